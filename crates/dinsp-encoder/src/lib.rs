#![warn(clippy::pedantic)]

pub mod error;
pub mod synth;
pub mod writer;

pub use error::EncodeError;
pub use synth::{SynthOptions, synthetic_file};
pub use writer::IntegralFileWriter;
