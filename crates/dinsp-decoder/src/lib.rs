#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod header;
pub mod layouts;
pub mod parser;
pub mod stream;

pub use config::SessionConfig;
pub use error::{DecodeError, ParseFailure, RecordFault};
pub use header::read_header_and_pairs;
pub use layouts::SessionLayouts;
pub use parser::{IntegralFileParser, SessionHeader, parse_file};
pub use stream::{BlockRef, BlockStream, ValuesRef};
