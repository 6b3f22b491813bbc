#![warn(clippy::pedantic)]

pub mod error;
pub mod field;
pub mod layout;
pub mod reader;
pub mod writer;

pub use error::WireError;
pub use field::FieldBuf;
pub use layout::{Count, FieldKind, FieldSpec, Layout, MAX_FIELDS};
pub use reader::{MARKER_SIZE, ReadCount, RecordInfo, RecordReader};
pub use writer::{RecordBuilder, RecordWriter};

// Re-exported so downstream crates name complex values through one path.
pub use num::complex::Complex64;
