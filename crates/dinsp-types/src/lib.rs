#![warn(clippy::pedantic)]

pub mod block;
pub mod error;
pub mod header;
pub mod kind;
pub mod metadata;
pub mod summary;
pub mod width;

pub use block::{IndexPair, IntegralBlock, IntegralValues, is_sentinel};
pub use error::TypeError;
pub use header::{FileHeader, KramersPair, KramersPairTable, TIMESTAMP_LEN};
pub use kind::ValueKind;
pub use metadata::SessionMetadata;
pub use summary::{ParseSummary, StreamEvent, StreamState};
pub use width::IntegerWidth;
