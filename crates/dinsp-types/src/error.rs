/// Errors raised while turning raw decoded fields into typed values.
///
/// These sit above [`WireError`](dinsp_wire::WireError): the bytes were
/// framed and split correctly, but what they say does not make sense
/// for an integral file.
///
/// ```text
/// ┌──────────────────────────────────────────────────────┐
/// │ TypeError (this crate)                               │
/// │   ├── InvalidIntegerWidth  metadata byte size ∉ {4,8} │
/// │   ├── NegativeValue        a count or size below zero │
/// │   └── OddPairTable         flat index list not pairs  │
/// └──────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TypeError {
    /// The metadata named an integer size other than 4 or 8 bytes.
    #[error("unsupported integer size: {bytes} bytes (expected 4 or 8)")]
    InvalidIntegerWidth { bytes: u8 },

    /// A field that counts things held a negative value.
    #[error("{field} must not be negative, got {value}")]
    NegativeValue { field: &'static str, value: i64 },

    /// A flat index list had an odd number of entries.
    #[error("pair table holds {len} indices, which is not an even number")]
    OddPairTable { len: usize },
}
