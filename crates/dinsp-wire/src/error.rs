use std::path::PathBuf;

/// Errors raised by the record layer: framing, layout parsing and field
/// decoding.
///
/// ```text
///   WireError
///   ├── NotFound             ← open() on a path that does not exist
///   ├── InvalidLayout        ← descriptor text rejected by the parser
///   ├── EndOfFile            ← clean EOF exactly at a record boundary
///   ├── UnexpectedEof        ← EOF inside a marker or payload
///   ├── MarkerMismatch       ← head and tail length markers disagree
///   ├── UnsupportedSubrecord ← negative head marker (continued record)
///   ├── NegativeCount        ← back-referenced count field is < 0
///   ├── BufferMismatch       ← caller buffer variant does not fit the field
///   ├── RecordTooLarge       ← writer payload exceeds the i32 marker range
///   ├── NothingToBackspace   ← backspace() at the start of the stream
///   ├── Poisoned             ← a previous operation failed on this handle
///   └── Io(std::io::Error)   ← from the underlying reader or writer
/// ```
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// The file to open does not exist.
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// A layout descriptor could not be parsed.
    ///
    /// `position` is the byte offset into the descriptor where the
    /// offending item starts.
    #[error("invalid layout {descriptor:?} at {position}: {reason}")]
    InvalidLayout {
        descriptor: String,
        position: usize,
        reason: &'static str,
    },

    /// No more records: the stream ended cleanly between two records.
    #[error("end of file at offset {offset}")]
    EndOfFile { offset: u64 },

    /// Input ended inside a record marker or payload.
    #[error("unexpected end of input at offset {offset}")]
    UnexpectedEof { offset: u64 },

    /// The trailing length marker does not repeat the leading one.
    #[error("record at offset {offset}: head marker {head} != tail marker {tail}")]
    MarkerMismatch { offset: u64, head: i32, tail: i32 },

    /// The head marker was negative, which marks a record split into
    /// sub-records. Only single-segment records are read.
    #[error("record at offset {offset} is split into sub-records (marker {marker})")]
    UnsupportedSubrecord { offset: u64, marker: i32 },

    /// A `[#k]` count resolved to a negative value.
    #[error("field {field} has negative element count {count}")]
    NegativeCount { field: usize, count: i64 },

    /// The buffer supplied for a field has the wrong variant, or a
    /// back-referenced field had no value yet.
    #[error("buffer for field {field} does not match layout kind {expected}")]
    BufferMismatch { field: usize, expected: &'static str },

    /// A payload is too long for a 4-byte record marker.
    #[error("record payload of {length} bytes exceeds the marker range")]
    RecordTooLarge { length: usize },

    /// `backspace()` was called before any record was read.
    #[error("no preceding record to backspace over")]
    NothingToBackspace,

    /// The handle carries a sticky error from an earlier operation.
    #[error("record stream is in error state")]
    Poisoned,

    /// I/O error during read, write or seek.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
