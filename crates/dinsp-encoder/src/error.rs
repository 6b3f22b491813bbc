use dinsp_types::ValueKind;
use dinsp_wire::WireError;

/// Errors that can occur while writing an integral file.
///
/// The writer enforces record order and per-record consistency, and
/// propagates lower-level framing and I/O errors.
///
/// Error hierarchy:
///
/// ```text
///   EncodeError
///   ├── HeaderMissing      ← block or sentinel before the header
///   ├── HeaderRepeated     ← header() called twice
///   ├── AfterSentinel      ← any record after the sentinel
///   ├── SentinelIndices    ← a data block with row = col = 0
///   ├── LengthMismatch     ← pair and value slices differ in length
///   ├── KindMismatch       ← real values for a complex file or vice versa
///   ├── IndexOutOfRange    ← integer does not fit the file's width
///   ├── Wire(WireError)    ← from dinsp-wire framing
///   └── Io(std::io::Error) ← from underlying I/O writes
/// ```
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("the file header must be written before any block")]
    HeaderMissing,

    #[error("the file header has already been written")]
    HeaderRepeated,

    #[error("no record may follow the end-of-stream sentinel")]
    AfterSentinel,

    #[error("block indices (0, 0) are reserved for the sentinel")]
    SentinelIndices,

    #[error("block has {pairs} index pairs but {values} values")]
    LengthMismatch { pairs: usize, values: usize },

    #[error("{given} values cannot be written to a {expected} integral file")]
    KindMismatch { expected: ValueKind, given: ValueKind },

    #[error("integer {value} does not fit a 4-byte field")]
    IndexOutOfRange { value: i64 },

    #[error(transparent)]
    Wire(#[from] WireError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
