use std::path::PathBuf;

use dinsp_types::{ParseSummary, StreamState, TypeError};
use dinsp_wire::WireError;

/// Why a single record could not be turned into the expected values.
#[derive(Debug, thiserror::Error)]
pub enum RecordFault {
    /// The record ended before every layout field was decoded.
    #[error("decoded {decoded} of {expected} fields")]
    ShortRecord { decoded: usize, expected: usize },

    #[error(transparent)]
    Wire(#[from] WireError),

    #[error(transparent)]
    Type(#[from] TypeError),
}

/// Errors that stop an integral file session.
///
/// Every decode error is fatal to the file: records are packed without
/// delimiters, so once one is misread nothing after it can be trusted.
///
/// ```text
///   DecodeError
///   ├── FileNotFound          ← before any record is touched
///   ├── ConfigurationMissing  ← no companion metadata at all
///   ├── InvalidMetadata       ← metadata present but unusable
///   ├── HeaderDecode          ← leading record (timestamp, pair count)
///   ├── PairTableDecode       ← leading record re-read with the pair table
///   ├── BlockDecode           ← integral block record; also covers a file
///   │                           that ends before the sentinel
///   └── ShapeMismatch         ← block record longer than the session layout,
///                               i.e. complex values read as real
/// ```
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("integral file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Width and value kind are never guessed: a wrong guess misreads
    /// every record that follows.
    #[error("integral file cannot be parsed without companion metadata (integer size, arithmetic group)")]
    ConfigurationMissing,

    #[error("invalid companion metadata: {0}")]
    InvalidMetadata(TypeError),

    #[error("error while reading file header: {0}")]
    HeaderDecode(RecordFault),

    #[error("error while reading Kramers pair table: {0}")]
    PairTableDecode(RecordFault),

    /// `block` is the 1-based position of the failing record among the
    /// block records.
    #[error("error while reading integral block {block}: {fault}")]
    BlockDecode { block: u64, fault: RecordFault },

    #[error("integral block {block} left {trailing} bytes unread: value kind does not match the file")]
    ShapeMismatch { block: u64, trailing: usize },
}

impl DecodeError {
    /// Whether the error looks like the file simply stopping early, as
    /// opposed to bytes that are present but inconsistent.
    ///
    /// Both are reported as [`DecodeError::BlockDecode`]; this only
    /// refines the diagnostic.
    #[must_use]
    pub fn is_truncation(&self) -> bool {
        matches!(
            self,
            Self::BlockDecode {
                fault: RecordFault::ShortRecord { .. }
                    | RecordFault::Wire(WireError::EndOfFile { .. } | WireError::UnexpectedEof { .. }),
                ..
            }
        )
    }
}

/// A session that stopped on an error, with whatever it had
/// accumulated up to that point.
///
/// `partial.total_non_zero_count` counts fully decoded blocks only.
#[derive(Debug, thiserror::Error)]
#[error(
    "integral stream stopped after {} blocks ({} non-zero integrals): {error}",
    .partial.blocks_read,
    .partial.total_non_zero_count
)]
pub struct ParseFailure {
    pub partial: ParseSummary,
    pub error: DecodeError,
}

impl ParseFailure {
    /// A failure before anything was read.
    #[must_use]
    pub fn empty(error: DecodeError) -> Self {
        Self {
            partial: ParseSummary {
                state: StreamState::Failed,
                ..ParseSummary::default()
            },
            error,
        }
    }
}
