use dinsp_types::{IntegerWidth, SessionMetadata, ValueKind};
use log::debug;

use crate::error::DecodeError;

/// The two per-file choices every record decode depends on.
///
/// Fixed once before the file is opened and never renegotiated:
///
/// ```text
/// ┌───────┬──────────────────────────┬──────────────────────────────┐
/// │ Field │ Source                   │ Effect                       │
/// ├───────┼──────────────────────────┼──────────────────────────────┤
/// │ width │ metadata integer_size    │ i4 / i8 for every integer    │
/// │ kind  │ group_arith, is_spinfree │ r8 / z8 for integral values  │
/// └───────┴──────────────────────────┴──────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    pub width: IntegerWidth,
    pub kind: ValueKind,
}

impl SessionConfig {
    #[must_use]
    pub fn new(width: IntegerWidth, kind: ValueKind) -> Self {
        Self { width, kind }
    }

    /// Fix width and value kind from companion metadata.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::ConfigurationMissing`] when no metadata is available.
    /// - [`DecodeError::InvalidMetadata`] when the integer size is not 4 or 8.
    pub fn negotiate(metadata: Option<&SessionMetadata>) -> Result<Self, DecodeError> {
        let metadata = metadata.ok_or(DecodeError::ConfigurationMissing)?;
        let width = metadata
            .integer_width()
            .map_err(DecodeError::InvalidMetadata)?;
        let kind = metadata.value_kind();
        debug!(
            "negotiated session: {width} integers, {kind} integrals (group_arith={}, spinfree={})",
            metadata.group_arith, metadata.is_spinfree
        );
        Ok(Self { width, kind })
    }
}
