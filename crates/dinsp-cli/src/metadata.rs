use std::fs;

use anyhow::{Context, Result};
use dinsp_types::SessionMetadata;

use crate::{Arith, MetadataArgs};

/// Arithmetic group written for complex runs; any value above one selects
/// complex integrals.
const COMPLEX_GROUP: u8 = 2;

impl Arith {
    pub fn group(self) -> u8 {
        match self {
            Self::Real => dinsp_types::ValueKind::REAL_GROUP,
            Self::Complex => COMPLEX_GROUP,
        }
    }
}

impl MetadataArgs {
    /// Collect the session metadata from the command line.
    ///
    /// `Ok(None)` when neither `--metadata` nor `--int-size`/`--arith`
    /// was given; the parser turns that into a configuration error.
    ///
    /// # Errors
    ///
    /// Returns an error if the metadata file cannot be read or is not
    /// valid JSON.
    pub fn load(&self) -> Result<Option<SessionMetadata>> {
        if let Some(path) = &self.metadata {
            let text = fs::read_to_string(path)
                .with_context(|| format!("cannot read metadata {}", path.display()))?;
            let mut metadata: SessionMetadata = serde_json::from_str(&text)
                .with_context(|| format!("invalid metadata JSON in {}", path.display()))?;
            metadata.is_spinfree |= self.spinfree;
            return Ok(Some(metadata));
        }

        Ok(self
            .int_size
            .zip(self.arith)
            .map(|(integer_size, arith)| SessionMetadata {
                integer_size,
                group_arith: arith.group(),
                is_spinfree: self.spinfree,
            }))
    }
}
