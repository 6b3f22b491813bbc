use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::kind::ValueKind;
use crate::width::IntegerWidth;

/// Companion metadata an integral file cannot be read without.
///
/// This is what the header/metadata file of the same calculation
/// provides: the integer size the producing build used and the flags
/// that decide between real and complex integrals. It can also be
/// loaded from a JSON sidecar:
///
/// ```json
/// { "integer_size": 8, "group_arith": 2, "is_spinfree": false }
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMetadata {
    /// Integer size in bytes, 4 or 8.
    pub integer_size: u8,
    /// Arithmetic group: 1 real, 2 complex, 4 quaternion.
    pub group_arith: u8,
    #[serde(default)]
    pub is_spinfree: bool,
}

impl SessionMetadata {
    /// # Errors
    ///
    /// [`TypeError::InvalidIntegerWidth`] if `integer_size` is not 4 or 8.
    pub fn integer_width(&self) -> Result<IntegerWidth, TypeError> {
        IntegerWidth::from_bytes(self.integer_size)
    }

    #[must_use]
    pub fn value_kind(&self) -> ValueKind {
        ValueKind::from_arith(self.group_arith, self.is_spinfree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sidecar_json_defaults_spinfree() {
        let meta: SessionMetadata =
            serde_json::from_str(r#"{ "integer_size": 4, "group_arith": 2 }"#).unwrap();
        assert!(!meta.is_spinfree);
        assert_eq!(meta.integer_width(), Ok(IntegerWidth::Narrow));
        assert_eq!(meta.value_kind(), ValueKind::Complex);
    }
}
