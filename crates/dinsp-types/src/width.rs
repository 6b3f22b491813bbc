use std::fmt;

use dinsp_wire::FieldKind;
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Byte width of every integer field in one integral file.
///
/// Different program builds write either 4-byte or 8-byte integers; the
/// choice is made once per file from the companion metadata and then
/// threaded through every layout of the session.
///
/// ```text
/// ┌────────┬───────┬────────────┬──────────────────┐
/// │ Width  │ Bytes │ Layout tag │ Index pair field │
/// ├────────┼───────┼────────────┼──────────────────┤
/// │ Narrow │ 4     │ i4         │ c8               │
/// │ Wide   │ 8     │ i8         │ c16              │
/// └────────┴───────┴────────────┴──────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegerWidth {
    Narrow,
    Wide,
}

impl IntegerWidth {
    /// Map a byte count from metadata to a width.
    ///
    /// # Errors
    ///
    /// [`TypeError::InvalidIntegerWidth`] for anything but 4 or 8.
    pub fn from_bytes(bytes: u8) -> Result<Self, TypeError> {
        match bytes {
            4 => Ok(Self::Narrow),
            8 => Ok(Self::Wide),
            other => Err(TypeError::InvalidIntegerWidth { bytes: other }),
        }
    }

    #[must_use]
    pub fn bytes(self) -> usize {
        match self {
            Self::Narrow => 4,
            Self::Wide => 8,
        }
    }

    /// Layout kind for a single integer of this width.
    #[must_use]
    pub fn field_kind(self) -> FieldKind {
        match self {
            Self::Narrow => FieldKind::Int4,
            Self::Wide => FieldKind::Int8,
        }
    }

    /// Layout kind for one `(k, l)` index pair, read as opaque bytes.
    #[must_use]
    pub fn pair_kind(self) -> FieldKind {
        FieldKind::Text(2 * self.bytes())
    }

    /// Decode one little-endian integer of this width from the start of
    /// `bytes`. Returns `None` if `bytes` is too short.
    #[must_use]
    pub fn decode(self, bytes: &[u8]) -> Option<i64> {
        match self {
            Self::Narrow => bytes
                .get(..4)
                .and_then(|b| <[u8; 4]>::try_from(b).ok())
                .map(|b| i64::from(i32::from_le_bytes(b))),
            Self::Wide => bytes
                .get(..8)
                .and_then(|b| <[u8; 8]>::try_from(b).ok())
                .map(i64::from_le_bytes),
        }
    }
}

impl fmt::Display for IntegerWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Narrow => f.write_str("int4"),
            Self::Wide => f.write_str("int8"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_bytes_accepts_only_four_and_eight() {
        assert_eq!(IntegerWidth::from_bytes(4), Ok(IntegerWidth::Narrow));
        assert_eq!(IntegerWidth::from_bytes(8), Ok(IntegerWidth::Wide));
        assert_eq!(
            IntegerWidth::from_bytes(2),
            Err(TypeError::InvalidIntegerWidth { bytes: 2 })
        );
    }

    #[test]
    fn kinds_follow_width() {
        assert_eq!(IntegerWidth::Narrow.field_kind().to_string(), "i4");
        assert_eq!(IntegerWidth::Wide.field_kind().to_string(), "i8");
        assert_eq!(IntegerWidth::Narrow.pair_kind().to_string(), "c8");
        assert_eq!(IntegerWidth::Wide.pair_kind().to_string(), "c16");
    }

    #[test]
    fn decode_sign_extends_narrow() {
        assert_eq!(IntegerWidth::Narrow.decode(&(-3i32).to_le_bytes()), Some(-3));
        assert_eq!(IntegerWidth::Wide.decode(&(1i64 << 40).to_le_bytes()), Some(1 << 40));
        assert_eq!(IntegerWidth::Wide.decode(&[0u8; 4]), None);
    }
}
