use num::complex::Complex64;

use crate::layout::FieldKind;

/// Caller-owned output buffer for one layout field.
///
/// Integers of either width are widened to `i64` and single-precision
/// reals to `f64`, so the same buffer type serves narrow and wide files.
/// Text fields keep their raw bytes; arrays of text elements are stored
/// back to back.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldBuf {
    Text(Vec<u8>),
    Int(Vec<i64>),
    Real(Vec<f64>),
    Complex(Vec<Complex64>),
}

impl FieldBuf {
    /// Create an empty buffer of the variant matching `kind`, reserving
    /// room for `elements` elements.
    #[must_use]
    pub fn for_kind(kind: FieldKind, elements: usize) -> Self {
        match kind {
            FieldKind::Text(n) => Self::Text(Vec::with_capacity(n.saturating_mul(elements))),
            FieldKind::Int4 | FieldKind::Int8 => Self::Int(Vec::with_capacity(elements)),
            FieldKind::Real4 | FieldKind::Real8 => Self::Real(Vec::with_capacity(elements)),
            FieldKind::Complex4 | FieldKind::Complex8 => {
                Self::Complex(Vec::with_capacity(elements))
            }
        }
    }

    /// Number of decoded elements (bytes, for text).
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Text(v) => v.len(),
            Self::Int(v) => v.len(),
            Self::Real(v) => v.len(),
            Self::Complex(v) => v.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        match self {
            Self::Text(v) => v.clear(),
            Self::Int(v) => v.clear(),
            Self::Real(v) => v.clear(),
            Self::Complex(v) => v.clear(),
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&[u8]> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_ints(&self) -> Option<&[i64]> {
        match self {
            Self::Int(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_reals(&self) -> Option<&[f64]> {
        match self {
            Self::Real(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_complex(&self) -> Option<&[Complex64]> {
        match self {
            Self::Complex(v) => Some(v),
            _ => None,
        }
    }

    /// First integer of an `Int` buffer, the value of a scalar field.
    #[must_use]
    pub fn first_int(&self) -> Option<i64> {
        self.as_ints().and_then(|v| v.first().copied())
    }

    /// Whether this buffer can receive elements of `kind`.
    pub(crate) fn accepts(&self, kind: FieldKind) -> bool {
        matches!(
            (self, kind),
            (Self::Text(_), FieldKind::Text(_))
                | (Self::Int(_), FieldKind::Int4 | FieldKind::Int8)
                | (Self::Real(_), FieldKind::Real4 | FieldKind::Real8)
                | (Self::Complex(_), FieldKind::Complex4 | FieldKind::Complex8)
        )
    }

    /// Replace the contents with the elements packed in `bytes`.
    ///
    /// `bytes.len()` must be a multiple of `kind.element_size()` and the
    /// variant must accept `kind`; the reader checks both beforehand.
    pub(crate) fn fill(&mut self, kind: FieldKind, bytes: &[u8]) {
        self.clear();
        match (self, kind) {
            (Self::Text(v), FieldKind::Text(_)) => v.extend_from_slice(bytes),
            (Self::Int(v), FieldKind::Int4) => v.extend(
                bytes
                    .chunks_exact(4)
                    .map(|c| i64::from(i32::from_le_bytes(array4(c)))),
            ),
            (Self::Int(v), FieldKind::Int8) => {
                v.extend(bytes.chunks_exact(8).map(|c| i64::from_le_bytes(array8(c))));
            }
            (Self::Real(v), FieldKind::Real4) => v.extend(
                bytes
                    .chunks_exact(4)
                    .map(|c| f64::from(f32::from_le_bytes(array4(c)))),
            ),
            (Self::Real(v), FieldKind::Real8) => {
                v.extend(bytes.chunks_exact(8).map(|c| f64::from_le_bytes(array8(c))));
            }
            (Self::Complex(v), FieldKind::Complex4) => v.extend(bytes.chunks_exact(8).map(|c| {
                Complex64::new(
                    f64::from(f32::from_le_bytes(array4(&c[..4]))),
                    f64::from(f32::from_le_bytes(array4(&c[4..]))),
                )
            })),
            (Self::Complex(v), FieldKind::Complex8) => v.extend(bytes.chunks_exact(16).map(|c| {
                Complex64::new(
                    f64::from_le_bytes(array8(&c[..8])),
                    f64::from_le_bytes(array8(&c[8..])),
                )
            })),
            _ => {}
        }
    }
}

fn array4(chunk: &[u8]) -> [u8; 4] {
    let mut out = [0u8; 4];
    out.copy_from_slice(chunk);
    out
}

fn array8(chunk: &[u8]) -> [u8; 8] {
    let mut out = [0u8; 8];
    out.copy_from_slice(chunk);
    out
}
