use dinsp_wire::Complex64;

use crate::kind::ValueKind;
use crate::width::IntegerWidth;

/// The `(k, l)` spinor indices of one non-zero integral.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexPair {
    pub k: i64,
    pub l: i64,
}

impl IndexPair {
    /// Split packed pair bytes (`k | l` per element, `width` bytes each)
    /// into pairs. A trailing partial element is ignored.
    pub fn decode_all(width: IntegerWidth, bytes: &[u8]) -> impl Iterator<Item = Self> + '_ {
        let w = width.bytes();
        bytes.chunks_exact(2 * w).filter_map(move |chunk| {
            Some(Self {
                k: width.decode(&chunk[..w])?,
                l: width.decode(&chunk[w..])?,
            })
        })
    }
}

/// Integral values of one block, in one of the two interpretations.
#[derive(Clone, Debug, PartialEq)]
pub enum IntegralValues {
    Real(Vec<f64>),
    Complex(Vec<Complex64>),
}

impl IntegralValues {
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Real(_) => ValueKind::Real,
            Self::Complex(_) => ValueKind::Complex,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Real(v) => v.len(),
            Self::Complex(v) => v.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One chunk of non-zero two-electron integrals for a pair of Kramers
/// pair indices.
///
/// ```text
/// ┌─────┬─────┬───────┬──────────────────────┬─────────────────────┐
/// │ ikr │ jkr │ nonzr │ (k, l) × nonzr       │ value × nonzr       │
/// └─────┴─────┴───────┴──────────────────────┴─────────────────────┘
/// ```
///
/// `ikr == 0 && jkr == 0` marks the end of the stream and never carries
/// integrals.
#[derive(Clone, Debug, PartialEq)]
pub struct IntegralBlock {
    pub row_index: i64,
    pub col_index: i64,
    pub index_pairs: Vec<IndexPair>,
    pub values: IntegralValues,
}

impl IntegralBlock {
    /// Number of integrals in the block.
    #[must_use]
    pub fn block_size(&self) -> usize {
        self.index_pairs.len()
    }

    #[must_use]
    pub fn is_sentinel(&self) -> bool {
        is_sentinel(self.row_index, self.col_index)
    }
}

/// End-of-stream test on the two leading block indices.
#[must_use]
pub fn is_sentinel(row_index: i64, col_index: i64) -> bool {
    row_index == 0 && col_index == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_decode_at_both_widths() {
        let mut narrow = Vec::new();
        for v in [1i32, 2, 3, 4] {
            narrow.extend_from_slice(&v.to_le_bytes());
        }
        let mut wide = Vec::new();
        for v in [1i64, 2, 3, 4] {
            wide.extend_from_slice(&v.to_le_bytes());
        }

        let a: Vec<_> = IndexPair::decode_all(IntegerWidth::Narrow, &narrow).collect();
        let b: Vec<_> = IndexPair::decode_all(IntegerWidth::Wide, &wide).collect();
        assert_eq!(a, b);
        assert_eq!(a, vec![IndexPair { k: 1, l: 2 }, IndexPair { k: 3, l: 4 }]);
    }

    #[test]
    fn sentinel_needs_both_indices_zero() {
        assert!(is_sentinel(0, 0));
        assert!(!is_sentinel(0, 1));
        assert!(!is_sentinel(1, 0));
    }

    #[test]
    fn block_size_counts_pairs() {
        let block = IntegralBlock {
            row_index: 1,
            col_index: 2,
            index_pairs: vec![IndexPair { k: 1, l: 1 }; 3],
            values: IntegralValues::Real(vec![0.0; 3]),
        };
        assert_eq!(block.block_size(), 3);
        assert_eq!(block.values.kind(), ValueKind::Real);
        assert!(!block.is_sentinel());
    }
}
