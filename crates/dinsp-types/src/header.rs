use serde::Serialize;

use crate::error::TypeError;

/// Width of the timestamp text at the start of an integral file.
pub const TIMESTAMP_LEN: usize = 18;

/// Leading record of an integral file.
///
/// ```text
/// ┌──────────────────┬──────────────┬──────────────────────────────┐
/// │ timestamp (c18)  │ nkr (iW)     │ kr pairs (iW × 2·nkr)        │
/// └──────────────────┴──────────────┴──────────────────────────────┘
///   └──── FileHeader ──────────────┘ └──── KramersPairTable ──────┘
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FileHeader {
    /// Creation date and time, trimmed to its printable prefix.
    pub timestamp: String,
    pub kramers_pair_count: usize,
}

impl FileHeader {
    /// Build a header from the raw timestamp field and the pair count.
    ///
    /// # Errors
    ///
    /// [`TypeError::NegativeValue`] if the count is negative.
    pub fn from_raw(timestamp: &[u8], kramers_pair_count: i64) -> Result<Self, TypeError> {
        let kramers_pair_count =
            usize::try_from(kramers_pair_count).map_err(|_| TypeError::NegativeValue {
                field: "kramers_pair_count",
                value: kramers_pair_count,
            })?;
        Ok(Self {
            timestamp: printable_prefix(timestamp),
            kramers_pair_count,
        })
    }

    /// Number of spinors described by the pair table (two per pair).
    #[must_use]
    pub fn spinor_count(&self) -> usize {
        2 * self.kramers_pair_count
    }
}

/// Cut a fixed-width text field at [`TIMESTAMP_LEN`], then at the first
/// byte that is not printable ASCII, and drop trailing blanks.
fn printable_prefix(raw: &[u8]) -> String {
    let field = &raw[..raw.len().min(TIMESTAMP_LEN)];
    let end = field
        .iter()
        .position(|&b| !(b.is_ascii_graphic() || b == b' '))
        .unwrap_or(field.len());
    String::from_utf8_lossy(&field[..end]).trim_end().to_string()
}

/// Two spinor labels related by time reversal, 1-based as stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct KramersPair {
    pub spinor_a: i64,
    pub spinor_b: i64,
}

/// The Kramers pairs of a file, in file order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct KramersPairTable(Vec<KramersPair>);

impl KramersPairTable {
    /// Group a flat `a0, b0, a1, b1, ...` index list into pairs.
    ///
    /// # Errors
    ///
    /// [`TypeError::OddPairTable`] if the list length is odd.
    pub fn from_flat(indices: &[i64]) -> Result<Self, TypeError> {
        if indices.len() % 2 != 0 {
            return Err(TypeError::OddPairTable { len: indices.len() });
        }
        Ok(Self(
            indices
                .chunks_exact(2)
                .map(|p| KramersPair {
                    spinor_a: p[0],
                    spinor_b: p[1],
                })
                .collect(),
        ))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, KramersPair> {
        self.0.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[KramersPair] {
        &self.0
    }
}

impl From<Vec<KramersPair>> for KramersPairTable {
    fn from(pairs: Vec<KramersPair>) -> Self {
        Self(pairs)
    }
}

impl<'a> IntoIterator for &'a KramersPairTable {
    type Item = &'a KramersPair;
    type IntoIter = std::slice::Iter<'a, KramersPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_is_cut_at_eighteen_bytes() {
        let header = FileHeader::from_raw(b"Mon Jan  1 12:00:00 2024 extra", 1).unwrap();
        assert_eq!(header.timestamp, "Mon Jan  1 12:00:0");
    }

    #[test]
    fn timestamp_stops_at_nul_and_drops_padding() {
        let header = FileHeader::from_raw(b"2024-01-01 00:00  ", 0).unwrap();
        assert_eq!(header.timestamp, "2024-01-01 00:00");
        let header = FileHeader::from_raw(b"12:00\0garbage", 0).unwrap();
        assert_eq!(header.timestamp, "12:00");
    }

    #[test]
    fn negative_count_rejected() {
        assert_eq!(
            FileHeader::from_raw(b"x", -2),
            Err(TypeError::NegativeValue {
                field: "kramers_pair_count",
                value: -2
            })
        );
    }

    #[test]
    fn pairs_in_file_order() {
        let table = KramersPairTable::from_flat(&[1, 2, 3, 4]).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.as_slice()[1],
            KramersPair {
                spinor_a: 3,
                spinor_b: 4
            }
        );
    }

    #[test]
    fn odd_flat_list_rejected() {
        assert_eq!(
            KramersPairTable::from_flat(&[1, 2, 3]),
            Err(TypeError::OddPairTable { len: 3 })
        );
    }
}
