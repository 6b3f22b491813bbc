use dinsp_types::{IntegerWidth, ValueKind};
use dinsp_wire::Complex64;

use crate::error::EncodeError;
use crate::writer::IntegralFileWriter;

/// Shape of a synthetic integral file.
///
/// Block `j` (0-based) holds `j % 4 + 1` integrals, capped at the square
/// of the spinor count, so the total is known without decoding.
#[derive(Clone, Debug, PartialEq)]
pub struct SynthOptions {
    pub width: IntegerWidth,
    pub kind: ValueKind,
    pub kramers_pairs: usize,
    pub blocks: usize,
    pub timestamp: String,
    /// Leave out the sentinel record.
    pub truncate: bool,
}

impl Default for SynthOptions {
    fn default() -> Self {
        Self {
            width: IntegerWidth::Narrow,
            kind: ValueKind::Real,
            kramers_pairs: 4,
            blocks: 16,
            timestamp: "2024-01-01 00:00".to_string(),
            truncate: false,
        }
    }
}

impl SynthOptions {
    fn spinors(&self) -> usize {
        2 * self.kramers_pairs
    }

    fn block_size(&self, block: usize) -> usize {
        (block % 4 + 1).min(self.spinors() * self.spinors())
    }

    /// Sum of block sizes the generated file will carry.
    #[must_use]
    pub fn expected_non_zero_count(&self) -> usize {
        (0..self.blocks).map(|j| self.block_size(j)).sum()
    }
}

/// Generate an integral file in memory.
///
/// # Errors
///
/// [`EncodeError::IndexOutOfRange`] if a narrow file is asked to hold
/// indices beyond the 4-byte range.
pub fn synthetic_file(options: &SynthOptions) -> Result<Vec<u8>, EncodeError> {
    let mut file = IntegralFileWriter::new(options.width, options.kind);

    let pairs: Vec<(i64, i64)> = (1..=to_i64(options.kramers_pairs))
        .map(|i| (2 * i - 1, 2 * i))
        .collect();
    file.header(&options.timestamp, &pairs)?;

    if options.kramers_pairs > 0 {
        let n = options.kramers_pairs;
        let spinors = options.spinors();
        for j in 0..options.blocks {
            let row = to_i64(j % n + 1);
            let col = to_i64(j / n % n + 1);
            let size = options.block_size(j);
            let indices: Vec<(i64, i64)> = (0..size)
                .map(|m| (to_i64(m % spinors + 1), to_i64(m / spinors % spinors + 1)))
                .collect();
            #[allow(clippy::cast_precision_loss)]
            let value = |m: usize| 1.0 / (j + m + 1) as f64;
            match options.kind {
                ValueKind::Real => {
                    let values: Vec<f64> = (0..size).map(value).collect();
                    file.real_block(row, col, &indices, &values)?;
                }
                ValueKind::Complex => {
                    let values: Vec<Complex64> =
                        (0..size).map(|m| Complex64::new(value(m), -value(m))).collect();
                    file.complex_block(row, col, &indices, &values)?;
                }
            }
        }
    }

    if !options.truncate {
        file.sentinel()?;
    }
    file.finish()
}

fn to_i64(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use dinsp_decoder::{IntegralFileParser, SessionConfig};
    use dinsp_wire::RecordReader;

    use super::*;

    fn parse(bytes: Vec<u8>, options: &SynthOptions) -> dinsp_types::ParseSummary {
        IntegralFileParser::new(
            RecordReader::new(Cursor::new(bytes)),
            SessionConfig::new(options.width, options.kind),
        )
        .unwrap()
        .parse()
        .unwrap()
    }

    #[test]
    fn totals_match_the_prediction() {
        for width in [IntegerWidth::Narrow, IntegerWidth::Wide] {
            for kind in [ValueKind::Real, ValueKind::Complex] {
                let options = SynthOptions {
                    width,
                    kind,
                    ..SynthOptions::default()
                };
                let summary = parse(synthetic_file(&options).unwrap(), &options);
                assert_eq!(summary.blocks_read, 16);
                assert_eq!(
                    summary.total_non_zero_count,
                    i64::try_from(options.expected_non_zero_count()).unwrap()
                );
                assert_eq!(summary.kramers_pairs.len(), 4);
            }
        }
    }

    #[test]
    fn block_size_capped_for_tiny_files() {
        let options = SynthOptions {
            kramers_pairs: 0,
            blocks: 3,
            ..SynthOptions::default()
        };
        assert_eq!(options.expected_non_zero_count(), 0);
        let summary = parse(synthetic_file(&options).unwrap(), &options);
        assert_eq!(summary.blocks_read, 0);
        assert!(summary.is_complete());
    }
}
