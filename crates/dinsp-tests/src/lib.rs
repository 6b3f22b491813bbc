//! Shared fixtures for the integration tests and benchmarks.

use std::io::Cursor;

use dinsp_decoder::{IntegralFileParser, SessionConfig};
use dinsp_encoder::IntegralFileWriter;
use dinsp_types::{IntegerWidth, ParseSummary, SessionMetadata, ValueKind};
use dinsp_wire::{Complex64, RecordReader};

pub const TIMESTAMP: &str = "2024-01-01 00:00";

/// Kramers pairs of the reference file.
pub const PAIRS: [(i64, i64); 2] = [(1, 2), (3, 4)];

/// Parser over an in-memory file.
///
/// # Panics
///
/// If the session layouts cannot be built.
#[must_use]
pub fn parser(
    bytes: Vec<u8>,
    width: IntegerWidth,
    kind: ValueKind,
) -> IntegralFileParser<Cursor<Vec<u8>>> {
    IntegralFileParser::new(
        RecordReader::new(Cursor::new(bytes)),
        SessionConfig::new(width, kind),
    )
    .expect("session layouts")
}

/// Metadata as the upstream run would record it.
#[must_use]
pub fn metadata(width: IntegerWidth, kind: ValueKind) -> SessionMetadata {
    SessionMetadata {
        integer_size: u8::try_from(width.bytes()).expect("4 or 8"),
        group_arith: match kind {
            ValueKind::Real => ValueKind::REAL_GROUP,
            ValueKind::Complex => 2,
        },
        is_spinfree: false,
    }
}

/// Append a block of `size` integrals of the writer's kind.
///
/// # Panics
///
/// If the writer rejects the block.
pub fn push_block(
    file: &mut IntegralFileWriter<Vec<u8>>,
    kind: ValueKind,
    row: i64,
    col: i64,
    size: usize,
) {
    let pairs: Vec<(i64, i64)> = (1..=size as i64).map(|m| (m, m + 1)).collect();
    match kind {
        ValueKind::Real => {
            let values: Vec<f64> = (0..size).map(|m| m as f64 * 0.125).collect();
            file.real_block(row, col, &pairs, &values).expect("real block");
        }
        ValueKind::Complex => {
            let values: Vec<Complex64> = (0..size)
                .map(|m| Complex64::new(m as f64, -(m as f64)))
                .collect();
            file.complex_block(row, col, &pairs, &values)
                .expect("complex block");
        }
    }
}

/// The reference file: two pairs, blocks `(1,1,3)` and `(1,2,2)`, sentinel.
///
/// # Panics
///
/// If encoding fails.
#[must_use]
pub fn reference_file(width: IntegerWidth, kind: ValueKind) -> Vec<u8> {
    file_with_blocks(width, kind, &[(1, 1, 3), (1, 2, 2)], true)
}

/// A file with the reference header and the given `(row, col, size)`
/// blocks, optionally closed by the sentinel.
///
/// # Panics
///
/// If encoding fails.
#[must_use]
pub fn file_with_blocks(
    width: IntegerWidth,
    kind: ValueKind,
    blocks: &[(i64, i64, usize)],
    sentinel: bool,
) -> Vec<u8> {
    let mut file = IntegralFileWriter::new(width, kind);
    file.header(TIMESTAMP, &PAIRS).expect("header");
    for &(row, col, size) in blocks {
        push_block(&mut file, kind, row, col, size);
    }
    if sentinel {
        file.sentinel().expect("sentinel");
    }
    file.finish().expect("finish")
}

/// The summary with timing cleared, for comparisons.
#[must_use]
pub fn untimed(mut summary: ParseSummary) -> ParseSummary {
    summary.elapsed = std::time::Duration::ZERO;
    summary
}
