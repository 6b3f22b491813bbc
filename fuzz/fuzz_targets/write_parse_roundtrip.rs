#![no_main]

use std::io::Cursor;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use dinsp_decoder::{IntegralFileParser, SessionConfig};
use dinsp_encoder::IntegralFileWriter;
use dinsp_types::{IntegerWidth, ValueKind};
use dinsp_wire::RecordReader;

#[derive(Debug, Arbitrary)]
struct Block {
    row: i16,
    col: i16,
    values: Vec<(i16, i16, f64)>,
}

#[derive(Debug, Arbitrary)]
struct Input {
    wide: bool,
    pairs: Vec<(i16, i16)>,
    blocks: Vec<Block>,
}

// Fuzz target: write an integral file, parse it back.
//
// The parsed total must equal the sum of the written block sizes and the
// pair table must come back unchanged.
fuzz_target!(|input: Input| {
    let width = if input.wide { IntegerWidth::Wide } else { IntegerWidth::Narrow };
    let pairs: Vec<(i64, i64)> = input
        .pairs
        .iter()
        .map(|&(a, b)| (i64::from(a), i64::from(b)))
        .collect();

    let mut file = IntegralFileWriter::new(width, ValueKind::Real);
    file.header("fuzz", &pairs).unwrap();
    let mut expected = 0i64;
    for block in &input.blocks {
        if block.row == 0 && block.col == 0 {
            continue;
        }
        let indices: Vec<(i64, i64)> = block
            .values
            .iter()
            .map(|&(k, l, _)| (i64::from(k), i64::from(l)))
            .collect();
        let values: Vec<f64> = block.values.iter().map(|v| v.2).collect();
        file.real_block(i64::from(block.row), i64::from(block.col), &indices, &values)
            .unwrap();
        expected += values.len() as i64;
    }
    file.sentinel().unwrap();

    let summary = IntegralFileParser::new(
        RecordReader::new(Cursor::new(file.finish().unwrap())),
        SessionConfig::new(width, ValueKind::Real),
    )
    .unwrap()
    .parse()
    .unwrap();

    assert_eq!(summary.total_non_zero_count, expected);
    assert_eq!(summary.kramers_pairs.len(), pairs.len());
});
