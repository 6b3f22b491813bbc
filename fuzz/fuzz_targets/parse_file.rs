#![no_main]

use std::io::Cursor;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use dinsp_decoder::{IntegralFileParser, SessionConfig};
use dinsp_types::{IntegerWidth, StreamState, ValueKind};
use dinsp_wire::RecordReader;

#[derive(Debug, Arbitrary)]
struct Input {
    wide: bool,
    complex: bool,
    bytes: Vec<u8>,
}

// Fuzz target: full integral session over arbitrary bytes.
//
// The parser must never panic, and a failed session's partial summary
// must be in the failed state.
fuzz_target!(|input: Input| {
    let width = if input.wide { IntegerWidth::Wide } else { IntegerWidth::Narrow };
    let kind = if input.complex { ValueKind::Complex } else { ValueKind::Real };
    let parser = IntegralFileParser::new(
        RecordReader::new(Cursor::new(input.bytes)),
        SessionConfig::new(width, kind),
    )
    .unwrap();

    match parser.parse() {
        Ok(summary) => {
            assert_eq!(summary.state, StreamState::Terminated);
            assert!(summary.total_non_zero_count >= 0);
        }
        Err(failure) => assert_eq!(failure.partial.state, StreamState::Failed),
    }
});
