#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;
use dinsp_wire::{RecordReader, MARKER_SIZE};

// Fuzz target: record framing.
//
// Catches bugs in:
// - Negative or oversized length markers
// - Truncated payloads and tail markers
// - Backspace over damaged records
fuzz_target!(|data: &[u8]| {
    let mut reader = RecordReader::new(Cursor::new(data));
    let mut end = 0u64;
    while let Ok(Some(info)) = reader.skip() {
        end = info.offset + (info.length + 2 * MARKER_SIZE) as u64;
        assert!(end <= data.len() as u64);
    }
    if !reader.error() {
        assert_eq!(end, reader.offset());
    }
});
