#![no_main]

use libfuzzer_sys::fuzz_target;
use dinsp_wire::Layout;

// Fuzz target: layout descriptor parsing.
//
// Any descriptor that parses must print in canonical form and reparse to
// the same layout.
fuzz_target!(|data: &str| {
    if let Ok(layout) = Layout::parse(data) {
        let canonical = layout.to_string();
        let reparsed = Layout::parse(&canonical).unwrap();
        assert_eq!(reparsed, layout);
    }
});
