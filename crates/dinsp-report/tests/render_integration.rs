//! Integration test: encode → parse → report
//!
//! Builds small integral files with the encoder, parses them with the
//! decoder and checks the rendered text against inline snapshots. Timing
//! is switched off so the output is stable.

use std::io::Cursor;

use dinsp_decoder::{IntegralFileParser, SessionConfig};
use dinsp_encoder::IntegralFileWriter;
use dinsp_report::{BlockEntry, DefaultReporter, InspectReport, ReportConfig, Reporter};
use dinsp_types::{IntegerWidth, ValueKind};
use dinsp_wire::RecordReader;
use insta::assert_snapshot;

fn parser(bytes: Vec<u8>) -> IntegralFileParser<Cursor<Vec<u8>>> {
    IntegralFileParser::new(
        RecordReader::new(Cursor::new(bytes)),
        SessionConfig::new(IntegerWidth::Narrow, ValueKind::Real),
    )
    .expect("layouts build")
}

fn two_pair_file(finish: bool) -> Vec<u8> {
    let mut file = IntegralFileWriter::new(IntegerWidth::Narrow, ValueKind::Real);
    file.header("2024-01-01 00:00", &[(1, 2), (3, 4)]).unwrap();
    file.real_block(1, 1, &[(1, 1), (1, 2), (2, 2)], &[0.1, 0.2, 0.3])
        .unwrap();
    if finish {
        file.real_block(1, 2, &[(1, 3), (2, 4)], &[0.4, 0.5]).unwrap();
        file.sentinel().unwrap();
    }
    file.finish().unwrap()
}

fn untimed() -> ReportConfig {
    ReportConfig {
        show_timing: false,
        ..ReportConfig::default()
    }
}

#[test]
fn complete_file_text_report() {
    let summary = parser(two_pair_file(true)).parse().unwrap();
    let report = InspectReport::new("MDCINT", IntegerWidth::Narrow, ValueKind::Real, summary);
    let text = DefaultReporter.render(&report, &untimed()).unwrap();

    assert_snapshot!(text, @r"
    two-electron integrals file
    file                       MDCINT
    integers / integrals       int4 / real
    date and time              2024-01-01 00:00
    number of Kramers pairs    2
       1   2
       3   4
    number of non-zero ints    5
    ");
}

#[test]
fn block_listing() {
    let mut blocks = Vec::new();
    let summary = parser(two_pair_file(true))
        .parse_with(|b| {
            blocks.push(BlockEntry {
                row_index: b.row_index,
                col_index: b.col_index,
                block_size: b.block_size,
            });
        })
        .unwrap();
    let report = InspectReport::new("MDCINT", IntegerWidth::Narrow, ValueKind::Real, summary)
        .with_blocks(blocks);
    let config = ReportConfig {
        show_pairs: false,
        show_blocks: true,
        ..untimed()
    };
    let text = DefaultReporter.render(&report, &config).unwrap();

    assert_snapshot!(text, @r"
    two-electron integrals file
    file                       MDCINT
    integers / integrals       int4 / real
    date and time              2024-01-01 00:00
    number of Kramers pairs    2
         row     col      size
           1       1         3
           1       2         2
    number of non-zero ints    5
    ");
}

#[test]
fn truncated_file_reports_partial_count() {
    let failure = parser(two_pair_file(false)).parse().unwrap_err();
    let report = InspectReport::new(
        "MDCINT",
        IntegerWidth::Narrow,
        ValueKind::Real,
        failure.partial,
    )
    .with_error(failure.error.to_string());
    let text = DefaultReporter.render(&report, &untimed()).unwrap();

    assert!(text.contains("number of non-zero ints    3\n"));
    assert!(text.contains("stopped                    after 1 blocks: error while reading integral block 2"));
}
