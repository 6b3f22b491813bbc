//! Sessions opened from paths: metadata negotiation, missing files and
//! files written to disk.

use std::fs;

use dinsp_decoder::{DecodeError, IntegralFileParser, parse_file};
use dinsp_encoder::{IntegralFileWriter, SynthOptions, synthetic_file};
use dinsp_report::{DefaultReporter, InspectReport, ReportConfig, ReportFormat, Reporter};
use dinsp_tests::{PAIRS, TIMESTAMP, metadata, reference_file};
use dinsp_types::{IntegerWidth, SessionMetadata, StreamState, ValueKind};
use tempfile::TempDir;

#[test]
fn parse_file_from_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("MDCINT");
    fs::write(&path, reference_file(IntegerWidth::Wide, ValueKind::Complex)).unwrap();

    let meta = metadata(IntegerWidth::Wide, ValueKind::Complex);
    let summary = parse_file(&path, Some(&meta)).unwrap();
    assert_eq!(summary.total_non_zero_count, 5);
    assert_eq!(summary.state, StreamState::Terminated);
}

#[test]
fn writer_can_target_a_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("MDCINT");
    let mut file = IntegralFileWriter::create(&path, IntegerWidth::Narrow, ValueKind::Real).unwrap();
    file.header(TIMESTAMP, &PAIRS)
        .unwrap()
        .real_block(2, 1, &[(1, 1)], &[0.5])
        .unwrap()
        .sentinel()
        .unwrap();
    file.finish().unwrap();

    let meta = metadata(IntegerWidth::Narrow, ValueKind::Real);
    let summary = IntegralFileParser::open(&path, Some(&meta))
        .unwrap()
        .parse()
        .unwrap();
    assert_eq!(summary.total_non_zero_count, 1);
}

#[test]
fn missing_file_gives_empty_summary() {
    let dir = TempDir::new().unwrap();
    let meta = metadata(IntegerWidth::Narrow, ValueKind::Real);
    let failure = parse_file(dir.path().join("absent"), Some(&meta)).unwrap_err();

    assert!(matches!(failure.error, DecodeError::FileNotFound { .. }));
    assert_eq!(failure.partial.total_non_zero_count, 0);
    assert_eq!(failure.partial.blocks_read, 0);
    assert!(failure.partial.header.is_none());
}

#[test]
fn missing_metadata_fails_before_reading() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("MDCINT");
    fs::write(&path, reference_file(IntegerWidth::Narrow, ValueKind::Real)).unwrap();

    let failure = parse_file(&path, None).unwrap_err();
    assert!(matches!(failure.error, DecodeError::ConfigurationMissing));
    assert_eq!(failure.partial.total_non_zero_count, 0);
    assert!(failure.partial.kramers_pairs.is_empty());
}

#[test]
fn unsupported_integer_size() {
    let meta = SessionMetadata {
        integer_size: 16,
        group_arith: 1,
        is_spinfree: false,
    };
    let failure = parse_file("MDCINT", Some(&meta)).unwrap_err();
    assert!(matches!(failure.error, DecodeError::InvalidMetadata(_)));
}

#[test]
fn metadata_sidecar_selects_the_session() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("MDCINT");
    fs::write(&path, reference_file(IntegerWidth::Wide, ValueKind::Real)).unwrap();

    // complex group, but spin-free runs always store real integrals
    let meta: SessionMetadata =
        serde_json::from_str(r#"{ "integer_size": 8, "group_arith": 4, "is_spinfree": true }"#)
            .unwrap();
    let parser = IntegralFileParser::open(&path, Some(&meta)).unwrap();
    assert_eq!(parser.config().kind, ValueKind::Real);
    assert_eq!(parser.parse().unwrap().total_non_zero_count, 5);
}

#[test]
fn synthetic_file_json_report() {
    let options = SynthOptions {
        width: IntegerWidth::Wide,
        kind: ValueKind::Complex,
        kramers_pairs: 3,
        blocks: 9,
        ..SynthOptions::default()
    };
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("MDCINT");
    fs::write(&path, synthetic_file(&options).unwrap()).unwrap();

    let meta = metadata(options.width, options.kind);
    let summary = parse_file(&path, Some(&meta)).unwrap();
    let report = InspectReport::new("MDCINT", options.width, options.kind, summary);
    let config = ReportConfig {
        format: ReportFormat::Json,
        ..ReportConfig::default()
    };
    let json: serde_json::Value =
        serde_json::from_str(&DefaultReporter.render(&report, &config).unwrap()).unwrap();

    assert_eq!(json["blocks_read"], 9);
    assert_eq!(
        json["total_non_zero_count"],
        options.expected_non_zero_count()
    );
    assert_eq!(json["header"]["kramers_pair_count"], 3);
    assert_eq!(json["kramers_pairs"][2]["spinor_b"], 6);
    assert_eq!(json["state"], "terminated");
}
