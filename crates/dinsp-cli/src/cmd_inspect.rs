/// Implementation of `dinsp inspect`.
///
/// Parses an integral file and prints its header, Kramers pair table,
/// non-zero integral count and read time. A file that stops before its
/// sentinel is still reported, with the partial count and the error,
/// before the command fails.
///
/// # Output format
///
/// ```text
/// two-electron integrals file
/// file                       MDCINT
/// integers / integrals       int4 / real
/// date and time              2024-01-01 00:00
/// number of Kramers pairs    2
///    1   2
///    3   4
/// number of non-zero ints    5
/// time for reading 2e ints   0.00 sec
/// ```
use anyhow::{Context, Result};
use dinsp_decoder::IntegralFileParser;
use dinsp_report::{
    BlockEntry, DefaultReporter, InspectReport, ReportConfig, ReportFormat, Reporter,
};

use crate::InspectArgs;

/// Run the `dinsp inspect` command.
///
/// # Errors
///
/// Returns an error if metadata is missing or invalid, the file cannot be
/// opened, or the integral stream fails to decode (after printing the
/// partial report).
pub fn run(args: &InspectArgs) -> Result<()> {
    let metadata = args.metadata.load()?;
    let file = args.file.display().to_string();

    let parser = IntegralFileParser::open(&args.file, metadata.as_ref())
        .map_err(|failure| failure.error)
        .with_context(|| format!("cannot inspect {file}"))?;
    let config = parser.config();

    let mut blocks = Vec::new();
    let outcome = parser.parse_with(|block| {
        if args.blocks {
            blocks.push(BlockEntry {
                row_index: block.row_index,
                col_index: block.col_index,
                block_size: block.block_size,
            });
        }
    });
    let (summary, error) = match outcome {
        Ok(summary) => (summary, None),
        Err(failure) => (failure.partial, Some(failure.error)),
    };

    let mut report = InspectReport::new(file.as_str(), config.width, config.kind, summary)
        .with_blocks(blocks);
    if let Some(e) = &error {
        report = report.with_error(e.to_string());
    }

    let report_config = ReportConfig {
        format: if args.json {
            ReportFormat::Json
        } else {
            ReportFormat::Text
        },
        show_blocks: args.blocks,
        ..ReportConfig::default()
    };
    let rendered = DefaultReporter
        .render(&report, &report_config)
        .context("cannot render report")?;
    println!("{rendered}");

    match error {
        Some(e) => Err(e).with_context(|| format!("failed to read {file}")),
        None => Ok(()),
    }
}
