use std::fmt::Write;

use crate::config::ReportConfig;
use crate::error::ReportError;
use crate::report::InspectReport;

/// Width of the label column.
const LABEL: usize = 27;

/// Plain-text renderer.
///
/// Labels are padded to one column and the pair table is printed one pair
/// per line, four characters per index:
///
/// ```text
/// two-electron integrals file
/// date and time              2024-01-01 00:00
/// number of Kramers pairs    2
///    1   2
///    3   4
/// number of non-zero ints    5
/// time for reading 2e ints   0.00 sec
/// ```
///
/// A failed session adds a `stopped` line with the error after the
/// partial count.
pub struct TextRenderer;

impl TextRenderer {
    /// # Errors
    ///
    /// [`ReportError::Format`] if writing to the buffer fails.
    pub fn render(report: &InspectReport, config: &ReportConfig) -> Result<String, ReportError> {
        let summary = &report.summary;
        let mut out = String::new();

        writeln!(out, "two-electron integrals file")?;
        line(&mut out, "file", &report.file)?;
        line(
            &mut out,
            "integers / integrals",
            &format!("{} / {}", report.integer_width, report.value_kind),
        )?;

        if let Some(header) = &summary.header {
            line(&mut out, "date and time", &header.timestamp)?;
            line(
                &mut out,
                "number of Kramers pairs",
                &header.kramers_pair_count.to_string(),
            )?;
            if config.show_pairs {
                for pair in &summary.kramers_pairs {
                    writeln!(out, "{:4}{:4}", pair.spinor_a, pair.spinor_b)?;
                }
            }
        }

        if config.show_blocks && !report.blocks.is_empty() {
            writeln!(out, "{:>8}{:>8}{:>10}", "row", "col", "size")?;
            for block in &report.blocks {
                writeln!(
                    out,
                    "{:>8}{:>8}{:>10}",
                    block.row_index, block.col_index, block.block_size
                )?;
            }
        }

        line(
            &mut out,
            "number of non-zero ints",
            &summary.total_non_zero_count.to_string(),
        )?;
        if let Some(error) = &report.error {
            line(
                &mut out,
                "stopped",
                &format!("after {} blocks: {error}", summary.blocks_read),
            )?;
        }
        if config.show_timing {
            line(
                &mut out,
                "time for reading 2e ints",
                &format!("{:.2} sec", summary.elapsed_seconds()),
            )?;
        }

        Ok(out)
    }
}

fn line(out: &mut String, label: &str, value: &str) -> std::fmt::Result {
    writeln!(out, "{label:<width$}{value}", width = LABEL)
}
