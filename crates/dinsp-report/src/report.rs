use dinsp_types::{IntegerWidth, ParseSummary, ValueKind};
use serde::Serialize;

use crate::config::{ReportConfig, ReportFormat};
use crate::error::ReportError;
use crate::render_json::JsonRenderer;
use crate::render_text::TextRenderer;

/// Position and size of one integral block, for block listings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct BlockEntry {
    pub row_index: i64,
    pub col_index: i64,
    pub block_size: usize,
}

/// Everything known about one inspected file.
///
/// A failed session still produces a report: `summary` then holds the
/// partial totals and `error` the reason the stream stopped.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InspectReport {
    pub file: String,
    pub integer_width: IntegerWidth,
    pub value_kind: ValueKind,
    #[serde(flatten)]
    pub summary: ParseSummary,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<BlockEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl InspectReport {
    #[must_use]
    pub fn new(
        file: impl Into<String>,
        integer_width: IntegerWidth,
        value_kind: ValueKind,
        summary: ParseSummary,
    ) -> Self {
        Self {
            file: file.into(),
            integer_width,
            value_kind,
            summary,
            blocks: Vec::new(),
            error: None,
        }
    }

    #[must_use]
    pub fn with_blocks(mut self, blocks: Vec<BlockEntry>) -> Self {
        self.blocks = blocks;
        self
    }

    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

/// Turns an [`InspectReport`] into text for a human or a script.
///
/// ```text
/// InspectReport ──▶ Reporter::render() ──▶ String
///                         │
///                   ReportConfig
///                   (format, show_pairs, show_blocks, ...)
/// ```
pub trait Reporter {
    /// # Errors
    ///
    /// [`ReportError`] if serialization or formatting fails.
    fn render(&self, report: &InspectReport, config: &ReportConfig) -> Result<String, ReportError>;
}

/// Dispatches on [`ReportConfig::format`].
pub struct DefaultReporter;

impl Reporter for DefaultReporter {
    fn render(&self, report: &InspectReport, config: &ReportConfig) -> Result<String, ReportError> {
        match config.format {
            ReportFormat::Text => TextRenderer::render(report, config),
            ReportFormat::Json => JsonRenderer::render(report, config),
        }
    }
}
