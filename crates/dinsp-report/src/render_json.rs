use crate::config::ReportConfig;
use crate::error::ReportError;
use crate::report::InspectReport;

/// JSON renderer.
///
/// The summary fields are flattened into the top-level object:
///
/// ```text
/// {
///   "file": "MDCINT",
///   "integer_width": "narrow",
///   "value_kind": "real",
///   "header": { "timestamp": "...", "kramers_pair_count": 2 },
///   "kramers_pairs": [ { "spinor_a": 1, "spinor_b": 2 }, ... ],
///   "total_non_zero_count": 5,
///   "blocks_read": 2,
///   "state": "terminated",
///   "elapsed_seconds": 0.0001
/// }
/// ```
pub struct JsonRenderer;

impl JsonRenderer {
    /// # Errors
    ///
    /// [`ReportError::Json`] if serialization fails.
    pub fn render(report: &InspectReport, config: &ReportConfig) -> Result<String, ReportError> {
        let json = if config.pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };
        Ok(json)
    }
}
