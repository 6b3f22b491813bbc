/// Controls how an [`InspectReport`](crate::InspectReport) is rendered.
///
/// ```text
/// ┌─────────────┬───────────────────────────────────────────────┐
/// │ Field       │ Purpose                                       │
/// ├─────────────┼───────────────────────────────────────────────┤
/// │ format      │ Plain text or JSON                            │
/// │ show_pairs  │ List the Kramers pair table (text only)       │
/// │ show_blocks │ List row, column and size of every block      │
/// │ show_timing │ Print the block loop duration (text only)     │
/// │ pretty      │ Indent JSON output                            │
/// └─────────────┴───────────────────────────────────────────────┘
/// ```
///
/// JSON output always carries every field; the `show_*` switches only
/// shorten the text form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportConfig {
    pub format: ReportFormat,
    pub show_pairs: bool,
    pub show_blocks: bool,
    pub show_timing: bool,
    pub pretty: bool,
}

impl Default for ReportConfig {
    /// Text with the pair table and timing, no block listing.
    fn default() -> Self {
        Self {
            format: ReportFormat::Text,
            show_pairs: true,
            show_blocks: false,
            show_timing: true,
            pretty: true,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}
