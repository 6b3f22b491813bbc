/// Errors that can occur while rendering a report.
///
/// ```text
/// ┌──────────┬───────────────────────────────────────────────┐
/// │ Variant  │ Cause                                         │
/// ├──────────┼───────────────────────────────────────────────┤
/// │ Json     │ serde_json failed to serialize the report     │
/// │ Format   │ writing into the text buffer failed           │
/// └──────────┴───────────────────────────────────────────────┘
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("cannot serialize report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot format report")]
    Format(#[from] std::fmt::Error),
}
