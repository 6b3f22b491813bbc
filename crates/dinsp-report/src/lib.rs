#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod report;
pub mod render_json;
pub mod render_text;

pub use config::{ReportConfig, ReportFormat};
pub use error::ReportError;
pub use report::{BlockEntry, DefaultReporter, InspectReport, Reporter};
