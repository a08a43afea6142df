//! Government report pipeline: template fetch, data fetch, HTML assembly,
//! persistence and PDF export.

pub mod export;
pub mod render;
pub mod service;
pub mod template;

use chrono::{DateTime, Local};
use std::sync::Arc;

pub use export::{
    export_filename, ExportedReport, PageLayout, PdfRenderer, ReportExporter, WkhtmltopdfRenderer,
};
pub use render::{render_report, ReportSnapshot};
pub use service::ReportService;
pub use template::TemplateSource;

/// Source of "now" for report timestamps and export filenames.
pub type Clock = Arc<dyn Fn() -> DateTime<Local> + Send + Sync>;

pub fn system_clock() -> Clock {
    Arc::new(Local::now)
}
