use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone};
use metrics::counter;
use std::fmt::Display;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use uuid::Uuid;

use crisis_shared::errors::{AppError, AppResult, ErrorCode};

use super::service::ReportService;
use super::Clock;

// --- Page layout ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSize {
    A4,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLayout {
    pub size: PageSize,
    pub orientation: Orientation,
}

impl PageLayout {
    pub const fn a4_portrait() -> Self {
        Self {
            size: PageSize::A4,
            orientation: Orientation::Portrait,
        }
    }
}

impl PageSize {
    fn as_arg(self) -> &'static str {
        match self {
            PageSize::A4 => "A4",
        }
    }
}

impl Orientation {
    fn as_arg(self) -> &'static str {
        match self {
            Orientation::Portrait => "Portrait",
        }
    }
}

// --- Renderer ---

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to start pdf renderer `{bin}`: {source}")]
    Spawn {
        bin: String,
        #[source]
        source: std::io::Error,
    },

    #[error("pdf renderer i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("pdf renderer exited with {status}: {stderr}")]
    Exited { status: ExitStatus, stderr: String },

    #[error("pdf renderer produced an empty document")]
    EmptyDocument,
}

/// Lays HTML out into a paginated PDF document.
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    /// Resolves only once layout has finished and the document is complete.
    async fn render(&self, html: &str, layout: PageLayout) -> Result<Vec<u8>, RenderError>;
}

/// Pipes HTML through an external `wkhtmltopdf` process.
#[derive(Debug, Clone)]
pub struct WkhtmltopdfRenderer {
    bin: String,
}

impl WkhtmltopdfRenderer {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }
}

#[async_trait]
impl PdfRenderer for WkhtmltopdfRenderer {
    async fn render(&self, html: &str, layout: PageLayout) -> Result<Vec<u8>, RenderError> {
        let mut child = Command::new(&self.bin)
            .args([
                "--quiet",
                "--encoding",
                "utf-8",
                "--page-size",
                layout.size.as_arg(),
                "--orientation",
                layout.orientation.as_arg(),
                "-",
                "-",
            ])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| RenderError::Spawn { bin: self.bin.clone(), source })?;

        let mut stdin = child.stdin.take().ok_or_else(|| {
            let kind = std::io::ErrorKind::BrokenPipe;
            RenderError::Io(std::io::Error::new(kind, "renderer stdin unavailable"))
        })?;

        // Feed stdin while draining stdout so a large document cannot fill both pipes.
        let feed = async move {
            stdin.write_all(html.as_bytes()).await?;
            stdin.shutdown().await
        };
        let (fed, output) = tokio::join!(feed, child.wait_with_output());
        let output = output?;

        if !output.status.success() {
            return Err(RenderError::Exited {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        fed?;

        if output.stdout.is_empty() {
            return Err(RenderError::EmptyDocument);
        }

        Ok(output.stdout)
    }
}

// --- Export ---

/// `govreport_<DD-MM-YYYY>_<HH-MM-SS>.pdf`, derived from the locale date and
/// time strings with `/` and `:` turned into `-` and spaces into `_`.
pub fn export_filename<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    let date = at.format("%d/%m/%Y").to_string().replace('/', "-").replace(' ', "_");
    let time = at.format("%H:%M:%S").to_string().replace(':', "-").replace(' ', "_");
    format!("govreport_{date}_{time}.pdf")
}

#[derive(Debug, Clone)]
pub struct ExportedReport {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl ExportedReport {
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }
}

/// Turns report HTML into a downloadable PDF.
///
/// Renderer failures are returned to the caller as `ExportFailed`; nothing on
/// this path swallows them.
pub struct ReportExporter {
    reports: Arc<ReportService>,
    renderer: Arc<dyn PdfRenderer>,
    clock: Clock,
}

impl ReportExporter {
    pub fn new(reports: Arc<ReportService>, renderer: Arc<dyn PdfRenderer>, clock: Clock) -> Self {
        Self { reports, renderer, clock }
    }

    /// Exports the stored report `id`, or a freshly generated (and stored) one.
    /// The filename carries the time the export was requested.
    pub async fn export(&self, id: Option<Uuid>) -> AppResult<ExportedReport> {
        let requested_at = (self.clock)();
        let html = self.reports.fetch_report_html(id).await?;
        self.export_html(&html, Some(requested_at)).await
    }

    /// Renders `html` as-is. `filename_seed` fixes the timestamp in the
    /// filename; without one the clock is read.
    pub async fn export_html(
        &self,
        html: &str,
        filename_seed: Option<DateTime<Local>>,
    ) -> AppResult<ExportedReport> {
        let at = filename_seed.unwrap_or_else(|| (self.clock)());
        let filename = export_filename(&at);

        let bytes = self
            .renderer
            .render(html, PageLayout::a4_portrait())
            .await
            .map_err(|e| {
                tracing::error!(error = %e, filename = %filename, "pdf export failed");
                AppError::new(ErrorCode::ExportFailed, format!("pdf export failed: {e}"))
            })?;

        counter!("reports_exported_total").increment(1);
        tracing::info!(filename = %filename, size = bytes.len(), "report exported");

        Ok(ExportedReport { filename, bytes })
    }
}

// --- Tests ---

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::TemplateSource;
    use crate::testing::{event, FakeRenderer, FakeStore};
    use chrono::FixedOffset;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(y, mo, d, h, mi, s)
            .unwrap()
    }

    fn matches_pattern(name: &str) -> bool {
        // govreport_DD-MM-YYYY_HH-MM-SS.pdf
        let Some(stem) = name.strip_prefix("govreport_").and_then(|n| n.strip_suffix(".pdf")) else {
            return false;
        };
        let shape = "00-00-0000_00-00-00";
        stem.len() == shape.len()
            && stem.chars().zip(shape.chars()).all(|(c, s)| match s {
                '0' => c.is_ascii_digit(),
                other => c == other,
            })
    }

    #[test]
    fn filename_is_pinned_to_day_month_year() {
        assert_eq!(
            export_filename(&at(2024, 11, 20, 14, 5, 9)),
            "govreport_20-11-2024_14-05-09.pdf"
        );
    }

    #[test]
    fn filenames_differ_by_timestamp() {
        let first = export_filename(&at(2024, 3, 7, 8, 0, 0));
        let second = export_filename(&at(2024, 3, 7, 8, 0, 1));

        assert_ne!(first, second);
        assert!(matches_pattern(&first), "{first}");
        assert!(matches_pattern(&second), "{second}");
    }

    #[test]
    fn content_disposition_is_attachment() {
        let exported = ExportedReport {
            filename: "govreport_01-01-2025_00-00-00.pdf".into(),
            bytes: vec![],
        };
        assert_eq!(
            exported.content_disposition(),
            "attachment; filename=\"govreport_01-01-2025_00-00-00.pdf\""
        );
    }

    fn exporter(
        store: Arc<FakeStore>,
        renderer: Arc<FakeRenderer>,
    ) -> (ReportExporter, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report-template.html");
        std::fs::write(&path, "{{events}}").unwrap();
        let clock: Clock = Arc::new(|| Local.with_ymd_and_hms(2025, 1, 15, 9, 30, 0).unwrap());
        let reports = Arc::new(ReportService::new(store, TemplateSource::new(path), clock.clone()));
        (ReportExporter::new(reports, renderer, clock), dir)
    }

    #[tokio::test]
    async fn exports_generated_report_as_a4_portrait() {
        let store = Arc::new(FakeStore::new());
        store.events.lock().unwrap().push(event(1, "Flood"));
        let renderer = Arc::new(FakeRenderer::default());
        let (exporter, _dir) = exporter(store.clone(), renderer.clone());

        let exported = exporter.export(None).await.unwrap();

        assert_eq!(exported.filename, "govreport_15-01-2025_09-30-00.pdf");
        assert_eq!(exported.bytes, b"%PDF-1.4 fake");
        let rendered = renderer.rendered.lock().unwrap();
        assert_eq!(rendered.len(), 1);
        assert!(rendered[0].0.contains("<td>Flood</td>"));
        assert_eq!(rendered[0].1, PageLayout::a4_portrait());
        assert_eq!(store.call_count("insert_report"), 1);
    }

    #[tokio::test]
    async fn renderer_failure_propagates() {
        let store = Arc::new(FakeStore::new());
        let renderer = Arc::new(FakeRenderer { fail: true, ..Default::default() });
        let (exporter, _dir) = exporter(store, renderer);

        let err = exporter.export_html("<p>hi</p>", None).await.unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::ExportFailed));
    }

    #[tokio::test]
    async fn filename_seed_overrides_clock() {
        let store = Arc::new(FakeStore::new());
        let renderer = Arc::new(FakeRenderer::default());
        let (exporter, _dir) = exporter(store, renderer.clone());

        let seed = Local.with_ymd_and_hms(2024, 12, 31, 23, 59, 58).unwrap();
        let seeded = exporter.export_html("<p>hi</p>", Some(seed)).await.unwrap();
        let unseeded = exporter.export_html("<p>hi</p>", None).await.unwrap();

        assert_eq!(seeded.filename, "govreport_31-12-2024_23-59-58.pdf");
        assert_eq!(unseeded.filename, "govreport_15-01-2025_09-30-00.pdf");
        assert_eq!(renderer.rendered.lock().unwrap()[0].0, "<p>hi</p>");
    }

    #[tokio::test]
    async fn missing_renderer_binary_is_spawn_error() {
        let renderer = WkhtmltopdfRenderer::new("/nonexistent/wkhtmltopdf");
        let err = renderer.render("<p>hi</p>", PageLayout::a4_portrait()).await.unwrap_err();
        assert!(matches!(err, RenderError::Spawn { .. }));
    }
}
