use chrono::{DateTime, Local, Utc};
use metrics::counter;
use std::sync::Arc;
use uuid::Uuid;

use crisis_shared::errors::AppResult;

use crate::models::NewReport;
use crate::store::DataStore;

use super::render::{locale_timestamp, render_report, ReportSnapshot};
use super::template::TemplateSource;
use super::Clock;

/// Assembles, stores and retrieves government reports.
///
/// Store failures never reach the caller: reads degrade to empty results and
/// a failed insert of a freshly generated report is only logged. The only
/// error `generate` returns is an unreadable template.
pub struct ReportService {
    store: Arc<dyn DataStore>,
    template: TemplateSource,
    clock: Clock,
}

impl ReportService {
    pub fn new(store: Arc<dyn DataStore>, template: TemplateSource, clock: Clock) -> Self {
        Self { store, template, clock }
    }

    pub fn template(&self) -> &TemplateSource {
        &self.template
    }

    /// Point-in-time snapshot of events, help requests and resource requests.
    pub async fn generate(&self) -> AppResult<String> {
        self.generate_at((self.clock)()).await
    }

    /// Stored HTML for `id`, verbatim. Empty when missing or on fetch error.
    pub async fn retrieve_by_id(&self, id: Uuid) -> String {
        match self.store.find_report(id).await {
            Ok(Some(report)) => report.source,
            Ok(None) => {
                tracing::warn!(report_id = %id, "report not found");
                String::new()
            }
            Err(e) => {
                tracing::error!(report_id = %id, error = %e, "error fetching report");
                String::new()
            }
        }
    }

    /// With an id, replays the stored report. Without one, generates a new
    /// report, stores it best-effort and returns it either way.
    pub async fn fetch_report_html(&self, id: Option<Uuid>) -> AppResult<String> {
        if let Some(id) = id {
            return Ok(self.retrieve_by_id(id).await);
        }

        let now = (self.clock)();
        let source = self.generate_at(now).await?;

        let new_report = NewReport {
            generated_on: now.with_timezone(&Utc).date_naive(),
            source: source.clone(),
        };
        match self.store.insert_report(new_report).await {
            Ok(report) => {
                tracing::info!(
                    report_id = %report.id,
                    generated_on = %report.generated_on,
                    "report stored"
                );
            }
            Err(e) => {
                counter!("report_persist_failures_total").increment(1);
                tracing::error!(error = %e, "error inserting report");
            }
        }

        Ok(source)
    }

    async fn generate_at(&self, now: DateTime<Local>) -> AppResult<String> {
        let template = self.template.load().await?;

        let (events, help_requests, resource_requests) = tokio::join!(
            self.store.list_events(),
            self.store.list_help_requests(),
            self.store.list_resource_requests(),
        );

        let snapshot = ReportSnapshot {
            events: events.unwrap_or_else(|e| {
                tracing::error!(error = %e, "error fetching events");
                Vec::new()
            }),
            help_requests: help_requests.unwrap_or_else(|e| {
                tracing::error!(error = %e, "error fetching help requests");
                Vec::new()
            }),
            resource_requests: resource_requests.unwrap_or_else(|e| {
                tracing::error!(error = %e, "error fetching resource requests");
                Vec::new()
            }),
        };

        let html = render_report(&template, &locale_timestamp(&now), &snapshot);

        counter!("reports_generated_total").increment(1);
        tracing::debug!(
            events = snapshot.events.len(),
            help_requests = snapshot.help_requests.len(),
            resource_requests = snapshot.resource_requests.len(),
            "report generated"
        );

        Ok(html)
    }
}

// --- Tests ---

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Report;
    use crate::testing::{event, help_request, FakeStore};
    use chrono::{NaiveDate, TimeZone};
    use crisis_shared::ErrorCode;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::fs;
    use tempfile::TempDir;

    const TEMPLATE: &str = "<h1>{{date}}</h1>{{events}}{{help_requests}}{{resource_requests}}";

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 11, 20, 14, 5, 9).unwrap()
    }

    fn service(store: Arc<FakeStore>) -> (ReportService, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report-template.html");
        fs::write(&path, TEMPLATE).unwrap();
        let service = ReportService::new(store, TemplateSource::new(path), Arc::new(fixed_now));
        (service, dir)
    }

    #[tokio::test]
    async fn generate_with_empty_store() {
        let store = Arc::new(FakeStore::new());
        let (service, _dir) = service(store.clone());

        let html = service.generate().await.unwrap();
        assert!(html.starts_with("<h1>20/11/2024, 14:05:09</h1><table>"));
        assert!(html.ends_with("</table>"));
        assert_eq!(html.matches("<table>").count(), 1);

        let mut calls = store.calls();
        calls.sort_unstable();
        assert_eq!(calls, ["list_events", "list_help_requests", "list_resource_requests"]);
    }

    #[tokio::test]
    async fn generate_degrades_failed_reads_to_empty() {
        let store = Arc::new(FakeStore::new());
        store.events.lock().unwrap().push(event(1, "Flood"));
        store.help_requests.lock().unwrap().push(help_request(1, "Water", None));
        store.fail("list_help_requests");
        let (service, _dir) = service(store.clone());

        let html = service.generate().await.unwrap();
        assert!(html.contains("<td>Flood</td>"));
        assert!(!html.contains("Water"));
    }

    #[tokio::test]
    async fn generate_fails_without_template() {
        let store = Arc::new(FakeStore::new());
        let service = ReportService::new(
            store,
            TemplateSource::new("/nonexistent/report-template.html"),
            Arc::new(fixed_now),
        );

        let err = service.generate().await.unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::TemplateUnavailable));
    }

    #[tokio::test]
    async fn stored_report_is_replayed_verbatim() {
        let store = Arc::new(FakeStore::new());
        let id = Uuid::new_v4();
        store.reports.lock().unwrap().push(Report {
            id,
            generated_on: NaiveDate::from_ymd_opt(2024, 10, 1).unwrap(),
            source: "<p>{{date}} frozen</p>".into(),
        });
        store.events.lock().unwrap().push(event(1, "Flood"));
        let (service, _dir) = service(store.clone());

        let first = service.fetch_report_html(Some(id)).await.unwrap();
        let second = service.fetch_report_html(Some(id)).await.unwrap();
        assert_eq!(first, "<p>{{date}} frozen</p>");
        assert_eq!(first, second);
        assert_eq!(store.call_count("list_events"), 0);
        assert_eq!(store.call_count("insert_report"), 0);
    }

    #[tokio::test]
    async fn unknown_or_failing_lookup_is_empty() {
        let store = Arc::new(FakeStore::new());
        let (service, _dir) = service(store.clone());

        assert_eq!(service.retrieve_by_id(Uuid::new_v4()).await, "");

        store.fail("find_report");
        assert_eq!(service.fetch_report_html(Some(Uuid::new_v4())).await.unwrap(), "");
    }

    #[tokio::test]
    async fn new_report_is_persisted() {
        let store = Arc::new(FakeStore::new());
        store.events.lock().unwrap().push(event(1, "Flood"));
        let (service, _dir) = service(store.clone());

        let html = service.fetch_report_html(None).await.unwrap();

        let stored = store.reports.lock().unwrap().clone();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].source, html);
        assert_eq!(stored[0].generated_on, fixed_now().with_timezone(&Utc).date_naive());
    }

    #[test]
    fn persistence_failure_still_returns_report() {
        let store = Arc::new(FakeStore::new());
        store.events.lock().unwrap().push(event(1, "Flood"));
        store.fail("insert_report");
        let (service, _dir) = service(store.clone());

        // Counters land in a recorder scoped to this thread only.
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let (expected, html) = metrics::with_local_recorder(&recorder, || {
            tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap()
                .block_on(async {
                    let expected = service.generate().await.unwrap();
                    let html = service.fetch_report_html(None).await.unwrap();
                    (expected, html)
                })
        });

        assert_eq!(html, expected);
        assert_eq!(store.call_count("insert_report"), 1);
        assert!(store.reports.lock().unwrap().is_empty());

        let rendered = handle.render();
        assert!(
            rendered.lines().any(|l| l == "report_persist_failures_total 1"),
            "{rendered}"
        );
    }
}
