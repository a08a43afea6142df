pub mod config;
pub mod desk;
pub mod models;
pub mod report;
pub mod routes;
pub mod schema;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use config::AppConfig;
use desk::{EventBoard, OrganizationDirectory, ReportIndex, TaskDesk};
use report::{Clock, PdfRenderer, ReportExporter, ReportService, TemplateSource};
use store::DataStore;

pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<dyn DataStore>,
    pub organizations: OrganizationDirectory,
    pub events: Mutex<EventBoard>,
    pub report_index: Mutex<ReportIndex>,
    pub tasks: TaskDesk,
    pub reports: Arc<ReportService>,
    pub exporter: ReportExporter,
    pub metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        store: Arc<dyn DataStore>,
        renderer: Arc<dyn PdfRenderer>,
        clock: Clock,
    ) -> Self {
        let organizations = OrganizationDirectory::builtin();
        let events = EventBoard::new(
            store.clone(),
            organizations.clone(),
            config.default_event_location.clone(),
        );
        let reports = Arc::new(ReportService::new(
            store.clone(),
            TemplateSource::new(&config.template_path),
            clock.clone(),
        ));
        let exporter = ReportExporter::new(reports.clone(), renderer, clock);

        Self {
            organizations,
            events: Mutex::new(events),
            report_index: Mutex::new(ReportIndex::new(store.clone())),
            tasks: TaskDesk::new(store.clone()),
            reports,
            exporter,
            store,
            config,
            metrics_handle: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics_handle = Some(handle);
        self
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    use routes::{events, health, organizations, reports, tasks};

    Router::new()
        .route("/health", get(health::health_check))
        .route("/metrics", get(health::metrics))
        .route("/events", get(events::list_events).post(events::create_event))
        .route("/events/refresh", post(events::refresh_events))
        .route("/events/:id/organizations", post(events::assign_organization))
        .route("/organizations", get(organizations::list_organizations))
        .route("/organizations/:id/volunteers", get(organizations::list_volunteers))
        .route("/tasks", post(tasks::create_task))
        .route("/reports", get(reports::list_reports))
        .route("/reports/refresh", post(reports::refresh_reports))
        .route("/reports/export", post(reports::export_new_report))
        .route("/reports/:id/source", get(reports::get_report_source))
        .route("/reports/:id/export", get(reports::export_report))
        .layer(axum::middleware::from_fn(crisis_shared::middleware::metrics_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
