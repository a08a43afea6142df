use std::sync::Arc;

use crisis_admin::config::AppConfig;
use crisis_admin::report::{system_clock, WkhtmltopdfRenderer};
use crisis_admin::store::PgStore;
use crisis_admin::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    crisis_shared::middleware::init_tracing("crisis-admin");

    let config = AppConfig::load()?;
    let port = config.port;

    let metrics_handle = crisis_shared::middleware::init_metrics()?;

    let db = crisis_shared::clients::db::create_pool(&config.database_url, config.db_pool_size);
    let store = Arc::new(PgStore::new(db));
    let renderer = Arc::new(WkhtmltopdfRenderer::new(config.pdf_renderer_bin.clone()));

    let state = AppState::new(config, store, renderer, system_clock()).with_metrics(metrics_handle);

    if let Err(e) = state.reports.template().check().await {
        tracing::warn!(error = %e, "report generation will fail until the template is readable");
    }

    // One-shot fetch of the lists shown on the admin pages.
    let event_count = state.events.lock().await.load().await.len();
    let report_count = state.report_index.lock().await.load().await.len();
    tracing::info!(events = event_count, reports = report_count, "admin boards loaded");

    let app = crisis_admin::router(Arc::new(state));

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "crisis-admin starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
