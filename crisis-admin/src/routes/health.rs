use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use crisis_shared::{HealthCheck, HealthResponse, HealthStatus};
use std::sync::Arc;

use crate::AppState;

/// Liveness plus database and template checks.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Response {
    let database = match state.store.ping().await {
        Ok(()) => HealthCheck::passed("database"),
        Err(e) => HealthCheck::failed("database", e.to_string()),
    };

    // The service still answers without a template, only generation fails.
    let template = match state.reports.template().load().await {
        Ok(_) => HealthCheck::passed("report_template"),
        Err(e) => HealthCheck {
            name: "report_template".to_string(),
            status: HealthStatus::Degraded,
            message: Some(e.to_string()),
        },
    };

    let response = HealthResponse::healthy("crisis-admin", env!("CARGO_PKG_VERSION"))
        .with_checks(vec![database, template]);

    let status = match response.status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status, Json(response)).into_response()
}

/// Returns Prometheus metrics.
pub async fn metrics(State(state): State<Arc<AppState>>) -> String {
    state
        .metrics_handle
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default()
}
