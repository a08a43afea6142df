use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use std::sync::Arc;
use uuid::Uuid;

use crisis_shared::errors::AppResult;
use crisis_shared::types::api::ApiResponse;

use crate::models::ReportSummary;
use crate::report::ExportedReport;
use crate::AppState;

pub async fn list_reports(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<Vec<ReportSummary>>>> {
    let mut index = state.report_index.lock().await;
    let reports = index.load().await.to_vec();
    Ok(Json(ApiResponse::ok(reports)))
}

pub async fn refresh_reports(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<Vec<ReportSummary>>>> {
    let mut index = state.report_index.lock().await;
    let reports = index.refresh().await.to_vec();
    Ok(Json(ApiResponse::ok(reports)))
}

/// Stored HTML as-is. Unknown ids answer with an empty document.
pub async fn get_report_source(
    State(state): State<Arc<AppState>>,
    Path(report_id): Path<Uuid>,
) -> Html<String> {
    Html(state.reports.retrieve_by_id(report_id).await)
}

/// Generates, stores and downloads a new report.
pub async fn export_new_report(State(state): State<Arc<AppState>>) -> AppResult<Response> {
    let exported = state.exporter.export(None).await?;
    Ok(pdf_response(exported))
}

/// Downloads a stored report; its HTML is replayed, not regenerated.
pub async fn export_report(
    State(state): State<Arc<AppState>>,
    Path(report_id): Path<Uuid>,
) -> AppResult<Response> {
    let exported = state.exporter.export(Some(report_id)).await?;
    Ok(pdf_response(exported))
}

fn pdf_response(exported: ExportedReport) -> Response {
    let disposition = exported.content_disposition();
    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        exported.bytes,
    )
        .into_response()
}
