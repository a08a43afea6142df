use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;

use crisis_shared::errors::AppResult;
use crisis_shared::types::api::ApiResponse;

use crate::desk::EventForm;
use crate::models::CrisisEvent;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct AssignOrganizationRequest {
    pub organization_id: i64,
}

pub async fn list_events(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<Vec<CrisisEvent>>>> {
    let mut board = state.events.lock().await;
    let events = board.load().await.to_vec();
    Ok(Json(ApiResponse::ok(events)))
}

pub async fn refresh_events(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<Vec<CrisisEvent>>>> {
    let mut board = state.events.lock().await;
    let events = board.refresh().await.to_vec();
    Ok(Json(ApiResponse::ok(events)))
}

pub async fn create_event(
    State(state): State<Arc<AppState>>,
    Json(form): Json<EventForm>,
) -> AppResult<(StatusCode, Json<ApiResponse<CrisisEvent>>)> {
    let event = state.events.lock().await.create_event(form).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(event))))
}

pub async fn assign_organization(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<i64>,
    Json(body): Json<AssignOrganizationRequest>,
) -> AppResult<Json<ApiResponse<CrisisEvent>>> {
    let event = state
        .events
        .lock()
        .await
        .assign_organization(event_id, body.organization_id)
        .await?;
    Ok(Json(ApiResponse::ok(event)))
}
