use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;

use crisis_shared::errors::AppResult;
use crisis_shared::types::api::ApiResponse;

use crate::desk::TaskForm;
use crate::models::Task;
use crate::AppState;

pub async fn create_task(
    State(state): State<Arc<AppState>>,
    Json(form): Json<TaskForm>,
) -> AppResult<(StatusCode, Json<ApiResponse<Task>>)> {
    let task = state.tasks.create_task(form).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(task))))
}
