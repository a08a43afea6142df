use axum::extract::{Path, State};
use axum::Json;
use std::sync::Arc;

use crisis_shared::errors::{AppError, AppResult, ErrorCode};
use crisis_shared::types::api::ApiResponse;

use crate::models::{AidOrganization, Volunteer};
use crate::AppState;

pub async fn list_organizations(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<Vec<AidOrganization>>> {
    Json(ApiResponse::ok(state.organizations.all().to_vec()))
}

pub async fn list_volunteers(
    State(state): State<Arc<AppState>>,
    Path(organization_id): Path<i64>,
) -> AppResult<Json<ApiResponse<Vec<Volunteer>>>> {
    if state.organizations.find(organization_id).is_none() {
        return Err(AppError::new(
            ErrorCode::OrganizationNotFound,
            format!("organization {organization_id} not found"),
        ));
    }

    let volunteers = state.tasks.volunteers(organization_id).await;
    Ok(Json(ApiResponse::ok(volunteers)))
}
