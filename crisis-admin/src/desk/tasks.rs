use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crisis_shared::errors::{AppError, AppResult, ErrorCode};

use crate::models::{NewTask, Task, Volunteer};
use crate::store::DataStore;

use super::not_blank;

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct TaskForm {
    pub volunteer_id: Option<Uuid>,
    #[validate(custom = "not_blank")]
    pub title: String,
    #[validate(custom = "not_blank")]
    pub description: String,
}

/// Volunteer lookup and task assignment for one aid organization's page.
pub struct TaskDesk {
    store: Arc<dyn DataStore>,
}

impl TaskDesk {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    /// Volunteers of `organization_id` with their display names. Empty on error.
    pub async fn volunteers(&self, organization_id: i64) -> Vec<Volunteer> {
        match self.store.list_volunteers(organization_id).await {
            Ok(rows) => rows.into_iter().map(Volunteer::from).collect(),
            Err(e) => {
                tracing::error!(organization_id, error = %e, "error fetching volunteers");
                Vec::new()
            }
        }
    }

    pub async fn create_task(&self, form: TaskForm) -> AppResult<Task> {
        let Some(volunteer_id) = form.volunteer_id else {
            tracing::warn!("task rejected: no volunteer selected");
            return Err(AppError::new(ErrorCode::VolunteerRequired, "a volunteer must be selected"));
        };
        if let Err(e) = form.validate() {
            tracing::warn!(error = %e, "task rejected: all fields are required");
            return Err(e.into());
        }

        let new_task = NewTask {
            volunteer_id,
            title: form.title,
            description: form.description,
            status: "pending".to_string(),
        };

        let task = self.store.insert_task(new_task).await.map_err(|e| {
            tracing::error!(error = %e, "error creating task");
            e
        })?;

        tracing::info!(task_id = %task.id, volunteer_id = %task.volunteer_id, "task created");
        Ok(task)
    }
}
