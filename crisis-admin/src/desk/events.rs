use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crisis_shared::errors::{AppError, AppResult, ErrorCode};

use crate::models::{CrisisEvent, NewEvent};
use crate::store::DataStore;

use super::not_blank;
use super::organizations::OrganizationDirectory;

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct EventForm {
    #[validate(custom = "not_blank")]
    pub title: String,
    #[validate(custom = "not_blank")]
    pub description: String,
    pub location: Option<String>,
}

/// Crisis events shown on the admin page.
///
/// The list is fetched once and then kept in memory; `refresh` reloads it.
/// Mutations go to the store first and only touch the list once the store
/// has accepted them.
pub struct EventBoard {
    store: Arc<dyn DataStore>,
    directory: OrganizationDirectory,
    default_location: String,
    events: Vec<CrisisEvent>,
    loaded: bool,
}

impl EventBoard {
    pub fn new(
        store: Arc<dyn DataStore>,
        directory: OrganizationDirectory,
        default_location: impl Into<String>,
    ) -> Self {
        Self {
            store,
            directory,
            default_location: default_location.into(),
            events: Vec::new(),
            loaded: false,
        }
    }

    pub fn events(&self) -> &[CrisisEvent] {
        &self.events
    }

    /// Fetches the list on first use only.
    pub async fn load(&mut self) -> &[CrisisEvent] {
        if !self.loaded {
            self.refresh().await;
        }
        &self.events
    }

    /// Replaces the list with the store's current rows. A failed fetch
    /// leaves an empty board.
    pub async fn refresh(&mut self) -> &[CrisisEvent] {
        self.events = self.store.list_events().await.unwrap_or_else(|e| {
            tracing::error!(error = %e, "error fetching events");
            Vec::new()
        });
        self.loaded = true;
        &self.events
    }

    pub async fn create_event(&mut self, form: EventForm) -> AppResult<CrisisEvent> {
        if let Err(e) = form.validate() {
            tracing::warn!(error = %e, "please provide a valid event title and description");
            return Err(e.into());
        }
        self.load().await;

        let location = form
            .location
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| self.default_location.clone());

        let new_event = NewEvent {
            title: form.title,
            description: form.description,
            location,
        };

        let event = self.store.insert_event(new_event).await.map_err(|e| {
            tracing::error!(error = %e, "error inserting event");
            e
        })?;

        tracing::info!(event_id = event.id, title = %event.title, "event created");
        self.events.push(event.clone());
        Ok(event)
    }

    /// Persists the assignment, then mirrors it on the board. Assigning an
    /// organization the event already has changes nothing.
    pub async fn assign_organization(
        &mut self,
        event_id: i64,
        organization_id: i64,
    ) -> AppResult<CrisisEvent> {
        if self.directory.find(organization_id).is_none() {
            return Err(AppError::with_details(
                ErrorCode::OrganizationNotFound,
                format!("organization {organization_id} not found"),
                serde_json::json!({ "organization_id": organization_id }),
            ));
        }

        self.load().await;
        let idx = self
            .events
            .iter()
            .position(|e| e.id == event_id)
            .ok_or_else(|| {
                AppError::new(ErrorCode::EventNotFound, format!("event {event_id} not found"))
            })?;

        let current = &self.events[idx];
        if current.assigned_organizations.contains(&organization_id) {
            return Ok(current.clone());
        }

        let mut organization_ids = current.assigned_organizations.clone();
        organization_ids.push(organization_id);

        let updated = self
            .store
            .update_event_organizations(event_id, organization_ids)
            .await
            .map_err(|e| {
                tracing::error!(
                    event_id,
                    organization_id,
                    error = %e,
                    "error updating assigned organizations"
                );
                e
            })?;

        tracing::info!(event_id, organization_id, "organization assigned");
        self.events[idx] = updated.clone();
        Ok(updated)
    }
}

// --- Tests ---
