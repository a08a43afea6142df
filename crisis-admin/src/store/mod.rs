//! Row-level access to the relational backend.
//!
//! Every operation is attempted once. Callers decide whether an error is
//! surfaced or degraded to an empty value.

mod postgres;

pub use postgres::PgStore;

use async_trait::async_trait;
use uuid::Uuid;

use crisis_shared::AppResult;

use crate::models::{
    CrisisEvent, HelpRequest, NewEvent, NewReport, NewTask, Report, ReportSummary,
    ResourceRequest, Task, VolunteerProfile,
};

#[async_trait]
pub trait DataStore: Send + Sync {
    /// All events in store order.
    async fn list_events(&self) -> AppResult<Vec<CrisisEvent>>;

    async fn insert_event(&self, event: NewEvent) -> AppResult<CrisisEvent>;

    /// Replaces the event's organization list. `EventNotFound` when no row matches.
    async fn update_event_organizations(
        &self,
        event_id: i64,
        organization_ids: Vec<i64>,
    ) -> AppResult<CrisisEvent>;

    async fn list_help_requests(&self) -> AppResult<Vec<HelpRequest>>;

    async fn list_resource_requests(&self) -> AppResult<Vec<ResourceRequest>>;

    /// Report identifiers and dates, newest first. Sources are not loaded.
    async fn list_reports(&self) -> AppResult<Vec<ReportSummary>>;

    async fn find_report(&self, id: Uuid) -> AppResult<Option<Report>>;

    async fn insert_report(&self, report: NewReport) -> AppResult<Report>;

    async fn list_volunteers(&self, organization_id: i64) -> AppResult<Vec<VolunteerProfile>>;

    async fn insert_task(&self, task: NewTask) -> AppResult<Task>;

    /// Cheap round trip used by the health endpoint.
    async fn ping(&self) -> AppResult<()>;
}
