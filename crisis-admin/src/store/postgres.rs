use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use uuid::Uuid;

use crisis_shared::clients::db::DbPool;
use crisis_shared::errors::{AppError, AppResult, ErrorCode};

use crate::models::{
    CrisisEvent, HelpRequest, NewEvent, NewReport, NewTask, Report, ReportSummary,
    ResourceRequest, Task, VolunteerProfile,
};
use crate::schema::{events, help_requests, reports, resource_requests, tasks, users, volunteers};
use crate::store::DataStore;

/// Postgres-backed store over the shared r2d2 pool.
#[derive(Clone)]
pub struct PgStore {
    db: DbPool,
}

impl PgStore {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    fn conn(&self) -> AppResult<PooledConnection<ConnectionManager<PgConnection>>> {
        self.db
            .get()
            .map_err(|e| {
                AppError::new(ErrorCode::ServiceUnavailable, format!("db pool error: {e}"))
            })
    }
}

#[async_trait]
impl DataStore for PgStore {
    async fn list_events(&self) -> AppResult<Vec<CrisisEvent>> {
        let mut conn = self.conn()?;

        let rows = events::table
            .select(CrisisEvent::as_select())
            .load(&mut conn)?;

        Ok(rows)
    }

    async fn insert_event(&self, event: NewEvent) -> AppResult<CrisisEvent> {
        let mut conn = self.conn()?;

        let row = diesel::insert_into(events::table)
            .values(&event)
            .returning(CrisisEvent::as_returning())
            .get_result(&mut conn)?;

        Ok(row)
    }

    async fn update_event_organizations(
        &self,
        event_id: i64,
        organization_ids: Vec<i64>,
    ) -> AppResult<CrisisEvent> {
        let mut conn = self.conn()?;

        diesel::update(events::table.find(event_id))
            .set(events::assigned_organizations.eq(organization_ids))
            .returning(CrisisEvent::as_returning())
            .get_result(&mut conn)
            .optional()?
            .ok_or_else(|| {
                AppError::new(ErrorCode::EventNotFound, format!("event {event_id} not found"))
            })
    }

    async fn list_help_requests(&self) -> AppResult<Vec<HelpRequest>> {
        let mut conn = self.conn()?;

        let rows = help_requests::table
            .select(HelpRequest::as_select())
            .load(&mut conn)?;

        Ok(rows)
    }

    async fn list_resource_requests(&self) -> AppResult<Vec<ResourceRequest>> {
        let mut conn = self.conn()?;

        let rows = resource_requests::table
            .select(ResourceRequest::as_select())
            .load(&mut conn)?;

        Ok(rows)
    }

    async fn list_reports(&self) -> AppResult<Vec<ReportSummary>> {
        let mut conn = self.conn()?;

        let rows = reports::table
            .select((reports::id, reports::generated_on))
            .order(reports::generated_on.desc())
            .load::<ReportSummary>(&mut conn)?;

        Ok(rows)
    }

    async fn find_report(&self, id: Uuid) -> AppResult<Option<Report>> {
        let mut conn = self.conn()?;

        let row = reports::table
            .find(id)
            .select(Report::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(row)
    }

    async fn insert_report(&self, report: NewReport) -> AppResult<Report> {
        let mut conn = self.conn()?;

        let row = diesel::insert_into(reports::table)
            .values(&report)
            .returning(Report::as_returning())
            .get_result(&mut conn)?;

        Ok(row)
    }

    async fn list_volunteers(&self, organization_id: i64) -> AppResult<Vec<VolunteerProfile>> {
        let mut conn = self.conn()?;

        let rows = volunteers::table
            .left_join(users::table)
            .filter(volunteers::aid_organization_id.eq(organization_id))
            .select((volunteers::id, users::full_name.nullable()))
            .load::<VolunteerProfile>(&mut conn)?;

        Ok(rows)
    }

    async fn insert_task(&self, task: NewTask) -> AppResult<Task> {
        let mut conn = self.conn()?;

        let row = diesel::insert_into(tasks::table)
            .values(&task)
            .returning(Task::as_returning())
            .get_result(&mut conn)?;

        Ok(row)
    }

    async fn ping(&self) -> AppResult<()> {
        let mut conn = self.conn()?;
        diesel::sql_query("SELECT 1").execute(&mut conn)?;
        Ok(())
    }
}
