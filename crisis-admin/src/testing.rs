//! In-memory `DataStore` for unit tests. Records every call and can be told
//! to fail individual operations.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::collections::HashSet;
use std::sync::Mutex;
use uuid::Uuid;

use crisis_shared::errors::{AppError, AppResult, ErrorCode};

use crate::models::{
    CrisisEvent, HelpRequest, NewEvent, NewReport, NewTask, Report, ReportSummary,
    ResourceRequest, Task, VolunteerProfile,
};
use crate::report::export::{PageLayout, PdfRenderer, RenderError};
use crate::store::DataStore;

#[derive(Default)]
pub struct FakeStore {
    pub events: Mutex<Vec<CrisisEvent>>,
    pub help_requests: Mutex<Vec<HelpRequest>>,
    pub resource_requests: Mutex<Vec<ResourceRequest>>,
    pub reports: Mutex<Vec<Report>>,
    pub volunteers: Mutex<Vec<(i64, VolunteerProfile)>>,
    pub tasks: Mutex<Vec<Task>>,
    calls: Mutex<Vec<&'static str>>,
    failing: Mutex<HashSet<&'static str>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later call to `op` return an error.
    pub fn fail(&self, op: &'static str) {
        self.failing.lock().unwrap().insert(op);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, op: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| **c == op).count()
    }

    fn enter(&self, op: &'static str) -> AppResult<()> {
        self.calls.lock().unwrap().push(op);
        if self.failing.lock().unwrap().contains(op) {
            return Err(AppError::new(ErrorCode::InternalError, format!("{op}: connection reset")));
        }
        Ok(())
    }
}

#[async_trait]
impl DataStore for FakeStore {
    async fn list_events(&self) -> AppResult<Vec<CrisisEvent>> {
        self.enter("list_events")?;
        Ok(self.events.lock().unwrap().clone())
    }

    async fn insert_event(&self, event: NewEvent) -> AppResult<CrisisEvent> {
        self.enter("insert_event")?;
        let mut events = self.events.lock().unwrap();
        let row = CrisisEvent {
            id: events.iter().map(|e| e.id).max().unwrap_or(0) + 1,
            title: event.title,
            description: Some(event.description),
            location: event.location,
            status: "active".into(),
            assigned_organizations: Vec::new(),
        };
        events.push(row.clone());
        Ok(row)
    }

    async fn update_event_organizations(
        &self,
        event_id: i64,
        organization_ids: Vec<i64>,
    ) -> AppResult<CrisisEvent> {
        self.enter("update_event_organizations")?;
        let mut events = self.events.lock().unwrap();
        let event = events
            .iter_mut()
            .find(|e| e.id == event_id)
            .ok_or_else(|| AppError::new(ErrorCode::EventNotFound, "event not found"))?;
        event.assigned_organizations = organization_ids;
        Ok(event.clone())
    }

    async fn list_help_requests(&self) -> AppResult<Vec<HelpRequest>> {
        self.enter("list_help_requests")?;
        Ok(self.help_requests.lock().unwrap().clone())
    }

    async fn list_resource_requests(&self) -> AppResult<Vec<ResourceRequest>> {
        self.enter("list_resource_requests")?;
        Ok(self.resource_requests.lock().unwrap().clone())
    }

    async fn list_reports(&self) -> AppResult<Vec<ReportSummary>> {
        self.enter("list_reports")?;
        Ok(self
            .reports
            .lock()
            .unwrap()
            .iter()
            .rev()
            .map(|r| ReportSummary { id: r.id, generated_on: r.generated_on })
            .collect())
    }

    async fn find_report(&self, id: Uuid) -> AppResult<Option<Report>> {
        self.enter("find_report")?;
        Ok(self.reports.lock().unwrap().iter().find(|r| r.id == id).cloned())
    }

    async fn insert_report(&self, report: NewReport) -> AppResult<Report> {
        self.enter("insert_report")?;
        let row = Report {
            id: Uuid::new_v4(),
            generated_on: report.generated_on,
            source: report.source,
        };
        self.reports.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn list_volunteers(&self, organization_id: i64) -> AppResult<Vec<VolunteerProfile>> {
        self.enter("list_volunteers")?;
        Ok(self
            .volunteers
            .lock()
            .unwrap()
            .iter()
            .filter(|(org, _)| *org == organization_id)
            .map(|(_, v)| v.clone())
            .collect())
    }

    async fn insert_task(&self, task: NewTask) -> AppResult<Task> {
        self.enter("insert_task")?;
        let row = Task {
            id: Uuid::new_v4(),
            volunteer_id: task.volunteer_id,
            title: task.title,
            description: task.description,
            status: task.status,
        };
        self.tasks.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn ping(&self) -> AppResult<()> {
        self.enter("ping")
    }
}

// --- Fixtures ---

pub fn event(id: i64, title: &str) -> CrisisEvent {
    CrisisEvent {
        id,
        title: title.into(),
        description: Some(format!("{title} description")),
        location: "Valencia".into(),
        status: "active".into(),
        assigned_organizations: Vec::new(),
    }
}

pub fn help_request(id: i64, name: &str, description: Option<&str>) -> HelpRequest {
    HelpRequest {
        id,
        name: name.into(),
        event_id: 1,
        status: "open".into(),
        description: description.map(Into::into),
        created_at: Utc.with_ymd_and_hms(2024, 11, 2, 8, 30, 0).unwrap(),
    }
}

pub fn resource_request(id: i64, name: &str, quantity: i32) -> ResourceRequest {
    ResourceRequest {
        id,
        name: name.into(),
        event_id: 1,
        status: "pending".into(),
        quantity,
        description: None,
        created_at: Utc.with_ymd_and_hms(2024, 11, 3, 9, 0, 0).unwrap(),
    }
}

// --- Renderer ---

/// Records what it was asked to render and returns a fixed document.
#[derive(Default)]
pub struct FakeRenderer {
    pub rendered: Mutex<Vec<(String, PageLayout)>>,
    pub fail: bool,
}

#[async_trait]
impl PdfRenderer for FakeRenderer {
    async fn render(&self, html: &str, layout: PageLayout) -> Result<Vec<u8>, RenderError> {
        if self.fail {
            return Err(RenderError::EmptyDocument);
        }
        self.rendered.lock().unwrap().push((html.to_string(), layout));
        Ok(b"%PDF-1.4 fake".to_vec())
    }
}
