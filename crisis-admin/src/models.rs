use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::{events, help_requests, reports, resource_requests, tasks};

// --- CrisisEvent ---

#[derive(Debug, Queryable, Identifiable, Selectable, Serialize, Deserialize, Clone, PartialEq)]
#[diesel(table_name = events)]
pub struct CrisisEvent {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub location: String,
    pub status: String,
    pub assigned_organizations: Vec<i64>,
}

#[derive(Debug, Insertable, Clone, PartialEq)]
#[diesel(table_name = events)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub location: String,
}

// --- Requests (read-only) ---

#[derive(Debug, Queryable, Selectable, Serialize, Clone)]
#[diesel(table_name = help_requests)]
pub struct HelpRequest {
    pub id: i64,
    pub name: String,
    pub event_id: i64,
    pub status: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Queryable, Selectable, Serialize, Clone)]
#[diesel(table_name = resource_requests)]
pub struct ResourceRequest {
    pub id: i64,
    pub name: String,
    pub event_id: i64,
    pub status: String,
    pub quantity: i32,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

// --- Report ---

/// A generation run. `source` is written once and replayed verbatim on export.
#[derive(Debug, Queryable, Identifiable, Selectable, Serialize, Clone)]
#[diesel(table_name = reports)]
pub struct Report {
    pub id: Uuid,
    pub generated_on: NaiveDate,
    pub source: String,
}

#[derive(Debug, Queryable, Serialize, Deserialize, Clone, PartialEq)]
pub struct ReportSummary {
    pub id: Uuid,
    pub generated_on: NaiveDate,
}

#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = reports)]
pub struct NewReport {
    pub generated_on: NaiveDate,
    pub source: String,
}

// --- Task ---

#[derive(Debug, Queryable, Identifiable, Selectable, Serialize, Clone)]
#[diesel(table_name = tasks)]
pub struct Task {
    pub id: Uuid,
    pub volunteer_id: Uuid,
    pub title: String,
    pub description: String,
    pub status: String,
}

#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = tasks)]
pub struct NewTask {
    pub volunteer_id: Uuid,
    pub title: String,
    pub description: String,
    pub status: String,
}

// --- Volunteer ---

/// Volunteer joined against the user profile table.
#[derive(Debug, Queryable, Clone)]
pub struct VolunteerProfile {
    pub id: Uuid,
    pub full_name: Option<String>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Volunteer {
    pub id: Uuid,
    pub name: String,
}

impl From<VolunteerProfile> for Volunteer {
    fn from(profile: VolunteerProfile) -> Self {
        Self {
            id: profile.id,
            name: profile
                .full_name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| "Unknown".to_string()),
        }
    }
}

// --- AidOrganization ---

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct AidOrganization {
    pub id: i64,
    pub name: String,
    pub contact: String,
}
