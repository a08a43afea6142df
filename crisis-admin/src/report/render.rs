use chrono::{DateTime, TimeZone};
use std::fmt::{Display, Write};

use crate::models::{CrisisEvent, HelpRequest, ResourceRequest};

pub const DATE_TOKEN: &str = "{{date}}";
pub const EVENTS_TOKEN: &str = "{{events}}";
pub const HELP_REQUESTS_TOKEN: &str = "{{help_requests}}";
pub const RESOURCE_REQUESTS_TOKEN: &str = "{{resource_requests}}";

pub const TOKENS: [&str; 4] = [
    DATE_TOKEN,
    EVENTS_TOKEN,
    HELP_REQUESTS_TOKEN,
    RESOURCE_REQUESTS_TOKEN,
];

/// Rows captured for one generation run.
#[derive(Debug, Default, Clone)]
pub struct ReportSnapshot {
    pub events: Vec<CrisisEvent>,
    pub help_requests: Vec<HelpRequest>,
    pub resource_requests: Vec<ResourceRequest>,
}

/// Fills the template's placeholder tokens.
///
/// Replacement runs in a fixed order (date, events, help requests, resource
/// requests) and covers every occurrence of a token. A token missing from
/// the template is simply not substituted. Field values are interpolated
/// verbatim; no HTML escaping is applied.
pub fn render_report(template: &str, generated_at: &str, snapshot: &ReportSnapshot) -> String {
    let mut content = template.replace(DATE_TOKEN, generated_at);

    content = content.replace(EVENTS_TOKEN, &events_table(&snapshot.events));

    let help_requests = if snapshot.help_requests.is_empty() {
        String::new()
    } else {
        help_requests_table(&snapshot.help_requests)
    };
    content = content.replace(HELP_REQUESTS_TOKEN, &help_requests);

    let resource_requests = if snapshot.resource_requests.is_empty() {
        String::new()
    } else {
        resource_requests_table(&snapshot.resource_requests)
    };
    content.replace(RESOURCE_REQUESTS_TOKEN, &resource_requests)
}

/// Locale string used for `{{date}}`, e.g. `20/11/2024, 14:05:09`.
pub fn locale_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    at.format("%d/%m/%Y, %H:%M:%S").to_string()
}

/// Tokens the template does not contain.
pub fn missing_tokens(template: &str) -> Vec<&'static str> {
    TOKENS.iter().copied().filter(|t| !template.contains(t)).collect()
}

// The events table is always emitted, even with an empty body.
fn events_table(events: &[CrisisEvent]) -> String {
    let mut html = table_head(&["Event Title", "Location", "Status", "Description"]);
    for event in events {
        push_row(
            &mut html,
            &[
                &event.title,
                &event.location,
                &event.status,
                event.description.as_deref().unwrap_or(""),
            ],
        );
    }
    close_table(html)
}

fn help_requests_table(requests: &[HelpRequest]) -> String {
    let mut html = table_head(&["Request Name", "Event", "Status", "Description", "Created At"]);
    for request in requests {
        push_row(
            &mut html,
            &[
                &request.name,
                &request.event_id.to_string(),
                &request.status,
                request.description.as_deref().filter(|d| !d.is_empty()).unwrap_or("N/A"),
                &request.created_at.to_rfc3339(),
            ],
        );
    }
    close_table(html)
}

fn resource_requests_table(requests: &[ResourceRequest]) -> String {
    let mut html = table_head(&[
        "Request Name",
        "Event",
        "Status",
        "Quantity",
        "Description",
        "Created At",
    ]);
    for request in requests {
        push_row(
            &mut html,
            &[
                &request.name,
                &request.event_id.to_string(),
                &request.status,
                &request.quantity.to_string(),
                request.description.as_deref().filter(|d| !d.is_empty()).unwrap_or("N/A"),
                &request.created_at.to_rfc3339(),
            ],
        );
    }
    close_table(html)
}

fn table_head(columns: &[&str]) -> String {
    let mut html = String::from("<table>\n  <thead>\n    <tr>\n");
    for column in columns {
        let _ = writeln!(html, "      <th>{column}</th>");
    }
    html.push_str("    </tr>\n  </thead>\n  <tbody>\n");
    html
}

fn push_row(html: &mut String, cells: &[&str]) {
    html.push_str("    <tr>\n");
    for cell in cells {
        let _ = writeln!(html, "      <td>{cell}</td>");
    }
    html.push_str("    </tr>\n");
}

fn close_table(mut html: String) -> String {
    html.push_str("  </tbody>\n</table>");
    html
}

// --- Tests ---
