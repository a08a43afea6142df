//! View logic behind the admin pages. Each desk holds an injected store and,
//! where the page keeps a list on screen, the in-memory copy of that list.

pub mod events;
pub mod organizations;
pub mod reports;
pub mod tasks;

pub use events::{EventBoard, EventForm};
pub use organizations::OrganizationDirectory;
pub use reports::ReportIndex;
pub use tasks::{TaskDesk, TaskForm};

use validator::ValidationError;

/// Rejects empty and whitespace-only strings.
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}
