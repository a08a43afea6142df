pub mod events;
pub mod health;
pub mod organizations;
pub mod reports;
pub mod tasks;
