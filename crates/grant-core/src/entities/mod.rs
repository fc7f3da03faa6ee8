//! Entity structs for all grant-tracker domain objects.
//!
//! Each persisted entity maps to a table in the libSQL database. All structs
//! derive `Serialize`, `Deserialize`, and `JsonSchema` for JSON roundtrip and
//! schema validation. `New*` structs are the caller-supplied payloads used to
//! create rows.

mod communication;
mod dashboard;
mod file;
mod grant;
mod reminder;
mod strategy;

pub use communication::{Communication, NewCommunication};
pub use dashboard::{DashboardStats, DeadlineEntry, OutcomeEntry};
pub use file::{ApplicationFile, NewApplicationFile};
pub use grant::{Grant, ImportSummary, NewGrant};
pub use reminder::{NewReminder, Reminder, ReminderWithGrant};
pub use strategy::{MonthGroup, StrategyGrant};
