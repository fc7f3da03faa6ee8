use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::ReminderType;

/// A scheduled nudge tied to a grant.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Reminder {
    pub id: i64,
    pub grant_id: i64,
    pub reminder_type: ReminderType,
    pub reminder_date: NaiveDate,
    pub sent: bool,
    pub email_sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewReminder {
    pub reminder_type: ReminderType,
    pub reminder_date: NaiveDate,
}

/// A due reminder with its grant's display fields alongside.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ReminderWithGrant {
    #[serde(flatten)]
    pub reminder: Reminder,
    pub name: String,
    pub deadline: Option<String>,
    pub amount: Option<String>,
}
