use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{CommunicationType, Direction};

/// A logged exchange with a funder.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Communication {
    pub id: i64,
    pub grant_id: i64,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: CommunicationType,
    pub direction: Direction,
    pub subject: Option<String>,
    pub summary: Option<String>,
    pub status: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewCommunication {
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: CommunicationType,
    pub direction: Direction,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}
