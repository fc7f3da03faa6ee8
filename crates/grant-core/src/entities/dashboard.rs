use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{GrantStatus, Outcome, Priority};

/// Summary figures for the dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct DashboardStats {
    pub total_grants: u64,
    /// Submitted or under review.
    pub awaiting_decision: u64,
    pub successful: u64,
    pub unsuccessful: u64,
    pub not_started: u64,
    pub preparing: u64,
    /// Sum of `amount_awarded` over successful grants.
    pub total_won: i64,
    /// Derived from the counts above, never stored.
    pub success_rate: f64,
    pub upcoming_deadlines: Vec<DeadlineEntry>,
    pub recent_outcomes: Vec<OutcomeEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DeadlineEntry {
    pub id: i64,
    pub name: String,
    pub deadline: String,
    pub amount: Option<String>,
    #[schemars(with = "String")]
    pub priority: Priority,
    pub status: GrantStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct OutcomeEntry {
    pub id: i64,
    pub name: String,
    pub outcome: Outcome,
    pub decision_date: Option<NaiveDate>,
    pub amount_awarded: Option<i64>,
}
