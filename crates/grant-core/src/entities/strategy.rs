use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{GrantStatus, Priority};

/// Grants planned for one suggested submission month.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MonthGroup {
    pub suggested_month: String,
    pub count: usize,
    pub grants: Vec<StrategyGrant>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StrategyGrant {
    pub id: i64,
    pub name: String,
    pub amount: Option<String>,
    #[schemars(with = "String")]
    pub priority: Priority,
    pub status: GrantStatus,
    pub deadline: Option<String>,
}
