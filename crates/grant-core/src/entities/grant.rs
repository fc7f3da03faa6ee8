use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

use crate::enums::{GrantStatus, Outcome, Priority};

/// A funding opportunity tracked through its application lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Grant {
    pub id: i64,
    pub name: String,
    /// Advertised funding range as free text, e.g. `"£5,000 - £25,000"`.
    pub amount: Option<String>,
    pub ease: Option<i64>,
    pub fit: Option<i64>,
    pub category: Option<String>,
    /// Deadline label as imported; see `dates::parse_deadline`.
    pub deadline: Option<String>,
    pub url: Option<String>,
    #[schemars(with = "String")]
    pub priority: Priority,
    pub status: GrantStatus,
    pub notes: Option<String>,
    pub application_date: Option<NaiveDate>,
    pub suggested_month: Option<String>,
    pub documents_needed: Vec<String>,
    pub outcome: Option<Outcome>,
    pub decision_date: Option<NaiveDate>,
    pub amount_awarded: Option<i64>,
    pub rejection_reasons: Option<String>,
    pub funder_feedback: Option<String>,
    pub lessons_learned: Option<String>,
    pub resubmission_date: Option<NaiveDate>,
    pub is_annual_grant: bool,
    pub improvements_needed: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One imported grant record. Missing fields take the import defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewGrant {
    pub name: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub amount: Option<String>,
    #[serde(default)]
    pub ease: Option<i64>,
    #[serde(default)]
    pub fit: Option<i64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    #[schemars(with = "Option<String>")]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub status: Option<GrantStatus>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub suggested_month: Option<String>,
    #[serde(default)]
    pub documents_needed: Vec<String>,
}

impl NewGrant {
    pub const DEFAULT_EASE: i64 = 3;
    pub const DEFAULT_FIT: i64 = 3;

    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Spreadsheet exports write amounts either as text or as bare numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// Result of a bulk import.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: u32,
    /// Records whose name already exists.
    pub skipped: u32,
    /// Records that could not be parsed or inserted.
    pub failed: u32,
}
