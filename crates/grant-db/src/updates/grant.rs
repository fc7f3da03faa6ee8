//! Grant update builder.
//!
//! Only planning fields are editable here. Outcome, decision, award and
//! resubmission fields are written exclusively by `record_outcome`, so they
//! are not part of this type and `deny_unknown_fields` rejects them.

use chrono::NaiveDate;
use grant_core::enums::{GrantStatus, Priority};
use grant_core::errors::CoreError;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GrantUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub amount: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub ease: Option<Option<i64>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub fit: Option<Option<i64>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub category: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub deadline: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub url: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<GrantStatus>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub application_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub suggested_month: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documents_needed: Option<Vec<String>>,
}

/// Distinguishes an explicit JSON `null` (clear) from an absent key (keep).
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn check_score(field: &str, value: Option<Option<i64>>) -> Result<(), CoreError> {
    match value {
        Some(Some(score)) if !(1..=5).contains(&score) => Err(CoreError::validation(format!(
            "{field} must be between 1 and 5, got {score}"
        ))),
        _ => Ok(()),
    }
}

impl GrantUpdate {
    /// Reject values the listing and lifecycle rules cannot accept.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` for an empty name, a score outside
    /// 1..=5, or a status that only an outcome submission may set.
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(CoreError::validation("name must not be empty"));
            }
        }
        check_score("ease", self.ease)?;
        check_score("fit", self.fit)?;
        if let Some(status) = self.status {
            if status.is_outcome_status() {
                return Err(CoreError::validation(format!(
                    "status '{status}' can only be set by recording an outcome"
                )));
            }
        }
        Ok(())
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.amount.is_none()
            && self.ease.is_none()
            && self.fit.is_none()
            && self.category.is_none()
            && self.deadline.is_none()
            && self.url.is_none()
            && self.priority.is_none()
            && self.status.is_none()
            && self.notes.is_none()
            && self.application_date.is_none()
            && self.suggested_month.is_none()
            && self.documents_needed.is_none()
    }
}

pub struct GrantUpdateBuilder(GrantUpdate);

impl GrantUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(GrantUpdate::default())
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.0.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn amount(mut self, amount: Option<String>) -> Self {
        self.0.amount = Some(amount);
        self
    }

    #[must_use]
    pub fn ease(mut self, ease: Option<i64>) -> Self {
        self.0.ease = Some(ease);
        self
    }

    #[must_use]
    pub fn fit(mut self, fit: Option<i64>) -> Self {
        self.0.fit = Some(fit);
        self
    }

    #[must_use]
    pub fn deadline(mut self, deadline: Option<String>) -> Self {
        self.0.deadline = Some(deadline);
        self
    }

    #[must_use]
    pub fn priority(mut self, priority: Priority) -> Self {
        self.0.priority = Some(priority);
        self
    }

    #[must_use]
    pub fn status(mut self, status: GrantStatus) -> Self {
        self.0.status = Some(status);
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: Option<String>) -> Self {
        self.0.notes = Some(notes);
        self
    }

    #[must_use]
    pub fn application_date(mut self, date: Option<NaiveDate>) -> Self {
        self.0.application_date = Some(date);
        self
    }

    #[must_use]
    pub fn suggested_month(mut self, month: Option<String>) -> Self {
        self.0.suggested_month = Some(month);
        self
    }

    #[must_use]
    pub fn documents_needed(mut self, documents: Vec<String>) -> Self {
        self.0.documents_needed = Some(documents);
        self
    }

    #[must_use]
    pub fn build(self) -> GrantUpdate {
        self.0
    }
}

impl Default for GrantUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
