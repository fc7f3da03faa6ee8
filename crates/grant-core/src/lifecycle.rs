//! Outcome submission validation and the decision it produces.
//!
//! An [`OutcomeSubmission`] is the loosely-typed payload a caller sends when
//! a funder decides. [`OutcomeSubmission::validate`] turns it into an
//! [`OutcomeDecision`], which fixes exactly which grant columns get written
//! and whether a resubmission reminder follows. Persisting the decision is
//! the database layer's job.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::dates::{parse_iso_date, resubmission_reminder_date};
use crate::enums::{GrantStatus, Outcome};
use crate::errors::CoreError;

/// Raw outcome payload. Empty strings are treated as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct OutcomeSubmission {
    #[serde(default)]
    pub outcome: Option<String>,
    #[serde(default)]
    pub decision_date: Option<String>,
    #[serde(default)]
    pub amount_awarded: Option<i64>,
    #[serde(default)]
    pub rejection_reasons: Option<String>,
    #[serde(default)]
    pub funder_feedback: Option<String>,
    #[serde(default)]
    pub lessons_learned: Option<String>,
    #[serde(default)]
    pub resubmission_date: Option<String>,
    #[serde(default)]
    pub improvements_needed: Option<String>,
    #[serde(default)]
    pub is_annual_grant: Option<bool>,
}

/// A validated outcome, ready to be written to a grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeDecision {
    pub decision_date: NaiveDate,
    pub funder_feedback: Option<String>,
    pub lessons_learned: Option<String>,
    pub kind: DecisionKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecisionKind {
    /// Rejection and resubmission fields are left untouched.
    Awarded { amount_awarded: i64 },
    /// `amount_awarded` is cleared.
    Declined {
        rejection_reasons: Option<String>,
        resubmission: ResubmissionPlan,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResubmissionPlan {
    pub resubmission_date: Option<NaiveDate>,
    pub is_annual_grant: bool,
    pub improvements_needed: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl OutcomeSubmission {
    /// Check required fields and resolve the decision.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if `outcome` is missing or not one of
    /// `Successful`/`Unsuccessful`, if `decision_date` is missing or malformed,
    /// if a successful outcome lacks a non-negative `amount_awarded`, or if an
    /// unsuccessful outcome carries a malformed `resubmission_date`.
    pub fn validate(self) -> Result<OutcomeDecision, CoreError> {
        let outcome = match non_empty(self.outcome) {
            None => return Err(CoreError::validation("outcome is required")),
            Some(raw) => Outcome::parse(&raw).ok_or_else(|| {
                CoreError::validation(format!(
                    "outcome must be 'Successful' or 'Unsuccessful', got '{raw}'"
                ))
            })?,
        };

        let decision_date = match non_empty(self.decision_date) {
            None => return Err(CoreError::validation("decision_date is required")),
            Some(raw) => parse_iso_date("decision_date", &raw)?,
        };

        let kind = match outcome {
            Outcome::Successful => {
                let amount_awarded = self.amount_awarded.ok_or_else(|| {
                    CoreError::validation("amount_awarded is required for a successful outcome")
                })?;
                if amount_awarded < 0 {
                    return Err(CoreError::validation(format!(
                        "amount_awarded must not be negative, got {amount_awarded}"
                    )));
                }
                DecisionKind::Awarded { amount_awarded }
            }
            Outcome::Unsuccessful => {
                let resubmission_date = non_empty(self.resubmission_date)
                    .map(|raw| parse_iso_date("resubmission_date", &raw))
                    .transpose()?;
                DecisionKind::Declined {
                    rejection_reasons: non_empty(self.rejection_reasons),
                    resubmission: ResubmissionPlan {
                        resubmission_date,
                        is_annual_grant: self.is_annual_grant.unwrap_or(false),
                        improvements_needed: non_empty(self.improvements_needed),
                    },
                }
            }
        };

        Ok(OutcomeDecision {
            decision_date,
            funder_feedback: non_empty(self.funder_feedback),
            lessons_learned: non_empty(self.lessons_learned),
            kind,
        })
    }
}

impl OutcomeDecision {
    #[must_use]
    pub const fn outcome(&self) -> Outcome {
        match self.kind {
            DecisionKind::Awarded { .. } => Outcome::Successful,
            DecisionKind::Declined { .. } => Outcome::Unsuccessful,
        }
    }

    /// Always `Successful` or `Unsuccessful`.
    #[must_use]
    pub const fn status(&self) -> GrantStatus {
        self.outcome().status()
    }

    /// Date of the resubmission reminder this decision schedules, if any.
    ///
    /// Only an unsuccessful outcome on an annual grant with a known
    /// resubmission date schedules one.
    #[must_use]
    pub fn resubmission_reminder(&self) -> Option<NaiveDate> {
        match &self.kind {
            DecisionKind::Declined { resubmission, .. } if resubmission.is_annual_grant => {
                resubmission
                    .resubmission_date
                    .and_then(resubmission_reminder_date)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn successful(amount: Option<i64>) -> OutcomeSubmission {
        OutcomeSubmission {
            outcome: Some("Successful".into()),
            decision_date: Some("2025-09-01".into()),
            amount_awarded: amount,
            ..OutcomeSubmission::default()
        }
    }

    fn unsuccessful(is_annual: bool, resubmission: Option<&str>) -> OutcomeSubmission {
        OutcomeSubmission {
            outcome: Some("Unsuccessful".into()),
            decision_date: Some("2025-09-01".into()),
            amount_awarded: Some(5000),
            rejection_reasons: Some("Oversubscribed".into()),
            resubmission_date: resubmission.map(String::from),
            is_annual_grant: Some(is_annual),
            ..OutcomeSubmission::default()
        }
    }

    #[test]
    fn successful_outcome_keeps_amount() {
        let decision = successful(Some(30_000)).validate().unwrap();
        assert_eq!(decision.status(), GrantStatus::Successful);
        assert_eq!(decision.kind, DecisionKind::Awarded { amount_awarded: 30_000 });
        assert_eq!(decision.resubmission_reminder(), None);
    }

    #[test]
    fn successful_outcome_ignores_rejection_fields() {
        let mut submission = successful(Some(100));
        submission.rejection_reasons = Some("n/a".into());
        submission.resubmission_date = Some("not a date".into());
        submission.is_annual_grant = Some(true);
        let decision = submission.validate().unwrap();
        assert_eq!(decision.kind, DecisionKind::Awarded { amount_awarded: 100 });
    }

    #[test]
    fn successful_outcome_requires_amount() {
        let err = successful(None).validate().unwrap_err();
        assert!(matches!(err, CoreError::Validation(msg) if msg.contains("amount_awarded")));
    }

    #[test]
    fn negative_amount_is_rejected() {
        assert!(matches!(
            successful(Some(-1)).validate(),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn unsuccessful_outcome_drops_amount() {
        let decision = unsuccessful(false, None).validate().unwrap();
        assert_eq!(decision.status(), GrantStatus::Unsuccessful);
        match decision.kind {
            DecisionKind::Declined {
                rejection_reasons, ..
            } => assert_eq!(rejection_reasons.as_deref(), Some("Oversubscribed")),
            DecisionKind::Awarded { .. } => panic!("expected a declined decision"),
        }
    }

    #[test]
    fn annual_unsuccessful_schedules_reminder() {
        let decision = unsuccessful(true, Some("2026-06-15")).validate().unwrap();
        assert_eq!(decision.resubmission_reminder(), Some(date(2026, 3, 15)));
    }

    #[test]
    fn non_annual_unsuccessful_schedules_nothing() {
        let decision = unsuccessful(false, Some("2026-06-15")).validate().unwrap();
        assert_eq!(decision.resubmission_reminder(), None);
    }

    #[test]
    fn annual_without_date_schedules_nothing() {
        let decision = unsuccessful(true, Some("")).validate().unwrap();
        assert_eq!(decision.resubmission_reminder(), None);
    }

    #[test]
    fn missing_outcome_or_date_is_rejected() {
        let mut no_outcome = successful(Some(1));
        no_outcome.outcome = None;
        assert!(matches!(no_outcome.validate(), Err(CoreError::Validation(_))));

        let mut no_date = successful(Some(1));
        no_date.decision_date = Some("  ".into());
        assert!(matches!(no_date.validate(), Err(CoreError::Validation(_))));
    }

    #[test]
    fn unknown_outcome_is_rejected() {
        let mut submission = successful(Some(1));
        submission.outcome = Some("Pending".into());
        let err = submission.validate().unwrap_err();
        assert!(matches!(err, CoreError::Validation(msg) if msg.contains("Pending")));
    }

    #[test]
    fn malformed_resubmission_date_is_rejected_when_declined() {
        assert!(matches!(
            unsuccessful(true, Some("June 2026")).validate(),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn empty_feedback_is_absent() {
        let mut submission = successful(Some(1));
        submission.funder_feedback = Some(String::new());
        submission.lessons_learned = Some("Start earlier".into());
        let decision = submission.validate().unwrap();
        assert_eq!(decision.funder_feedback, None);
        assert_eq!(decision.lessons_learned.as_deref(), Some("Start earlier"));
    }
}
