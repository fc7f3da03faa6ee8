//! Grant lifecycle engine: records a funder decision on a grant.
//!
//! The grant update and the derived resubmission reminder are written in one
//! transaction. Recording an outcome is not idempotent: each unsuccessful
//! submission on an annual grant appends another resubmission reminder.

use chrono::Utc;

use grant_core::entities::Grant;
use grant_core::enums::ReminderType;
use grant_core::lifecycle::{DecisionKind, OutcomeSubmission};

use crate::error::DatabaseError;
use crate::helpers::format_date;
use crate::repos::grant::fetch_grant;
use crate::repos::reminder::insert_reminder;
use crate::service::GrantService;

impl GrantService {
    /// Validate `submission` and write the decision to grant `grant_id`.
    ///
    /// A successful outcome writes the award and leaves rejection and
    /// resubmission fields untouched. An unsuccessful outcome clears
    /// `amount_awarded` and overwrites the rejection and resubmission fields;
    /// on an annual grant with a resubmission date it also schedules a
    /// `resubmission` reminder three months ahead of that date.
    ///
    /// # Errors
    ///
    /// `DatabaseError::Validation` for a malformed submission and
    /// `DatabaseError::NotFound` for an unknown grant; nothing is written in
    /// either case.
    pub async fn record_outcome(
        &self,
        grant_id: i64,
        submission: OutcomeSubmission,
    ) -> Result<Grant, DatabaseError> {
        let decision = submission.validate()?;
        let outcome = decision.outcome();
        let now = Utc::now().to_rfc3339();

        let conn = self.db().connect().await?;
        let tx = conn.transaction().await?;

        let affected = match &decision.kind {
            DecisionKind::Awarded { amount_awarded } => {
                tx.execute(
                    "UPDATE grants SET outcome = ?1, status = ?2, decision_date = ?3, \
                     amount_awarded = ?4, funder_feedback = ?5, lessons_learned = ?6, \
                     updated_at = ?7 \
                     WHERE id = ?8",
                    libsql::params![
                        outcome.as_str(),
                        decision.status().as_str(),
                        format_date(decision.decision_date),
                        *amount_awarded,
                        decision.funder_feedback.as_deref(),
                        decision.lessons_learned.as_deref(),
                        now.as_str(),
                        grant_id
                    ],
                )
                .await?
            }
            DecisionKind::Declined {
                rejection_reasons,
                resubmission,
            } => {
                tx.execute(
                    "UPDATE grants SET outcome = ?1, status = ?2, decision_date = ?3, \
                     amount_awarded = NULL, rejection_reasons = ?4, funder_feedback = ?5, \
                     lessons_learned = ?6, resubmission_date = ?7, is_annual_grant = ?8, \
                     improvements_needed = ?9, updated_at = ?10 \
                     WHERE id = ?11",
                    libsql::params![
                        outcome.as_str(),
                        decision.status().as_str(),
                        format_date(decision.decision_date),
                        rejection_reasons.as_deref(),
                        decision.funder_feedback.as_deref(),
                        decision.lessons_learned.as_deref(),
                        resubmission.resubmission_date.map(format_date),
                        i64::from(resubmission.is_annual_grant),
                        resubmission.improvements_needed.as_deref(),
                        now.as_str(),
                        grant_id
                    ],
                )
                .await?
            }
        };

        if affected == 0 {
            // Dropping the uncommitted transaction discards it.
            return Err(DatabaseError::not_found("Grant", grant_id));
        }

        if let Some(reminder_date) = decision.resubmission_reminder() {
            let reminder_id =
                insert_reminder(&tx, grant_id, ReminderType::Resubmission, reminder_date).await?;
            tracing::info!(
                grant_id,
                reminder_id,
                %reminder_date,
                "resubmission reminder scheduled"
            );
        }

        tx.commit().await?;
        tracing::info!(grant_id, outcome = %outcome, "outcome recorded");

        fetch_grant(&conn, grant_id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Grant", grant_id))
    }
}
