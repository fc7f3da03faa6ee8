//! Status, outcome, priority and category enums for the grant tracker.
//!
//! Enums are stored in SQL as the exact strings returned by `as_str()` and use
//! the same strings on the wire. `parse()` is the inverse of `as_str()` and is
//! used at boundaries that receive plain text (multipart forms, imports).

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

/// Funding priority of a grant.
///
/// Imported data carries free text, so values outside the four known levels
/// are preserved verbatim in `Other` and always sort after `Low`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    Highest,
    High,
    #[default]
    Medium,
    Low,
    Other(String),
}

impl Priority {
    /// Position in the fixed priority order; unrecognized values rank last.
    #[must_use]
    pub const fn rank(&self) -> u8 {
        match self {
            Self::Highest => 0,
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
            Self::Other(_) => 4,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Highest => "HIGHEST",
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
            Self::Other(raw) => raw,
        }
    }

    /// Whether this is one of the four known levels.
    #[must_use]
    pub const fn is_recognized(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<String> for Priority {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "HIGHEST" => Self::Highest,
            "HIGH" => Self::High,
            "MEDIUM" => Self::Medium,
            "LOW" => Self::Low,
            _ => Self::Other(raw),
        }
    }
}

impl From<&str> for Priority {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_string())
    }
}

impl From<Priority> for String {
    fn from(priority: Priority) -> Self {
        match priority {
            Priority::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl Ord for Priority {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank()
            .cmp(&other.rank())
            .then_with(|| match (self, other) {
                (Self::Other(a), Self::Other(b)) => a.cmp(b),
                _ => Ordering::Equal,
            })
    }
}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// GrantStatus
// ---------------------------------------------------------------------------

/// Where a grant application currently stands.
///
/// ```text
/// Not Started → Preparing → Submitted → Under Review → Successful
///                                                    → Unsuccessful
/// (any) → Withdrawn
/// ```
///
/// `Successful` and `Unsuccessful` are only ever reached through an outcome
/// submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum GrantStatus {
    #[default]
    #[serde(rename = "Not Started")]
    NotStarted,
    Preparing,
    Submitted,
    #[serde(rename = "Under Review")]
    UnderReview,
    Successful,
    Unsuccessful,
    Withdrawn,
}

impl GrantStatus {
    pub const ALL: [Self; 7] = [
        Self::NotStarted,
        Self::Preparing,
        Self::Submitted,
        Self::UnderReview,
        Self::Successful,
        Self::Unsuccessful,
        Self::Withdrawn,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "Not Started",
            Self::Preparing => "Preparing",
            Self::Submitted => "Submitted",
            Self::UnderReview => "Under Review",
            Self::Successful => "Successful",
            Self::Unsuccessful => "Unsuccessful",
            Self::Withdrawn => "Withdrawn",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == s.trim())
    }

    /// Submitted or under review: the funder has not decided yet.
    #[must_use]
    pub const fn is_awaiting_decision(self) -> bool {
        matches!(self, Self::Submitted | Self::UnderReview)
    }

    /// No further deadline applies once a grant is decided or withdrawn.
    #[must_use]
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Successful | Self::Unsuccessful | Self::Withdrawn)
    }

    /// Statuses that only the outcome endpoint may set.
    #[must_use]
    pub const fn is_outcome_status(self) -> bool {
        matches!(self, Self::Successful | Self::Unsuccessful)
    }
}

impl fmt::Display for GrantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// The funder's decision on an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Outcome {
    Successful,
    Unsuccessful,
}

impl Outcome {
    pub const ALL: [Self; 2] = [Self::Successful, Self::Unsuccessful];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Successful => "Successful",
            Self::Unsuccessful => "Unsuccessful",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == s.trim())
    }

    /// The grant status an outcome moves the grant into.
    #[must_use]
    pub const fn status(self) -> GrantStatus {
        match self {
            Self::Successful => GrantStatus::Successful,
            Self::Unsuccessful => GrantStatus::Unsuccessful,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// FileCategory
// ---------------------------------------------------------------------------

/// Declared category of an uploaded document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FileCategory {
    #[default]
    Application,
    Communication,
    Outcome,
    Reporting,
    Other,
}

impl FileCategory {
    pub const ALL: [Self; 5] = [
        Self::Application,
        Self::Communication,
        Self::Outcome,
        Self::Reporting,
        Self::Other,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Application => "application",
            Self::Communication => "communication",
            Self::Outcome => "outcome",
            Self::Reporting => "reporting",
            Self::Other => "other",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == s.trim())
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CommunicationType / Direction
// ---------------------------------------------------------------------------

/// Channel of a funder communication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CommunicationType {
    Email,
    Phone,
    Meeting,
    Document,
}

impl CommunicationType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Meeting => "meeting",
            Self::Document => "document",
        }
    }
}

impl fmt::Display for CommunicationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a communication was received from or sent to the funder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Received,
    Sent,
}

impl Direction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Sent => "sent",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ReminderType
// ---------------------------------------------------------------------------

/// What a reminder is nudging about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReminderType {
    Deadline,
    Followup,
    Resubmission,
}

impl ReminderType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Deadline => "deadline",
            Self::Followup => "followup",
            Self::Resubmission => "resubmission",
        }
    }
}

impl fmt::Display for ReminderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("HIGHEST", Priority::Highest)]
    #[case("high", Priority::High)]
    #[case(" Medium ", Priority::Medium)]
    #[case("LOW", Priority::Low)]
    #[case("URGENT", Priority::Other("URGENT".into()))]
    fn priority_parses_case_insensitively(#[case] raw: &str, #[case] expected: Priority) {
        assert_eq!(Priority::from(raw), expected);
    }

    #[test]
    fn priority_serializes_as_plain_string() {
        let json = serde_json::to_string(&Priority::Highest).unwrap();
        assert_eq!(json, "\"HIGHEST\"");

        let other: Priority = serde_json::from_str("\"someday\"").unwrap();
        assert_eq!(other, Priority::Other("someday".into()));
        assert_eq!(serde_json::to_string(&other).unwrap(), "\"someday\"");
    }

    #[test]
    fn unrecognized_priorities_sort_after_low() {
        assert!(Priority::Low < Priority::Other("A".into()));
        assert!(Priority::Other("A".into()) < Priority::Other("B".into()));
        assert!(Priority::Highest < Priority::High);
    }

    #[test]
    fn grant_status_uses_display_strings() {
        for status in GrantStatus::ALL {
            let json = serde_json::to_value(status).unwrap();
            assert_eq!(json, serde_json::Value::String(status.as_str().into()));
            assert_eq!(GrantStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(GrantStatus::parse("Under review"), None);
    }

    #[test]
    fn closed_and_awaiting_statuses() {
        assert!(GrantStatus::Submitted.is_awaiting_decision());
        assert!(GrantStatus::UnderReview.is_awaiting_decision());
        assert!(!GrantStatus::Preparing.is_awaiting_decision());
        assert!(GrantStatus::Withdrawn.is_closed());
        assert!(!GrantStatus::Withdrawn.is_outcome_status());
        assert!(!GrantStatus::NotStarted.is_closed());
    }

    #[test]
    fn outcome_maps_to_status() {
        assert_eq!(Outcome::Successful.status(), GrantStatus::Successful);
        assert_eq!(Outcome::Unsuccessful.status(), GrantStatus::Unsuccessful);
        assert_eq!(Outcome::parse("Pending"), None);
    }

    #[test]
    fn file_category_defaults_to_application() {
        assert_eq!(FileCategory::default(), FileCategory::Application);
        assert_eq!(FileCategory::parse("reporting"), Some(FileCategory::Reporting));
        assert_eq!(FileCategory::parse("invoice"), None);
    }
}
