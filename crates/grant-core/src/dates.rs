//! Calendar rules: resubmission lead time, the reminder window, and
//! best-effort parsing of the free-text deadline and planning-month labels.

use chrono::{Days, Months, NaiveDate};

use crate::errors::CoreError;

/// Resubmission reminders fire this many calendar months before the next deadline.
pub const RESUBMISSION_LEAD_MONTHS: u32 = 3;

/// Unsent reminders due within this many days of "today" are listed as upcoming.
pub const REMINDER_WINDOW_DAYS: u64 = 30;

/// Date a resubmission reminder is scheduled for.
///
/// Subtracts [`RESUBMISSION_LEAD_MONTHS`] from the month field. When the day
/// does not exist in the target month, chrono clamps it to the last day of
/// that month (`2026-05-31` becomes `2026-02-28`).
#[must_use]
pub fn resubmission_reminder_date(resubmission_date: NaiveDate) -> Option<NaiveDate> {
    resubmission_date.checked_sub_months(Months::new(RESUBMISSION_LEAD_MONTHS))
}

/// Last reminder date included when listing reminders as of `as_of`.
#[must_use]
pub fn reminder_horizon(as_of: NaiveDate) -> NaiveDate {
    as_of
        .checked_add_days(Days::new(REMINDER_WINDOW_DAYS))
        .unwrap_or(NaiveDate::MAX)
}

/// Parse a strict ISO `YYYY-MM-DD` date supplied by a caller.
///
/// # Errors
///
/// Returns `CoreError::Validation` naming `field` if the value is not a valid date.
pub fn parse_iso_date(field: &str, value: &str) -> Result<NaiveDate, CoreError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| {
        CoreError::validation(format!("{field} must be a YYYY-MM-DD date, got '{value}': {e}"))
    })
}

const DEADLINE_FORMATS: &[&str] = &["%Y-%m-%d", "%B %d, %Y", "%B %d %Y", "%d %B %Y", "%d/%m/%Y"];

/// Best-effort parse of an imported deadline label such as `"Mar 15, 2026"`.
///
/// Returns `None` for labels like `"Rolling"` or `"TBC"`; callers sort those last.
#[must_use]
pub fn parse_deadline(label: &str) -> Option<NaiveDate> {
    let label = label.trim();
    DEADLINE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(label, fmt).ok())
}

/// Parse a planning label such as `"March 2026"` to the first day of that month.
#[must_use]
pub fn parse_month_label(label: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&format!("1 {}", label.trim()), "%d %B %Y").ok()
}
