//! Derived dashboard figures.

/// Share of decided-or-pending applications that succeeded, as a percentage
/// rounded to one decimal place. Zero when nothing has been submitted.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn success_rate(successful: u64, unsuccessful: u64, awaiting_decision: u64) -> f64 {
    let total = successful + unsuccessful + awaiting_decision;
    if total == 0 {
        return 0.0;
    }
    let pct = successful as f64 / total as f64 * 100.0;
    (pct * 10.0).round() / 10.0
}
