//! Listing order for grants.
//!
//! Priority first (HIGHEST, HIGH, MEDIUM, LOW, then anything unrecognized),
//! then name, then id. Name comparison is plain byte order so results do not
//! depend on locale.

use std::cmp::Ordering;

use crate::entities::{Grant, StrategyGrant};
use crate::enums::Priority;

/// Compare two `(priority, name, id)` keys in listing order.
#[must_use]
pub fn compare_listing(a: (&Priority, &str, i64), b: (&Priority, &str, i64)) -> Ordering {
    a.0.cmp(b.0)
        .then_with(|| a.1.cmp(b.1))
        .then_with(|| a.2.cmp(&b.2))
}

/// Sort grants into listing order. Stable.
pub fn sort_grants(grants: &mut [Grant]) {
    grants.sort_by(|a, b| {
        compare_listing((&a.priority, &a.name, a.id), (&b.priority, &b.name, b.id))
    });
}

/// Sort the grants of one planning month into listing order. Stable.
pub fn sort_strategy_grants(grants: &mut [StrategyGrant]) {
    grants.sort_by(|a, b| {
        compare_listing((&a.priority, &a.name, a.id), (&b.priority, &b.name, b.id))
    });
}
