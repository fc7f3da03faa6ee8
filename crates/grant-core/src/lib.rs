//! # grant-core
//!
//! Core types and pure domain rules for the grant tracker.
//!
//! This crate provides the foundational types shared across all crates:
//! - Entity structs for grants, files, communications and reminders
//! - Status, outcome, priority and category enums
//! - Cross-cutting error types
//! - Date rules (resubmission lead time, reminder window, label parsing)
//! - Priority ordering for listings and monthly grouping
//! - The outcome decision that drives the grant lifecycle
//! - Dashboard success-rate derivation

pub mod dates;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod lifecycle;
pub mod ordering;
pub mod stats;
