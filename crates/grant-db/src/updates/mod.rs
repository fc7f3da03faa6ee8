//! Update types for entity mutations.
//!
//! Each update struct has `Option` fields. Only `Some` fields generate SET
//! clauses in the dynamic UPDATE SQL. Nullable columns use
//! `Option<Option<T>>`: `Some(None)` clears the column.

pub mod file;
pub mod grant;
