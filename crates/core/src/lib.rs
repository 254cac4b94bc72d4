//! Domain rules for the stockroom inventory tracker.
//!
//! Nothing in this crate talks to the database; it holds the error taxonomy,
//! input validation, dashboard arithmetic, and the on-disk image store.

pub mod accounts;
pub mod error;
pub mod inventory;
pub mod search;
pub mod types;
pub mod uploads;
