//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - Input DTOs for inserts and updates

pub mod inventory_item;
pub mod session;
pub mod user;
