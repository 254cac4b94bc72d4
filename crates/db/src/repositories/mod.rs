//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod inventory_repo;
pub mod session_repo;
pub mod user_repo;

pub use inventory_repo::InventoryRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
