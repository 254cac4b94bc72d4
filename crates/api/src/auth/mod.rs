//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`session`] -- Signed session tokens, their cookie, and the
//!   server-side session rows that back them.
//! - [`credentials`] -- Registration and credential checks.

pub mod credentials;
pub mod password;
pub mod session;
