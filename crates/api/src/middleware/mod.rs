//! Request extractors for session authentication.
//!
//! - [`auth::AuthUser`] -- Requires a live session; redirects to `/login` otherwise.
//! - [`auth::MaybeAuthUser`] -- The session user if there is one.

pub mod auth;
