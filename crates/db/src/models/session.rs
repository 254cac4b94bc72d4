//! User session model and DTOs.

use sqlx::FromRow;
use stockroom_core::types::{DbId, Timestamp};

/// A session row from the `user_sessions` table.
///
/// `token_hash` is the SHA-256 of the session token's unique id; the token
/// itself only ever lives in the browser cookie.
#[derive(Debug, Clone, FromRow)]
pub struct UserSession {
    pub id: DbId,
    pub user_id: DbId,
    pub token_hash: String,
    pub expires_at: Timestamp,
    pub is_revoked: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new user session.
pub struct CreateSession {
    pub user_id: DbId,
    pub token_hash: String,
    pub expires_at: Timestamp,
}
