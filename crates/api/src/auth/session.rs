//! Session tokens, the cookie that carries them, and the `user_sessions`
//! rows that make them revocable.
//!
//! A session token is an HS256-signed JWT. Its `jti` claim is a random UUID.
//! Only the SHA-256 of that id is stored server-side. A token is accepted
//! only while its signature and `exp` are valid *and* its row is neither
//! revoked nor expired, so logout takes effect immediately.

use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::{Duration, Utc};
use cookie::time::Duration as CookieDuration;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use stockroom_core::types::{DbId, Timestamp};
use stockroom_db::models::session::CreateSession;
use stockroom_db::models::user::User;
use stockroom_db::repositories::{SessionRepo, UserRepo};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Name of the cookie holding the session token.
pub const SESSION_COOKIE: &str = "stockroom_session";

/// Default server-side cap on a browser-session login, in hours.
const DEFAULT_SESSION_HOURS: i64 = 24;
/// Default "remember me" lifetime in days.
const DEFAULT_REMEMBER_DAYS: i64 = 30;
/// Upper bound for `SESSION_HOURS` (one year).
const MAX_SESSION_HOURS: i64 = 24 * 365;
/// Upper bound for `REMEMBER_DAYS` (ten years).
const MAX_REMEMBER_DAYS: i64 = 3650;

/// Claims embedded in every session token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique session id; its hash keys the `user_sessions` row.
    pub jti: String,
}

/// Configuration for session signing and lifetimes.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// HMAC-SHA256 secret used to sign and verify session tokens.
    pub secret: String,
    /// Server-side lifetime of a login without "remember me".
    pub session_hours: i64,
    /// Lifetime of a "remember me" login.
    pub remember_days: i64,
    /// Whether to mark the cookie `Secure` (HTTPS only).
    pub cookie_secure: bool,
}

impl SessionConfig {
    /// Load session configuration from environment variables.
    ///
    /// | Env Var          | Required | Default |
    /// |------------------|----------|---------|
    /// | `SESSION_SECRET` | **yes**  | --      |
    /// | `SESSION_HOURS`  | no       | `24`    |
    /// | `REMEMBER_DAYS`  | no       | `30`    |
    /// | `COOKIE_SECURE`  | no       | `false` |
    ///
    /// # Panics
    ///
    /// Panics if `SESSION_SECRET` is not set or is empty, or if either
    /// lifetime is not a whole number between 1 and its upper bound.
    pub fn from_env() -> Self {
        let secret = std::env::var("SESSION_SECRET")
            .expect("SESSION_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "SESSION_SECRET must not be empty");

        let session_hours =
            lifetime_from_env("SESSION_HOURS", DEFAULT_SESSION_HOURS, MAX_SESSION_HOURS);
        let remember_days =
            lifetime_from_env("REMEMBER_DAYS", DEFAULT_REMEMBER_DAYS, MAX_REMEMBER_DAYS);

        let cookie_secure = std::env::var("COOKIE_SECURE")
            .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Self {
            secret,
            session_hours,
            remember_days,
            cookie_secure,
        }
    }
}

fn lifetime_from_env(var: &str, default: i64, max: i64) -> i64 {
    match std::env::var(var) {
        Ok(raw) => parse_lifetime(&raw, max).unwrap_or_else(|e| panic!("{var} {e}")),
        Err(_) => default,
    }
}

/// Parse a session lifetime, accepting only `1..=max`.
fn parse_lifetime(raw: &str, max: i64) -> Result<i64, String> {
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("must be a whole number, got {raw:?}"))?;
    if !(1..=max).contains(&value) {
        return Err(format!("must be between 1 and {max}, got {value}"));
    }
    Ok(value)
}

/// How long a login should last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionLifetime {
    /// Cookie dies with the browser; server caps it at `session_hours`.
    Browser,
    /// "Remember me": persistent cookie for `remember_days`.
    Remembered,
}

impl SessionLifetime {
    pub fn from_remember_me(remember: bool) -> Self {
        if remember {
            Self::Remembered
        } else {
            Self::Browser
        }
    }

    fn duration(self, config: &SessionConfig) -> Duration {
        match self {
            Self::Browser => Duration::hours(config.session_hours),
            Self::Remembered => Duration::days(config.remember_days),
        }
    }
}

/// A freshly signed session token and the data needed to persist it.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub token_hash: String,
    pub expires_at: Timestamp,
    pub lifetime: SessionLifetime,
}

/// Sign a new session token for `user_id`.
pub fn issue_session_token(
    user_id: DbId,
    lifetime: SessionLifetime,
    config: &SessionConfig,
) -> Result<IssuedSession, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let expires_at = now + lifetime.duration(config);
    let jti = Uuid::new_v4().to_string();

    let claims = Claims {
        sub: user_id,
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
        jti,
    };

    let token = encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;

    Ok(IssuedSession {
        token,
        token_hash: hash_token_id(&claims.jti),
        expires_at,
        lifetime,
    })
}

/// Validate and decode a session token, returning the embedded [`Claims`].
///
/// Validates the signature and expiration automatically.
pub fn validate_session_token(
    token: &str,
    config: &SessionConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}

/// Compute the SHA-256 hex digest of a token id.
pub fn hash_token_id(jti: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(jti.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Build the cookie carrying `issued`.
///
/// Browser-lifetime sessions get no `Max-Age`, so the browser drops them on
/// exit.
pub fn session_cookie(issued: &IssuedSession, config: &SessionConfig) -> Cookie<'static> {
    let builder = Cookie::build((SESSION_COOKIE, issued.token.clone()))
        .path("/")
        .http_only(true)
        .secure(config.cookie_secure)
        .same_site(SameSite::Lax);

    match issued.lifetime {
        SessionLifetime::Browser => builder.build(),
        SessionLifetime::Remembered => builder
            .max_age(CookieDuration::days(config.remember_days))
            .build(),
    }
}

/// Cookie to pass to `CookieJar::remove` to clear the session on logout.
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}

// ---------------------------------------------------------------------------
// Session lifecycle against the database
// ---------------------------------------------------------------------------

/// Issue a token for `user_id` and record its session row.
pub async fn start_session(
    pool: &PgPool,
    config: &SessionConfig,
    user_id: DbId,
    lifetime: SessionLifetime,
) -> AppResult<IssuedSession> {
    let issued = issue_session_token(user_id, lifetime, config)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let pruned = SessionRepo::cleanup_for_user(pool, user_id).await?;
    if pruned > 0 {
        tracing::debug!(user_id, pruned, "Pruned stale sessions");
    }

    SessionRepo::create(
        pool,
        &CreateSession {
            user_id,
            token_hash: issued.token_hash.clone(),
            expires_at: issued.expires_at,
        },
    )
    .await?;

    Ok(issued)
}

/// Resolve a session token to its user.
///
/// Returns `Ok(None)` for anything short of a valid, live session: a bad
/// signature, an expired token, a revoked row, or a deleted user.
pub async fn resolve_session(
    pool: &PgPool,
    config: &SessionConfig,
    token: &str,
) -> Result<Option<User>, sqlx::Error> {
    let Ok(claims) = validate_session_token(token, config) else {
        return Ok(None);
    };

    let hash = hash_token_id(&claims.jti);
    let Some(session) = SessionRepo::find_active_by_token_hash(pool, &hash).await? else {
        return Ok(None);
    };
    if session.user_id != claims.sub {
        tracing::warn!(session_id = session.id, "Session row does not match token subject");
        return Ok(None);
    }

    UserRepo::find_by_id(pool, session.user_id).await
}

/// Revoke the session behind `token`, if it is one of ours.
pub async fn end_session(pool: &PgPool, config: &SessionConfig, token: &str) -> AppResult<()> {
    let Ok(claims) = validate_session_token(token, config) else {
        return Ok(());
    };
    if SessionRepo::revoke_by_token_hash(pool, &hash_token_id(&claims.jti)).await? {
        tracing::info!(user_id = claims.sub, "Session revoked");
    }
    Ok(())
}
