//! Session-cookie authentication extractors for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::Method;
use axum_extra::extract::CookieJar;
use stockroom_core::types::DbId;

use crate::auth::session::{resolve_session, SESSION_COOKIE};
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user resolved from the session cookie.
///
/// Use this as an extractor parameter in any handler that requires a login:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Html<String>> {
///     tracing::info!(user_id = user.user_id, "handling request");
///     Ok(Html(String::new()))
/// }
/// ```
///
/// Without a live session the request is rejected with
/// [`AppError::AuthenticationRequired`], which redirects to the login page.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id.
    pub user_id: DbId,
    /// Display name for the page header.
    pub username: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = session_user(parts, state).await? {
            return Ok(user);
        }

        // Only GETs are worth coming back to; a replayed POST would lose its body.
        let return_to = (parts.method == Method::GET)
            .then(|| parts.uri.path())
            .and_then(safe_return_path)
            .map(str::to_string);

        Err(AppError::AuthenticationRequired { return_to })
    }
}

/// The session user, if the request carries a live session.
///
/// Used by the login and register pages to send signed-in users onward.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeAuthUser(session_user(parts, state).await?))
    }
}

async fn session_user(parts: &Parts, state: &AppState) -> Result<Option<AuthUser>, AppError> {
    let jar = CookieJar::from_headers(&parts.headers);
    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        return Ok(None);
    };

    let user = resolve_session(&state.pool, &state.config.session, cookie.value()).await?;
    Ok(user.map(|user| AuthUser {
        user_id: user.id,
        username: user.username,
    }))
}

/// Accept `path` as a post-login destination only if it is a plain local path.
///
/// Rejects anything that could leave the site (`//host`, `https://...`) and
/// anything needing escaping inside a query string.
pub fn safe_return_path(path: &str) -> Option<&str> {
    let local = path.starts_with('/') && !path.starts_with("//");
    let plain = path
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '_' | '-'));
    (local && plain).then_some(path)
}

/// Login URL for a request that needs a session, remembering where it came from.
pub fn login_redirect_target(return_to: Option<&str>) -> String {
    match return_to.and_then(safe_return_path) {
        Some(path) if path != "/" => format!("/login?next={path}"),
        _ => "/login".to_string(),
    }
}
