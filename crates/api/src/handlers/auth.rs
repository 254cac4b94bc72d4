//! Handlers for registration, login and logout.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use stockroom_core::accounts::Registration;
use stockroom_core::error::CoreError;

use crate::auth::credentials::{authenticate, register as register_account};
use crate::auth::session::{
    end_session, removal_cookie, session_cookie, start_session, SessionLifetime, SESSION_COOKIE,
};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::{safe_return_path, MaybeAuthUser};
use crate::state::AppState;
use crate::views::auth::{login_page as render_login, register_page as render_register, RegisterValues};
use crate::views::Notice;

/// Shown when the login form is submitted with a blank field.
pub const MISSING_CREDENTIALS_MESSAGE: &str = "Please enter username and password.";

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Query string accepted by the login page.
#[derive(Debug, Default, Deserialize)]
pub struct LoginPageQuery {
    pub notice: Option<String>,
    pub next: Option<String>,
}

/// Body of `POST /login`. Not `Debug`: it carries the plaintext password.
#[derive(Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Present (as `"on"`) when the "remember me" box is ticked.
    pub remember: Option<String>,
    pub next: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /register
pub async fn register_page(MaybeAuthUser(user): MaybeAuthUser) -> Response {
    if user.is_some() {
        return Redirect::to("/").into_response();
    }
    render_register(&RegisterValues::default(), &[]).into_response()
}

/// POST /register
///
/// Creates the account and sends the user to the login page. Any problem
/// re-renders the form with every message at once.
pub async fn register(
    State(state): State<AppState>,
    MaybeAuthUser(user): MaybeAuthUser,
    Form(form): Form<Registration>,
) -> AppResult<Response> {
    if user.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    let normalized = form.normalized();
    let problems = normalized.problems();
    if !problems.is_empty() {
        return Ok(register_rejection(&normalized, &problems));
    }

    match register_account(&state.pool, normalized.clone()).await {
        Ok(_) => Ok(Redirect::to(&Notice::Registered.redirect_to("/login")).into_response()),
        Err(AppError::Core(err)) => {
            if let Some(message) = err.form_message().map(str::to_string) {
                return Ok(register_rejection(&normalized, &[message]));
            }
            Err(AppError::Core(err))
        }
        Err(err) => Err(err),
    }
}

fn register_rejection(form: &Registration, problems: &[String]) -> Response {
    let values = RegisterValues {
        username: &form.username,
        email: &form.email,
    };
    (StatusCode::UNPROCESSABLE_ENTITY, render_register(&values, problems)).into_response()
}

/// GET /login
pub async fn login_page(
    MaybeAuthUser(user): MaybeAuthUser,
    Query(query): Query<LoginPageQuery>,
) -> Response {
    if user.is_some() {
        return Redirect::to("/").into_response();
    }
    let next = query.next.as_deref().and_then(safe_return_path);
    let notice = query.notice.as_deref().and_then(Notice::from_code);
    render_login("", next, notice, &[]).into_response()
}

/// POST /login
///
/// On success sets the session cookie and redirects to `next` (when it is a
/// local path) or the dashboard.
pub async fn login(
    State(state): State<AppState>,
    MaybeAuthUser(user): MaybeAuthUser,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    if user.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    let next = form.next.as_deref().and_then(safe_return_path);
    let username = form.username.trim();

    if username.is_empty() || form.password.is_empty() {
        let page = render_login(username, next, None, &[MISSING_CREDENTIALS_MESSAGE.to_string()]);
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
    }

    let user = match authenticate(&state.pool, username, &form.password).await {
        Ok(user) => user,
        Err(AppError::Core(CoreError::Unauthorized(message))) => {
            let page = render_login(username, next, None, &[message]);
            return Ok((StatusCode::UNAUTHORIZED, page).into_response());
        }
        Err(err) => return Err(err),
    };

    let lifetime = SessionLifetime::from_remember_me(form.remember.is_some());
    let issued = start_session(&state.pool, &state.config.session, user.id, lifetime).await?;
    let jar = jar.add(session_cookie(&issued, &state.config.session));

    tracing::debug!(user_id = user.id, ?lifetime, "Session started");
    Ok((jar, Redirect::to(next.unwrap_or("/"))).into_response())
}

/// GET /logout
///
/// Revokes the session (if any) and clears the cookie. Safe to hit while
/// logged out.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> AppResult<Response> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        end_session(&state.pool, &state.config.session, cookie.value()).await?;
    }
    let jar = jar.remove(removal_cookie());
    Ok((jar, Redirect::to(&Notice::LoggedOut.redirect_to("/login"))).into_response())
}
