pub mod auth;
pub mod health;
pub mod inventory;

use axum::Router;

use crate::state::AppState;

/// Build the page route tree.
///
/// Route hierarchy:
///
/// ```text
/// /register                 register form, create account
/// /login                    login form, start session
/// /logout                   end session
///
/// /                         dashboard with totals (requires auth)
/// /add                      add form, create item
/// /edit/{id}                edit form, update item
/// /delete/{id}              delete item (POST)
/// /view/{id}                item detail
/// /search?q=                substring search
/// ```
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(inventory::router())
}
