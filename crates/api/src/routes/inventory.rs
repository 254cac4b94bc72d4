//! Route definitions for inventory pages. All require a session.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::inventory;
use crate::state::AppState;

/// ```text
/// GET        /             -> index
/// GET, POST  /add          -> add_page, add
/// GET, POST  /edit/{id}    -> edit_page, edit
/// POST       /delete/{id}  -> delete
/// GET        /view/{id}    -> view
/// GET        /search       -> search
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(inventory::index))
        .route("/add", get(inventory::add_page).post(inventory::add))
        .route("/edit/{id}", get(inventory::edit_page).post(inventory::edit))
        .route("/delete/{id}", post(inventory::delete))
        .route("/view/{id}", get(inventory::view))
        .route("/search", get(inventory::search))
}
