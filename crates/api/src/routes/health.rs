use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthStatus {
    /// `"ok"` when the database answers, `"degraded"` otherwise.
    pub status: &'static str,
    pub version: &'static str,
}

/// GET /health
async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    let status = match stockroom_db::health_check(&state.pool).await {
        Ok(()) => "ok",
        Err(err) => {
            tracing::warn!(error = %err, "Health check could not reach the database");
            "degraded"
        }
    };
    Json(HealthStatus {
        status,
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
