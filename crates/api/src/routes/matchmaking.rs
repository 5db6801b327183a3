//! Route definitions for the pairing engine.
//!
//! All routes require authentication.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::matchmaking;
use crate::state::AppState;

/// Routes mounted at `/match`.
///
/// ```text
/// POST /request       -> request_match
/// POST /{id}/cancel   -> cancel_match
/// GET  /status        -> check_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/request", post(matchmaking::request_match))
        .route("/{id}/cancel", post(matchmaking::cancel_match))
        .route("/status", get(matchmaking::check_status))
}
