//! Route definitions for presence.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::presence;
use crate::state::AppState;

/// Routes mounted at `/presence`.
///
/// ```text
/// POST /heartbeat   -> heartbeat
/// GET  /{user_id}   -> get_presence
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/heartbeat", post(presence::heartbeat))
        .route("/{user_id}", get(presence::get_presence))
}
