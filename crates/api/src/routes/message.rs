//! Route definitions for direct message operations.

use axum::routing::delete;
use axum::Router;

use crate::handlers::message;
use crate::state::AppState;

/// Routes mounted at `/messages`.
///
/// ```text
/// DELETE /{id} -> delete_message (sender-only, grace window)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", delete(message::delete_message))
}
