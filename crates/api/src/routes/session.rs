//! Route definitions for sessions and their messages.
//!
//! All routes require authentication and participant membership.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{message, session};
use crate::state::AppState;

/// Routes mounted at `/sessions`.
///
/// ```text
/// GET  /{id}                 -> get_session
/// POST /{id}/end             -> end_session
/// POST /{id}/messages        -> send_message
/// GET  /{id}/messages        -> list_messages
/// POST /{id}/messages/read   -> mark_read
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(session::get_session))
        .route("/{id}/end", post(session::end_session))
        .route(
            "/{id}/messages",
            post(message::send_message).get(message::list_messages),
        )
        .route("/{id}/messages/read", post(message::mark_read))
}
