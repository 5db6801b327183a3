pub mod health;
pub mod matchmaking;
pub mod message;
pub mod presence;
pub mod session;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /match/request                   request pairing (POST)
/// /match/{id}/cancel               cancel pending request (POST)
/// /match/status                    poll match status (GET)
///
/// /sessions/{id}                   session metadata (GET)
/// /sessions/{id}/end               end session (POST)
/// /sessions/{id}/messages          send (POST), list (GET)
/// /sessions/{id}/messages/read     mark peer messages read (POST)
///
/// /messages/{id}                   delete own message (DELETE)
///
/// /presence/heartbeat              heartbeat (POST)
/// /presence/{user_id}              derived online flag (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/match", matchmaking::router())
        .nest("/sessions", session::router())
        .nest("/messages", message::router())
        .nest("/presence", presence::router())
}
