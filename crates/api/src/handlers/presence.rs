//! Handlers for the `/presence` resource: the presence tracker surface.

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use heartlink_core::policy;
use heartlink_core::types::{DbId, SessionId, Timestamp};
use heartlink_db::repositories::PresenceRepo;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /presence/heartbeat`. The body is optional.
#[derive(Debug, Default, Deserialize)]
pub struct HeartbeatRequest {
    /// Advisory only: recorded for the sweeper and UI hints, never used to
    /// authorize session access.
    pub session_id: Option<SessionId>,
}

/// Response payload for a heartbeat ack.
#[derive(Debug, Serialize)]
pub struct HeartbeatResponse {
    pub last_seen: Timestamp,
}

/// Derived presence view of another user.
#[derive(Debug, Serialize)]
pub struct PresenceResponse {
    pub user_id: DbId,
    pub online: bool,
}

/// POST /api/v1/presence/heartbeat
///
/// Record `last_seen = now` for the caller. `last_seen` is monotonic.
pub async fn heartbeat(
    auth: AuthUser,
    State(state): State<AppState>,
    body: Option<Json<HeartbeatRequest>>,
) -> AppResult<Json<DataResponse<HeartbeatResponse>>> {
    let input = body.map(|Json(b)| b).unwrap_or_default();

    let record = PresenceRepo::heartbeat(&state.pool, auth.user_id, input.session_id).await?;

    Ok(Json(DataResponse::new(HeartbeatResponse {
        last_seen: record.last_seen,
    })))
}

/// GET /api/v1/presence/{user_id}
///
/// Derived online flag for any user (partner indicator in the chat UI).
/// Users with no presence record are offline.
pub async fn get_presence(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<DataResponse<PresenceResponse>>> {
    let cutoff = Utc::now() - policy::online_window();
    let online = PresenceRepo::is_online(&state.pool, user_id, cutoff).await?;

    Ok(Json(DataResponse::new(PresenceResponse { user_id, online })))
}
