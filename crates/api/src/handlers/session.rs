//! Handlers for the `/sessions` resource: the session manager surface.

use axum::extract::{Path, State};
use axum::Json;
use heartlink_core::error::CoreError;
use heartlink_core::types::{DbId, SessionId, Timestamp};
use heartlink_db::models::chat_session::ChatSession;
use heartlink_db::models::status::SessionStatus;
use heartlink_db::repositories::ChatSessionRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Session metadata as seen by one participant.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: SessionId,
    pub peer_id: DbId,
    pub status: &'static str,
    pub created_at: Timestamp,
    pub ended_at: Option<Timestamp>,
}

impl SessionResponse {
    fn for_participant(session: &ChatSession, peer_id: DbId) -> Self {
        Self {
            id: session.id,
            peer_id,
            status: session
                .status()
                .map(SessionStatus::as_str)
                .unwrap_or("unknown"),
            created_at: session.created_at,
            ended_at: session.ended_at,
        }
    }
}

/// Fetch a session and authorize the caller as a participant.
///
/// Only the two participants may read session metadata; everyone else gets
/// a 403 (the session id itself is an opaque token, so existence is not a
/// secret).
pub async fn load_for_participant(
    state: &AppState,
    session_id: SessionId,
    user_id: DbId,
) -> Result<(ChatSession, DbId), AppError> {
    let session = ChatSessionRepo::get(&state.pool, session_id)
        .await?
        .ok_or_else(|| CoreError::not_found("ChatSession", session_id))?;

    let peer = session
        .peer_of(user_id)
        .ok_or_else(|| CoreError::Forbidden("Not a participant in this session".into()))?;

    Ok((session, peer))
}

/// GET /api/v1/sessions/{id}
///
/// Session metadata, participant-only.
pub async fn get_session(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(session_id): Path<SessionId>,
) -> AppResult<Json<DataResponse<SessionResponse>>> {
    let (session, peer) = load_for_participant(&state, session_id, auth.user_id).await?;

    Ok(Json(DataResponse::new(SessionResponse::for_participant(
        &session, peer,
    ))))
}

/// POST /api/v1/sessions/{id}/end
///
/// Either participant may unilaterally end an active session. The
/// transition is terminal; ending an already-ended session is a 410.
pub async fn end_session(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(session_id): Path<SessionId>,
) -> AppResult<Json<DataResponse<SessionResponse>>> {
    let (session, peer) = load_for_participant(&state, session_id, auth.user_id).await?;

    if !session.is_active() {
        return Err(CoreError::AlreadyEnded("Session is already ended".into()).into());
    }

    let ended = ChatSessionRepo::end(&state.pool, session_id).await?;
    if !ended {
        // Lost a race with the other participant or the sweeper.
        return Err(CoreError::AlreadyEnded("Session is already ended".into()).into());
    }

    tracing::info!(
        session_id = %session_id,
        ended_by = auth.user_id,
        "Session ended by participant",
    );

    let session = ChatSessionRepo::get(&state.pool, session_id)
        .await?
        .ok_or_else(|| CoreError::not_found("ChatSession", session_id))?;

    Ok(Json(DataResponse::new(SessionResponse::for_participant(
        &session, peer,
    ))))
}
