//! Handlers for the `/match` resource: the pairing engine surface.
//!
//! Matching is always non-blocking request/response; clients poll
//! `GET /match/status` while waiting.

use axum::extract::{Path, State};
use axum::Json;
use heartlink_core::error::CoreError;
use heartlink_core::types::{DbId, SessionId, Timestamp};
use heartlink_db::models::match_request::{CancelOutcome, MatchOutcome, RequestStatus};
use heartlink_db::repositories::MatchRequestRepo;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response payload for `POST /match/request`.
#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MatchOutcomeResponse {
    /// Queued; keep polling `/match/status`.
    Waiting { request_id: DbId },
    /// Paired with the oldest waiting user.
    Paired { session_id: SessionId, peer_id: DbId },
    /// Already in an active session (e.g. after a page reload).
    Reconnect { session_id: SessionId, peer_id: DbId },
}

/// Response payload for `GET /match/status`.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MatchStatusResponse {
    NotFound,
    Pending {
        request_id: DbId,
        expires_at: Timestamp,
    },
    Matched {
        session_id: SessionId,
        peer_id: DbId,
    },
    Expired,
    Cancelled,
}

/// POST /api/v1/match/request
///
/// Atomically pair the caller with the oldest waiting user, or enqueue
/// them. Idempotent for users who are already waiting or already matched.
pub async fn request_match(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<MatchOutcomeResponse>>> {
    let outcome = MatchRequestRepo::request_match(&state.pool, auth.user_id).await?;

    let response = match outcome {
        MatchOutcome::Waiting { request } => {
            tracing::debug!(user_id = auth.user_id, request_id = request.id, "Queued for match");
            MatchOutcomeResponse::Waiting {
                request_id: request.id,
            }
        }
        MatchOutcome::Paired { session, peer } => {
            tracing::info!(
                user_id = auth.user_id,
                peer_id = peer,
                session_id = %session.id,
                "Paired",
            );
            MatchOutcomeResponse::Paired {
                session_id: session.id,
                peer_id: peer,
            }
        }
        MatchOutcome::Reconnect { session, peer } => MatchOutcomeResponse::Reconnect {
            session_id: session.id,
            peer_id: peer,
        },
    };

    Ok(Json(DataResponse::new(response)))
}

/// POST /api/v1/match/{id}/cancel
///
/// Cancel the caller's own pending request. Cancelling an already-expired
/// or already-cancelled request is an idempotent no-op; losing the race to
/// a concurrent pairing is a 409 so the client knows it was matched.
pub async fn cancel_match(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(request_id): Path<DbId>,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    let outcome = MatchRequestRepo::cancel(&state.pool, request_id, auth.user_id).await?;

    let status = match outcome {
        CancelOutcome::Cancelled => "cancelled",
        CancelOutcome::AlreadyResolved => "already_resolved",
        CancelOutcome::LostToMatch => {
            return Err(CoreError::Conflict(
                "Request was already matched; check /match/status".into(),
            )
            .into());
        }
        CancelOutcome::NotOwner => {
            return Err(CoreError::Forbidden("Not the owner of this match request".into()).into());
        }
        CancelOutcome::NotFound => {
            return Err(CoreError::not_found("MatchRequest", request_id).into());
        }
    };

    Ok(Json(DataResponse::new(
        serde_json::json!({ "status": status }),
    )))
}

/// GET /api/v1/match/status
///
/// Read the caller's current match status. Polling this while pending and
/// recently seen slides the request's expiry forward (bounded by the
/// absolute maximum pending age).
pub async fn check_status(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<MatchStatusResponse>>> {
    let status = MatchRequestRepo::check_status(&state.pool, auth.user_id).await?;

    let response = match status {
        RequestStatus::NotFound => MatchStatusResponse::NotFound,
        RequestStatus::Pending { request } => MatchStatusResponse::Pending {
            request_id: request.id,
            expires_at: request.expires_at,
        },
        RequestStatus::Matched { session_id, peer } => MatchStatusResponse::Matched {
            session_id,
            peer_id: peer,
        },
        RequestStatus::Expired => MatchStatusResponse::Expired,
        RequestStatus::Cancelled => MatchStatusResponse::Cancelled,
    };

    Ok(Json(DataResponse::new(response)))
}
