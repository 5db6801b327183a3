//! Handlers for session messages: the messaging gateway.
//!
//! All message operations authorize the caller as a session participant
//! first. Message kind strings are parsed into the closed [`MessageKind`]
//! set at this boundary; anything else is a validation error.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use heartlink_core::error::CoreError;
use heartlink_core::policy;
use heartlink_core::types::{DbId, SessionId, Timestamp};
use heartlink_db::models::message::Message;
use heartlink_db::models::status::MessageKind;
use heartlink_db::repositories::{ChatSessionRepo, MessageRepo};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::handlers::session::load_for_participant;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Maximum page size for message listing.
const MAX_LIMIT: i64 = 200;

/// Default page size for message listing.
const DEFAULT_LIMIT: i64 = 50;

/// Request body for `POST /sessions/{id}/messages`.
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    /// Message kind name; defaults to `text`.
    pub kind: Option<String>,
    /// Text content, or an opaque storage reference for media kinds.
    pub content: String,
}

/// Query parameters for `GET /sessions/{id}/messages`.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    /// Maximum number of results. Defaults to 50, capped at 200.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}

/// A message as returned to clients (kind decoded to its name).
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub id: DbId,
    pub session_id: SessionId,
    pub sender_id: DbId,
    pub kind: &'static str,
    pub content: String,
    pub created_at: Timestamp,
    pub is_read: bool,
}

impl From<Message> for MessageResponse {
    fn from(message: Message) -> Self {
        Self {
            id: message.id,
            session_id: message.session_id,
            sender_id: message.sender_id,
            kind: message.kind().map(MessageKind::as_str).unwrap_or("text"),
            content: message.content,
            created_at: message.created_at,
            is_read: message.is_read,
        }
    }
}

/// Parse and validate the send request against gateway rules.
fn validate_send(input: &SendMessageRequest) -> Result<MessageKind, CoreError> {
    let kind_name = input.kind.as_deref().unwrap_or("text");
    let kind = MessageKind::parse(kind_name)
        .ok_or_else(|| CoreError::Validation(format!("Unknown message kind: {kind_name}")))?;

    if input.content.trim().is_empty() {
        return Err(CoreError::Validation("Message content must not be empty".into()));
    }
    if input.content.chars().count() > policy::MAX_MESSAGE_CONTENT_LEN {
        return Err(CoreError::Validation(format!(
            "Message content exceeds {} characters",
            policy::MAX_MESSAGE_CONTENT_LEN
        )));
    }

    Ok(kind)
}

/// POST /api/v1/sessions/{id}/messages
///
/// Accept a message into an active session. An identical `(sender,
/// content)` pair within the debounce window is rejected with 429.
pub async fn send_message(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(session_id): Path<SessionId>,
    Json(input): Json<SendMessageRequest>,
) -> AppResult<Json<DataResponse<MessageResponse>>> {
    let kind = validate_send(&input)?;

    let (session, _) = load_for_participant(&state, session_id, auth.user_id).await?;
    if !session.is_active() {
        return Err(CoreError::AlreadyEnded("Session is already ended".into()).into());
    }

    let cutoff = Utc::now() - policy::message_debounce();
    let message = MessageRepo::create_debounced(
        &state.pool,
        session_id,
        auth.user_id,
        kind,
        &input.content,
        cutoff,
    )
    .await?
    .ok_or_else(|| CoreError::RateLimited("Duplicate message suppressed".into()))?;

    Ok(Json(DataResponse::new(message.into())))
}

/// GET /api/v1/sessions/{id}/messages
///
/// List the session's messages in send order, participant-only.
pub async fn list_messages(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(session_id): Path<SessionId>,
    Query(params): Query<MessageQuery>,
) -> AppResult<Json<DataResponse<Vec<MessageResponse>>>> {
    load_for_participant(&state, session_id, auth.user_id).await?;

    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = params.offset.unwrap_or(0).max(0);

    let messages = MessageRepo::list_for_session(&state.pool, session_id, limit, offset).await?;

    Ok(Json(DataResponse::new(
        messages.into_iter().map(MessageResponse::from).collect(),
    )))
}

/// POST /api/v1/sessions/{id}/messages/read
///
/// Mark the other participant's messages as read. Never flips the
/// caller's own messages. Returns the number marked.
pub async fn mark_read(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(session_id): Path<SessionId>,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    load_for_participant(&state, session_id, auth.user_id).await?;

    let count = MessageRepo::mark_read(&state.pool, session_id, auth.user_id).await?;

    Ok(Json(DataResponse::new(
        serde_json::json!({ "marked_read": count }),
    )))
}

/// DELETE /api/v1/messages/{id}
///
/// Delete the caller's own message, only within the delete grace window
/// and only while the session is still active. Returns 204 on success.
pub async fn delete_message(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(message_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let message = MessageRepo::get(&state.pool, message_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Message", message_id))?;

    if message.sender_id != auth.user_id {
        return Err(CoreError::Forbidden("Only the sender may delete a message".into()).into());
    }

    let session = ChatSessionRepo::get(&state.pool, message.session_id)
        .await?
        .ok_or_else(|| CoreError::not_found("ChatSession", message.session_id))?;
    if !session.is_active() {
        return Err(CoreError::AlreadyEnded("Session is already ended".into()).into());
    }

    if Utc::now() - message.created_at > policy::message_delete_grace() {
        return Err(CoreError::Conflict("Delete grace window has elapsed".into()).into());
    }

    MessageRepo::delete(&state.pool, message_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
