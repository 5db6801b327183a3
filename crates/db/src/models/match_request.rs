//! Match request entity and pairing-engine outcome types.

use heartlink_core::types::{DbId, SessionId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::chat_session::ChatSession;
use crate::models::status::MatchStatus;

/// A row from the `match_requests` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MatchRequest {
    pub id: DbId,
    pub requester_id: DbId,
    pub status_id: i16,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
    pub matched_with: Option<DbId>,
    pub session_id: Option<SessionId>,
    pub matched_at: Option<Timestamp>,
}

impl MatchRequest {
    /// Decode the status column. `None` only if the row carries an id that
    /// is not in the seeded lookup table.
    pub fn status(&self) -> Option<MatchStatus> {
        MatchStatus::from_id(self.status_id)
    }
}

/// Result of an atomic `RequestMatch` attempt.
#[derive(Debug)]
pub enum MatchOutcome {
    /// The caller already has an active session; no request was created.
    Reconnect { session: ChatSession, peer: DbId },
    /// The caller is queued (either a fresh request or an existing live one).
    Waiting { request: MatchRequest },
    /// The caller was paired with the oldest waiting user.
    Paired { session: ChatSession, peer: DbId },
}

/// Read-only view returned by `CheckStatus`.
#[derive(Debug)]
pub enum RequestStatus {
    /// The user has never requested a match (or all history was pruned).
    NotFound,
    /// Still waiting; carries the (possibly slid-forward) request row.
    Pending { request: MatchRequest },
    /// Paired; the session may or may not still be active.
    Matched { session_id: SessionId, peer: DbId },
    Expired,
    Cancelled,
}

/// Result of a `CancelMatch` attempt.
#[derive(Debug, PartialEq, Eq)]
pub enum CancelOutcome {
    /// The pending request was cancelled.
    Cancelled,
    /// The request had already expired or been cancelled; cancelling again
    /// is an idempotent no-op.
    AlreadyResolved,
    /// The pairing engine matched the request first; the cancellation lost
    /// the race and must surface as a conflict, never a false success.
    LostToMatch,
    /// The request belongs to a different user.
    NotOwner,
    /// No such request id.
    NotFound,
}
