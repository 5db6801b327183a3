//! Chat session entity.

use heartlink_core::types::{DbId, SessionId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::status::SessionStatus;

/// A row from the `chat_sessions` table.
///
/// Membership is immutable after creation and the two participants are
/// always distinct (enforced by a table CHECK constraint).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ChatSession {
    pub id: SessionId,
    pub participant_a: DbId,
    pub participant_b: DbId,
    pub status_id: i16,
    pub created_at: Timestamp,
    pub ended_at: Option<Timestamp>,
}

impl ChatSession {
    pub fn status(&self) -> Option<SessionStatus> {
        SessionStatus::from_id(self.status_id)
    }

    pub fn is_active(&self) -> bool {
        self.status_id == SessionStatus::Active.id()
    }

    /// Whether the given user is one of the two participants.
    pub fn has_participant(&self, user_id: DbId) -> bool {
        self.participant_a == user_id || self.participant_b == user_id
    }

    /// The other participant, from `user_id`'s point of view.
    ///
    /// Returns `None` when `user_id` is not a participant.
    pub fn peer_of(&self, user_id: DbId) -> Option<DbId> {
        if self.participant_a == user_id {
            Some(self.participant_b)
        } else if self.participant_b == user_id {
            Some(self.participant_a)
        } else {
            None
        }
    }
}
