//! Message entity.

use heartlink_core::types::{DbId, SessionId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::status::MessageKind;

/// A row from the `messages` table.
///
/// `is_read` is meaningful only once flipped by the *other* participant;
/// a sender's own messages are never marked read by the sender.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Message {
    pub id: DbId,
    pub session_id: SessionId,
    pub sender_id: DbId,
    pub kind_id: i16,
    pub content: String,
    pub created_at: Timestamp,
    pub is_read: bool,
}

impl Message {
    pub fn kind(&self) -> Option<MessageKind> {
        MessageKind::from_id(self.kind_id)
    }
}
