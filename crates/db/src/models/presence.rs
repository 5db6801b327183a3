//! Presence record entity.

use heartlink_core::types::{DbId, SessionId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `presence_records` table.
///
/// Online/offline is derived from `last_seen` at query time and never
/// persisted. `current_session_id` is advisory only: it feeds the sweeper
/// and UI hints, never authorization.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PresenceRecord {
    pub user_id: DbId,
    pub last_seen: Timestamp,
    pub current_session_id: Option<SessionId>,
}

impl PresenceRecord {
    /// Derive the online flag against a precomputed cutoff
    /// (`now - ONLINE_WINDOW`).
    pub fn is_online_at(&self, cutoff: Timestamp) -> bool {
        self.last_seen > cutoff
    }
}
