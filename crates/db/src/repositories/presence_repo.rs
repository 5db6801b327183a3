//! Repository for the `presence_records` table: the presence tracker.

use heartlink_core::types::{DbId, SessionId, Timestamp};
use sqlx::PgPool;

use crate::models::presence::PresenceRecord;

/// Column list for `presence_records` queries.
const COLUMNS: &str = "user_id, last_seen, current_session_id";

/// Provides heartbeat upserts and derived online checks.
pub struct PresenceRepo;

impl PresenceRepo {
    /// Record a heartbeat: upsert `last_seen = NOW()` for the user.
    ///
    /// `last_seen` is monotonic (GREATEST guards against clock skew between
    /// pool connections). A supplied `session_id` is recorded as the
    /// advisory `current_session_id`; `None` leaves any previous value in
    /// place rather than clearing it.
    pub async fn heartbeat(
        pool: &PgPool,
        user_id: DbId,
        session_id: Option<SessionId>,
    ) -> Result<PresenceRecord, sqlx::Error> {
        sqlx::query_as(&format!(
            "INSERT INTO presence_records (user_id, last_seen, current_session_id) \
             VALUES ($1, NOW(), $2) \
             ON CONFLICT (user_id) DO UPDATE SET \
                 last_seen = GREATEST(presence_records.last_seen, EXCLUDED.last_seen), \
                 current_session_id = COALESCE(EXCLUDED.current_session_id, presence_records.current_session_id) \
             RETURNING {COLUMNS}"
        ))
        .bind(user_id)
        .bind(session_id)
        .fetch_one(pool)
        .await
    }

    /// Fetch a user's presence record.
    pub async fn get(pool: &PgPool, user_id: DbId) -> Result<Option<PresenceRecord>, sqlx::Error> {
        sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM presence_records WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// Derived online flag: was the user seen after `cutoff`
    /// (`now - ONLINE_WINDOW`)? Users with no presence row are offline.
    pub async fn is_online(
        pool: &PgPool,
        user_id: DbId,
        cutoff: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let online: Option<bool> = sqlx::query_scalar(
            "SELECT EXISTS( \
                 SELECT 1 FROM presence_records WHERE user_id = $1 AND last_seen > $2 \
             )",
        )
        .bind(user_id)
        .bind(cutoff)
        .fetch_one(pool)
        .await?;
        Ok(online.unwrap_or(false))
    }
}
