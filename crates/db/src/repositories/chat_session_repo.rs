//! Repository for the `chat_sessions` table: the session manager.
//!
//! Sessions are created only inside the pairing transaction
//! (see `match_request_repo`); this repository owns reads, the terminal
//! end transition, and the sweeper's candidate query.

use heartlink_core::types::{DbId, SessionId, Timestamp};
use sqlx::PgPool;

use crate::models::chat_session::ChatSession;
use crate::models::status::{MatchStatus, SessionStatus};

/// Column list for `chat_sessions` queries.
const COLUMNS: &str = "id, participant_a, participant_b, status_id, created_at, ended_at";

/// Provides chat session lifecycle operations.
pub struct ChatSessionRepo;

impl ChatSessionRepo {
    /// Fetch a session by id.
    pub async fn get(pool: &PgPool, session_id: SessionId) -> Result<Option<ChatSession>, sqlx::Error> {
        sqlx::query_as(&format!("SELECT {COLUMNS} FROM chat_sessions WHERE id = $1"))
            .bind(session_id)
            .fetch_optional(pool)
            .await
    }

    /// The oldest active session the user participates in, if any.
    pub async fn find_active_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<ChatSession>, sqlx::Error> {
        sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM chat_sessions \
             WHERE status_id = $1 AND (participant_a = $2 OR participant_b = $2) \
             ORDER BY created_at ASC \
             LIMIT 1"
        ))
        .bind(SessionStatus::Active.id())
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// End an active session and cascade to its match requests.
    ///
    /// The transition is terminal and happens at most once: the conditional
    /// update only fires while the session is still active, and the cascade
    /// flips any `matched` request referencing the session to `expired` so
    /// the pairing cannot be resumed from the request side.
    ///
    /// Returns `false` when the session was already ended (or does not
    /// exist); callers decide whether that is an error.
    pub async fn end(pool: &PgPool, session_id: SessionId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let result = sqlx::query(
            "UPDATE chat_sessions SET status_id = $2, ended_at = NOW() \
             WHERE id = $1 AND status_id = $3",
        )
        .bind(session_id)
        .bind(SessionStatus::Ended.id())
        .bind(SessionStatus::Active.id())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query(
            "UPDATE match_requests SET status_id = $2 \
             WHERE session_id = $1 AND status_id = $3",
        )
        .bind(session_id)
        .bind(MatchStatus::Expired.id())
        .bind(MatchStatus::Matched.id())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Active sessions eligible for auto-ending.
    ///
    /// A session qualifies only when it is older than the creation grace
    /// period *and* both participants have been idle past the inactivity
    /// cutoff. A participant with no presence row counts as idle since the
    /// session was created. One present participant keeps the session alive.
    pub async fn sweep_candidates(
        pool: &PgPool,
        grace_cutoff: Timestamp,
        idle_cutoff: Timestamp,
    ) -> Result<Vec<SessionId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT s.id FROM chat_sessions s \
             LEFT JOIN presence_records pa ON pa.user_id = s.participant_a \
             LEFT JOIN presence_records pb ON pb.user_id = s.participant_b \
             WHERE s.status_id = $1 \
               AND s.created_at < $2 \
               AND COALESCE(pa.last_seen, s.created_at) < $3 \
               AND COALESCE(pb.last_seen, s.created_at) < $3",
        )
        .bind(SessionStatus::Active.id())
        .bind(grace_cutoff)
        .bind(idle_cutoff)
        .fetch_all(pool)
        .await
    }
}
