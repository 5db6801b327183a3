//! Repository for the `messages` table: the messaging gateway storage.

use heartlink_core::types::{DbId, SessionId, Timestamp};
use sqlx::PgPool;

use crate::models::message::Message;
use crate::models::status::MessageKind;

/// Column list for `messages` queries.
const COLUMNS: &str = "id, session_id, sender_id, kind_id, content, created_at, is_read";

/// Provides message CRUD with duplicate suppression and read tracking.
pub struct MessageRepo;

impl MessageRepo {
    /// Insert a message unless an identical `(sender, content)` pair was
    /// accepted in the same session after `debounce_cutoff`.
    ///
    /// The guard is best-effort: the check and insert are one statement,
    /// catching sequential resubmits, but two identical sends in flight at
    /// the same instant can both pass the `NOT EXISTS` under READ
    /// COMMITTED. That is acceptable for a duplicate-submission guard; it
    /// is not a rate limiter. Returns `None` when suppressed.
    pub async fn create_debounced(
        pool: &PgPool,
        session_id: SessionId,
        sender_id: DbId,
        kind: MessageKind,
        content: &str,
        debounce_cutoff: Timestamp,
    ) -> Result<Option<Message>, sqlx::Error> {
        sqlx::query_as(&format!(
            "INSERT INTO messages (session_id, sender_id, kind_id, content) \
             SELECT $1, $2, $3, $4 \
             WHERE NOT EXISTS ( \
                 SELECT 1 FROM messages \
                 WHERE session_id = $1 AND sender_id = $2 AND content = $4 \
                   AND created_at > $5 \
             ) \
             RETURNING {COLUMNS}"
        ))
        .bind(session_id)
        .bind(sender_id)
        .bind(kind.id())
        .bind(content)
        .bind(debounce_cutoff)
        .fetch_optional(pool)
        .await
    }

    /// Fetch a message by id.
    pub async fn get(pool: &PgPool, message_id: DbId) -> Result<Option<Message>, sqlx::Error> {
        sqlx::query_as(&format!("SELECT {COLUMNS} FROM messages WHERE id = $1"))
            .bind(message_id)
            .fetch_optional(pool)
            .await
    }

    /// List a session's messages in send order (per-session monotonic
    /// `created_at`, tie-broken by id).
    pub async fn list_for_session(
        pool: &PgPool,
        session_id: SessionId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Message>, sqlx::Error> {
        sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM messages \
             WHERE session_id = $1 \
             ORDER BY created_at ASC, id ASC \
             LIMIT $2 OFFSET $3"
        ))
        .bind(session_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// Mark as read every unread message in the session sent by the *other*
    /// participant. The reader's own messages are never touched.
    ///
    /// Returns the number of messages marked.
    pub async fn mark_read(
        pool: &PgPool,
        session_id: SessionId,
        reader_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE messages SET is_read = true \
             WHERE session_id = $1 AND sender_id <> $2 AND is_read = false",
        )
        .bind(session_id)
        .bind(reader_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Hard-delete a message. Ownership, session state, and the grace
    /// window are enforced by the gateway before calling this.
    pub async fn delete(pool: &PgPool, message_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM messages WHERE id = $1")
            .bind(message_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
