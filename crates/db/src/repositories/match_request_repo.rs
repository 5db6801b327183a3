//! Repository for the `match_requests` table: the pairing engine core.
//!
//! The atomic find-or-enqueue sequence runs under a single
//! transaction-scoped advisory lock shared by every caller: the scan and
//! the enqueue must observe each other's committed writes, or two
//! simultaneous requesters on an empty queue would both enqueue and never
//! pair. `FOR UPDATE` on the claimed row keeps it pinned until commit.

use chrono::Utc;
use heartlink_core::policy;
use heartlink_core::types::{DbId, SessionId};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::chat_session::ChatSession;
use crate::models::match_request::{CancelOutcome, MatchOutcome, MatchRequest, RequestStatus};
use crate::models::status::{MatchStatus, SessionStatus};

/// Column list for `match_requests` queries.
const COLUMNS: &str =
    "id, requester_id, status_id, created_at, expires_at, matched_with, session_id, matched_at";

/// Column list for `chat_sessions` rows returned from the pairing transaction.
const SESSION_COLUMNS: &str =
    "id, participant_a, participant_b, status_id, created_at, ended_at";

/// Advisory lock key for the pairing critical section. One key for all
/// callers: under READ COMMITTED a per-caller key would let two concurrent
/// requesters each miss the other's uncommitted pending row.
const PAIRING_LOCK_KEY: i64 = 0x4845_4152_544c_4e4b;

/// Provides the atomic pairing operation plus request lifecycle queries.
pub struct MatchRequestRepo;

impl MatchRequestRepo {
    /// Atomically resolve a `RequestMatch` call for `user_id`.
    ///
    /// Inside one transaction, in order:
    /// 1. Take the shared pairing advisory lock, serializing the whole
    ///    read-modify-write across all callers.
    /// 2. If the user is already in an active session, return
    ///    [`MatchOutcome::Reconnect`] without touching the queue.
    /// 3. If the user already has a live pending request, return
    ///    [`MatchOutcome::Waiting`] with that request (idempotent).
    /// 4. Lock the oldest other-user live pending request
    ///    (`FOR UPDATE SKIP LOCKED`, FIFO by `created_at` then `id`).
    ///    If one is found, create the session and mark both requests
    ///    matched; otherwise enqueue the caller as pending.
    pub async fn request_match(pool: &PgPool, user_id: DbId) -> Result<MatchOutcome, sqlx::Error> {
        let now = Utc::now();
        let mut tx = pool.begin().await?;

        // Released automatically at commit or rollback.
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(PAIRING_LOCK_KEY)
            .execute(&mut *tx)
            .await?;

        // Reconnect path: an already-matched user always gets their
        // existing session back, so a page reload recovers state.
        let active: Option<ChatSession> = sqlx::query_as(&format!(
            "SELECT {SESSION_COLUMNS} FROM chat_sessions \
             WHERE status_id = $1 AND (participant_a = $2 OR participant_b = $2) \
             ORDER BY created_at ASC \
             LIMIT 1"
        ))
        .bind(SessionStatus::Active.id())
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(session) = active {
            let peer = session.peer_of(user_id).unwrap_or(session.participant_a);
            tx.commit().await?;
            return Ok(MatchOutcome::Reconnect { session, peer });
        }

        // Demote the caller's own overdue pending rows before queueing,
        // so a stale row the sweeper has not reached yet cannot trip the
        // one-pending-per-user unique index below.
        sqlx::query(
            "UPDATE match_requests SET status_id = $2 \
             WHERE requester_id = $1 AND status_id = $3 AND expires_at <= $4",
        )
        .bind(user_id)
        .bind(MatchStatus::Expired.id())
        .bind(MatchStatus::Pending.id())
        .bind(now)
        .execute(&mut *tx)
        .await?;

        // Idempotency: never create a second pending request for a user
        // who is already waiting and not yet expired.
        let existing: Option<MatchRequest> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM match_requests \
             WHERE requester_id = $1 AND status_id = $2 AND expires_at > $3"
        ))
        .bind(user_id)
        .bind(MatchStatus::Pending.id())
        .bind(now)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(request) = existing {
            tx.commit().await?;
            return Ok(MatchOutcome::Waiting { request });
        }

        // FIFO scan for the oldest live pending request from another user.
        // SKIP LOCKED lets concurrent pairers claim distinct peers instead
        // of queueing on the same row.
        let peer_request: Option<MatchRequest> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM match_requests \
             WHERE status_id = $1 AND requester_id <> $2 AND expires_at > $3 \
             ORDER BY created_at ASC, id ASC \
             LIMIT 1 \
             FOR UPDATE SKIP LOCKED"
        ))
        .bind(MatchStatus::Pending.id())
        .bind(user_id)
        .bind(now)
        .fetch_optional(&mut *tx)
        .await?;

        let outcome = match peer_request {
            Some(peer_request) => {
                let peer = peer_request.requester_id;

                let session: ChatSession = sqlx::query_as(&format!(
                    "INSERT INTO chat_sessions (id, participant_a, participant_b, status_id) \
                     VALUES ($1, $2, $3, $4) \
                     RETURNING {SESSION_COLUMNS}"
                ))
                .bind(Uuid::new_v4())
                .bind(peer)
                .bind(user_id)
                .bind(SessionStatus::Active.id())
                .fetch_one(&mut *tx)
                .await?;

                sqlx::query(
                    "UPDATE match_requests \
                     SET status_id = $2, matched_with = $3, session_id = $4, matched_at = $5 \
                     WHERE id = $1",
                )
                .bind(peer_request.id)
                .bind(MatchStatus::Matched.id())
                .bind(user_id)
                .bind(session.id)
                .bind(now)
                .execute(&mut *tx)
                .await?;

                // The caller's request is synthesized directly in the
                // matched state; it never existed as pending.
                sqlx::query(
                    "INSERT INTO match_requests \
                     (requester_id, status_id, expires_at, matched_with, session_id, matched_at) \
                     VALUES ($1, $2, $3, $4, $5, $6)",
                )
                .bind(user_id)
                .bind(MatchStatus::Matched.id())
                .bind(now + policy::pending_timeout())
                .bind(peer)
                .bind(session.id)
                .bind(now)
                .execute(&mut *tx)
                .await?;

                MatchOutcome::Paired { session, peer }
            }
            None => {
                let request: MatchRequest = sqlx::query_as(&format!(
                    "INSERT INTO match_requests (requester_id, status_id, expires_at) \
                     VALUES ($1, $2, $3) \
                     RETURNING {COLUMNS}"
                ))
                .bind(user_id)
                .bind(MatchStatus::Pending.id())
                .bind(now + policy::pending_timeout())
                .fetch_one(&mut *tx)
                .await?;

                MatchOutcome::Waiting { request }
            }
        };

        tx.commit().await?;
        Ok(outcome)
    }

    /// Cancel a pending request on behalf of its owner.
    ///
    /// The status transition is a conditional update, so a pairing attempt
    /// that matched the request in the same instant wins cleanly: the
    /// cancellation then reports [`CancelOutcome::LostToMatch`] instead of
    /// partially applying.
    pub async fn cancel(
        pool: &PgPool,
        request_id: DbId,
        user_id: DbId,
    ) -> Result<CancelOutcome, sqlx::Error> {
        let Some(request) = Self::get(pool, request_id).await? else {
            return Ok(CancelOutcome::NotFound);
        };

        if request.requester_id != user_id {
            return Ok(CancelOutcome::NotOwner);
        }

        let result = sqlx::query(
            "UPDATE match_requests SET status_id = $2 \
             WHERE id = $1 AND status_id = $3",
        )
        .bind(request_id)
        .bind(MatchStatus::Cancelled.id())
        .bind(MatchStatus::Pending.id())
        .execute(pool)
        .await?;

        if result.rows_affected() > 0 {
            return Ok(CancelOutcome::Cancelled);
        }

        // The request resolved between the read and the update (or before
        // the call). Distinguish a lost pairing race from a stale no-op.
        let resolved = Self::get(pool, request_id).await?;
        match resolved.as_ref().and_then(MatchRequest::status) {
            Some(MatchStatus::Matched) => Ok(CancelOutcome::LostToMatch),
            _ => Ok(CancelOutcome::AlreadyResolved),
        }
    }

    /// Read the caller's current match status, applying the bounded
    /// keep-alive slide for live pending requests.
    ///
    /// A pending request whose owner has been seen within
    /// `KEEPALIVE_WINDOW` gets `expires_at` slid forward to
    /// `now + PENDING_TIMEOUT`, capped at `created_at + MAX_PENDING_AGE`
    /// and never moved backwards. The cap keeps a forever-polling user from
    /// starving newer requesters.
    pub async fn check_status(pool: &PgPool, user_id: DbId) -> Result<RequestStatus, sqlx::Error> {
        let now = Utc::now();

        let Some(request) = Self::find_latest_for_user(pool, user_id).await? else {
            return Ok(RequestStatus::NotFound);
        };

        match request.status() {
            Some(MatchStatus::Pending) => {
                if request.expires_at <= now {
                    // Report expiry immediately; the sweeper owns the row flip.
                    return Ok(RequestStatus::Expired);
                }

                let capped = (now + policy::pending_timeout())
                    .min(request.created_at + policy::max_pending_age());

                let slid: Option<MatchRequest> = sqlx::query_as(&format!(
                    "UPDATE match_requests mr \
                     SET expires_at = GREATEST(mr.expires_at, $2) \
                     WHERE mr.id = $1 AND mr.status_id = $3 AND EXISTS ( \
                         SELECT 1 FROM presence_records p \
                         WHERE p.user_id = mr.requester_id AND p.last_seen > $4 \
                     ) \
                     RETURNING {COLUMNS}"
                ))
                .bind(request.id)
                .bind(capped)
                .bind(MatchStatus::Pending.id())
                .bind(now - policy::keepalive_window())
                .fetch_optional(pool)
                .await?;

                Ok(RequestStatus::Pending {
                    request: slid.unwrap_or(request),
                })
            }
            Some(MatchStatus::Matched) => {
                if let (Some(session_id), Some(peer)) = (request.session_id, request.matched_with) {
                    Ok(RequestStatus::Matched { session_id, peer })
                } else {
                    // Matched rows always carry both references; a torn row
                    // is reported as expired rather than half-matched.
                    Ok(RequestStatus::Expired)
                }
            }
            Some(MatchStatus::Expired) => Ok(RequestStatus::Expired),
            Some(MatchStatus::Cancelled) | None => Ok(RequestStatus::Cancelled),
        }
    }

    /// Fetch a request by id.
    pub async fn get(pool: &PgPool, request_id: DbId) -> Result<Option<MatchRequest>, sqlx::Error> {
        sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM match_requests WHERE id = $1"
        ))
        .bind(request_id)
        .fetch_optional(pool)
        .await
    }

    /// The user's most recent request, regardless of status.
    pub async fn find_latest_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<MatchRequest>, sqlx::Error> {
        sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM match_requests \
             WHERE requester_id = $1 \
             ORDER BY created_at DESC, id DESC \
             LIMIT 1"
        ))
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// Demote every pending request past its expiry to `expired`.
    ///
    /// Returns the number of rows flipped. Called by the sweeper.
    pub async fn expire_stale(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE match_requests SET status_id = $1 \
             WHERE status_id = $2 AND expires_at < NOW()",
        )
        .bind(MatchStatus::Expired.id())
        .bind(MatchStatus::Pending.id())
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Count requests referencing a session (test and audit helper).
    pub async fn count_for_session(
        pool: &PgPool,
        session_id: SessionId,
    ) -> Result<i64, sqlx::Error> {
        let count: Option<i64> =
            sqlx::query_scalar("SELECT COUNT(*) FROM match_requests WHERE session_id = $1")
                .bind(session_id)
                .fetch_one(pool)
                .await?;
        Ok(count.unwrap_or(0))
    }
}
