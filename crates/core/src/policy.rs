//! Canonical lifecycle policy constants.
//!
//! Every timeout and window used by the pairing engine, the messaging
//! gateway, and the sweeper lives here. Call sites must not introduce their
//! own magic numbers for these thresholds.

use chrono::Duration;

/// How long a pending match request stays live without a keep-alive.
pub const PENDING_TIMEOUT_SECS: i64 = 10 * 60;

/// Absolute cap on a pending request's age. `CheckStatus` keep-alive polling
/// can slide `expires_at` forward, but never past `created_at` plus this cap,
/// so a polling-but-unmatched user cannot starve newer requesters forever.
pub const MAX_PENDING_AGE_SECS: i64 = 30 * 60;

/// Presence recency required for a `CheckStatus` call to slide the pending
/// expiry forward.
pub const KEEPALIVE_WINDOW_SECS: i64 = 2 * 60;

/// A user is considered online when `now - last_seen` is under this window.
pub const ONLINE_WINDOW_SECS: i64 = 5 * 60;

/// An active session is auto-ended only when *both* participants have been
/// idle longer than this. One present participant keeps the session alive.
pub const SESSION_INACTIVITY_TIMEOUT_SECS: i64 = 30 * 60;

/// Newly created sessions are never auto-ended within this window, so a
/// session survives long enough for the first message to be sent.
pub const SESSION_GRACE_PERIOD_SECS: i64 = 10 * 60;

/// A sender may delete their own message only within this window.
pub const MESSAGE_DELETE_GRACE_SECS: i64 = 5 * 60;

/// Identical `(sender, content)` submissions within this window are rejected.
/// This is a duplicate-submission guard, not a general rate limiter.
pub const MESSAGE_DEBOUNCE_MILLIS: i64 = 1_000;

/// How often the background sweeper runs.
pub const SWEEP_INTERVAL_SECS: u64 = 60;

/// Maximum accepted message content length (characters).
pub const MAX_MESSAGE_CONTENT_LEN: usize = 4_000;

/// `PENDING_TIMEOUT_SECS` as a chrono duration.
pub fn pending_timeout() -> Duration {
    Duration::seconds(PENDING_TIMEOUT_SECS)
}

/// `MAX_PENDING_AGE_SECS` as a chrono duration.
pub fn max_pending_age() -> Duration {
    Duration::seconds(MAX_PENDING_AGE_SECS)
}

/// `KEEPALIVE_WINDOW_SECS` as a chrono duration.
pub fn keepalive_window() -> Duration {
    Duration::seconds(KEEPALIVE_WINDOW_SECS)
}

/// `ONLINE_WINDOW_SECS` as a chrono duration.
pub fn online_window() -> Duration {
    Duration::seconds(ONLINE_WINDOW_SECS)
}

/// `SESSION_INACTIVITY_TIMEOUT_SECS` as a chrono duration.
pub fn session_inactivity_timeout() -> Duration {
    Duration::seconds(SESSION_INACTIVITY_TIMEOUT_SECS)
}

/// `SESSION_GRACE_PERIOD_SECS` as a chrono duration.
pub fn session_grace_period() -> Duration {
    Duration::seconds(SESSION_GRACE_PERIOD_SECS)
}

/// `MESSAGE_DELETE_GRACE_SECS` as a chrono duration.
pub fn message_delete_grace() -> Duration {
    Duration::seconds(MESSAGE_DELETE_GRACE_SECS)
}

/// `MESSAGE_DEBOUNCE_MILLIS` as a chrono duration.
pub fn message_debounce() -> Duration {
    Duration::milliseconds(MESSAGE_DEBOUNCE_MILLIS)
}
