//! Periodic expiry sweeper.
//!
//! A single long-lived Tokio task that, on a fixed interval, demotes stale
//! pending match requests to `expired` and ends active sessions whose
//! participants have both gone idle. Cleanup cadence is decoupled from
//! request volume: the sweeper is timer-driven, never client-triggered.

use std::time::Duration;

use chrono::Utc;
use heartlink_core::policy;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use heartlink_db::repositories::{ChatSessionRepo, MatchRequestRepo};

/// Background expiry sweeper.
pub struct Sweeper {
    pool: PgPool,
    interval: Duration,
}

impl Sweeper {
    /// Create a sweeper with the canonical interval, overridable via the
    /// `SWEEP_INTERVAL_SECS` env var.
    pub fn new(pool: PgPool) -> Self {
        let secs: u64 = std::env::var("SWEEP_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(policy::SWEEP_INTERVAL_SECS);

        Self {
            pool,
            interval: Duration::from_secs(secs),
        }
    }

    /// Create a sweeper with an explicit interval (used by tests).
    pub fn with_interval(pool: PgPool, interval: Duration) -> Self {
        Self { pool, interval }
    }

    /// Run the sweep loop until the cancellation token is triggered.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            "Expiry sweeper started",
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Expiry sweeper shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    self.sweep_pending().await;
                    self.sweep_sessions().await;
                }
            }
        }
    }

    /// Demote pending requests past their expiry. One statement; the
    /// keep-alive slide already happened on the `CheckStatus` path.
    async fn sweep_pending(&self) {
        match MatchRequestRepo::expire_stale(&self.pool).await {
            Ok(expired) => {
                if expired > 0 {
                    tracing::info!(expired, "Pending sweep: demoted stale requests");
                } else {
                    tracing::debug!("Pending sweep: nothing to demote");
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Pending sweep failed");
            }
        }
    }

    /// End sessions where both participants are idle past the inactivity
    /// timeout (and the creation grace period has elapsed). Sessions are
    /// ended one at a time so one bad row cannot halt the sweep.
    async fn sweep_sessions(&self) {
        let now = Utc::now();
        let grace_cutoff = now - policy::session_grace_period();
        let idle_cutoff = now - policy::session_inactivity_timeout();

        let candidates =
            match ChatSessionRepo::sweep_candidates(&self.pool, grace_cutoff, idle_cutoff).await {
                Ok(candidates) => candidates,
                Err(e) => {
                    tracing::error!(error = %e, "Session sweep: candidate query failed");
                    return;
                }
            };

        let mut ended = 0u64;
        for session_id in candidates {
            match ChatSessionRepo::end(&self.pool, session_id).await {
                Ok(true) => ended += 1,
                // Already ended by a participant between the scan and now.
                Ok(false) => {}
                Err(e) => {
                    tracing::error!(
                        session_id = %session_id,
                        error = %e,
                        "Session sweep: failed to end session",
                    );
                }
            }
        }

        if ended > 0 {
            tracing::info!(ended, "Session sweep: ended inactive sessions");
        } else {
            tracing::debug!("Session sweep: nothing to end");
        }
    }
}
