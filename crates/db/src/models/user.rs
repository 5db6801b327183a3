//! Minimal user model. Account management is owned by the host application;
//! this table only anchors foreign keys and test fixtures.

use heartlink_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub created_at: Timestamp,
}
