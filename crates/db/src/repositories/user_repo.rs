//! Repository for the `users` table.
//!
//! Intentionally minimal: Heart Link consumes identities minted elsewhere.

use heartlink_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::User;

/// Column list for `users` queries.
const COLUMNS: &str = "id, username, created_at";

pub struct UserRepo;

impl UserRepo {
    /// Create a user, returning the generated id.
    pub async fn create(pool: &PgPool, username: &str) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar("INSERT INTO users (username) VALUES ($1) RETURNING id")
            .bind(username)
            .fetch_one(pool)
            .await
    }

    /// Fetch a user by id.
    pub async fn get(pool: &PgPool, user_id: DbId) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as(&format!("SELECT {COLUMNS} FROM users WHERE id = $1"))
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }
}
