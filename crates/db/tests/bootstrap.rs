use heartlink_db::models::status::{MatchStatus, MessageKind, SessionStatus};
use sqlx::PgPool;

/// Full bootstrap test: connect, migrate, verify schema.
#[sqlx::test(migrations = "../../migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    // Health check
    heartlink_db::health_check(&pool).await.unwrap();

    // Verify the lookup tables exist and have seed data
    let tables = [
        "match_request_statuses",
        "chat_session_statuses",
        "message_kinds",
    ];

    for table in tables {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert!(count.0 > 0, "{table} should have seed data, got 0 rows");
    }
}

/// Seed order must match the #[repr(i16)] enum discriminants and names.
#[sqlx::test(migrations = "../../migrations")]
async fn lookup_seeds_match_enums(pool: PgPool) {
    for status in [
        MatchStatus::Pending,
        MatchStatus::Matched,
        MatchStatus::Expired,
        MatchStatus::Cancelled,
    ] {
        let name: (String,) =
            sqlx::query_as("SELECT name FROM match_request_statuses WHERE id = $1")
                .bind(status.id())
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(name.0, status.as_str());
    }

    for status in [SessionStatus::Active, SessionStatus::Ended] {
        let name: (String,) =
            sqlx::query_as("SELECT name FROM chat_session_statuses WHERE id = $1")
                .bind(status.id())
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(name.0, status.as_str());
    }

    for kind in [
        MessageKind::Text,
        MessageKind::Image,
        MessageKind::Audio,
        MessageKind::File,
        MessageKind::Video,
    ] {
        let name: (String,) = sqlx::query_as("SELECT name FROM message_kinds WHERE id = $1")
            .bind(kind.id())
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(name.0, kind.as_str());
        assert_eq!(MessageKind::parse(&name.0), Some(kind));
    }
}
