//! Integration tests for the messaging gateway storage layer.

use chrono::Utc;
use heartlink_core::policy;
use heartlink_core::types::{DbId, SessionId};
use heartlink_db::models::match_request::MatchOutcome;
use heartlink_db::models::status::MessageKind;
use heartlink_db::repositories::{MatchRequestRepo, MessageRepo, UserRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn paired_session(pool: &PgPool) -> (DbId, DbId, SessionId) {
    let alice = UserRepo::create(pool, "alice").await.unwrap();
    let bob = UserRepo::create(pool, "bob").await.unwrap();
    MatchRequestRepo::request_match(pool, alice).await.unwrap();
    match MatchRequestRepo::request_match(pool, bob).await.unwrap() {
        MatchOutcome::Paired { session, .. } => (alice, bob, session.id),
        other => panic!("expected Paired, got {other:?}"),
    }
}

async fn send(pool: &PgPool, session: SessionId, sender: DbId, content: &str) -> Option<DbId> {
    let cutoff = Utc::now() - policy::message_debounce();
    MessageRepo::create_debounced(pool, session, sender, MessageKind::Text, content, cutoff)
        .await
        .unwrap()
        .map(|m| m.id)
}

// ---------------------------------------------------------------------------
// Debounce
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn identical_message_within_window_is_suppressed(pool: PgPool) {
    let (alice, _bob, session) = paired_session(&pool).await;

    let first = send(&pool, session, alice, "hello").await;
    assert!(first.is_some());

    let duplicate = send(&pool, session, alice, "hello").await;
    assert!(duplicate.is_none(), "identical (sender, content) within 1s");

    let different = send(&pool, session, alice, "hello!").await;
    assert!(different.is_some(), "different content is not debounced");
}

#[sqlx::test(migrations = "../../migrations")]
async fn debounce_is_per_sender(pool: PgPool) {
    let (alice, bob, session) = paired_session(&pool).await;

    assert!(send(&pool, session, alice, "hello").await.is_some());
    // The other participant may say the same thing.
    assert!(send(&pool, session, bob, "hello").await.is_some());
}

#[sqlx::test(migrations = "../../migrations")]
async fn old_duplicate_outside_window_is_accepted(pool: PgPool) {
    let (alice, _bob, session) = paired_session(&pool).await;

    let first = send(&pool, session, alice, "hello").await.unwrap();
    sqlx::query("UPDATE messages SET created_at = NOW() - interval '5 seconds' WHERE id = $1")
        .bind(first)
        .execute(&pool)
        .await
        .unwrap();

    assert!(send(&pool, session, alice, "hello").await.is_some());
}

// ---------------------------------------------------------------------------
// Read tracking
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn mark_read_never_touches_own_messages(pool: PgPool) {
    let (alice, bob, session) = paired_session(&pool).await;

    send(&pool, session, alice, "one").await.unwrap();
    send(&pool, session, alice, "two").await.unwrap();
    send(&pool, session, bob, "three").await.unwrap();

    // Alice marks: only Bob's message flips.
    let marked = MessageRepo::mark_read(&pool, session, alice).await.unwrap();
    assert_eq!(marked, 1);

    let messages = MessageRepo::list_for_session(&pool, session, 50, 0).await.unwrap();
    for message in &messages {
        if message.sender_id == alice {
            assert!(!message.is_read, "reader's own messages stay unread");
        } else {
            assert!(message.is_read);
        }
    }

    // Marking again finds nothing new.
    let marked = MessageRepo::mark_read(&pool, session, alice).await.unwrap();
    assert_eq!(marked, 0);
}

// ---------------------------------------------------------------------------
// Listing and deletion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn messages_list_in_send_order(pool: PgPool) {
    let (alice, bob, session) = paired_session(&pool).await;

    let first = send(&pool, session, alice, "first").await.unwrap();
    let second = send(&pool, session, bob, "second").await.unwrap();
    let third = send(&pool, session, alice, "third").await.unwrap();

    let messages = MessageRepo::list_for_session(&pool, session, 50, 0).await.unwrap();
    let ids: Vec<DbId> = messages.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![first, second, third]);

    // Paging.
    let page = MessageRepo::list_for_session(&pool, session, 2, 1).await.unwrap();
    let ids: Vec<DbId> = page.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![second, third]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn delete_removes_the_row(pool: PgPool) {
    let (alice, _bob, session) = paired_session(&pool).await;

    let id = send(&pool, session, alice, "oops").await.unwrap();

    assert!(MessageRepo::delete(&pool, id).await.unwrap());
    assert!(MessageRepo::get(&pool, id).await.unwrap().is_none());
    assert!(!MessageRepo::delete(&pool, id).await.unwrap());
}
