//! HTTP-level integration tests for the session endpoints.

mod common;

use axum::http::StatusCode;
use common::{assert_error_body, body_json, create_user_with_token, get_auth, post_auth};
use sqlx::PgPool;
use uuid::Uuid;

/// Pair two fresh users over the API and return `(session_id, alice, bob)`
/// where the latter two are Bearer tokens.
async fn paired_session(pool: &PgPool) -> (String, String, String) {
    let (_alice_id, alice) = create_user_with_token(pool, "alice").await;
    let (_bob_id, bob) = create_user_with_token(pool, "bob").await;

    let app = common::build_test_app(pool.clone());
    post_auth(app, "/api/v1/match/request", &alice).await;

    let app = common::build_test_app(pool.clone());
    let json = body_json(post_auth(app, "/api/v1/match/request", &bob).await).await;
    let session_id = json["data"]["session_id"].as_str().unwrap().to_string();

    (session_id, alice, bob)
}

#[sqlx::test(migrations = "../../migrations")]
async fn both_participants_see_each_other_as_peer(pool: PgPool) {
    let (session_id, alice, bob) = paired_session(&pool).await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &format!("/api/v1/sessions/{session_id}"), &alice).await;
    assert_eq!(response.status(), StatusCode::OK);
    let alice_view = body_json(response).await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/v1/sessions/{session_id}"), &bob).await;
    assert_eq!(response.status(), StatusCode::OK);
    let bob_view = body_json(response).await;

    assert_eq!(alice_view["data"]["status"], "active");
    assert_eq!(bob_view["data"]["status"], "active");
    // Peers are cross-referenced.
    assert_ne!(alice_view["data"]["peer_id"], bob_view["data"]["peer_id"]);
    assert!(alice_view["data"]["ended_at"].is_null());
}

#[sqlx::test(migrations = "../../migrations")]
async fn outsiders_cannot_read_a_session(pool: PgPool) {
    let (session_id, _alice, _bob) = paired_session(&pool).await;
    let (_id, outsider) = create_user_with_token(&pool, "outsider").await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/v1/sessions/{session_id}"), &outsider).await;
    assert_error_body(response, StatusCode::FORBIDDEN).await;
}

#[sqlx::test(migrations = "../../migrations")]
async fn unknown_session_is_not_found(pool: PgPool) {
    let (_id, token) = create_user_with_token(&pool, "alice").await;

    let app = common::build_test_app(pool);
    let random_id = Uuid::new_v4();
    let response = get_auth(app, &format!("/api/v1/sessions/{random_id}"), &token).await;
    assert_error_body(response, StatusCode::NOT_FOUND).await;
}

#[sqlx::test(migrations = "../../migrations")]
async fn either_participant_can_end_and_the_end_is_terminal(pool: PgPool) {
    let (session_id, alice, bob) = paired_session(&pool).await;

    let app = common::build_test_app(pool.clone());
    let response = post_auth(app, &format!("/api/v1/sessions/{session_id}/end"), &bob).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "ended");
    assert!(json["data"]["ended_at"].is_string());

    // Ending again, from either side, is 410 Gone.
    let app = common::build_test_app(pool.clone());
    let response = post_auth(app, &format!("/api/v1/sessions/{session_id}/end"), &alice).await;
    assert_error_body(response, StatusCode::GONE).await;

    // Both can still read the ended session.
    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/v1/sessions/{session_id}"), &alice).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "ended");
}

#[sqlx::test(migrations = "../../migrations")]
async fn outsiders_cannot_end_a_session(pool: PgPool) {
    let (session_id, _alice, _bob) = paired_session(&pool).await;
    let (_id, outsider) = create_user_with_token(&pool, "outsider").await;

    let app = common::build_test_app(pool);
    let response = post_auth(app, &format!("/api/v1/sessions/{session_id}/end"), &outsider).await;
    assert_error_body(response, StatusCode::FORBIDDEN).await;
}

#[sqlx::test(migrations = "../../migrations")]
async fn ended_participants_can_requeue_over_the_api(pool: PgPool) {
    let (session_id, alice, _bob) = paired_session(&pool).await;

    let app = common::build_test_app(pool.clone());
    post_auth(app, &format!("/api/v1/sessions/{session_id}/end"), &alice).await;

    // No reconnect once the session is gone; a fresh request queues.
    let app = common::build_test_app(pool);
    let response = post_auth(app, "/api/v1/match/request", &alice).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["outcome"], "waiting");
}
