//! HTTP-level integration tests for the password reset flow.
//!
//! The test config runs outside production mode, so reset responses echo the
//! token and the full round trip can be driven over HTTP.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_test_user, get, login_user, post_json, TEST_PASSWORD};
use drivepoints_db::models::user::Role;
use sqlx::PgPool;

/// Request a reset for the given email and return the echoed token.
async fn request_token(app: &axum::Router, email: &str) -> String {
    let response = post_json(app, "/password-reset/request", serde_json::json!({ "email": email })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    json["token"]
        .as_str()
        .expect("non-production responses echo the token")
        .to_string()
}

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// A missing email is a 400; an unknown email gets the same generic 200 as a
/// known one and creates no row.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_request_validation_and_anti_enumeration(pool: PgPool) {
    create_test_user(&pool, "known@example.com", Role::Driver).await;
    let app = common::build_test_app(pool.clone());

    let missing = post_json(&app, "/password-reset/request", serde_json::json!({})).await;
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);

    let unknown = post_json(
        &app,
        "/password-reset/request",
        serde_json::json!({ "email": "nobody@example.com" }),
    )
    .await;
    assert_eq!(unknown.status(), StatusCode::OK);
    let unknown_json = body_json(unknown).await;
    assert!(unknown_json.get("token").is_none(), "no token for unknown email");

    let known = post_json(
        &app,
        "/password-reset/request",
        serde_json::json!({ "email": "known@example.com" }),
    )
    .await;
    assert_eq!(known.status(), StatusCode::OK);
    let known_json = body_json(known).await;
    assert_eq!(known_json["message"], unknown_json["message"]);

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM password_reset_tokens")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(rows, 1, "only the known email produced a token row");
}

/// The dev echo also includes a usable reset URL containing the token.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_request_echoes_reset_url_outside_production(pool: PgPool) {
    create_test_user(&pool, "dev@example.com", Role::Driver).await;
    let app = common::build_test_app(pool);

    let response = post_json(
        &app,
        "/password-reset/request",
        serde_json::json!({ "email": "dev@example.com" }),
    )
    .await;
    let json = body_json(response).await;
    let token = json["token"].as_str().unwrap();
    let url = json["resetUrl"].as_str().unwrap();
    assert!(url.contains(token));
    assert!(url.starts_with("http://localhost:3000/reset-password?token="));
}

// ---------------------------------------------------------------------------
// Verify / reset round trip
// ---------------------------------------------------------------------------

/// Full round trip: request, verify, reset, single-use, login with new
/// password.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reset_round_trip(pool: PgPool) {
    create_test_user(&pool, "cycle@example.com", Role::Driver).await;
    let app = common::build_test_app(pool);

    let token = request_token(&app, "cycle@example.com").await;

    // Verify is a read-only probe; repeated calls keep succeeding.
    for _ in 0..2 {
        let probe = get(&app, &format!("/password-reset/verify/{token}")).await;
        assert_eq!(probe.status(), StatusCode::OK);
        assert_eq!(body_json(probe).await["valid"], true);
    }

    let reset = post_json(
        &app,
        "/password-reset/reset",
        serde_json::json!({ "token": token, "newPassword": "brand-new-password" }),
    )
    .await;
    assert_eq!(reset.status(), StatusCode::OK);

    // Consumed: the same token is now invalid for both probe and reset.
    let probe = get(&app, &format!("/password-reset/verify/{token}")).await;
    assert_eq!(probe.status(), StatusCode::BAD_REQUEST);
    let reuse = post_json(
        &app,
        "/password-reset/reset",
        serde_json::json!({ "token": token, "newPassword": "another-password-1" }),
    )
    .await;
    assert_eq!(reuse.status(), StatusCode::BAD_REQUEST);

    // Old password dead, new password live.
    let old = post_json(
        &app,
        "/auth/login",
        serde_json::json!({ "email": "cycle@example.com", "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(old.status(), StatusCode::UNAUTHORIZED);
    login_user(&app, "cycle@example.com", "brand-new-password").await;
}

/// A weak replacement password is rejected and the token stays unconsumed.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reset_rejects_weak_password(pool: PgPool) {
    create_test_user(&pool, "weak@example.com", Role::Driver).await;
    let app = common::build_test_app(pool);

    let token = request_token(&app, "weak@example.com").await;

    let response = post_json(
        &app,
        "/password-reset/reset",
        serde_json::json!({ "token": token, "newPassword": "tiny" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Token unaffected.
    let probe = get(&app, &format!("/password-reset/verify/{token}")).await;
    assert_eq!(probe.status(), StatusCode::OK);
}

/// An expired token is rejected by both verify and reset even if unused.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_expired_token_rejected(pool: PgPool) {
    create_test_user(&pool, "late@example.com", Role::Driver).await;
    let app = common::build_test_app(pool.clone());

    let token = request_token(&app, "late@example.com").await;
    sqlx::query("UPDATE password_reset_tokens SET expires_at = NOW() - INTERVAL '1 minute'")
        .execute(&pool)
        .await
        .unwrap();

    let probe = get(&app, &format!("/password-reset/verify/{token}")).await;
    assert_eq!(probe.status(), StatusCode::BAD_REQUEST);

    let reset = post_json(
        &app,
        "/password-reset/reset",
        serde_json::json!({ "token": token, "newPassword": "irrelevant-password" }),
    )
    .await;
    assert_eq!(reset.status(), StatusCode::BAD_REQUEST);
}

/// Requesting again purges the user's dead tokens but keeps live ones.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_repeat_requests_purge_stale_tokens(pool: PgPool) {
    create_test_user(&pool, "again@example.com", Role::Driver).await;
    let app = common::build_test_app(pool.clone());

    let first = request_token(&app, "again@example.com").await;
    // Expire the first token, then request a second.
    sqlx::query("UPDATE password_reset_tokens SET expires_at = NOW() - INTERVAL '1 minute'")
        .execute(&pool)
        .await
        .unwrap();
    let second = request_token(&app, "again@example.com").await;
    assert_ne!(first, second);

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM password_reset_tokens")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(rows, 1, "the expired token was purged on re-request");
}
