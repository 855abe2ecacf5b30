//! Integration tests for password reset token storage.
//!
//! Exercises the repository layer against a real database to verify that:
//! - `find_valid` sees only unused, unexpired tokens
//! - Consumption is single-use even under a concurrent race
//! - `purge_stale_for_user` removes dead rows but keeps outstanding tokens

use chrono::{Duration, Utc};
use drivepoints_db::models::user::{CreateUser, Role};
use drivepoints_db::repositories::{ResetTokenRepo, UserRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_user(pool: &PgPool, email: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            username: None,
            email: email.to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaGhhc2g".to_string(),
            role: Role::Driver,
            sponsor_id: None,
        },
    )
    .await
    .unwrap()
    .id
}

// ---------------------------------------------------------------------------
// Test: find_valid honors expiry and the used flag
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_find_valid_checks_expiry_and_used(pool: PgPool) {
    let user_id = seed_user(&pool, "reset@example.com").await;

    ResetTokenRepo::create(&pool, user_id, "fresh", Utc::now() + Duration::hours(1))
        .await
        .unwrap();
    ResetTokenRepo::create(&pool, user_id, "stale", Utc::now() - Duration::minutes(5))
        .await
        .unwrap();

    assert!(ResetTokenRepo::find_valid(&pool, "fresh")
        .await
        .unwrap()
        .is_some());
    assert!(
        ResetTokenRepo::find_valid(&pool, "stale")
            .await
            .unwrap()
            .is_none(),
        "expired token should not be valid"
    );
    assert!(ResetTokenRepo::find_valid(&pool, "never-issued")
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Test: a consumed token cannot be consumed again
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_mark_used_is_single_use(pool: PgPool) {
    let user_id = seed_user(&pool, "once@example.com").await;
    let token = ResetTokenRepo::create(&pool, user_id, "one-shot", Utc::now() + Duration::hours(1))
        .await
        .unwrap();

    let mut tx = pool.begin().await.unwrap();
    assert!(ResetTokenRepo::mark_used_tx(&mut tx, token.id).await.unwrap());
    tx.commit().await.unwrap();

    // Second consumer loses the race.
    let mut tx = pool.begin().await.unwrap();
    assert!(!ResetTokenRepo::mark_used_tx(&mut tx, token.id).await.unwrap());
    tx.rollback().await.unwrap();

    assert!(ResetTokenRepo::find_valid(&pool, "one-shot")
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Test: a rolled-back consumption leaves the token valid
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_mark_used_rollback_keeps_token(pool: PgPool) {
    let user_id = seed_user(&pool, "rollback@example.com").await;
    let token = ResetTokenRepo::create(&pool, user_id, "kept", Utc::now() + Duration::hours(1))
        .await
        .unwrap();

    let mut tx = pool.begin().await.unwrap();
    assert!(ResetTokenRepo::mark_used_tx(&mut tx, token.id).await.unwrap());
    tx.rollback().await.unwrap();

    assert!(
        ResetTokenRepo::find_valid(&pool, "kept")
            .await
            .unwrap()
            .is_some(),
        "rollback should undo the used flag"
    );
}

// ---------------------------------------------------------------------------
// Test: purge removes used and expired tokens, keeps live ones
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_purge_stale_for_user(pool: PgPool) {
    let user_id = seed_user(&pool, "purge@example.com").await;
    let other_id = seed_user(&pool, "other@example.com").await;

    ResetTokenRepo::create(&pool, user_id, "live", Utc::now() + Duration::hours(1))
        .await
        .unwrap();
    ResetTokenRepo::create(&pool, user_id, "old", Utc::now() - Duration::minutes(1))
        .await
        .unwrap();
    let spent = ResetTokenRepo::create(&pool, user_id, "spent", Utc::now() + Duration::hours(1))
        .await
        .unwrap();
    let mut tx = pool.begin().await.unwrap();
    ResetTokenRepo::mark_used_tx(&mut tx, spent.id).await.unwrap();
    tx.commit().await.unwrap();

    // Another user's stale token must be untouched.
    ResetTokenRepo::create(&pool, other_id, "other-old", Utc::now() - Duration::minutes(1))
        .await
        .unwrap();

    let purged = ResetTokenRepo::purge_stale_for_user(&pool, user_id)
        .await
        .unwrap();
    assert_eq!(purged, 2);

    assert!(ResetTokenRepo::find_valid(&pool, "live")
        .await
        .unwrap()
        .is_some());

    let other_rows: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM password_reset_tokens WHERE user_id = $1")
            .bind(other_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(other_rows, 1);
}
