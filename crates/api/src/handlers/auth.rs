//! Handlers for the `/auth` resource (register, login, logout, me, and
//! self-service username/email changes).

use axum::extract::{Path, State};
use axum::Json;
use chrono::{Duration, Utc};
use drivepoints_core::error::CoreError;
use drivepoints_core::types::DbId;
use drivepoints_db::models::session::CreateSession;
use drivepoints_db::models::user::{AccountStatus, CreateUser, PublicUser, Role};
use drivepoints_db::repositories::{SessionRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::auth::jwt::{generate_token, validate_token};
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::auth::session_limit::enforce_session_limit;
use crate::auth::tokens::new_session_id;
use crate::error::{AppError, AppResult};
use crate::middleware::session::SessionUser;
use crate::state::AppState;

/// Normalize an email for storage and lookup: trim then lowercase.
///
/// Uniqueness is case-insensitive, so every path that touches an email must
/// go through this first.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
///
/// Fields are optional at the serde level so missing input fails with a 400
/// and a stable message rather than a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request body for `PATCH /auth/users/{id}/username`.
#[derive(Debug, Deserialize)]
pub struct ChangeUsernameRequest {
    pub username: Option<String>,
}

/// Request body for `PATCH /auth/users/{id}/email`.
#[derive(Debug, Deserialize)]
pub struct ChangeEmailRequest {
    pub email: Option<String>,
}

/// Minimal acknowledgment body (`{"ok": true}`).
#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub ok: bool,
    pub token: String,
    pub user: PublicUser,
}

/// The caller's own profile, returned by `GET /auth/me`.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: DbId,
    pub username: Option<String>,
    pub email: String,
    pub role: Role,
    pub sponsor_id: Option<DbId>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /auth/register
///
/// Create an ACTIVE account. The role defaults to DRIVER.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<Json<OkResponse>> {
    // 1. Validate input before touching the database.
    let (email, password) = match (input.email, input.password) {
        (Some(e), Some(p)) if !e.trim().is_empty() && !p.is_empty() => (e, p),
        _ => {
            return Err(AppError::Core(CoreError::Validation(
                "Missing email or password".into(),
            )))
        }
    };
    validate_password_strength(&password).map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let email = normalize_email(&email);

    // 2. Reject a taken email early for a clean message; the partial unique
    //    index still backstops the insert race (classified to 409).
    if UserRepo::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "Email already exists".into(),
        )));
    }

    // 3. Hash and insert.
    let password_hash = hash_password(&password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    UserRepo::create(
        &state.pool,
        &CreateUser {
            username: None,
            email,
            password_hash,
            role: input.role.unwrap_or(Role::Driver),
            sponsor_id: None,
        },
    )
    .await?;

    Ok(Json(OkResponse { ok: true }))
}

/// POST /auth/login
///
/// Authenticate with email + password. Returns a signed token whose `jti`
/// matches a freshly inserted session row.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    // 1. Validate input.
    let (email, password) = match (input.email, input.password) {
        (Some(e), Some(p)) if !e.trim().is_empty() && !p.is_empty() => (e, p),
        _ => {
            return Err(AppError::Core(CoreError::Validation(
                "Missing email or password".into(),
            )))
        }
    };

    // 2. Find user by normalized email. Unknown email and wrong password
    //    must be indistinguishable to the caller.
    let email = normalize_email(&email);
    let user = UserRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Invalid credentials".into())))?;

    // 3. Check account status before verifying the password.
    if user.status != AccountStatus::Active {
        return Err(AppError::Core(CoreError::Forbidden(format!(
            "Account is {}",
            user.status
        ))));
    }

    // 4. Verify password.
    let password_valid = verify_password(&password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid credentials".into(),
        )));
    }

    // 5. Make room under the session limit (FIFO eviction).
    enforce_session_limit(&state.pool, user.id, state.config.session_limit).await?;

    // 6. Insert the new session row.
    let jti = new_session_id();
    let expires_at = Utc::now() + Duration::hours(state.config.jwt.token_expiry_hours);
    SessionRepo::create(
        &state.pool,
        &CreateSession {
            user_id: user.id,
            jti: jti.clone(),
            expires_at,
        },
    )
    .await?;

    // 7. Mint the token.
    let token = generate_token(user.id, user.role, user.sponsor_id, &jti, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(Json(LoginResponse {
        ok: true,
        token,
        user: PublicUser::from(&user),
    }))
}

/// POST /auth/logout
///
/// Revoke the session named by the presented token. Idempotent: a second
/// logout with the same token still returns 200.
///
/// Deliberately does NOT run the session gate -- the gate would reject an
/// already-revoked session with 401, breaking idempotence.
pub async fn logout(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
) -> AppResult<Json<OkResponse>> {
    let auth_header = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("missing token".into())))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("missing token".into())))?;

    let claims = validate_token(token, &state.config.jwt)
        .map_err(|_| AppError::Core(CoreError::Unauthorized("invalid token".into())))?;

    let jti = claims
        .jti
        .ok_or_else(|| AppError::Core(CoreError::Validation("missing session id".into())))?;

    // Result ignored: revoking an already-dead session is not an error.
    SessionRepo::revoke_by_jti(&state.pool, claims.id, &jti).await?;

    Ok(Json(OkResponse { ok: true }))
}

/// GET /auth/me
///
/// The caller's own profile, resolved through the session gate.
pub async fn me(State(state): State<AppState>, user: SessionUser) -> AppResult<Json<MeResponse>> {
    let row = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "user",
            id: user.user_id,
        }))?;

    Ok(Json(MeResponse {
        id: row.id,
        username: row.username,
        email: row.email,
        role: row.role,
        sponsor_id: row.sponsor_id,
    }))
}

/// PATCH /auth/users/{id}/username
///
/// Self-or-admin only.
pub async fn change_username(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<DbId>,
    Json(input): Json<ChangeUsernameRequest>,
) -> AppResult<Json<OkResponse>> {
    require_self_or_admin(&user, id)?;

    let username = input
        .username
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| AppError::Core(CoreError::Validation("Username is required".into())))?;

    let updated = UserRepo::update_username(&state.pool, id, username).await?;
    if !updated {
        return Err(AppError::Core(CoreError::NotFound { entity: "user", id }));
    }

    Ok(Json(OkResponse { ok: true }))
}

/// PATCH /auth/users/{id}/email
///
/// Self-or-admin only. The new email is normalized and must be free among
/// non-deleted users.
pub async fn change_email(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<DbId>,
    Json(input): Json<ChangeEmailRequest>,
) -> AppResult<Json<OkResponse>> {
    require_self_or_admin(&user, id)?;

    let email = input
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .ok_or_else(|| AppError::Core(CoreError::Validation("Email is required".into())))?;
    let email = normalize_email(email);

    if let Some(existing) = UserRepo::find_by_email(&state.pool, &email).await? {
        if existing.id != id {
            return Err(AppError::Core(CoreError::Conflict(
                "Email already exists".into(),
            )));
        }
    }

    let updated = UserRepo::update_email(&state.pool, id, &email).await?;
    if !updated {
        return Err(AppError::Core(CoreError::NotFound { entity: "user", id }));
    }

    Ok(Json(OkResponse { ok: true }))
}

/// Reject callers that are neither the target user nor an admin.
fn require_self_or_admin(user: &SessionUser, target: DbId) -> Result<(), AppError> {
    if user.user_id != target && user.role != Role::Admin {
        return Err(AppError::Core(CoreError::Forbidden(
            "Cannot modify another user's account".into(),
        )));
    }
    Ok(())
}
