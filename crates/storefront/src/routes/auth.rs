//! Auth route handlers.
//!
//! Email-and-password accounts with Argon2id hashing. Login and registration
//! both end with the user written into the session; every failure on the
//! login path collapses to the same message so the endpoint does not confirm
//! which emails have accounts.

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{Json, extract::State};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use tiny_sprouts_core::Email;

use crate::db::{UserRepository, users::is_unique_violation};
use crate::error::{AppError, Result};
use crate::middleware::{RequireAuth, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::routes::ApiResponse;
use crate::state::AppState;

/// Minimum accepted password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Request to create an account.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Request to sign in.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Create an account and sign the new user in.
///
/// POST /api/auth/register
///
/// # Errors
///
/// Returns `AppError::Validation` for a malformed email, a short password
/// or an already-registered email, and `AppError::Database` when the insert
/// fails for any other reason.
#[instrument(skip(state, session, req))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<CurrentUser>>> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }

    let email = Email::parse(&req.email).map_err(|e| AppError::Validation(e.to_string()))?;

    if req.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    let password_hash = hash_password(&req.password)?;

    let user = UserRepository::new(state.pool())
        .create(name, &email, &password_hash)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Validation("An account with this email already exists".to_string())
            } else {
                AppError::Database(e)
            }
        })?;

    let current = CurrentUser::from(&user);
    set_current_user(&session, &current)
        .await
        .map_err(|e| AppError::Internal(format!("failed to write session: {e}")))?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok(Json(ApiResponse::with_message(
        current,
        "Account created successfully",
    )))
}

/// Sign in with email and password.
///
/// POST /api/auth/login
///
/// # Errors
///
/// Returns `AppError::Unauthorized` when the email or password is wrong;
/// the message is identical for both cases.
#[instrument(skip(state, session, req))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<CurrentUser>>> {
    let invalid = || AppError::Unauthorized("Invalid email or password".to_string());

    let email = Email::parse(&req.email).map_err(|_| invalid())?;

    let user = UserRepository::new(state.pool())
        .get_by_email(&email)
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(&req.password, &user.password_hash) {
        return Err(invalid());
    }

    let current = CurrentUser::from(&user);
    set_current_user(&session, &current)
        .await
        .map_err(|e| AppError::Internal(format!("failed to write session: {e}")))?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(ApiResponse::ok(current)))
}

/// Sign out.
///
/// POST /api/auth/logout
///
/// Clearing an already-anonymous session succeeds.
///
/// # Errors
///
/// Returns `AppError::Internal` when the session cannot be modified.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Json<ApiResponse<()>>> {
    clear_current_user(&session)
        .await
        .map_err(|e| AppError::Internal(format!("failed to clear session: {e}")))?;

    Ok(Json(ApiResponse::with_message((), "Logged out")))
}

/// The current user.
///
/// GET /api/auth/me
#[instrument(skip(user))]
pub async fn me(RequireAuth(user): RequireAuth) -> Json<ApiResponse<CurrentUser>> {
    Json(ApiResponse::ok(user))
}

/// Hash a password with Argon2id and a fresh random salt.
fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))
}

/// Verify a password against a stored hash. An unparseable stored hash
/// verifies false rather than erroring.
fn verify_password(password: &str, stored_hash: &str) -> bool {
    PasswordHash::new(stored_hash).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
}
