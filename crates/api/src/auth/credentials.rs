//! Account creation and credential checks.

use sqlx::PgPool;
use stockroom_core::accounts::{Registration, DUPLICATE_ACCOUNT_MESSAGE};
use stockroom_core::error::CoreError;
use stockroom_db::models::user::{CreateUser, User};
use stockroom_db::repositories::UserRepo;

use crate::auth::password::{hash_password, verify_against_dummy, verify_password};
use crate::error::{AppError, AppResult};

/// Message for any failed login, whether the username or the password was wrong.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password.";

/// Create an account from a submitted registration form.
///
/// Fails with [`CoreError::Validation`] when the input breaks a field rule or
/// the username or email is already taken.
pub async fn register(pool: &PgPool, registration: Registration) -> AppResult<User> {
    let registration = registration.normalized();
    registration.check()?;

    if UserRepo::username_or_email_taken(pool, &registration.username, &registration.email).await? {
        return Err(duplicate());
    }

    let password_hash = hash_password(&registration.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let input = CreateUser {
        username: registration.username,
        email: registration.email,
        password_hash,
    };

    // A concurrent registration can still win the race past the pre-check.
    let user = UserRepo::create(pool, &input).await.map_err(|err| {
        // PostgreSQL unique constraint violation: error code 23505
        let unique_violation = matches!(
            &err,
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505")
        );
        if unique_violation {
            duplicate()
        } else {
            AppError::Database(err)
        }
    })?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");
    Ok(user)
}

/// Check a username and password, returning the matching user.
pub async fn authenticate(pool: &PgPool, username: &str, password: &str) -> AppResult<User> {
    let Some(user) = UserRepo::find_by_username(pool, username.trim()).await? else {
        verify_against_dummy(password);
        tracing::debug!("Login attempt for unknown username");
        return Err(invalid_credentials());
    };

    let valid = verify_password(password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !valid {
        tracing::info!(user_id = user.id, "Failed login attempt");
        return Err(invalid_credentials());
    }

    tracing::info!(user_id = user.id, "User logged in");
    Ok(user)
}

fn duplicate() -> AppError {
    AppError::Core(CoreError::Validation(DUPLICATE_ACCOUNT_MESSAGE.into()))
}

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized(INVALID_CREDENTIALS_MESSAGE.into()))
}
