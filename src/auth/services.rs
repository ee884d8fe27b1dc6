use lazy_static::lazy_static;
use regex::Regex;
use time::OffsetDateTime;
use tracing::{info, warn};

use super::{
    password::{hash_password, verify_password},
    repo::CreateUserError,
    repo_types::User,
    reset,
};
use crate::{error::AppError, state::AppState};

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_NAME_LEN: usize = 100;

/// A freshly authenticated user and their session token.
#[derive(Debug)]
pub struct Session {
    pub token: String,
    pub user: User,
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn validate_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<(), AppError> {
    if name.is_empty() {
        return Err(AppError::Validation("Name is required".into()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(AppError::Validation("Name is too long".into()));
    }
    Ok(())
}

pub async fn signup(
    state: &AppState,
    email: &str,
    password: &str,
    name: &str,
) -> Result<Session, AppError> {
    let email = normalize_email(email);
    let name = name.trim();

    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(AppError::Validation("Invalid email".into()));
    }
    validate_password(password)?;
    validate_name(name)?;

    let hash = hash_password(password)?;
    let user = match state.users.create(&email, &hash, name).await {
        Ok(user) => user,
        Err(CreateUserError::DuplicateEmail) => {
            warn!(email = %email, "email already registered");
            return Err(AppError::Conflict("User already exists".into()));
        }
        Err(CreateUserError::Other(e)) => return Err(e.into()),
    };

    let token = state.keys.issue(user.id)?;
    info!(user_id = %user.id, "user registered");
    Ok(Session { token, user })
}

pub async fn signin(state: &AppState, email: &str, password: &str) -> Result<Session, AppError> {
    let email = normalize_email(email);

    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(AppError::Validation("Invalid email".into()));
    }

    let Some(user) = state.users.find_by_email(&email).await? else {
        warn!(email = %email, "signin unknown email");
        return Err(invalid_credentials());
    };

    if !verify_password(password, &user.password_hash)? {
        warn!(user_id = %user.id, "signin invalid password");
        return Err(invalid_credentials());
    }

    let token = state.keys.issue(user.id)?;
    info!(user_id = %user.id, "user signed in");
    Ok(Session { token, user })
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid credentials".into())
}

/// Store a fresh reset token for `email` and mail the raw value to its owner.
pub async fn request_password_reset(state: &AppState, email: &str) -> Result<(), AppError> {
    let email = normalize_email(email);
    if email.is_empty() {
        return Err(AppError::Validation("Email is required".into()));
    }

    let Some(user) = state.users.find_by_email(&email).await? else {
        warn!(email = %email, "password reset for unknown email");
        return Err(AppError::NotFound("User not found".into()));
    };

    let token = reset::issue(OffsetDateTime::now_utc());
    state
        .users
        .set_reset_token(user.id, &token.hash, token.expires_at)
        .await?;
    state
        .mailer
        .send_password_reset(&user.email, &token.raw)
        .await?;

    info!(user_id = %user.id, "password reset requested");
    Ok(())
}

/// Redeem a reset token. Wrong, expired, and already-used tokens are indistinguishable.
pub async fn complete_password_reset(
    state: &AppState,
    raw_token: &str,
    new_password: &str,
) -> Result<(), AppError> {
    let raw_token = raw_token.trim();
    if raw_token.is_empty() {
        return Err(invalid_or_expired());
    }
    validate_password(new_password)?;

    let new_hash = hash_password(new_password)?;
    let consumed = state
        .users
        .consume_reset_token(
            &reset::hash_token(raw_token),
            &new_hash,
            OffsetDateTime::now_utc(),
        )
        .await?;

    match consumed {
        Some(user) => {
            info!(user_id = %user.id, "password reset completed");
            Ok(())
        }
        None => {
            warn!("invalid or expired reset token");
            Err(invalid_or_expired())
        }
    }
}

fn invalid_or_expired() -> AppError {
    AppError::Validation("Invalid or expired token".into())
}

pub async fn current_user(state: &AppState, user_id: uuid::Uuid) -> Result<User, AppError> {
    state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".into()))
}
