use lazy_static::lazy_static;
use regex::Regex;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    auth::{
        oauth::OAuthError,
        password,
        repo_types::SocialAccount,
    },
    error::ApiError,
    state::AppState,
    users::repo_types::User,
};

pub const GOOGLE_PROVIDER: &str = "google";

const MIN_PASSWORD_LEN: usize = 8;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Password login. Unknown email, a social-only account, and a wrong
/// password are indistinguishable to the caller.
pub async fn authenticate(
    db: &PgPool,
    email: &str,
    password_plain: &str,
) -> Result<Option<User>, ApiError> {
    let Some(user) = User::find_by_email(db, email).await? else {
        return Ok(None);
    };

    let Some(hash) = user.password_hash.clone() else {
        warn!(user_id = %user.id, "password login attempted on social-only account");
        return Ok(None);
    };

    if !password::verify_password_blocking(password_plain.to_string(), hash).await? {
        return Ok(None);
    }

    Ok(Some(user))
}

pub async fn register(
    db: &PgPool,
    name: Option<String>,
    email: &str,
    password_plain: &str,
) -> Result<User, ApiError> {
    if !is_valid_email(email) {
        return Err(ApiError::Validation("invalid email".into()));
    }
    if password_plain.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::Validation(
            "password must be at least 8 characters".into(),
        ));
    }

    // Pre-check for a friendlier message; the unique constraint is the
    // authority on races (insert maps 23505 to Conflict).
    if User::find_by_email(db, email).await?.is_some() {
        return Err(ApiError::Conflict("email already exists".into()));
    }

    let hash = password::hash_password_blocking(password_plain.to_string()).await?;
    let name = name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| email.split('@').next().unwrap_or(email).to_string());

    let user = User::create(db, name.trim(), email, Some(&hash)).await?;
    info!(user_id = %user.id, "user registered");
    Ok(user)
}

/// Google login-or-link-or-register. Terminal on the first match:
/// known social identity, then known email, then a fresh account.
pub async fn google_login(state: &AppState, code: &str) -> Result<Uuid, ApiError> {
    let access_token = state
        .oauth
        .exchange_code(code)
        .await
        .map_err(upstream_failure)?;
    let profile = state
        .oauth
        .fetch_profile(&access_token)
        .await
        .map_err(upstream_failure)?;

    if let Some(user_id) =
        SocialAccount::find_user_id(&state.db, GOOGLE_PROVIDER, &profile.sub).await?
    {
        info!(%user_id, "google login for linked account");
        return Ok(user_id);
    }

    if let Some(user) = User::find_by_email(&state.db, &profile.email).await? {
        SocialAccount::link(&state.db, user.id, GOOGLE_PROVIDER, &profile.sub)
            .await
            .map_err(link_failure)?;
        info!(user_id = %user.id, "google identity linked to existing account");
        return Ok(user.id);
    }

    let user_id = SocialAccount::create_with_user(
        &state.db,
        &profile.name,
        &profile.email,
        GOOGLE_PROVIDER,
        &profile.sub,
    )
    .await
    .map_err(link_failure)?;
    info!(%user_id, "user created from google profile");
    Ok(user_id)
}

fn upstream_failure(e: OAuthError) -> ApiError {
    warn!(error = %e, "google oauth exchange failed");
    ApiError::LoginFailed
}

/// A conflicting link (pair or email raced to another user) reads as a
/// failed login; anything else stays an internal error.
fn link_failure(e: sqlx::Error) -> ApiError {
    match ApiError::from(e) {
        ApiError::Conflict(msg) => {
            warn!(conflict = %msg, "social account link conflict");
            ApiError::LoginFailed
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_normal_emails() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("first.last+tag@sub.example.co.jp"));
    }

    #[test]
    fn rejects_garbage_emails() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("two@@example.com"));
        assert!(!is_valid_email("user@nodot"));
        assert!(!is_valid_email("user @example.com"));
    }
}
