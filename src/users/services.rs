use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::{
    auth::{password, services::is_valid_email},
    error::ApiError,
    users::{
        dto::{UserCreate, UserUpdate},
        repo_types::User,
    },
};

const MIN_PASSWORD_LEN: usize = 8;

pub async fn list_users(db: &PgPool, offset: i64, limit: i64) -> Result<Vec<User>, ApiError> {
    Ok(User::list(db, offset, limit).await?)
}

pub async fn get_user(db: &PgPool, id: Uuid) -> Result<User, ApiError> {
    User::find_by_id(db, id).await?.ok_or(ApiError::NotFound)
}

pub async fn create_user(db: &PgPool, data: UserCreate) -> Result<User, ApiError> {
    let email = data.email.trim();
    if !is_valid_email(email) {
        return Err(ApiError::Validation("invalid email".into()));
    }
    if data.password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::Validation(
            "password must be at least 8 characters".into(),
        ));
    }
    if User::find_by_email(db, email).await?.is_some() {
        return Err(ApiError::Conflict("email already exists".into()));
    }

    let hash = password::hash_password_blocking(data.password.clone()).await?;
    let user = User::create(db, data.name.trim(), email, Some(&hash)).await?;
    info!(user_id = %user.id, "user created");
    Ok(user)
}

pub async fn update_user(db: &PgPool, id: Uuid, data: UserUpdate) -> Result<User, ApiError> {
    let user = get_user(db, id).await?;

    if let Some(email) = data.email.as_deref() {
        if !is_valid_email(email) {
            return Err(ApiError::Validation("invalid email".into()));
        }
        if let Some(existing) = User::find_by_email(db, email).await? {
            if existing.id != user.id {
                return Err(ApiError::Conflict("email already exists".into()));
            }
        }
    }

    let password_hash = match data.password.as_deref() {
        Some(p) if p.len() < MIN_PASSWORD_LEN => {
            return Err(ApiError::Validation(
                "password must be at least 8 characters".into(),
            ))
        }
        Some(p) => Some(password::hash_password_blocking(p.to_string()).await?),
        None => None,
    };

    let updated = User::update(
        db,
        id,
        data.name.as_deref(),
        data.email.as_deref(),
        password_hash.as_deref(),
    )
    .await?;
    Ok(updated)
}

pub async fn delete_user(db: &PgPool, id: Uuid) -> Result<(), ApiError> {
    let removed = User::delete(db, id).await?;
    if removed == 0 {
        return Err(ApiError::NotFound);
    }
    info!(user_id = %id, "user deleted");
    Ok(())
}
