use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::users::repo_types::User;

pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct UserCreate {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Public view of a user; never carries the password hash.
#[derive(Debug, Serialize)]
pub struct UserPublic {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<User> for UserPublic {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub is_deleted: bool,
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub offset: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    MAX_PAGE_SIZE
}

impl Pagination {
    /// Limit is capped at MAX_PAGE_SIZE whatever the client asked for.
    pub fn clamp(&self) -> (i64, i64) {
        (
            self.offset.max(0),
            self.limit.clamp(0, MAX_PAGE_SIZE),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults() {
        let p: Pagination = serde_json::from_str("{}").unwrap();
        assert_eq!(p.clamp(), (0, MAX_PAGE_SIZE));
    }

    #[test]
    fn limit_is_capped() {
        let p = Pagination {
            offset: 10,
            limit: 5000,
        };
        assert_eq!(p.clamp(), (10, MAX_PAGE_SIZE));
    }

    #[test]
    fn negative_values_are_floored() {
        let p = Pagination {
            offset: -5,
            limit: -1,
        };
        assert_eq!(p.clamp(), (0, 0));
    }

    #[test]
    fn user_public_hides_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Alice".into(),
            email: "alice@example.com".into(),
            password_hash: Some("$argon2id$v=19$secret".into()),
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        };
        let json = serde_json::to_string(&UserPublic::from(user)).unwrap();
        assert!(json.contains("alice@example.com"));
        assert!(!json.contains("password"));
        assert!(!json.contains("argon2"));
    }

    #[test]
    fn delete_response_shape() {
        let json = serde_json::to_string(&DeleteResponse { is_deleted: true }).unwrap();
        assert_eq!(json, r#"{"is_deleted":true}"#);
    }
}
