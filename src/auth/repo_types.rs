use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Link between a local user and a third-party identity provider.
#[derive(Debug, Clone, FromRow)]
pub struct SocialAccount {
    pub id: Uuid,
    pub user_id: Uuid,
    pub provider: String,
    pub provider_user_id: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}
