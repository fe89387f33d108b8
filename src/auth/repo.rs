use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::repo_types::SocialAccount;

impl SocialAccount {
    /// Resolve a (provider, provider user id) pair to the owning user.
    pub async fn find_user_id(
        db: &PgPool,
        provider: &str,
        provider_user_id: &str,
    ) -> Result<Option<Uuid>, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            SELECT user_id
            FROM user_social_accounts
            WHERE provider = $1 AND provider_user_id = $2
            "#,
        )
        .bind(provider)
        .bind(provider_user_id)
        .fetch_optional(db)
        .await
    }

    /// Attach a social identity to an existing user. The unique constraint
    /// on (provider, provider_user_id) is the conflict authority.
    pub async fn link(
        db: &PgPool,
        user_id: Uuid,
        provider: &str,
        provider_user_id: &str,
    ) -> Result<SocialAccount, sqlx::Error> {
        sqlx::query_as::<_, SocialAccount>(
            r#"
            INSERT INTO user_social_accounts (user_id, provider, provider_user_id)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, provider, provider_user_id, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(provider)
        .bind(provider_user_id)
        .fetch_one(db)
        .await
    }

    /// Create a passwordless user and its social link in one transaction;
    /// a failed link rolls back the user row.
    pub async fn create_with_user(
        db: &PgPool,
        name: &str,
        email: &str,
        provider: &str,
        provider_user_id: &str,
    ) -> Result<Uuid, sqlx::Error> {
        let mut tx = db.begin().await?;

        let user_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO users (name, email)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(name)
        .bind(email)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO user_social_accounts (user_id, provider, provider_user_id)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(user_id)
        .bind(provider)
        .bind(provider_user_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(user_id)
    }
}
