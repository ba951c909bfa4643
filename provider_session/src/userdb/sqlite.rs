use chrono::Utc;
use sqlx::SqlitePool;

use crate::utils::gen_random_string;

use super::errors::UserError;
use super::types::User;
use super::UserDirectory;
use async_trait::async_trait;

/// SQLite-backed user directory.
pub struct SqliteUserDirectory {
    pool: SqlitePool,
}

impl SqliteUserDirectory {
    /// Connect to the given database URL and ensure the schema exists.
    pub async fn connect(url: &str) -> Result<Self, UserError> {
        let pool = SqlitePool::connect(url).await?;
        Self::from_pool(pool).await
    }

    /// Wrap an existing pool and ensure the schema exists.
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, UserError> {
        let directory = Self { pool };
        directory.ensure_schema().await?;
        Ok(directory)
    }

    async fn ensure_schema(&self) -> Result<(), UserError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY NOT NULL,
                provider TEXT NOT NULL,
                external_id TEXT NOT NULL,
                email TEXT NOT NULL,
                created_at TIMESTAMP NOT NULL,
                updated_at TIMESTAMP NOT NULL,
                UNIQUE(provider, external_id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for SqliteUserDirectory {
    async fn upsert_user(
        &self,
        provider: &str,
        external_id: &str,
        email: &str,
    ) -> Result<User, UserError> {
        // The candidate id is only kept on first insert; a conflicting row
        // retains its original id.
        let candidate_id = gen_random_string(16).map_err(|e| UserError::Crypto(e.to_string()))?;
        let now = Utc::now();

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, provider, external_id, email, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(provider, external_id)
            DO UPDATE SET email = excluded.email, updated_at = excluded.updated_at
            RETURNING *
            "#,
        )
        .bind(&candidate_id)
        .bind(provider)
        .bind(external_id)
        .bind(email)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>, UserError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }
}
