//! `SQLite` implementation of [`PushTokenRepository`].
//!
//! The store holds at most one delivery token, so the table is a single
//! fixed-id row replaced on every registration.

use sqlx::SqlitePool;

use relayhub_app::ports::PushTokenRepository;
use relayhub_domain::error::RelayHubError;

use crate::error::StorageError;

/// `SQLite`-backed push token storage.
pub struct SqlitePushTokenRepository {
    pool: SqlitePool,
}

impl SqlitePushTokenRepository {
    /// Create a new repository backed by the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl PushTokenRepository for SqlitePushTokenRepository {
    async fn get(&self) -> Result<Option<String>, RelayHubError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT token FROM push_token WHERE id = 0")
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(row.map(|(token,)| token))
    }

    async fn set(&self, token: &str) -> Result<(), RelayHubError> {
        sqlx::query(
            "INSERT INTO push_token (id, token) VALUES (0, ?) \
             ON CONFLICT (id) DO UPDATE SET token = excluded.token",
        )
        .bind(token)
        .execute(&self.pool)
        .await
        .map_err(StorageError::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;

    async fn setup() -> SqlitePushTokenRepository {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        SqlitePushTokenRepository::new(db.pool().clone())
    }

    #[tokio::test]
    async fn should_return_none_when_no_token_registered() {
        let repo = setup().await;
        assert!(repo.get().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn should_store_and_replace_the_single_token() {
        let repo = setup().await;
        repo.set("ExponentPushToken[aaa]").await.unwrap();
        assert_eq!(
            repo.get().await.unwrap().as_deref(),
            Some("ExponentPushToken[aaa]")
        );

        repo.set("ExponentPushToken[bbb]").await.unwrap();
        assert_eq!(
            repo.get().await.unwrap().as_deref(),
            Some("ExponentPushToken[bbb]")
        );
    }
}
