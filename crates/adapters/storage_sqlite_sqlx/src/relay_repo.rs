//! `SQLite` implementation of [`RelayRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use relayhub_app::ports::RelayRepository;
use relayhub_domain::error::RelayHubError;
use relayhub_domain::relay::{ActuatorId, Relay};

use crate::error::StorageError;

struct Wrapper(Relay);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let state: bool = row.try_get("state")?;
        let schedule_enabled: bool = row.try_get("schedule_enabled")?;

        let id = ActuatorId::new(id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(Relay {
            id,
            state,
            schedule_enabled,
        }))
    }
}

/// `SQLite`-backed relay repository.
pub struct SqliteRelayRepository {
    pool: SqlitePool,
}

impl SqliteRelayRepository {
    /// Create a new repository backed by the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl RelayRepository for SqliteRelayRepository {
    async fn list(&self) -> Result<Vec<Relay>, RelayHubError> {
        let rows: Vec<Wrapper> = sqlx::query_as("SELECT * FROM relays ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn get(&self, id: &ActuatorId) -> Result<Option<Relay>, RelayHubError> {
        let row: Option<Wrapper> = sqlx::query_as("SELECT * FROM relays WHERE id = ?")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(row.map(|w| w.0))
    }

    async fn set_state(&self, id: &ActuatorId, state: bool) -> Result<(), RelayHubError> {
        sqlx::query(
            "INSERT INTO relays (id, state) VALUES (?, ?) \
             ON CONFLICT (id) DO UPDATE SET state = excluded.state",
        )
        .bind(id.as_str())
        .bind(state)
        .execute(&self.pool)
        .await
        .map_err(StorageError::from)?;
        Ok(())
    }

    async fn set_schedule_enabled(
        &self,
        id: &ActuatorId,
        enabled: bool,
    ) -> Result<(), RelayHubError> {
        sqlx::query(
            "INSERT INTO relays (id, schedule_enabled) VALUES (?, ?) \
             ON CONFLICT (id) DO UPDATE SET schedule_enabled = excluded.schedule_enabled",
        )
        .bind(id.as_str())
        .bind(enabled)
        .execute(&self.pool)
        .await
        .map_err(StorageError::from)?;
        Ok(())
    }
}
