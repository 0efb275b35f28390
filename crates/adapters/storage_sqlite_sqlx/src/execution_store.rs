//! `SQLite` implementation of [`ExecutionStore`].
//!
//! The snapshot read and the commit are each exactly one transaction.
//! The snapshot sees rules and both actuator maps as of the same instant;
//! the commit applies every relay write and every rule stamp atomically,
//! so a failure leaves no stamp behind and the minute stays retryable.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use relayhub_app::ports::{CommitBatch, ExecutionStore, StoreSnapshot};
use relayhub_domain::error::RelayHubError;
use relayhub_domain::relay::{ActuatorId, RelayStates, ScheduleEnabled};

use crate::error::StorageError;
use crate::schedule_repo::decode_rules_lenient;

/// `SQLite`-backed execution store.
pub struct SqliteExecutionStore {
    pool: SqlitePool,
}

impl SqliteExecutionStore {
    /// Create a new store backed by the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ExecutionStore for SqliteExecutionStore {
    async fn snapshot(&self) -> Result<StoreSnapshot, RelayHubError> {
        let mut tx = self.pool.begin().await.map_err(StorageError::from)?;

        let relay_rows: Vec<SqliteRow> = sqlx::query("SELECT * FROM relays")
            .fetch_all(&mut *tx)
            .await
            .map_err(StorageError::from)?;
        let rule_rows: Vec<SqliteRow> = sqlx::query("SELECT * FROM schedules")
            .fetch_all(&mut *tx)
            .await
            .map_err(StorageError::from)?;

        tx.commit().await.map_err(StorageError::from)?;

        let mut states = RelayStates::new();
        let mut enabled = ScheduleEnabled::new();
        for row in &relay_rows {
            let id: String = row.try_get("id").map_err(StorageError::from)?;
            let Ok(id) = ActuatorId::new(id) else {
                tracing::warn!("skipping relay row with invalid id");
                continue;
            };
            states.set(
                id.clone(),
                row.try_get("state").map_err(StorageError::from)?,
            );
            enabled.set(
                id,
                row.try_get("schedule_enabled")
                    .map_err(StorageError::from)?,
            );
        }

        Ok(StoreSnapshot {
            rules: decode_rules_lenient(&rule_rows),
            states,
            enabled,
        })
    }

    async fn commit(&self, batch: CommitBatch) -> Result<(), RelayHubError> {
        if batch.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await.map_err(StorageError::from)?;

        for (id, state) in &batch.writes {
            sqlx::query(
                "INSERT INTO relays (id, state) VALUES (?, ?) \
                 ON CONFLICT (id) DO UPDATE SET state = excluded.state",
            )
            .bind(id.as_str())
            .bind(state)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::from)?;
        }

        for stamp in &batch.stamps {
            sqlx::query("UPDATE schedules SET last_execution = ?, last_run_at = ? WHERE id = ?")
                .bind(stamp.minute_key.as_str())
                .bind(stamp.run_at.to_rfc3339())
                .bind(stamp.schedule_id.to_string())
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from)?;
        }

        tx.commit().await.map_err(StorageError::from)?;
        Ok(())
    }
}
