//! `SQLite` implementation of [`ExecutionLogStore`].

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use relayhub_app::ports::ExecutionLogStore;
use relayhub_domain::error::RelayHubError;
use relayhub_domain::id::{ExecutionId, ScheduleId};
use relayhub_domain::log::{ExecutionEntry, ExecutionRecord};
use relayhub_domain::schedule::{ScheduleScope, ScheduleTime, SwitchAction};

use crate::error::StorageError;

struct Wrapper(ExecutionRecord);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let decode = |err: Box<dyn std::error::Error + Send + Sync>| sqlx::Error::Decode(err);

        let id: String = row.try_get("id")?;
        let schedule_id: String = row.try_get("schedule_id")?;
        let scope: String = row.try_get("scope")?;
        let time: String = row.try_get("time")?;
        let action: String = row.try_get("action")?;
        let executed_at: String = row.try_get("executed_at")?;

        let id = ExecutionId::from_str(&id).map_err(|err| decode(Box::new(err)))?;
        let schedule_id =
            ScheduleId::from_str(&schedule_id).map_err(|err| decode(Box::new(err)))?;
        let scope = match scope.as_str() {
            "ALL" => ScheduleScope::All,
            other => return Err(decode(format!("unknown scope {other:?}").into())),
        };
        let time = ScheduleTime::from_str(&time).map_err(|err| decode(Box::new(err)))?;
        let action = SwitchAction::from_str(&action).map_err(|err| decode(Box::new(err)))?;
        let executed_at = chrono::DateTime::parse_from_rfc3339(&executed_at)
            .map(|dt| dt.to_utc())
            .map_err(|err| decode(Box::new(err)))?;

        Ok(Self(ExecutionRecord {
            id,
            schedule_id,
            scope,
            time,
            action,
            executed_at,
        }))
    }
}

/// `SQLite`-backed execution log.
pub struct SqliteExecutionLogStore {
    pool: SqlitePool,
}

impl SqliteExecutionLogStore {
    /// Create a new log store backed by the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ExecutionLogStore for SqliteExecutionLogStore {
    async fn append(&self, entry: ExecutionEntry) -> Result<ExecutionRecord, RelayHubError> {
        let record = entry.into_record(ExecutionId::new());

        sqlx::query(
            "INSERT INTO execution_log (id, schedule_id, scope, time, action, executed_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(record.id.to_string())
        .bind(record.schedule_id.to_string())
        .bind(record.scope.to_string())
        .bind(record.time.to_string())
        .bind(record.action.to_string())
        .bind(record.executed_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(StorageError::from)?;

        Ok(record)
    }

    async fn recent(&self, limit: usize) -> Result<Vec<ExecutionRecord>, RelayHubError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows: Vec<Wrapper> =
            sqlx::query_as("SELECT * FROM execution_log ORDER BY executed_at DESC LIMIT ?")
                .bind(limit)
                .fetch_all(&self.pool)
                .await
                .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(|w| w.0).collect())
    }
}
