//! `SQLite` implementation of [`ScheduleRepository`].

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use relayhub_app::ports::ScheduleRepository;
use relayhub_domain::error::RelayHubError;
use relayhub_domain::id::ScheduleId;
use relayhub_domain::schedule::{
    MinuteKey, ScheduleRule, ScheduleScope, ScheduleTime, SwitchAction,
};

use crate::error::StorageError;

/// Decode one `schedules` row into a domain rule.
pub(crate) fn decode_rule(row: &SqliteRow) -> Result<ScheduleRule, sqlx::Error> {
    let decode = |err: Box<dyn std::error::Error + Send + Sync>| sqlx::Error::Decode(err);

    let id: String = row.try_get("id")?;
    let scope: String = row.try_get("scope")?;
    let time: String = row.try_get("time")?;
    let action: String = row.try_get("action")?;
    let created_at: String = row.try_get("created_at")?;
    let last_execution: Option<String> = row.try_get("last_execution")?;
    let last_run_at: Option<String> = row.try_get("last_run_at")?;

    let id = ScheduleId::from_str(&id).map_err(|err| decode(Box::new(err)))?;
    let scope = match scope.as_str() {
        "ALL" => ScheduleScope::All,
        other => return Err(decode(format!("unknown scope {other:?}").into())),
    };
    let time = ScheduleTime::from_str(&time).map_err(|err| decode(Box::new(err)))?;
    let action = SwitchAction::from_str(&action).map_err(|err| decode(Box::new(err)))?;
    let created_at = chrono::DateTime::parse_from_rfc3339(&created_at)
        .map(|dt| dt.to_utc())
        .map_err(|err| decode(Box::new(err)))?;
    let last_run_at = last_run_at
        .map(|raw| {
            chrono::DateTime::parse_from_rfc3339(&raw)
                .map(|dt| dt.to_utc())
                .map_err(|err| decode(Box::new(err)))
        })
        .transpose()?;

    Ok(ScheduleRule {
        id,
        scope,
        time,
        action,
        created_at,
        last_execution: last_execution.map(MinuteKey::from_raw),
        last_run_at,
    })
}

/// Decode a result set, skipping rows that fail to decode. A rule written
/// out-of-band with missing or malformed fields must not take the whole
/// rule set down with it.
pub(crate) fn decode_rules_lenient(rows: &[SqliteRow]) -> Vec<ScheduleRule> {
    rows.iter()
        .filter_map(|row| match decode_rule(row) {
            Ok(rule) => Some(rule),
            Err(err) => {
                tracing::warn!(error = %err, "skipping undecodable schedule row");
                None
            }
        })
        .collect()
}

/// `SQLite`-backed schedule repository.
pub struct SqliteScheduleRepository {
    pool: SqlitePool,
}

impl SqliteScheduleRepository {
    /// Create a new repository backed by the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ScheduleRepository for SqliteScheduleRepository {
    async fn create(&self, rule: ScheduleRule) -> Result<ScheduleRule, RelayHubError> {
        sqlx::query(
            "INSERT INTO schedules (id, scope, time, action, created_at, last_execution, last_run_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(rule.id.to_string())
        .bind(rule.scope.to_string())
        .bind(rule.time.to_string())
        .bind(rule.action.to_string())
        .bind(rule.created_at.to_rfc3339())
        .bind(rule.last_execution.as_ref().map(ToString::to_string))
        .bind(rule.last_run_at.map(|ts| ts.to_rfc3339()))
        .execute(&self.pool)
        .await
        .map_err(StorageError::from)?;

        Ok(rule)
    }

    async fn get_by_id(&self, id: ScheduleId) -> Result<Option<ScheduleRule>, RelayHubError> {
        let row: Option<SqliteRow> = sqlx::query("SELECT * FROM schedules WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;
        row.map(|row| decode_rule(&row).map_err(StorageError::from))
            .transpose()
            .map_err(RelayHubError::from)
    }

    async fn get_all(&self) -> Result<Vec<ScheduleRule>, RelayHubError> {
        let rows: Vec<SqliteRow> =
            sqlx::query("SELECT * FROM schedules ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await
                .map_err(StorageError::from)?;
        Ok(decode_rules_lenient(&rows))
    }

    async fn update(&self, rule: ScheduleRule) -> Result<ScheduleRule, RelayHubError> {
        sqlx::query(
            "UPDATE schedules SET scope = ?, time = ?, action = ?, last_execution = ?, last_run_at = ? \
             WHERE id = ?",
        )
        .bind(rule.scope.to_string())
        .bind(rule.time.to_string())
        .bind(rule.action.to_string())
        .bind(rule.last_execution.as_ref().map(ToString::to_string))
        .bind(rule.last_run_at.map(|ts| ts.to_rfc3339()))
        .bind(rule.id.to_string())
        .execute(&self.pool)
        .await
        .map_err(StorageError::from)?;

        Ok(rule)
    }

    async fn delete(&self, id: ScheduleId) -> Result<(), RelayHubError> {
        sqlx::query("DELETE FROM schedules WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(())
    }
}
