//! Audit log entries for executed schedule rules.
//!
//! The evaluator queues [`ExecutionEntry`] values; the log store assigns
//! the row identifier at append time, producing the persisted
//! [`ExecutionRecord`]. Keeping ids out of the evaluator keeps it a pure
//! function of its inputs.

use serde::{Deserialize, Serialize};

use crate::id::{ExecutionId, ScheduleId};
use crate::schedule::{ScheduleScope, ScheduleTime, SwitchAction};
use crate::time::Timestamp;

/// One rule execution, as computed by the evaluator. Not yet keyed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionEntry {
    pub schedule_id: ScheduleId,
    pub scope: ScheduleScope,
    pub time: ScheduleTime,
    pub action: SwitchAction,
    pub executed_at: Timestamp,
}

impl ExecutionEntry {
    /// Human-readable fragment used in notification summaries,
    /// e.g. `"ALL ON"`.
    #[must_use]
    pub fn summary(&self) -> String {
        format!("{} {}", self.scope, self.action)
    }

    /// Attach the store-assigned row id.
    #[must_use]
    pub fn into_record(self, id: ExecutionId) -> ExecutionRecord {
        ExecutionRecord {
            id,
            schedule_id: self.schedule_id,
            scope: self.scope,
            time: self.time,
            action: self.action,
            executed_at: self.executed_at,
        }
    }
}

/// Append-only persisted record of one rule execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRecord {
    pub id: ExecutionId,
    pub schedule_id: ScheduleId,
    pub scope: ScheduleScope,
    pub time: ScheduleTime,
    pub action: SwitchAction,
    pub executed_at: Timestamp,
}
