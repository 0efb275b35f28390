//! Execution store port — the scheduler's view of the shared store.
//!
//! The store is an injected capability with exactly two operations: a
//! single-snapshot read and an atomic multi-key write. The engine never
//! holds a lock across the read-evaluate-write span; cross-invocation
//! safety comes from the persisted minute stamps inside the atomic commit.

use std::collections::BTreeMap;
use std::future::Future;

use relayhub_domain::error::RelayHubError;
use relayhub_domain::evaluate::{Evaluation, RuleStamp};
use relayhub_domain::relay::{ActuatorId, RelayStates, ScheduleEnabled};
use relayhub_domain::schedule::ScheduleRule;

/// Everything the evaluator needs, read as of one instant.
#[derive(Debug, Clone, Default)]
pub struct StoreSnapshot {
    pub rules: Vec<ScheduleRule>,
    pub states: RelayStates,
    pub enabled: ScheduleEnabled,
}

/// The writes of one tick: relay states plus rule stamps, applied
/// all-or-nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitBatch {
    pub writes: BTreeMap<ActuatorId, bool>,
    pub stamps: Vec<RuleStamp>,
}

impl CommitBatch {
    /// Extract the persistent half of an evaluation (audit entries are
    /// appended separately, outside the transaction).
    #[must_use]
    pub fn from_evaluation(evaluation: &Evaluation) -> Self {
        Self {
            writes: evaluation.writes.clone(),
            stamps: evaluation.stamps.clone(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty() && self.stamps.is_empty()
    }
}

/// Snapshot read and atomic commit against the shared store.
pub trait ExecutionStore {
    /// Read rules, relay states, and enablement flags in one consistent
    /// snapshot (a single transaction — never two reads with intervening
    /// writes).
    fn snapshot(&self) -> impl Future<Output = Result<StoreSnapshot, RelayHubError>> + Send;

    /// Apply every write in `batch` atomically. On error nothing is
    /// persisted — in particular no stamp — so the same minute's work is
    /// safely retryable.
    fn commit(&self, batch: CommitBatch)
    -> impl Future<Output = Result<(), RelayHubError>> + Send;
}
