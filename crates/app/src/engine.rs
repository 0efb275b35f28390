//! Scheduler engine — drives one evaluation/commit cycle per invocation.
//!
//! Each tick reads one snapshot, runs the pure evaluator, commits the
//! resulting writes atomically, appends audit records, and fires a
//! best-effort notification. Overlapping invocations are tolerated by
//! construction: the persisted minute stamps inside the atomic commit are
//! the only double-execution guard, so a concurrent duplicate tick can at
//! worst re-apply idempotent writes and duplicate an audit entry.

use std::time::Duration;

use chrono::{DateTime, Datelike, LocalResult, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use tokio_util::sync::CancellationToken;

use relayhub_domain::error::{RelayHubError, ValidationError};
use relayhub_domain::evaluate::evaluate;
use relayhub_domain::schedule::ScheduleTime;

use crate::notifier::Notifier;
use crate::ports::{CommitBatch, ExecutionLogStore, ExecutionStore, PushSender, PushTokenRepository};

/// Result of one tick, reported to the trigger surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    /// Number of rules that produced a commit this tick.
    pub executed: usize,
}

/// The evaluate-commit-log-notify pipeline over the store ports.
pub struct SchedulerEngine<ES, LS, PT, PS> {
    store: ES,
    logs: LS,
    notifier: Notifier<PT, PS>,
    zone: Tz,
}

impl<ES, LS, PT, PS> SchedulerEngine<ES, LS, PT, PS>
where
    ES: ExecutionStore,
    LS: ExecutionLogStore,
    PT: PushTokenRepository,
    PS: PushSender,
{
    /// Create an engine evaluating wall-clock labels in `zone`.
    pub fn new(store: ES, logs: LS, notifier: Notifier<PT, PS>, zone: Tz) -> Self {
        Self {
            store,
            logs,
            notifier,
            zone,
        }
    }

    /// The configured evaluation zone.
    #[must_use]
    pub fn zone(&self) -> Tz {
        self.zone
    }

    /// Run one tick at the real clock.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the snapshot read or the commit fails.
    pub async fn run_tick(&self) -> Result<TickOutcome, RelayHubError> {
        let now = Utc::now().with_timezone(&self.zone);
        self.run_at(now).await
    }

    /// Shared handler for both trigger surfaces: real clock, or an
    /// explicit `H:MM` override resolved to today in the configured zone.
    ///
    /// # Errors
    ///
    /// Returns [`RelayHubError::Validation`] for a malformed override and
    /// storage errors from the snapshot read or commit.
    pub async fn run_once(&self, override_time: Option<&str>) -> Result<TickOutcome, RelayHubError> {
        match override_time {
            Some(raw) => {
                let now = self.resolve_override(raw)?;
                self.run_at(now).await
            }
            None => self.run_tick().await,
        }
    }

    /// Run one tick at an explicit instant.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the snapshot read or the commit fails.
    /// Log-append and notification failures are swallowed here; they never
    /// change the outcome of a committed tick.
    #[tracing::instrument(skip(self), fields(minute = %now.format("%Y%m%d%H%M")))]
    pub async fn run_at(&self, now: DateTime<Tz>) -> Result<TickOutcome, RelayHubError> {
        let snapshot = self.store.snapshot().await?;
        let evaluation = evaluate(&now, &snapshot.rules, &snapshot.states, &snapshot.enabled);

        if evaluation.is_empty() {
            // Idle minute: no writes means no store access at all.
            return Ok(TickOutcome { executed: 0 });
        }

        for (earlier, later) in &evaluation.conflicts {
            tracing::warn!(
                overridden = %earlier,
                winner = %later,
                "conflicting schedule rules in the same minute, last writer wins"
            );
        }

        let executed = evaluation.executed();
        self.store
            .commit(CommitBatch::from_evaluation(&evaluation))
            .await?;

        let summary = evaluation
            .entries
            .iter()
            .map(relayhub_domain::log::ExecutionEntry::summary)
            .collect::<Vec<_>>()
            .join(", ");

        for entry in evaluation.entries {
            if let Err(err) = self.logs.append(entry).await {
                tracing::warn!(error = %err, "audit log append failed");
            }
        }

        self.notifier.notify(&summary).await;

        tracing::info!(executed, "schedule tick committed");
        Ok(TickOutcome { executed })
    }

    /// Resolve an `H:MM` override to today, in the configured zone, at
    /// that wall-clock time with seconds zeroed.
    ///
    /// # Errors
    ///
    /// Returns [`RelayHubError::Validation`] when the label is malformed
    /// or names a wall-clock time skipped by a zone transition today.
    pub fn resolve_override(&self, raw: &str) -> Result<DateTime<Tz>, RelayHubError> {
        let time: ScheduleTime = raw.parse().map_err(RelayHubError::from)?;
        let today = Utc::now().with_timezone(&self.zone).date_naive();
        match self.zone.with_ymd_and_hms(
            today.year(),
            today.month(),
            today.day(),
            u32::from(time.hour()),
            u32::from(time.minute()),
            0,
        ) {
            LocalResult::Single(instant) => Ok(instant),
            // A repeated local time (fall-back transition): take the first.
            LocalResult::Ambiguous(earliest, _) => Ok(earliest),
            LocalResult::None => {
                Err(ValidationError::InvalidTime(raw.to_string()).into())
            }
        }
    }

    /// Run ticks forever, aligned to wall-clock minute boundaries, until
    /// cancelled. Individual tick failures are logged and the loop keeps
    /// going; the next minute retries naturally.
    pub async fn run_periodic(&self, cancel: CancellationToken) {
        loop {
            let delay = delay_until_next_minute(&Utc::now().with_timezone(&self.zone));
            tokio::select! {
                () = cancel.cancelled() => {
                    tracing::info!("schedule ticker cancelled");
                    break;
                }
                () = tokio::time::sleep(delay) => {
                    match self.run_tick().await {
                        Ok(outcome) if outcome.executed > 0 => {
                            tracing::info!(executed = outcome.executed, "periodic tick executed rules");
                        }
                        Ok(_) => tracing::debug!("periodic tick found nothing to do"),
                        Err(err) => tracing::error!(error = %err, "periodic tick failed"),
                    }
                }
            }
        }
    }
}

/// Time left until the next minute boundary of `now`'s zone.
fn delay_until_next_minute<Z>(now: &DateTime<Z>) -> Duration
where
    Z: TimeZone,
{
    let elapsed_ms =
        u64::from(now.second()) * 1_000 + u64::from(now.timestamp_subsec_millis());
    let remaining = 60_000u64.saturating_sub(elapsed_ms);
    Duration::from_millis(if remaining == 0 { 60_000 } else { remaining })
}
