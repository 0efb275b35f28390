//! Schedule service — use-cases for managing schedule rules.
//!
//! Time strings are validated here, at the write boundary; the evaluator
//! trusts persisted rules. Edits mutate `time`/`action` in place and leave
//! `id`, `created_at`, and the execution stamps untouched.

use relayhub_domain::error::{NotFoundError, RelayHubError};
use relayhub_domain::id::ScheduleId;
use relayhub_domain::schedule::{ScheduleRule, ScheduleTime, SwitchAction};
use relayhub_domain::time::now;

use crate::ports::ScheduleRepository;

/// Application service for schedule rule CRUD operations.
pub struct ScheduleService<S> {
    repo: S,
}

impl<S: ScheduleRepository> ScheduleService<S> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: S) -> Self {
        Self { repo }
    }

    /// Create a rule from a raw time label and an action.
    ///
    /// # Errors
    ///
    /// Returns [`RelayHubError::Validation`] when `time` is not a valid
    /// `HH:MM` label, or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn create(
        &self,
        time: &str,
        action: SwitchAction,
    ) -> Result<ScheduleRule, RelayHubError> {
        let time: ScheduleTime = time.parse().map_err(RelayHubError::from)?;
        let rule = ScheduleRule::create(time, action, now());
        self.repo.create(rule).await
    }

    /// Look up a rule by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`RelayHubError::NotFound`] when no rule with `id` exists,
    /// or a storage error from the repository.
    pub async fn get(&self, id: ScheduleId) -> Result<ScheduleRule, RelayHubError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Schedule",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// All rules, newest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list(&self) -> Result<Vec<ScheduleRule>, RelayHubError> {
        self.repo.get_all().await
    }

    /// Change a rule's time and action. Creation metadata and execution
    /// stamps survive the edit.
    ///
    /// # Errors
    ///
    /// Returns [`RelayHubError::Validation`] for a malformed time,
    /// [`RelayHubError::NotFound`] for an unknown id, or a storage error.
    #[tracing::instrument(skip(self))]
    pub async fn update(
        &self,
        id: ScheduleId,
        time: &str,
        action: SwitchAction,
    ) -> Result<ScheduleRule, RelayHubError> {
        let time: ScheduleTime = time.parse().map_err(RelayHubError::from)?;
        let mut rule = self.get(id).await?;
        rule.time = time;
        rule.action = action;
        self.repo.update(rule).await
    }

    /// Delete a rule by id.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: ScheduleId) -> Result<(), RelayHubError> {
        self.repo.delete(id).await
    }
}
