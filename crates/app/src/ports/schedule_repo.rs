//! Schedule repository port — persistence for schedule rules.

use std::future::Future;

use relayhub_domain::error::RelayHubError;
use relayhub_domain::id::ScheduleId;
use relayhub_domain::schedule::ScheduleRule;

/// Repository for persisting and querying [`ScheduleRule`]s.
pub trait ScheduleRepository {
    /// Create a new rule in storage.
    fn create(
        &self,
        rule: ScheduleRule,
    ) -> impl Future<Output = Result<ScheduleRule, RelayHubError>> + Send;

    /// Get a rule by its unique identifier.
    fn get_by_id(
        &self,
        id: ScheduleId,
    ) -> impl Future<Output = Result<Option<ScheduleRule>, RelayHubError>> + Send;

    /// All rules, newest first (descending `created_at`).
    fn get_all(&self) -> impl Future<Output = Result<Vec<ScheduleRule>, RelayHubError>> + Send;

    /// Update an existing rule in place.
    fn update(
        &self,
        rule: ScheduleRule,
    ) -> impl Future<Output = Result<ScheduleRule, RelayHubError>> + Send;

    /// Delete a rule. Deleting an unknown id is a no-op.
    fn delete(&self, id: ScheduleId) -> impl Future<Output = Result<(), RelayHubError>> + Send;
}
