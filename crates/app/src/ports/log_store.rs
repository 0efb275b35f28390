//! Execution log port — append-only audit storage.

use std::future::Future;
use std::sync::Arc;

use relayhub_domain::error::RelayHubError;
use relayhub_domain::log::{ExecutionEntry, ExecutionRecord};

/// Append-only store for rule execution records.
///
/// Appends happen after the state commit and are independently retryable;
/// a failed append never rolls back relay state.
pub trait ExecutionLogStore {
    /// Persist one entry, assigning its record id.
    fn append(
        &self,
        entry: ExecutionEntry,
    ) -> impl Future<Output = Result<ExecutionRecord, RelayHubError>> + Send;

    /// Most recent records first, at most `limit` of them.
    fn recent(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<ExecutionRecord>, RelayHubError>> + Send;
}

impl<T: ExecutionLogStore + Send + Sync> ExecutionLogStore for Arc<T> {
    fn append(
        &self,
        entry: ExecutionEntry,
    ) -> impl Future<Output = Result<ExecutionRecord, RelayHubError>> + Send {
        (**self).append(entry)
    }

    fn recent(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<ExecutionRecord>, RelayHubError>> + Send {
        (**self).recent(limit)
    }
}
