//! Common error types used across the workspace.
//!
//! Each layer defines its own typed error and converts into
//! [`RelayHubError`] via `#[from]` — no `String` variants.

/// Top-level error for the relayhub core.
#[derive(Debug, thiserror::Error)]
pub enum RelayHubError {
    /// A domain invariant or input validation failed.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A referenced record does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// The backing store failed. Boxed so adapter error types stay out
    /// of the domain crate.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Push delivery failed. Always swallowed by the notifier boundary;
    /// kept separate from `Storage` so the failure domains stay distinct.
    #[error("notification error")]
    Notification(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Validation failures rejected at the write boundary.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Actuator identifier is empty.
    #[error("actuator id must not be empty")]
    EmptyActuatorId,

    /// Actuator identifier contains characters outside `[a-z0-9_-]`.
    #[error("invalid actuator id: {0:?}")]
    InvalidActuatorId(String),

    /// Schedule time is not a valid `HH:MM` wall-clock label.
    #[error("invalid schedule time: {0:?}")]
    InvalidTime(String),

    /// Schedule action is neither `ON` nor `OFF`.
    #[error("invalid schedule action: {0:?}")]
    InvalidAction(String),
}

/// A lookup that came up empty.
#[derive(Debug, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    /// Kind of record, e.g. `"Schedule"`.
    pub entity: &'static str,
    /// The identifier that was looked up.
    pub id: String,
}
