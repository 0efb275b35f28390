//! Relay repository port — per-actuator state and enablement persistence.

use std::future::Future;

use relayhub_domain::error::RelayHubError;
use relayhub_domain::relay::{ActuatorId, Relay};

/// Persistence for the two per-actuator maps.
///
/// Keys absent from the store read as `false`; writing to an unknown key
/// creates it. State and enablement are written through separate methods
/// because they are separate maps — callers decide whether a toggle
/// touches both (see `TogglePolicy`).
pub trait RelayRepository {
    /// All known relays with state and enablement flag.
    fn list(&self) -> impl Future<Output = Result<Vec<Relay>, RelayHubError>> + Send;

    /// One relay, if it has ever been written.
    fn get(
        &self,
        id: &ActuatorId,
    ) -> impl Future<Output = Result<Option<Relay>, RelayHubError>> + Send;

    /// Set the on/off state for `id`, creating the key if absent.
    fn set_state(
        &self,
        id: &ActuatorId,
        state: bool,
    ) -> impl Future<Output = Result<(), RelayHubError>> + Send;

    /// Set the schedule-enablement flag for `id`, creating the key if absent.
    fn set_schedule_enabled(
        &self,
        id: &ActuatorId,
        enabled: bool,
    ) -> impl Future<Output = Result<(), RelayHubError>> + Send;
}
