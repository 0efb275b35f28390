//! Relay service — list relays and apply user toggles.

use relayhub_domain::error::{NotFoundError, RelayHubError};
use relayhub_domain::relay::{ActuatorId, Relay, TogglePolicy};

use crate::ports::RelayRepository;

/// Application service for relay reads and toggles.
///
/// The [`TogglePolicy`] decides whether setting a relay's state also sets
/// its schedule-enablement flag. The coupling lives here, as policy,
/// instead of being buried in a client-side toggle handler.
pub struct RelayService<R> {
    repo: R,
    policy: TogglePolicy,
}

impl<R: RelayRepository> RelayService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R, policy: TogglePolicy) -> Self {
        Self { repo, policy }
    }

    /// All known relays.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list(&self) -> Result<Vec<Relay>, RelayHubError> {
        self.repo.list().await
    }

    /// Set a relay's state, applying the toggle policy to its
    /// schedule-enablement flag, and return the updated view.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self), fields(relay = %id, policy = %self.policy))]
    pub async fn set_state(&self, id: &ActuatorId, state: bool) -> Result<Relay, RelayHubError> {
        self.repo.set_state(id, state).await?;
        if self.policy == TogglePolicy::FollowState {
            self.repo.set_schedule_enabled(id, state).await?;
        }
        self.fetch(id).await
    }

    /// Set only the schedule-enablement flag and return the updated view.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self), fields(relay = %id))]
    pub async fn set_schedule_enabled(
        &self,
        id: &ActuatorId,
        enabled: bool,
    ) -> Result<Relay, RelayHubError> {
        self.repo.set_schedule_enabled(id, enabled).await?;
        self.fetch(id).await
    }

    async fn fetch(&self, id: &ActuatorId) -> Result<Relay, RelayHubError> {
        self.repo.get(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Relay",
                id: id.to_string(),
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::future::Future;
    use std::sync::Mutex;

    #[derive(Default)]
    struct InMemoryRelayRepo {
        rows: Mutex<BTreeMap<ActuatorId, (bool, bool)>>,
    }

    impl RelayRepository for InMemoryRelayRepo {
        fn list(&self) -> impl Future<Output = Result<Vec<Relay>, RelayHubError>> + Send {
            let rows = self.rows.lock().unwrap();
            let result: Vec<Relay> = rows
                .iter()
                .map(|(id, (state, enabled))| Relay {
                    id: id.clone(),
                    state: *state,
                    schedule_enabled: *enabled,
                })
                .collect();
            async { Ok(result) }
        }

        fn get(
            &self,
            id: &ActuatorId,
        ) -> impl Future<Output = Result<Option<Relay>, RelayHubError>> + Send {
            let rows = self.rows.lock().unwrap();
            let result = rows.get(id).map(|(state, enabled)| Relay {
                id: id.clone(),
                state: *state,
                schedule_enabled: *enabled,
            });
            async { Ok(result) }
        }

        fn set_state(
            &self,
            id: &ActuatorId,
            state: bool,
        ) -> impl Future<Output = Result<(), RelayHubError>> + Send {
            let mut rows = self.rows.lock().unwrap();
            rows.entry(id.clone()).or_insert((false, false)).0 = state;
            async { Ok(()) }
        }

        fn set_schedule_enabled(
            &self,
            id: &ActuatorId,
            enabled: bool,
        ) -> impl Future<Output = Result<(), RelayHubError>> + Send {
            let mut rows = self.rows.lock().unwrap();
            rows.entry(id.clone()).or_insert((false, false)).1 = enabled;
            async { Ok(()) }
        }
    }

    fn relay1() -> ActuatorId {
        ActuatorId::new("relay1").unwrap()
    }

    #[tokio::test]
    async fn should_sync_enablement_when_policy_follows_state() {
        let svc = RelayService::new(InMemoryRelayRepo::default(), TogglePolicy::FollowState);

        let relay = svc.set_state(&relay1(), true).await.unwrap();
        assert!(relay.state);
        assert!(relay.schedule_enabled);

        let relay = svc.set_state(&relay1(), false).await.unwrap();
        assert!(!relay.state);
        assert!(!relay.schedule_enabled);
    }

    #[tokio::test]
    async fn should_leave_enablement_alone_when_policy_is_independent() {
        let svc = RelayService::new(InMemoryRelayRepo::default(), TogglePolicy::Independent);

        svc.set_schedule_enabled(&relay1(), true).await.unwrap();
        let relay = svc.set_state(&relay1(), false).await.unwrap();
        assert!(!relay.state);
        assert!(relay.schedule_enabled);
    }

    #[tokio::test]
    async fn should_create_unknown_relay_on_first_write() {
        let svc = RelayService::new(InMemoryRelayRepo::default(), TogglePolicy::FollowState);
        assert!(svc.list().await.unwrap().is_empty());

        svc.set_state(&relay1(), true).await.unwrap();
        let relays = svc.list().await.unwrap();
        assert_eq!(relays.len(), 1);
        assert_eq!(relays[0].id, relay1());
    }

    #[tokio::test]
    async fn should_set_enablement_independently_of_state() {
        let svc = RelayService::new(InMemoryRelayRepo::default(), TogglePolicy::FollowState);

        svc.set_state(&relay1(), false).await.unwrap();
        let relay = svc.set_schedule_enabled(&relay1(), true).await.unwrap();
        assert!(!relay.state);
        assert!(relay.schedule_enabled);
    }
}
