//! Push delivery ports — token storage and the delivery capability.

use std::future::Future;
use std::sync::Arc;

use relayhub_domain::error::RelayHubError;

/// Storage for the single registered delivery token.
pub trait PushTokenRepository {
    /// The registered token, if any.
    fn get(&self) -> impl Future<Output = Result<Option<String>, RelayHubError>> + Send;

    /// Register (or replace) the token.
    fn set(&self, token: &str) -> impl Future<Output = Result<(), RelayHubError>> + Send;
}

impl<T: PushTokenRepository + Send + Sync> PushTokenRepository for Arc<T> {
    fn get(&self) -> impl Future<Output = Result<Option<String>, RelayHubError>> + Send {
        (**self).get()
    }

    fn set(&self, token: &str) -> impl Future<Output = Result<(), RelayHubError>> + Send {
        (**self).set(token)
    }
}

/// Delivers one push message to one token. Implementations report
/// failures; swallowing them is the notifier's job, not the sender's.
pub trait PushSender {
    fn send(
        &self,
        token: &str,
        title: &str,
        body: &str,
    ) -> impl Future<Output = Result<(), RelayHubError>> + Send;
}
