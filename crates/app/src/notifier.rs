//! Best-effort push notification with its own failure domain.
//!
//! Nothing in here can fail past this boundary: token lookup errors,
//! structurally invalid tokens, and delivery failures are all logged and
//! swallowed. The commit outcome is decided before the notifier runs and
//! is never affected by it.

use crate::ports::{PushSender, PushTokenRepository};

/// Title used for every schedule notification.
const PUSH_TITLE: &str = "Schedule executed";

/// Whether `token` has the shape of an Expo push token.
#[must_use]
pub fn is_expo_push_token(token: &str) -> bool {
    token.starts_with("ExponentPushToken[") && token.ends_with(']')
}

/// Looks up the registered delivery token and sends a summary to it.
pub struct Notifier<PT, PS> {
    tokens: PT,
    sender: PS,
}

impl<PT, PS> Notifier<PT, PS>
where
    PT: PushTokenRepository,
    PS: PushSender,
{
    /// Create a notifier over the given token store and sender.
    pub fn new(tokens: PT, sender: PS) -> Self {
        Self { tokens, sender }
    }

    /// Deliver `summary` to the registered token, best effort.
    pub async fn notify(&self, summary: &str) {
        let token = match self.tokens.get().await {
            Ok(Some(token)) => token,
            Ok(None) => {
                tracing::debug!("no push token registered, skipping notification");
                return;
            }
            Err(err) => {
                tracing::warn!(error = %err, "push token lookup failed");
                return;
            }
        };

        if !is_expo_push_token(&token) {
            tracing::warn!("registered push token is not an Expo token, skipping notification");
            return;
        }

        if let Err(err) = self.sender.send(&token, PUSH_TITLE, summary).await {
            tracing::warn!(error = %err, "push delivery failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relayhub_domain::error::RelayHubError;
    use std::future::Future;
    use std::sync::Mutex;

    struct FixedTokenRepo(Option<String>);

    impl PushTokenRepository for FixedTokenRepo {
        fn get(&self) -> impl Future<Output = Result<Option<String>, RelayHubError>> + Send {
            let token = self.0.clone();
            async { Ok(token) }
        }

        fn set(&self, _token: &str) -> impl Future<Output = Result<(), RelayHubError>> + Send {
            async { Ok(()) }
        }
    }

    struct FailingTokenRepo;

    impl PushTokenRepository for FailingTokenRepo {
        fn get(&self) -> impl Future<Output = Result<Option<String>, RelayHubError>> + Send {
            async {
                Err(RelayHubError::Storage(Box::new(std::io::Error::other(
                    "store down",
                ))))
            }
        }

        fn set(&self, _token: &str) -> impl Future<Output = Result<(), RelayHubError>> + Send {
            async { Ok(()) }
        }
    }

    #[derive(Default)]
    struct SpySender {
        sent: Mutex<Vec<(String, String)>>,
        fail: bool,
    }

    impl PushSender for &SpySender {
        fn send(
            &self,
            token: &str,
            _title: &str,
            body: &str,
        ) -> impl Future<Output = Result<(), RelayHubError>> + Send {
            let result = if self.fail {
                Err(RelayHubError::Notification(Box::new(std::io::Error::other(
                    "delivery failed",
                ))))
            } else {
                self.sent
                    .lock()
                    .unwrap()
                    .push((token.to_string(), body.to_string()));
                Ok(())
            };
            async { result }
        }
    }

    const VALID_TOKEN: &str = "ExponentPushToken[xxxxxxxxxxxxxxxxxxxxxx]";

    #[test]
    fn should_accept_expo_shaped_tokens_only() {
        assert!(is_expo_push_token(VALID_TOKEN));
        assert!(!is_expo_push_token(""));
        assert!(!is_expo_push_token("ExponentPushToken[oops"));
        assert!(!is_expo_push_token("some-fcm-token"));
    }

    #[tokio::test]
    async fn should_send_summary_to_registered_token() {
        let sender = SpySender::default();
        let notifier = Notifier::new(FixedTokenRepo(Some(VALID_TOKEN.to_string())), &sender);

        notifier.notify("ALL ON").await;

        let sent = sender.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, VALID_TOKEN);
        assert_eq!(sent[0].1, "ALL ON");
    }

    #[tokio::test]
    async fn should_skip_when_no_token_registered() {
        let sender = SpySender::default();
        let notifier = Notifier::new(FixedTokenRepo(None), &sender);

        notifier.notify("ALL ON").await;
        assert!(sender.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_skip_when_token_is_structurally_invalid() {
        let sender = SpySender::default();
        let notifier = Notifier::new(FixedTokenRepo(Some("garbage".to_string())), &sender);

        notifier.notify("ALL ON").await;
        assert!(sender.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_swallow_token_lookup_failure() {
        let sender = SpySender::default();
        let notifier = Notifier::new(FailingTokenRepo, &sender);

        // Must not panic or propagate.
        notifier.notify("ALL ON").await;
        assert!(sender.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_swallow_delivery_failure() {
        let sender = SpySender {
            fail: true,
            ..SpySender::default()
        };
        let notifier = Notifier::new(FixedTokenRepo(Some(VALID_TOKEN.to_string())), &sender);

        notifier.notify("ALL ON").await;
        assert!(sender.sent.lock().unwrap().is_empty());
    }
}
