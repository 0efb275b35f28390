//! # relayhub-adapter-push-expo
//!
//! Push delivery over Expo's push HTTP API. Implements the `PushSender`
//! port; the app-layer notifier decides whether and what to send, this
//! adapter only performs the delivery call and reports its outcome.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use relayhub_app::ports::PushSender;
use relayhub_domain::error::RelayHubError;

const DEFAULT_BASE_URL: &str = "https://exp.host";
const SEND_PATH: &str = "/--/api/v2/push/send";

/// Errors originating from the Expo push layer.
#[derive(Debug, thiserror::Error)]
pub enum PushError {
    /// The HTTP request itself failed or returned a non-success status.
    #[error("push request failed")]
    Http(#[from] reqwest::Error),

    /// Expo accepted the request but refused the message.
    #[error("push rejected: {0}")]
    Rejected(String),
}

impl From<PushError> for RelayHubError {
    fn from(err: PushError) -> Self {
        Self::Notification(Box::new(err))
    }
}

#[derive(Debug, Serialize)]
struct PushMessage<'a> {
    to: &'a str,
    title: &'a str,
    body: &'a str,
    sound: &'a str,
}

#[derive(Debug, Deserialize)]
struct PushResponse {
    data: PushTicket,
}

/// Per-message ticket in Expo's response. `status` is `"ok"` or `"error"`.
#[derive(Debug, Deserialize)]
struct PushTicket {
    status: String,
    #[serde(default)]
    message: Option<String>,
}

/// Sends push messages through Expo's push service.
pub struct ExpoPushSender {
    client: Client,
    base_url: String,
}

impl Default for ExpoPushSender {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpoPushSender {
    /// Sender targeting the public Expo endpoint.
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Sender targeting a custom endpoint (tests, proxies).
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl PushSender for ExpoPushSender {
    async fn send(&self, token: &str, title: &str, body: &str) -> Result<(), RelayHubError> {
        let message = PushMessage {
            to: token,
            title,
            body,
            sound: "default",
        };

        let response = self
            .client
            .post(format!("{}{SEND_PATH}", self.base_url))
            .json(&message)
            .send()
            .await
            .map_err(PushError::from)?
            .error_for_status()
            .map_err(PushError::from)?;

        let receipt: PushResponse = response.json().await.map_err(PushError::from)?;
        if receipt.data.status != "ok" {
            let reason = receipt
                .data
                .message
                .unwrap_or_else(|| "unspecified delivery error".to_string());
            return Err(PushError::Rejected(reason).into());
        }

        Ok(())
    }
}
