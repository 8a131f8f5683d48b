//! Telegram Bot API forwarding.
//!
//! One `sendMessage` call per signal, bounded by the configured timeout and
//! never retried. Callers own any resubmission policy.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

/// Outcome of a failed forward, rendered as the diagnostic returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForwardError {
    #[error("Request timeout")]
    Timeout,

    /// Connect or transport failure.
    #[error("Network error: {0}")]
    Network(String),

    /// Telegram answered with a non-2xx status or `ok: false`.
    #[error("{description}")]
    Rejected { status: u16, description: String },

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Delivery seam between the HTTP handlers and the messaging platform.
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Send `text` to `chat_id` using `bot_token` as the credential.
    async fn send_message(
        &self,
        bot_token: &str,
        chat_id: &str,
        text: &str,
    ) -> Result<(), ForwardError>;
}

/// `sendMessage` request body.
#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    disable_web_page_preview: bool,
}

/// Envelope every Bot API response shares.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Bot API client backed by a pooled `reqwest` client.
#[derive(Debug, Clone)]
pub struct TelegramClient {
    client: Client,
    api_url: String,
    timeout: Duration,
}

impl TelegramClient {
    /// Create a client for the API at `api_url` (e.g. `https://api.telegram.org`).
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Result<Self, ForwardError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ForwardError::Unexpected(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    fn send_message_url(&self, bot_token: &str) -> String {
        format!("{}/bot{}/sendMessage", self.api_url, bot_token)
    }
}

#[async_trait]
impl MessageSender for TelegramClient {
    async fn send_message(
        &self,
        bot_token: &str,
        chat_id: &str,
        text: &str,
    ) -> Result<(), ForwardError> {
        let body = SendMessageRequest {
            chat_id,
            text,
            disable_web_page_preview: true,
        };

        let response = match self
            .client
            .post(self.send_message_url(bot_token))
            .json(&body)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                let e = e.without_url();
                if e.is_timeout() {
                    error!(
                        chat_id = chat_id,
                        timeout_seconds = self.timeout.as_secs_f64(),
                        "telegram_send_timeout"
                    );
                    return Err(ForwardError::Timeout);
                }
                error!(chat_id = chat_id, error = %e, "telegram_send_network_error");
                return Err(ForwardError::Network(e.to_string()));
            }
        };

        let status = response.status();
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                let e = e.without_url();
                if e.is_timeout() {
                    error!(chat_id = chat_id, "telegram_response_timeout");
                    return Err(ForwardError::Timeout);
                }
                error!(chat_id = chat_id, error = %e, "telegram_response_read_failed");
                return Err(ForwardError::Network(e.to_string()));
            }
        };

        let parsed = serde_json::from_slice::<ApiResponse>(&bytes);

        match parsed {
            Ok(api) if status.is_success() && api.ok => {
                info!(chat_id = chat_id, status_code = status.as_u16(), "telegram_send_success");
                Ok(())
            }
            Ok(api) => {
                let description = api
                    .description
                    .unwrap_or_else(|| "Unknown Telegram error".to_string());
                error!(
                    chat_id = chat_id,
                    status_code = status.as_u16(),
                    description = %description,
                    "telegram_api_error"
                );
                Err(ForwardError::Rejected {
                    status: status.as_u16(),
                    description,
                })
            }
            Err(_) if !status.is_success() => {
                error!(chat_id = chat_id, status_code = status.as_u16(), "telegram_http_error");
                Err(ForwardError::Rejected {
                    status: status.as_u16(),
                    description: format!("HTTP {}", status),
                })
            }
            Err(e) => {
                error!(chat_id = chat_id, error = %e, "telegram_response_invalid");
                Err(ForwardError::Unexpected(format!("invalid response body: {e}")))
            }
        }
    }
}
