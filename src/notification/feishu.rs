//! A client for sending text messages to a Feishu group-chat webhook.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Webhook the client falls back to when none is configured.
pub const DEFAULT_WEBHOOK_URL: &str =
    "https://open.feishu.cn/open-apis/bot/v2/hook/040742e7-0e22-43ce";

/// Errors surfaced while delivering one message to the webhook.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The outgoing message could not be encoded.
    #[error("failed to encode message: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The HTTP request never completed (connect, DNS, timeout).
    #[error("failed to reach webhook: {0}")]
    Request(#[source] reqwest::Error),

    /// The webhook answered with a non-success HTTP status.
    #[error("webhook returned status {0}")]
    Status(StatusCode),

    /// The response body was not the expected JSON shape.
    #[error("failed to decode webhook response: {0}")]
    Decode(#[source] reqwest::Error),

    /// The webhook took the request but reported an application error.
    #[error("webhook rejected message: code={code}, msg={msg}")]
    Remote { code: i64, msg: String },
}

/// A trait for clients that can deliver one rendered message.
#[async_trait]
pub trait FeishuClientTrait: Send + Sync {
    /// Delivers `text` as a Feishu text message.
    async fn send_text(&self, text: &str) -> Result<(), DeliveryError>;
}

/// A client posting text messages to a single Feishu webhook.
pub struct FeishuClient {
    webhook_url: String,
    http: reqwest::Client,
}

impl FeishuClient {
    /// Creates a client posting to `webhook_url`. An empty URL falls back
    /// to [`DEFAULT_WEBHOOK_URL`].
    pub fn new(webhook_url: impl Into<String>) -> Self {
        let webhook_url = webhook_url.into();
        let webhook_url = if webhook_url.is_empty() {
            DEFAULT_WEBHOOK_URL.to_string()
        } else {
            webhook_url
        };

        Self {
            webhook_url,
            http: reqwest::Client::new(),
        }
    }

    /// The URL messages are posted to.
    pub fn webhook_url(&self) -> &str {
        &self.webhook_url
    }
}

#[async_trait]
impl FeishuClientTrait for FeishuClient {
    async fn send_text(&self, text: &str) -> Result<(), DeliveryError> {
        let message = FeishuMessage {
            msg_type: "text",
            content: FeishuContent {
                text: text.to_string(),
            },
        };
        let body = serde_json::to_vec(&message)?;

        let response = self
            .http
            .post(&self.webhook_url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(DeliveryError::Request)?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeliveryError::Status(status));
        }

        let result: FeishuResponse = response.json().await.map_err(DeliveryError::Decode)?;
        if result.code != 0 {
            return Err(DeliveryError::Remote {
                code: result.code,
                msg: result.msg,
            });
        }

        debug!(webhook_url = %self.webhook_url, "message accepted by webhook");
        Ok(())
    }
}

/// Wire envelope of a Feishu text message.
#[derive(Debug, Serialize)]
struct FeishuMessage {
    msg_type: &'static str,
    content: FeishuContent,
}

#[derive(Debug, Serialize)]
struct FeishuContent {
    text: String,
}

/// Body the webhook answers with. Missing fields decode to their zero
/// values, matching what the endpoint actually returns on success.
#[derive(Debug, Deserialize)]
struct FeishuResponse {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    msg: String,
}
