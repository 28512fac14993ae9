use async_trait::async_trait;
use connector_core::{RecordSink, SinkError};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::config::WebhookConfig;
use crate::error::{ConnectorError, ConnectorResult};

/// `reqwest`-backed [`RecordSink`] posting one record per call to the
/// configured webhook, with the service token sent verbatim in the
/// `Authorization` header.
pub struct WebhookSink {
    client: Client,
    url: String,
    authorization_token: String
}

impl WebhookSink {
    pub fn new(url: &str, authorization_token: &str, timeout: Duration) -> ConnectorResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConnectorError::Configuration {
                message: format!("failed to build webhook client: {e}")
            })?;

        Ok(Self {
            client,
            url: url.to_string(),
            authorization_token: authorization_token.to_string()
        })
    }

    /// Returns `None` when the deployment has no webhook configured;
    /// batch sync stays disabled and every other operation keeps working.
    pub fn from_config(config: &WebhookConfig) -> ConnectorResult<Option<Self>> {
        let (Some(url), Some(token)) = (&config.url, &config.authorization_token) else {
            return Ok(None);
        };

        Self::new(url, token, Duration::from_secs(config.timeout_seconds)).map(Some)
    }
}

#[async_trait]
impl RecordSink for WebhookSink {
    async fn deliver(&self, payload: &Value) -> Result<(), SinkError> {
        debug!(url = %self.url, "Forwarding record to webhook");

        let response = self
            .client
            .post(&self.url)
            .header("Authorization", &self.authorization_token)
            .json(payload)
            .send()
            .await
            .map_err(|e| SinkError::Transport {
                reason: e.to_string()
            })?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(SinkError::Rejected {
                status: status.as_u16()
            })
        }
    }
}
