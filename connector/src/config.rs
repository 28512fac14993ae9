use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConnectorConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// The key Census presents on every call. `None` leaves the
    /// connector open, for local development.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default)]
    pub webhook: WebhookConfig
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl ConnectorConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Environment lookup is injected; `from_env` is the only caller
    /// that touches process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(addr) = lookup("CONNECTOR_BIND_ADDRESS") {
            config.bind_address = addr;
        }
        if let Some(port) = lookup("CONNECTOR_PORT") {
            if let Ok(p) = port.parse() {
                config.port = p;
            }
        }
        if let Some(key) = lookup("CONNECTOR_API_KEY") {
            config.api_key = Some(key);
        }
        if let Some(url) = lookup("WEBHOOK_URL") {
            config.webhook.url = Some(url);
        }
        if let Some(token) = lookup("SERVICE_AUTHORIZATION_TOKEN") {
            config.webhook.authorization_token = Some(token);
        }
        if let Some(timeout) = lookup("WEBHOOK_TIMEOUT_SECONDS") {
            if let Ok(t) = timeout.parse() {
                config.webhook.timeout_seconds = t;
            }
        }

        config
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.bind_address, self.port).parse()?)
    }
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            api_key: None,
            webhook: WebhookConfig::default()
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WebhookConfig {
    /// Destination for per-record forwarding. Batch sync is disabled
    /// until both `url` and `authorization_token` are set.
    #[serde(default)]
    pub url: Option<String>,

    /// Sent verbatim as the `Authorization` header on outbound calls.
    #[serde(default)]
    pub authorization_token: Option<String>,

    #[serde(default = "default_webhook_timeout")]
    pub timeout_seconds: u64
}

fn default_webhook_timeout() -> u64 {
    30
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: None,
            authorization_token: None,
            timeout_seconds: default_webhook_timeout()
        }
    }
}
