//! Traits for the connector's external collaborators.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Delivery failure reported by a [`RecordSink`].
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("webhook transport error: {reason}")]
    Transport { reason: String },

    #[error("webhook rejected record: status {status}")]
    Rejected { status: u16 }
}

/// Validates the API key presented by the caller.
///
/// Key validation is an external concern of the deployment; the connector
/// only sees a yes/no answer.
pub trait ApiKeyValidator: Send + Sync {
    fn authorize(&self, presented: Option<&str>) -> bool;
}

/// The downstream webhook: an opaque sink accepting one JSON record at a
/// time. Implementations decide transport and credentials.
#[async_trait]
pub trait RecordSink: Send + Sync {
    async fn deliver(&self, payload: &Value) -> Result<(), SinkError>;
}
