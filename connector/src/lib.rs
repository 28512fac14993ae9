pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod rpc;
pub mod sync;
pub mod telemetry;
pub mod webhook;

pub use config::{ConnectorConfig, WebhookConfig};
pub use error::{ConnectorError, ConnectorResult};
pub use routes::{AppState, create_router};
