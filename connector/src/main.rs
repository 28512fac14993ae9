use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use census_connector::auth::StaticKeyPolicy;
use census_connector::webhook::WebhookSink;
use census_connector::{AppState, ConnectorConfig, create_router};
use connector_core::{Catalog, RecordSink};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting Census webhook connector");

    let config = ConnectorConfig::from_env();
    info!("Configuration loaded");

    if config.api_key.is_none() {
        warn!("CONNECTOR_API_KEY not set, accepting every caller");
    }

    let sink = WebhookSink::from_config(&config.webhook)?;
    if sink.is_none() {
        warn!("WEBHOOK_URL / SERVICE_AUTHORIZATION_TOKEN not set, sync_batch is disabled");
    }

    let state = AppState {
        policy: Arc::new(StaticKeyPolicy::new(config.api_key.clone())),
        catalog: Arc::new(Catalog::campaign_event()),
        sink: sink.map(|s| Arc::new(s) as Arc<dyn RecordSink>)
    };

    let app = create_router(state);

    let addr = config.socket_addr()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
