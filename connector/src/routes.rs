use axum::{
    Json, Router,
    body::Bytes,
    extract::{Query, State},
    http::HeaderMap,
    routing::{get, post}
};
use connector_core::{ApiKeyValidator, Catalog, RecordSink};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use crate::auth::{self, API_KEY_PARAM};
use crate::error::{ConnectorError, ConnectorResult};
use crate::rpc::{self, ObjectParams, RpcRequest, RpcResponse, SyncBatchParams};
use crate::sync::BatchSync;
use crate::telemetry::Telemetry;

#[derive(Clone)]
pub struct AppState {
    pub policy: Arc<dyn ApiKeyValidator>,
    pub catalog: Arc<Catalog>,
    /// `None` until the deployment configures a webhook; `sync_batch`
    /// reports that as an operation error, everything else still works.
    pub sink: Option<Arc<dyn RecordSink>>
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route("/census-custom-api", post(rpc_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_handler() -> &'static str {
    "OK"
}

async fn metrics_handler() -> axum::response::Response<axum::body::Body> {
    let metrics_text = "# HELP connector_requests_total Total RPC requests\n# TYPE \
                        connector_requests_total counter\n\n# HELP connector_deliveries_total \
                        Records delivered to the webhook\n# TYPE connector_deliveries_total \
                        counter\n"
        .to_string();

    axum::response::Response::builder()
        .header("Content-Type", "text/plain")
        .body(axum::body::Body::from(metrics_text))
        .unwrap()
}

/// Health/auth check. Census pings this before saving the connector.
async fn root_handler(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap
) -> &'static str {
    let presented = query
        .get(API_KEY_PARAM)
        .map(String::as_str)
        .or_else(|| auth::bearer_key(&headers));

    if state.policy.authorize(presented) {
        "Welcome to microservice"
    } else {
        "Not authenticated"
    }
}

/// The sole RPC endpoint. Every path answers HTTP 200 with a
/// `{jsonrpc, id, result}` envelope; failures ride inside `result`.
async fn rpc_handler(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes
) -> Json<RpcResponse> {
    let envelope: Option<Value> = serde_json::from_slice(&body).ok();
    let (jsonrpc, id) = rpc::correlation_tokens(envelope.as_ref());

    let presented = query.get(API_KEY_PARAM).map(String::as_str);
    if !state.policy.authorize(presented) {
        Telemetry::record_rejected_key();
        warn!("Rejected RPC call with invalid API key");
        return Json(RpcResponse::failure(
            jsonrpc,
            id,
            &ConnectorError::InvalidApiKey.to_string()
        ));
    }

    let parsed = envelope
        .ok_or_else(|| ConnectorError::MalformedRequest {
            reason: "body is not valid JSON".to_string()
        })
        .and_then(RpcRequest::from_value);

    let request = match parsed {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "Rejected malformed RPC call");
            return Json(RpcResponse::failure(jsonrpc, id, &e.to_string()));
        }
    };

    match dispatch(&state, &request).await {
        Ok(result) => Json(RpcResponse::result(jsonrpc, id, result)),
        Err(e) => {
            warn!(method = %request.method, error = %e, "RPC operation failed");
            Json(RpcResponse::failure(jsonrpc, id, &e.to_string()))
        }
    }
}

async fn dispatch(state: &AppState, request: &RpcRequest) -> ConnectorResult<Value> {
    Telemetry::record_method(&request.method);
    debug!(method = %request.method, "Dispatching RPC method");

    match request.method.as_str() {
        "test_connection" => Ok(json!({"success": true})),
        "list_objects" => Ok(json!({"objects": state.catalog.object_descriptors()})),
        "list_fields" => {
            let params: ObjectParams = request.params_as("list_fields")?;
            let fields = state
                .catalog
                .fields_for(&params.object.object_api_name)
                .ok_or_else(|| ConnectorError::UnknownObject {
                    object_api_name: params.object.object_api_name.clone()
                })?;
            Ok(json!({"fields": fields}))
        }
        "supported_operations" => {
            let params: ObjectParams = request.params_as("supported_operations")?;
            let operations = state
                .catalog
                .operations_for(&params.object.object_api_name)
                .ok_or_else(|| ConnectorError::UnknownObject {
                    object_api_name: params.object.object_api_name.clone()
                })?;
            Ok(json!({"operations": operations}))
        }
        "get_sync_speed" => {
            let speed = state.catalog.sync_speed;
            Ok(json!({
                "maximum_batch_size": speed.maximum_batch_size,
                "maximum_parallel_batches": speed.maximum_parallel_batches,
                "maximum_records_per_second": speed.maximum_records_per_second
            }))
        }
        "sync_batch" => {
            let params: SyncBatchParams = request.params_as("sync_batch")?;
            let sink = state
                .sink
                .clone()
                .ok_or(ConnectorError::WebhookNotConfigured)?;
            let results = BatchSync::new(sink).sync_batch(&params).await?;
            Ok(json!({"record_results": results}))
        }
        other => Err(ConnectorError::UnsupportedMethod {
            method: other.to_string()
        })
    }
}
