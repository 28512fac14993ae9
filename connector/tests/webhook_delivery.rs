use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode}
};
use census_connector::auth::StaticKeyPolicy;
use census_connector::webhook::WebhookSink;
use census_connector::{AppState, create_router};
use connector_core::{Catalog, RecordSink, SinkError};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SERVICE_TOKEN: &str = "svc-token";

fn sink_for(server: &MockServer) -> WebhookSink {
    WebhookSink::new(&server.uri(), SERVICE_TOKEN, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_delivers_record_with_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .and(header("Authorization", SERVICE_TOKEN))
        .and(header("Content-Type", "application/json"))
        .and(body_json(
            json!({"email": "a@b.com", "data": {"census_unique_identifier": "123"}})
        ))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let sink = sink_for(&mock_server);
    sink.deliver(&json!({"email": "a@b.com", "data": {"census_unique_identifier": "123"}}))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_non_success_status_is_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let sink = sink_for(&mock_server);
    let err = sink.deliver(&json!({"email": "a@b.com"})).await.unwrap_err();

    assert!(matches!(err, SinkError::Rejected { status: 500 }));
}

#[tokio::test]
async fn test_unreachable_webhook_is_a_transport_error() {
    // Bind-then-drop leaves a port with no listener.
    let mock_server = MockServer::start().await;
    let uri = mock_server.uri();
    drop(mock_server);

    let sink = WebhookSink::new(&uri, SERVICE_TOKEN, Duration::from_secs(1)).unwrap();
    let err = sink.deliver(&json!({"email": "a@b.com"})).await.unwrap_err();
    eprintln!("DIAGNOSTIC err = {err:?}");
    assert!(matches!(err, SinkError::Transport { .. }));
}

fn app(sink: WebhookSink) -> Router {
    create_router(AppState {
        policy: Arc::new(StaticKeyPolicy::new(Some("S3CR3TT0K3N".to_string()))),
        catalog: Arc::new(Catalog::campaign_event()),
        sink: Some(Arc::new(sink) as Arc<dyn RecordSink>)
    })
}

#[tokio::test]
async fn test_sync_batch_end_to_end_posts_once_per_record() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .and(header("Authorization", SERVICE_TOKEN))
        .and(body_json(
            json!({"email": "a@b.com", "data": {"census_unique_identifier": "123"}})
        ))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let envelope = json!({
        "jsonrpc": "1.0",
        "id": 1,
        "method": "sync_batch",
        "params": {
            "sync_plan": {
                "operation": "append",
                "object": {"object_api_name": "campaign-event"},
                "schema": {
                    "email": {"active_identifier": false, "field": {"type": "string"}},
                    "unique_identifier": {"active_identifier": true, "field": {"type": "string"}}
                }
            },
            "records": [{"email": "a@b.com", "unique_identifier": "123"}]
        }
    });

    let response = app(sink_for(&mock_server))
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/census-custom-api?census-api-key=S3CR3TT0K3N")
                .header("content-type", "application/json")
                .body(Body::from(envelope.to_string()))
                .unwrap()
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(
        body["result"]["record_results"],
        json!([{"identifier": "123", "success": true}])
    );
}
