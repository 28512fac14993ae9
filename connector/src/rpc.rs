//! Wire types for the JSON-RPC-style envelope Census speaks.
//!
//! `jsonrpc` and `id` are correlation tokens owned by the caller: the
//! connector never interprets them, it echoes them back verbatim in every
//! response, whatever JSON type they arrived as.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::{ConnectorError, ConnectorResult};

#[derive(Debug, Clone, Deserialize)]
struct RawEnvelope {
    #[serde(default)]
    jsonrpc: Value,
    #[serde(default)]
    id: Value,
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    params: Value
}

/// A parsed inbound call.
#[derive(Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: Value,
    pub id: Value,
    pub method: String,
    pub params: Value
}

impl RpcRequest {
    pub fn from_value(envelope: Value) -> ConnectorResult<Self> {
        let raw: RawEnvelope =
            serde_json::from_value(envelope).map_err(|e| ConnectorError::MalformedRequest {
                reason: e.to_string()
            })?;

        let method = raw.method.ok_or_else(|| ConnectorError::MalformedRequest {
            reason: "missing method".to_string()
        })?;

        Ok(Self {
            jsonrpc: raw.jsonrpc,
            id: raw.id,
            method,
            params: raw.params
        })
    }

    /// Deserializes `params` into the shape `method` expects.
    pub fn params_as<T: DeserializeOwned>(&self, method: &str) -> ConnectorResult<T> {
        serde_json::from_value(self.params.clone()).map_err(|e| ConnectorError::InvalidParams {
            method: method.to_string(),
            reason: e.to_string()
        })
    }
}

/// Pulls the correlation tokens out of a request body that may not be a
/// well-formed envelope, so even rejections echo what the caller sent.
pub fn correlation_tokens(envelope: Option<&Value>) -> (Value, Value) {
    let jsonrpc = envelope
        .and_then(|v| v.get("jsonrpc"))
        .cloned()
        .unwrap_or(Value::Null);
    let id = envelope
        .and_then(|v| v.get("id"))
        .cloned()
        .unwrap_or(Value::Null);
    (jsonrpc, id)
}

/// The response envelope: `{jsonrpc, id, result}`, HTTP 200 on every path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcResponse {
    pub jsonrpc: Value,
    pub id: Value,
    pub result: Value
}

impl RpcResponse {
    pub fn result(jsonrpc: Value, id: Value, result: Value) -> Self {
        Self {
            jsonrpc,
            id,
            result
        }
    }

    pub fn failure(jsonrpc: Value, id: Value, error_message: &str) -> Self {
        Self {
            jsonrpc,
            id,
            result: serde_json::json!({
                "success": false,
                "error_message": error_message
            })
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectParams {
    pub object: ObjectRef
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectRef {
    pub object_api_name: String
}

#[derive(Debug, Clone, Deserialize)]
pub struct SyncBatchParams {
    pub sync_plan: SyncPlan,
    #[serde(default)]
    pub records: Vec<Value>
}

/// Caller-supplied description of what a `sync_batch` call targets.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncPlan {
    pub operation: String,
    pub object: ObjectRef,
    pub schema: BTreeMap<String, SchemaColumn>
}

#[derive(Debug, Clone, Deserialize)]
pub struct SchemaColumn {
    #[serde(default)]
    pub active_identifier: bool,
    pub field: FieldType
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldType {
    #[serde(rename = "type")]
    pub field_type: String
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_full_envelope() {
        let request = RpcRequest::from_value(json!({
            "jsonrpc": "1.0",
            "id": 42,
            "method": "test_connection",
            "params": {}
        }))
        .unwrap();

        assert_eq!(request.jsonrpc, json!("1.0"));
        assert_eq!(request.id, json!(42));
        assert_eq!(request.method, "test_connection");
    }

    #[test]
    fn test_missing_method_is_malformed() {
        let err = RpcRequest::from_value(json!({"jsonrpc": "1.0", "id": 1})).unwrap_err();
        assert!(matches!(err, ConnectorError::MalformedRequest { .. }));
        assert!(err.to_string().contains("method"));
    }

    #[test]
    fn test_string_id_survives_roundtrip() {
        let request = RpcRequest::from_value(json!({
            "jsonrpc": "1.0",
            "id": "abc-123",
            "method": "test_connection"
        }))
        .unwrap();

        let response = RpcResponse::result(request.jsonrpc, request.id, json!({"success": true}));
        let body = serde_json::to_value(&response).unwrap();
        assert_eq!(body["id"], json!("abc-123"));
        assert_eq!(body["jsonrpc"], json!("1.0"));
    }

    #[test]
    fn test_correlation_tokens_from_partial_body() {
        let body = json!({"id": 7, "garbage": true});
        let (jsonrpc, id) = correlation_tokens(Some(&body));
        assert_eq!(jsonrpc, Value::Null);
        assert_eq!(id, json!(7));

        let (jsonrpc, id) = correlation_tokens(None);
        assert_eq!(jsonrpc, Value::Null);
        assert_eq!(id, Value::Null);
    }

    #[test]
    fn test_failure_envelope_shape() {
        let response = RpcResponse::failure(json!("1.0"), json!(1), "The API Key is invalid");
        let body = serde_json::to_value(&response).unwrap();
        assert_eq!(body["result"]["success"], json!(false));
        assert_eq!(
            body["result"]["error_message"],
            json!("The API Key is invalid")
        );
    }

    #[test]
    fn test_sync_batch_params_parse() {
        let params: SyncBatchParams = serde_json::from_value(json!({
            "sync_plan": {
                "operation": "append",
                "object": {"object_api_name": "campaign-event"},
                "schema": {
                    "email": {"active_identifier": false, "field": {"type": "string"}},
                    "unique_identifier": {"active_identifier": true, "field": {"type": "string"}}
                }
            },
            "records": [{"email": "a@b.com", "unique_identifier": "123"}]
        }))
        .unwrap();

        assert_eq!(params.sync_plan.operation, "append");
        assert_eq!(params.sync_plan.object.object_api_name, "campaign-event");
        assert!(params.sync_plan.schema["unique_identifier"].active_identifier);
        assert_eq!(
            params.sync_plan.schema["email"].field.field_type,
            "string"
        );
        assert_eq!(params.records.len(), 1);
    }
}
