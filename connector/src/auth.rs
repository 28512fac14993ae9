use axum::http::{HeaderMap, header::AUTHORIZATION};
use connector_core::ApiKeyValidator;

/// Query parameter Census sends the key in. The connector is configured
/// in Census as `http://myurl.example/census-custom-api?census-api-key=<token>`.
pub const API_KEY_PARAM: &str = "census-api-key";

/// Compares the presented key against a single configured key.
///
/// A connector configured without a key accepts every caller; that
/// mirrors disabled auth in local development.
#[derive(Debug, Clone)]
pub struct StaticKeyPolicy {
    key: Option<String>
}

impl StaticKeyPolicy {
    pub fn new(key: Option<String>) -> Self {
        Self { key }
    }
}

impl ApiKeyValidator for StaticKeyPolicy {
    fn authorize(&self, presented: Option<&str>) -> bool {
        match &self.key {
            None => true,
            Some(expected) => presented == Some(expected.as_str())
        }
    }
}

/// Fallback key transport for the health-check route, which has no query
/// contract with Census.
pub fn bearer_key(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
