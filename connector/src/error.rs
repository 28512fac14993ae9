use thiserror::Error;

pub type ConnectorResult<T> = Result<T, ConnectorError>;

/// Operation-level failures of the RPC endpoint.
///
/// The `Display` rendering of each variant is the `error_message` the
/// caller sees in the `{success: false, error_message}` result envelope.
/// `InvalidApiKey` and `UnsupportedMethod` carry the exact wording the
/// caller's integration matches on.
#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("The API Key is invalid")]
    InvalidApiKey,

    #[error("That method is not supported")]
    UnsupportedMethod { method: String },

    #[error("Malformed request body: {reason}")]
    MalformedRequest { reason: String },

    #[error("Invalid params for {method}: {reason}")]
    InvalidParams { method: String, reason: String },

    #[error("Unknown object: {object_api_name}")]
    UnknownObject { object_api_name: String },

    #[error("Sync plan schema has no active identifier column")]
    MissingActiveIdentifier,

    #[error("Record {index} is missing key column: {column}")]
    RecordMissingKey { index: usize, column: String },

    #[error("The webhook destination is not configured")]
    WebhookNotConfigured,

    #[error("Configuration error: {message}")]
    Configuration { message: String }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_api_key_wording() {
        assert_eq!(
            ConnectorError::InvalidApiKey.to_string(),
            "The API Key is invalid"
        );
    }

    #[test]
    fn test_unsupported_method_wording() {
        let err = ConnectorError::UnsupportedMethod {
            method: "unknown_method".to_string()
        };
        assert_eq!(err.to_string(), "That method is not supported");
    }

    #[test]
    fn test_unknown_object_names_the_object() {
        let err = ConnectorError::UnknownObject {
            object_api_name: "contact".to_string()
        };
        assert!(err.to_string().contains("contact"));
    }
}
