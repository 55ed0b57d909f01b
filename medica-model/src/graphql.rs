//! GraphQL request/response envelopes.
//!
//! Operation documents themselves are opaque strings; the model only knows
//! the transport envelope: a `query`/`variables` POST body and a
//! `data`/`errors` response where machine-readable failure classes travel in
//! `errors[].extensions.code`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Well-known `extensions.code` values emitted by the backend.
pub mod code {
    /// The access token was missing, expired, or revoked.
    pub const UNAUTHENTICATED: &str = "UNAUTHENTICATED";
    /// Generic server fault. Never treated as a session problem.
    pub const INTERNAL_SERVER_ERROR: &str = "INTERNAL_SERVER_ERROR";
    /// Validation/business-rule rejection of the supplied variables.
    pub const BAD_USER_INPUT: &str = "BAD_USER_INPUT";
}

/// Standard GraphQL request envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphqlRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
    pub variables: Value,
}

/// `extensions` object attached to a GraphQL error entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GraphqlErrorExtensions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// One entry of the response `errors` array.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GraphqlError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<GraphqlErrorExtensions>,
}

impl GraphqlError {
    pub fn code(&self) -> Option<&str> {
        self.extensions.as_ref()?.code.as_deref()
    }

    pub fn is_unauthenticated(&self) -> bool {
        self.code() == Some(code::UNAUTHENTICATED)
    }
}

impl std::fmt::Display for GraphqlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.code() {
            Some(code) => write!(f, "{} ({code})", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Standard GraphQL response envelope, decoded before any operation-specific
/// payload is extracted.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphqlResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Vec<GraphqlError>,
}

impl GraphqlResponse {
    /// True when any error entry carries the given `extensions.code`.
    pub fn has_code(&self, code: &str) -> bool {
        self.errors.iter().any(|e| e.code() == Some(code))
    }

    /// Extracts the named root field from `data`, treating JSON `null` the
    /// same as an absent field.
    pub fn take_field(self, field: &str) -> Option<Value> {
        let mut data = self.data?;
        let value = data.get_mut(field)?.take();
        if value.is_null() { None } else { Some(value) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unauthenticated_error_is_detected() {
        let raw = r#"{
            "data": null,
            "errors": [
                {
                    "message": "jwt expired",
                    "extensions": { "code": "UNAUTHENTICATED" }
                }
            ]
        }"#;

        let response: GraphqlResponse = serde_json::from_str(raw).unwrap();
        assert!(response.has_code(code::UNAUTHENTICATED));
        assert!(!response.has_code(code::BAD_USER_INPUT));
        assert!(response.errors[0].is_unauthenticated());
    }

    #[test]
    fn take_field_extracts_root_payload() {
        let response: GraphqlResponse = serde_json::from_value(json!({
            "data": { "login": { "accessToken": "T1" } }
        }))
        .unwrap();
        let field = response.take_field("login").unwrap();
        assert_eq!(field["accessToken"], "T1");
    }

    #[test]
    fn take_field_treats_null_as_missing() {
        let response: GraphqlResponse = serde_json::from_value(json!({
            "data": { "getUser": null }
        }))
        .unwrap();
        assert!(response.take_field("getUser").is_none());
    }

    #[test]
    fn request_skips_absent_operation_name() {
        let request = GraphqlRequest {
            query: "query Q { me }".to_string(),
            operation_name: None,
            variables: json!({}),
        };
        let encoded = serde_json::to_value(&request).unwrap();
        assert!(encoded.get("operationName").is_none());
    }
}
