//! The uniform response envelope.
//!
//! Every proxy endpoint and every client helper answers with
//! `{ "success": bool, "data"?: ..., "error"?: "..." }` regardless of provider.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// The result of one provider action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResult {
    /// Whether the action succeeded.
    pub success: bool,
    /// Provider-shaped payload (if successful).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<JsonValue>,
    /// Error message (if failed).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ActionResult {
    /// Creates a successful result.
    #[must_use]
    pub fn success(data: JsonValue) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Creates a failed result.
    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

/// An envelope paired with the HTTP status the proxy answers with.
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyResponse {
    /// HTTP status code.
    pub status: u16,
    /// The envelope body.
    pub result: ActionResult,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_omits_error_field() {
        let body = serde_json::to_value(ActionResult::success(json!({"messageId": "1"})))
            .expect("serialize");
        assert_eq!(body, json!({"success": true, "data": {"messageId": "1"}}));
    }

    #[test]
    fn failure_omits_data_field() {
        let body = serde_json::to_value(ActionResult::failure("Bot token is required"))
            .expect("serialize");
        assert_eq!(
            body,
            json!({"success": false, "error": "Bot token is required"})
        );
    }

    #[test]
    fn parses_envelope_without_optional_fields() {
        let parsed: ActionResult =
            serde_json::from_value(json!({"success": false})).expect("deserialize");
        assert!(!parsed.success);
        assert!(parsed.data.is_none());
        assert!(parsed.error.is_none());
    }
}
