//! Inbound webhook receivers.
//!
//! Receivers authenticate and log deliveries, then acknowledge them. They do
//! not start any node executions.

pub mod github;
pub mod gmail;
pub mod signature;
pub mod youtube;

use crate::error::WebhookError;
use axum::Json;
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Acknowledgement body for an accepted delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookAck {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub triggered: Option<bool>,
}

impl WebhookAck {
    /// A plain acknowledgement.
    #[must_use]
    pub fn received(message: &'static str) -> Self {
        Self {
            success: true,
            message: Some(message),
            triggered: None,
        }
    }

    /// An acknowledgement for an event a trigger node would fire on.
    #[must_use]
    pub fn triggered(message: &'static str) -> Self {
        Self {
            triggered: Some(true),
            ..Self::received(message)
        }
    }
}

/// Query parameters on a subscription probe.
#[derive(Debug, Default, Deserialize)]
pub struct ChallengeQuery {
    pub challenge: Option<String>,
}

/// JSON description of a webhook URL.
pub(crate) fn describe(source: &str) -> Response {
    Json(json!({ "message": format!("{source} webhook endpoint") })).into_response()
}

/// Answers a subscription probe.
///
/// A non-empty `challenge` is echoed back as plain text.
pub(crate) fn probe_response(source: &str, query: ChallengeQuery) -> Response {
    match query.challenge.filter(|c| !c.is_empty()) {
        Some(challenge) => challenge.into_response(),
        None => describe(source),
    }
}

/// Deserializes a delivery body, or part of one.
pub(crate) fn parse<T: DeserializeOwned>(
    source: &'static str,
    value: serde_json::Value,
) -> Result<T, WebhookError> {
    serde_json::from_value(value).map_err(|e| WebhookError::MalformedPayload {
        source,
        reason: e.to_string(),
    })
}

/// Parses a raw body as JSON.
pub(crate) fn parse_body(
    source: &'static str,
    body: &[u8],
) -> Result<serde_json::Value, WebhookError> {
    serde_json::from_slice(body).map_err(|e| WebhookError::MalformedPayload {
        source,
        reason: e.to_string(),
    })
}

/// The `type` discriminator used by Gmail and YouTube deliveries.
///
/// Anything other than a string counts as no type.
pub(crate) fn event_type(payload: &serde_json::Value) -> Option<String> {
    payload
        .get("type")
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned)
}
