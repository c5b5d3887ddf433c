//! Error types for the webhook receivers.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::fmt;

/// Webhook delivery errors.
#[derive(Debug)]
pub enum WebhookError {
    /// The GitHub HMAC signature did not match the body.
    InvalidSignature,
    /// A Gmail verification request presented the wrong token.
    InvalidVerificationToken,
    /// The body was not the JSON shape the event requires.
    MalformedPayload { source: &'static str, reason: String },
}

impl fmt::Display for WebhookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSignature => write!(f, "Invalid signature"),
            Self::InvalidVerificationToken => write!(f, "Invalid verification token"),
            Self::MalformedPayload { source, reason } => {
                write!(f, "malformed {source} webhook payload: {reason}")
            }
        }
    }
}

impl std::error::Error for WebhookError {}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        match self {
            Self::InvalidSignature => {
                tracing::warn!("Rejected GitHub webhook with invalid signature");
                (StatusCode::FORBIDDEN, Json(json!({ "error": "Invalid signature" })))
                    .into_response()
            }
            Self::InvalidVerificationToken => {
                tracing::warn!("Rejected Gmail webhook verification token");
                (
                    StatusCode::FORBIDDEN,
                    Json(json!({ "error": "Invalid verification token" })),
                )
                    .into_response()
            }
            Self::MalformedPayload { source, reason } => {
                tracing::error!(source, error = %reason, "Webhook processing failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "success": false, "error": "Webhook processing failed" })),
                )
                    .into_response()
            }
        }
    }
}
