//! `POST /api/webhooks/gmail`.

use super::{ChallengeQuery, WebhookAck, event_type, parse, parse_body, probe_response};
use crate::app::AppState;
use crate::config::WebhookConfig;
use crate::error::WebhookError;
use axum::Json;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::response::Response;
use nodeflow_core::WebhookDeliveryId;
use serde::Deserialize;
use tracing::info;

const SOURCE: &str = "gmail";

#[derive(Debug, Deserialize)]
struct EmailData {
    #[serde(default)]
    from: Option<String>,
    #[serde(default)]
    subject: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewEmail {
    email_data: EmailData,
}

/// Handles one delivery.
///
/// Verification requests must present the configured token. With no token
/// configured, every verification request is refused.
pub(crate) fn process(
    config: &WebhookConfig,
    delivery: &WebhookDeliveryId,
    body: &[u8],
) -> Result<WebhookAck, WebhookError> {
    let payload = parse_body(SOURCE, body)?;
    match event_type(&payload).as_deref() {
        Some("verification") => {
            let token = payload.get("token").and_then(serde_json::Value::as_str);
            let expected = config
                .gmail_verification_token
                .as_deref()
                .filter(|t| !t.is_empty());
            match (expected, token) {
                (Some(expected), Some(token)) if expected == token => {
                    info!(%delivery, "Gmail push subscription verified");
                    Ok(WebhookAck {
                        success: true,
                        message: None,
                        triggered: None,
                    })
                }
                _ => Err(WebhookError::InvalidVerificationToken),
            }
        }
        Some("new_email") => {
            let NewEmail { email_data } = parse(SOURCE, payload)?;
            info!(
                %delivery,
                from = email_data.from.as_deref().unwrap_or_default(),
                subject = email_data.subject.as_deref().unwrap_or_default(),
                "New Gmail message"
            );
            Ok(WebhookAck::triggered("Gmail webhook processed"))
        }
        _ => Ok(WebhookAck::received("Webhook received")),
    }
}

pub async fn receive(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<WebhookAck>, WebhookError> {
    process(&state.webhooks, &WebhookDeliveryId::new(), &body).map(Json)
}

pub async fn probe(Query(query): Query<ChallengeQuery>) -> Response {
    probe_response("Gmail", query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value as JsonValue, json};

    fn config(token: Option<&str>) -> WebhookConfig {
        WebhookConfig {
            gmail_verification_token: token.map(str::to_string),
            ..Default::default()
        }
    }

    fn run(config: &WebhookConfig, body: &JsonValue) -> Result<WebhookAck, WebhookError> {
        let bytes = serde_json::to_vec(body).expect("encode");
        process(config, &WebhookDeliveryId::new(), &bytes)
    }

    #[test]
    fn matching_verification_token_is_accepted() {
        let ack = run(
            &config(Some("tok-123")),
            &json!({"type": "verification", "token": "tok-123"}),
        )
        .expect("verified");

        assert_eq!(
            serde_json::to_value(ack).expect("serialize"),
            json!({"success": true})
        );
    }

    #[test]
    fn wrong_verification_token_is_refused() {
        let err = run(
            &config(Some("tok-123")),
            &json!({"type": "verification", "token": "guess"}),
        )
        .expect_err("refused");
        assert!(matches!(err, WebhookError::InvalidVerificationToken));
    }

    #[test]
    fn non_string_verification_token_is_refused() {
        let err = run(
            &config(Some("5")),
            &json!({"type": "verification", "token": 5}),
        )
        .expect_err("refused");
        assert!(matches!(err, WebhookError::InvalidVerificationToken));
    }

    #[test]
    fn verification_without_configured_token_is_refused() {
        let err = run(&config(None), &json!({"type": "verification"})).expect_err("refused");
        assert!(matches!(err, WebhookError::InvalidVerificationToken));
    }

    #[test]
    fn new_email_is_triggered() {
        let ack = run(
            &config(None),
            &json!({
                "type": "new_email",
                "emailData": {"from": "alice@example.com", "subject": "Invoice"}
            }),
        )
        .expect("processed");

        assert_eq!(ack, WebhookAck::triggered("Gmail webhook processed"));
    }

    #[test]
    fn new_email_without_data_is_malformed() {
        let err = run(&config(None), &json!({"type": "new_email"})).expect_err("malformed");
        assert!(matches!(err, WebhookError::MalformedPayload { .. }));
    }

    #[test]
    fn non_string_type_is_received() {
        let ack = run(&config(None), &json!({"type": 5})).expect("processed");
        assert_eq!(ack, WebhookAck::received("Webhook received"));
    }

    #[test]
    fn other_types_are_received() {
        let ack = run(&config(None), &json!({"type": "label_changed"})).expect("processed");
        assert_eq!(ack, WebhookAck::received("Webhook received"));
    }
}
