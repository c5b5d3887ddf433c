//! Gmail: send, read and search messages.

use crate::credential::{AuthScheme, CredentialKind};
use crate::descriptor::{Provider, ProviderDescriptor, nested_error_message, no_hint};
use crate::endpoints::{join, segment};
use crate::error::ProxyError;
use crate::proxy::{Prepared, ProviderAction, ProviderRequest, Upstream};
use crate::request::{GmailRequest, require, require_credential};
use crate::transport::UpstreamRequest;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use futures::future::join_all;
use serde::Deserialize;
use serde_json::{Value as JsonValue, json};

pub static GMAIL: ProviderDescriptor = ProviderDescriptor {
    provider: Provider::Gmail,
    auth: AuthScheme::Bearer,
    headers: &[],
    error_message: nested_error_message,
    status_hint: no_hint,
};

/// Messages listed per read or search.
const LIST_SIZE: u32 = 10;
/// Listed messages whose details are fetched.
const DETAIL_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GmailAction {
    Send {
        recipient: String,
        subject: String,
        message: String,
    },
    Read,
    Search {
        query: String,
    },
}

impl ProviderRequest for GmailRequest {
    type Action = GmailAction;
    const PROVIDER: Provider = Provider::Gmail;

    fn prepare(self) -> Result<Prepared<GmailAction>, ProxyError> {
        let credential = require_credential(self.access_token, CredentialKind::AccessToken)?;
        let action = match self.action.as_str() {
            "send" => GmailAction::Send {
                recipient: require(self.recipient, "Recipient")?,
                subject: require(self.subject, "Subject")?,
                message: require(self.message, "Message")?,
            },
            "read" => GmailAction::Read,
            "search" => GmailAction::Search {
                query: require(self.search_query, "Search query")?,
            },
            _ => {
                return Err(ProxyError::UnsupportedAction {
                    provider: GMAIL.label(),
                    action: self.action,
                });
            }
        };
        Ok(Prepared {
            descriptor: &GMAIL,
            credential,
            action,
        })
    }
}

/// Builds the base64url RFC 822 message Gmail expects in `raw`.
fn encode_message(recipient: &str, subject: &str, message: &str) -> String {
    let email = format!("To: {recipient}\nSubject: {subject}\n\n{message}");
    URL_SAFE.encode(email)
}

#[derive(Debug, Deserialize)]
struct SentMessage {
    id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct MessageList {
    #[serde(default)]
    messages: Vec<MessageRef>,
}

#[derive(Debug, Deserialize)]
struct MessageRef {
    id: String,
}

#[derive(Debug, Default, Deserialize)]
struct MessageDetail {
    payload: Option<Payload>,
    snippet: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Payload {
    #[serde(default)]
    headers: Vec<Header>,
}

#[derive(Debug, Deserialize)]
struct Header {
    name: String,
    value: String,
}

impl MessageDetail {
    fn header(&self, name: &str) -> Option<&str> {
        self.payload
            .as_ref()?
            .headers
            .iter()
            .find(|header| header.name == name)
            .map(|header| header.value.as_str())
    }
}

/// Lists messages, then fetches up to five of them concurrently.
///
/// Detail fetches that fail are dropped from the result.
async fn summaries(
    upstream: &Upstream<'_>,
    query: Option<&str>,
) -> Result<Vec<JsonValue>, ProxyError> {
    let base = &upstream.endpoints().gmail;
    let mut list = UpstreamRequest::get(join(base, "messages"));
    if let Some(query) = query {
        list = list.with_query("q", query);
    }
    let list: MessageList = upstream
        .send_as(list.with_query("maxResults", LIST_SIZE))
        .await?;

    let details = list.messages.iter().take(DETAIL_LIMIT).map(|message| async move {
        let detail = upstream
            .send_as::<MessageDetail>(UpstreamRequest::get(join(
                base,
                &format!("messages/{}", segment(&message.id)),
            )))
            .await
            .ok()?;
        Some(json!({
            "id": message.id,
            "subject": detail.header("Subject").unwrap_or("No Subject"),
            "from": detail.header("From").unwrap_or("Unknown"),
            "date": detail.header("Date").map_or_else(|| upstream.now(), str::to_string),
            "snippet": detail.snippet.as_deref().unwrap_or("No content"),
        }))
    });

    Ok(join_all(details).await.into_iter().flatten().collect())
}

#[async_trait]
impl ProviderAction for GmailAction {
    fn name(&self) -> &'static str {
        match self {
            Self::Send { .. } => "send",
            Self::Read => "read",
            Self::Search { .. } => "search",
        }
    }

    async fn run(&self, upstream: &Upstream<'_>) -> Result<JsonValue, ProxyError> {
        match self {
            Self::Send {
                recipient,
                subject,
                message,
            } => {
                let request = UpstreamRequest::post(join(&upstream.endpoints().gmail, "messages/send"))
                    .with_json(json!({ "raw": encode_message(recipient, subject, message) }));
                let sent: SentMessage = upstream.send_as(request).await?;
                Ok(json!({
                    "messageId": sent.id,
                    "recipient": recipient,
                    "subject": subject,
                    "sentAt": upstream.now(),
                }))
            }
            Self::Read => {
                let emails = summaries(upstream, None).await?;
                Ok(json!({ "emails": emails }))
            }
            Self::Search { query } => {
                let results = summaries(upstream, Some(query)).await?;
                Ok(json!({ "query": query, "results": results }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;
    use crate::providers::test_support::{NOW, proxy};

    fn send_request() -> GmailRequest {
        GmailRequest {
            action: "send".to_string(),
            recipient: Some("ada@example.com".to_string()),
            subject: Some("Status".to_string()),
            message: Some("All green".to_string()),
            access_token: Some("ya29.token".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn send_posts_raw_message_and_reports_id() {
        let mock = MockTransport::new().on_json("/messages/send", 200, json!({"id": "msg-1"}));
        let response = proxy(&mock).respond(send_request()).await;

        assert_eq!(response.status, 200);
        assert_eq!(
            response.result.data,
            Some(json!({
                "messageId": "msg-1",
                "recipient": "ada@example.com",
                "subject": "Status",
                "sentAt": NOW,
            }))
        );

        let calls = mock.calls();
        let call = &calls[0];
        assert_eq!(call.header("Authorization"), Some("Bearer ya29.token"));
        let raw = call
            .json_body()
            .and_then(|body| body["raw"].as_str())
            .expect("raw field");
        let decoded = URL_SAFE.decode(raw).expect("base64url");
        assert_eq!(
            String::from_utf8(decoded).expect("utf8"),
            "To: ada@example.com\nSubject: Status\n\nAll green"
        );
    }

    #[tokio::test]
    async fn send_requires_subject() {
        let mock = MockTransport::new();
        let response = proxy(&mock)
            .respond(GmailRequest {
                subject: None,
                ..send_request()
            })
            .await;

        assert_eq!(response.status, 400);
        assert_eq!(response.result.error.as_deref(), Some("Subject is required"));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn read_fetches_first_five_details_and_drops_failures() {
        let ids: Vec<_> = (1..=7).map(|i| json!({"id": format!("m{i}")})).collect();
        let mut mock = MockTransport::new()
            .on_json("/messages", 200, json!({"messages": ids}))
            .on_json("/messages/m2", 500, json!({"error": {"message": "boom"}}));
        for id in ["m1", "m3", "m4", "m5"] {
            mock = mock.on_json(
                format!("/messages/{id}"),
                200,
                json!({
                    "id": id,
                    "snippet": "hello",
                    "payload": {"headers": [
                        {"name": "Subject", "value": "Hi"},
                        {"name": "From", "value": "bob@example.com"}
                    ]}
                }),
            );
        }

        let response = proxy(&mock)
            .respond(GmailRequest {
                action: "read".to_string(),
                access_token: Some("ya29.token".to_string()),
                ..Default::default()
            })
            .await;

        assert_eq!(response.status, 200);
        let data = response.result.data.expect("data");
        let emails = data["emails"].as_array().expect("emails");
        assert_eq!(emails.len(), 4);
        assert_eq!(
            emails[0],
            json!({
                "id": "m1",
                "subject": "Hi",
                "from": "bob@example.com",
                "date": NOW,
                "snippet": "hello",
            })
        );
        // One list call plus five detail calls; m6 and m7 are never fetched.
        assert_eq!(mock.call_count(), 6);
        assert_eq!(mock.calls()[0].query_value("maxResults"), Some("10"));
    }

    #[tokio::test]
    async fn search_passes_query_and_tolerates_empty_mailbox() {
        let mock = MockTransport::new().on_json("/messages", 200, json!({"resultSizeEstimate": 0}));
        let response = proxy(&mock)
            .respond(GmailRequest {
                action: "search".to_string(),
                search_query: Some("from:ci".to_string()),
                access_token: Some("ya29.token".to_string()),
                ..Default::default()
            })
            .await;

        assert_eq!(
            response.result.data,
            Some(json!({"query": "from:ci", "results": []}))
        );
        assert_eq!(mock.calls()[0].query_value("q"), Some("from:ci"));
    }
}
