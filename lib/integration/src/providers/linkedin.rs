//! LinkedIn UGC posts.

use crate::credential::{AuthScheme, CredentialKind};
use crate::descriptor::{Provider, ProviderDescriptor, no_hint, top_level_message};
use crate::endpoints::join;
use crate::error::ProxyError;
use crate::proxy::{Prepared, ProviderAction, ProviderRequest, Upstream};
use crate::request::{LinkedinRequest, require, require_credential};
use crate::transport::UpstreamRequest;
use async_trait::async_trait;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::{Value as JsonValue, json};

pub static LINKEDIN: ProviderDescriptor = ProviderDescriptor {
    provider: Provider::Linkedin,
    auth: AuthScheme::Bearer,
    headers: &[("X-Restli-Protocol-Version", "2.0.0")],
    error_message: top_level_message,
    status_hint: no_hint,
};

/// Characters left alone by URI component encoding.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkedinAction {
    CreatePost { author_urn: String, text: String },
    ProfilePosts { author_urn: String },
}

impl ProviderRequest for LinkedinRequest {
    type Action = LinkedinAction;
    const PROVIDER: Provider = Provider::Linkedin;

    fn prepare(self) -> Result<Prepared<LinkedinAction>, ProxyError> {
        let credential = require_credential(self.access_token, CredentialKind::AccessToken)?;
        let action = match self.action.as_str() {
            "create_post" => LinkedinAction::CreatePost {
                author_urn: require(self.author_urn, "authorUrn")?,
                text: require(self.text, "text")?,
            },
            "get_profile_posts" => LinkedinAction::ProfilePosts {
                author_urn: require(self.author_urn, "authorUrn")?,
            },
            _ => {
                return Err(ProxyError::UnsupportedAction {
                    provider: LINKEDIN.label(),
                    action: self.action,
                });
            }
        };
        Ok(Prepared {
            descriptor: &LINKEDIN,
            credential,
            action,
        })
    }
}

/// Rest.li list syntax can't go through ordinary query encoding: the parens
/// must stay literal while the URN inside them is escaped.
fn profile_posts_url(base: &str, author_urn: &str) -> String {
    let urn = utf8_percent_encode(author_urn, URI_COMPONENT);
    format!(
        "{}?q=authors&authors=List({urn})&sortBy=LAST_MODIFIED&count=10",
        join(base, "ugcPosts")
    )
}

#[async_trait]
impl ProviderAction for LinkedinAction {
    fn name(&self) -> &'static str {
        match self {
            Self::CreatePost { .. } => "create_post",
            Self::ProfilePosts { .. } => "get_profile_posts",
        }
    }

    async fn run(&self, upstream: &Upstream<'_>) -> Result<JsonValue, ProxyError> {
        let base = &upstream.endpoints().linkedin;
        let request = match self {
            Self::CreatePost { author_urn, text } => UpstreamRequest::post(join(base, "ugcPosts"))
                .with_json(json!({
                    "author": author_urn,
                    "lifecycleState": "PUBLISHED",
                    "specificContent": {
                        "com.linkedin.ugc.ShareContent": {
                            "shareCommentary": { "text": text },
                            "shareMediaCategory": "NONE",
                        },
                    },
                    "visibility": { "com.linkedin.ugc.MemberNetworkVisibility": "PUBLIC" },
                })),
            Self::ProfilePosts { author_urn } => {
                UpstreamRequest::get(profile_posts_url(base, author_urn))
            }
        };
        let result = upstream.send(request).await?;
        Ok(json!({ "action": self.name(), "result": result }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;
    use crate::providers::test_support::proxy;

    fn request(action: &str) -> LinkedinRequest {
        LinkedinRequest {
            action: action.to_string(),
            author_urn: Some("urn:li:person:abc123".to_string()),
            access_token: Some("AQV-linkedin-token".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn profile_posts_url_escapes_urn_inside_list() {
        assert_eq!(
            profile_posts_url("https://api.linkedin.com/v2", "urn:li:person:abc123"),
            "https://api.linkedin.com/v2/ugcPosts?q=authors&authors=List(urn%3Ali%3Aperson%3Aabc123)&sortBy=LAST_MODIFIED&count=10"
        );
    }

    #[tokio::test]
    async fn create_post_sends_restli_header_and_wraps_result() {
        let mock = MockTransport::new().on_json(
            "/v2/ugcPosts",
            201,
            json!({"id": "urn:li:share:1"}),
        );
        let response = proxy(&mock)
            .respond(LinkedinRequest {
                text: Some("Shipped!".to_string()),
                ..request("create_post")
            })
            .await;

        assert_eq!(
            response.result.data,
            Some(json!({"action": "create_post", "result": {"id": "urn:li:share:1"}}))
        );
        let calls = mock.calls();
        assert_eq!(calls[0].header("X-Restli-Protocol-Version"), Some("2.0.0"));
        assert_eq!(
            calls[0].json_body().map(|body| &body["specificContent"]["com.linkedin.ugc.ShareContent"]["shareCommentary"]["text"]),
            Some(&json!("Shipped!"))
        );
    }

    #[tokio::test]
    async fn create_post_requires_text() {
        let mock = MockTransport::new();
        let response = proxy(&mock).respond(request("create_post")).await;

        assert_eq!(response.result.error.as_deref(), Some("text is required"));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn upstream_message_field_is_reported() {
        let mock = MockTransport::new().on_json(
            "/v2/ugcPosts",
            403,
            json!({"serviceErrorCode": 100, "message": "Not enough permissions", "status": 403}),
        );
        let response = proxy(&mock).respond(request("get_profile_posts")).await;

        assert_eq!(response.status, 403);
        assert_eq!(
            response.result.error.as_deref(),
            Some("LinkedIn API error: Not enough permissions")
        );
    }
}
