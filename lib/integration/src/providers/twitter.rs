//! Twitter API v2: recent search and user timelines with an app-only token.

use crate::credential::{AuthScheme, CredentialKind};
use crate::descriptor::{Provider, ProviderDescriptor, detail_message, no_hint};
use crate::endpoints::{join, segment};
use crate::error::ProxyError;
use crate::proxy::{Prepared, ProviderAction, ProviderRequest, Upstream};
use crate::request::{TwitterRequest, require_credential, require_segment};
use crate::transport::UpstreamRequest;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value as JsonValue, json};

pub static TWITTER: ProviderDescriptor = ProviderDescriptor {
    provider: Provider::Twitter,
    auth: AuthScheme::Bearer,
    headers: &[],
    error_message: detail_message,
    status_hint: no_hint,
};

const DEFAULT_COUNT: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TwitterAction {
    Timeline { count: u32 },
    Trending { count: u32 },
    UserTweets { username: String, count: u32 },
}

impl ProviderRequest for TwitterRequest {
    type Action = TwitterAction;
    const PROVIDER: Provider = Provider::Twitter;

    fn prepare(self) -> Result<Prepared<TwitterAction>, ProxyError> {
        let credential = require_credential(self.bearer_token, CredentialKind::BearerToken)?;
        let count = self.count.unwrap_or(DEFAULT_COUNT);
        let action = match self.action.as_str() {
            "get_timeline" => TwitterAction::Timeline { count },
            "get_trending" => TwitterAction::Trending { count },
            "get_user_tweets" => TwitterAction::UserTweets {
                username: require_segment(self.username, "Username")?,
                count,
            },
            _ => {
                return Err(ProxyError::UnsupportedAction {
                    provider: TWITTER.label(),
                    action: self.action,
                });
            }
        };
        Ok(Prepared {
            descriptor: &TWITTER,
            credential,
            action,
        })
    }
}

/// A page of tweets; `data` is absent when there are none.
#[derive(Debug, Deserialize)]
struct TweetPage {
    #[serde(default)]
    data: Vec<JsonValue>,
}

#[derive(Debug, Deserialize)]
struct UserLookup {
    data: Option<User>,
}

#[derive(Debug, Deserialize)]
struct User {
    id: String,
}

async fn search_recent(
    upstream: &Upstream<'_>,
    query: &str,
    count: u32,
) -> Result<Vec<JsonValue>, ProxyError> {
    let request = UpstreamRequest::get(join(&upstream.endpoints().twitter, "tweets/search/recent"))
        .with_query("query", query)
        .with_query("max_results", count);
    let page: TweetPage = upstream.send_as(request).await?;
    Ok(page.data)
}

#[async_trait]
impl ProviderAction for TwitterAction {
    fn name(&self) -> &'static str {
        match self {
            Self::Timeline { .. } => "get_timeline",
            Self::Trending { .. } => "get_trending",
            Self::UserTweets { .. } => "get_user_tweets",
        }
    }

    async fn run(&self, upstream: &Upstream<'_>) -> Result<JsonValue, ProxyError> {
        let tweets = match self {
            Self::Timeline { count } => search_recent(upstream, "from:followed_user", *count).await?,
            Self::Trending { count } => search_recent(upstream, "trending", *count).await?,
            Self::UserTweets { username, count } => {
                let base = &upstream.endpoints().twitter;
                let lookup: UserLookup = upstream
                    .send_as(UpstreamRequest::get(join(
                        base,
                        &format!("users/by/username/{}", segment(username)),
                    )))
                    .await?;
                let user = lookup.data.ok_or_else(|| ProxyError::NotFound {
                    message: format!("Twitter user '{username}' not found"),
                })?;

                let page: TweetPage = upstream
                    .send_as(
                        UpstreamRequest::get(join(base, &format!("users/{}/tweets", segment(&user.id))))
                            .with_query("max_results", count),
                    )
                    .await?;

                return Ok(json!({
                    "action": "user_tweets",
                    "username": username,
                    "userId": user.id,
                    "count": page.data.len(),
                    "tweets": page.data,
                    "retrievedAt": upstream.now(),
                }));
            }
        };

        Ok(json!({
            "action": self.name(),
            "count": tweets.len(),
            "tweets": tweets,
            "retrievedAt": upstream.now(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;
    use crate::providers::test_support::{NOW, proxy};

    fn request(action: &str) -> TwitterRequest {
        TwitterRequest {
            action: action.to_string(),
            bearer_token: Some("AAAAbearer".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn trending_searches_recent_with_default_count() {
        let mock = MockTransport::new().on_json(
            "/tweets/search/recent",
            200,
            json!({"data": [{"id": "1", "text": "hello"}], "meta": {"result_count": 1}}),
        );
        let response = proxy(&mock).respond(request("get_trending")).await;

        assert_eq!(
            response.result.data,
            Some(json!({
                "action": "get_trending",
                "tweets": [{"id": "1", "text": "hello"}],
                "count": 1,
                "retrievedAt": NOW,
            }))
        );
        let calls = mock.calls();
        assert_eq!(calls[0].query_value("query"), Some("trending"));
        assert_eq!(calls[0].query_value("max_results"), Some("10"));
        assert_eq!(calls[0].header("Authorization"), Some("Bearer AAAAbearer"));
    }

    #[tokio::test]
    async fn empty_page_yields_zero_count() {
        let mock = MockTransport::new().on_json(
            "/tweets/search/recent",
            200,
            json!({"meta": {"result_count": 0}}),
        );
        let response = proxy(&mock).respond(request("get_timeline")).await;

        let data = response.result.data.expect("data");
        assert_eq!(data["count"], 0);
        assert_eq!(data["tweets"], json!([]));
    }

    #[tokio::test]
    async fn user_tweets_resolves_username_first() {
        let mock = MockTransport::new()
            .on_json("/users/by/username/jack", 200, json!({"data": {"id": "12", "username": "jack"}}))
            .on_json("/users/12/tweets", 200, json!({"data": [{"id": "20", "text": "just setting up"}]}));
        let response = proxy(&mock)
            .respond(TwitterRequest {
                username: Some("jack".to_string()),
                count: Some(5),
                ..request("get_user_tweets")
            })
            .await;

        assert_eq!(
            response.result.data,
            Some(json!({
                "action": "user_tweets",
                "username": "jack",
                "userId": "12",
                "tweets": [{"id": "20", "text": "just setting up"}],
                "count": 1,
                "retrievedAt": NOW,
            }))
        );
        let calls = mock.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].query_value("max_results"), Some("5"));
    }

    #[tokio::test]
    async fn failed_lookup_stops_the_chain() {
        let mock = MockTransport::new().on_json(
            "/users/by/username/",
            401,
            json!({"title": "Unauthorized", "detail": "Unauthorized", "status": 401}),
        );
        let response = proxy(&mock)
            .respond(TwitterRequest {
                username: Some("jack".to_string()),
                ..request("get_user_tweets")
            })
            .await;

        assert_eq!(response.status, 401);
        assert_eq!(response.result.error.as_deref(), Some("Twitter API error: Unauthorized"));
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn username_cannot_escape_its_path_segment() {
        let mock = MockTransport::new().on_json("/users/", 200, json!({}));
        proxy(&mock)
            .respond(TwitterRequest {
                username: Some("../../2/users/me?x=1".to_string()),
                ..request("get_user_tweets")
            })
            .await;

        let calls = mock.calls();
        assert_eq!(
            calls[0].url,
            "https://api.twitter.com/2/users/by/username/..%2F..%2F2%2Fusers%2Fme%3Fx%3D1"
        );
    }

    #[tokio::test]
    async fn dot_username_is_rejected_without_calls() {
        let mock = MockTransport::new();
        let response = proxy(&mock)
            .respond(TwitterRequest {
                username: Some("..".to_string()),
                ..request("get_user_tweets")
            })
            .await;

        assert_eq!(response.status, 400);
        assert_eq!(response.result.error.as_deref(), Some("Invalid Username"));
        assert_eq!(mock.call_count(), 0);
    }
}
