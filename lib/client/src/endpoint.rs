//! Ways of reaching the proxy.

use crate::error::ClientError;
use async_trait::async_trait;
use nodeflow_integration::{ActionRequest, ActionResult, Proxy};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::debug;

/// Something that turns an [`ActionRequest`] into an envelope.
#[async_trait]
pub trait ProxyEndpoint: Send + Sync {
    /// Sends `request` to the proxy and returns its envelope as-is.
    ///
    /// A failure envelope is an `Ok`; errors mean no envelope was obtained.
    async fn call(
        &self,
        request: &ActionRequest,
    ) -> nodeflow_core::Result<ActionResult, ClientError>;
}

/// Reaches a proxy server over HTTP.
#[derive(Debug, Clone)]
pub struct HttpProxyEndpoint {
    client: reqwest::Client,
    base_url: String,
}

impl HttpProxyEndpoint {
    /// Creates an endpoint for the server at `base_url` (e.g. `http://127.0.0.1:3000`).
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Creates an endpoint around an existing client.
    #[must_use]
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// URL of the proxy route for `request`.
    #[must_use]
    pub fn route_for(&self, request: &ActionRequest) -> String {
        format!(
            "{}/api/{}",
            self.base_url.trim_end_matches('/'),
            request.provider()
        )
    }
}

/// The provider body of a tagged request, i.e. what the route expects.
fn route_body(request: &ActionRequest) -> Result<JsonValue, ClientError> {
    let mut tagged = serde_json::to_value(request).map_err(|e| ClientError::Transport {
        reason: format!("could not encode request: {e}"),
    })?;
    Ok(tagged
        .get_mut("config")
        .map(JsonValue::take)
        .unwrap_or(JsonValue::Null))
}

#[async_trait]
impl ProxyEndpoint for HttpProxyEndpoint {
    async fn call(
        &self,
        request: &ActionRequest,
    ) -> nodeflow_core::Result<ActionResult, ClientError> {
        let url = self.route_for(request);
        let body = route_body(request)?;
        debug!(url = %url, action = request.action_name(), "Calling proxy");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ClientError::Transport {
                reason: e.to_string(),
            })?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| ClientError::Transport {
            reason: e.to_string(),
        })?;

        // Failure envelopes come back with non-2xx statuses; the body is what matters.
        let result = serde_json::from_str(&text).map_err(|e| ClientError::MalformedResponse {
            status,
            reason: e.to_string(),
        })?;
        Ok(result)
    }
}

/// Calls a [`Proxy`] in the same process.
#[derive(Debug, Clone)]
pub struct LocalProxyEndpoint {
    proxy: Arc<Proxy>,
}

impl LocalProxyEndpoint {
    #[must_use]
    pub fn new(proxy: Arc<Proxy>) -> Self {
        Self { proxy }
    }
}

#[async_trait]
impl ProxyEndpoint for LocalProxyEndpoint {
    async fn call(
        &self,
        request: &ActionRequest,
    ) -> nodeflow_core::Result<ActionResult, ClientError> {
        Ok(self.proxy.dispatch(request.clone()).await.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodeflow_integration::{DiscordRequest, Endpoints, MockTransport};
    use serde_json::json;

    #[test]
    fn route_and_body_come_from_the_tagged_request() {
        let request: ActionRequest = DiscordRequest {
            action: "send_message".to_string(),
            channel_id: Some("1".to_string()),
            ..Default::default()
        }
        .into();
        let endpoint = HttpProxyEndpoint::new("http://127.0.0.1:3000/");

        assert_eq!(endpoint.route_for(&request), "http://127.0.0.1:3000/api/discord");
        assert_eq!(
            route_body(&request).expect("body"),
            json!({"action": "send_message", "channelId": "1"})
        );
    }

    #[tokio::test]
    async fn local_endpoint_returns_failure_envelopes_as_ok() {
        let mock = MockTransport::new();
        let proxy = Arc::new(Proxy::new(Arc::new(mock.clone()), Endpoints::default()));
        let endpoint = LocalProxyEndpoint::new(proxy);

        let result = endpoint
            .call(
                &DiscordRequest {
                    action: "send_message".to_string(),
                    ..Default::default()
                }
                .into(),
            )
            .await
            .expect("envelope");

        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Bot token is required"));
        assert_eq!(mock.call_count(), 0);
    }
}
