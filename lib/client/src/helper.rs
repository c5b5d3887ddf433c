//! The client invocation helper.
//!
//! [`ProxyClient`] is what a node calls to run its action. It never fails:
//! every problem, local or remote, comes back as a failure envelope.

use crate::endpoint::ProxyEndpoint;
use crate::token::validate_credential;
use nodeflow_integration::{
    ActionRequest, ActionResult, AiRequest, DiscordRequest, DriveRequest, GmailRequest,
    LinkedinRequest, TwitterRequest, YoutubeRequest,
};
use tracing::{debug, warn};

/// Validates credentials locally and forwards requests to the proxy.
#[derive(Debug, Clone)]
pub struct ProxyClient<E> {
    endpoint: E,
}

impl<E: ProxyEndpoint> ProxyClient<E> {
    #[must_use]
    pub fn new(endpoint: E) -> Self {
        Self { endpoint }
    }

    /// Runs one request.
    ///
    /// A credential that is missing or fails its shape check short-circuits
    /// without contacting the proxy. Otherwise the proxy's envelope is
    /// returned unchanged.
    pub async fn invoke(&self, request: &ActionRequest) -> ActionResult {
        if let Err(err) = validate_credential(request) {
            debug!(
                provider = %request.provider(),
                error = %err,
                "Credential rejected before calling proxy"
            );
            return ActionResult::failure(err.to_string());
        }

        match self.endpoint.call(request).await {
            Ok(result) => result,
            Err(report) => {
                let err = report.current_context();
                warn!(
                    provider = %request.provider(),
                    action = request.action_name(),
                    error = %err,
                    "Proxy call failed"
                );
                ActionResult::failure(err.to_string())
            }
        }
    }

    pub async fn gmail(&self, request: GmailRequest) -> ActionResult {
        self.invoke(&request.into()).await
    }

    pub async fn drive(&self, request: DriveRequest) -> ActionResult {
        self.invoke(&request.into()).await
    }

    pub async fn discord(&self, request: DiscordRequest) -> ActionResult {
        self.invoke(&request.into()).await
    }

    pub async fn twitter(&self, request: TwitterRequest) -> ActionResult {
        self.invoke(&request.into()).await
    }

    pub async fn youtube(&self, request: YoutubeRequest) -> ActionResult {
        self.invoke(&request.into()).await
    }

    pub async fn linkedin(&self, request: LinkedinRequest) -> ActionResult {
        self.invoke(&request.into()).await
    }

    pub async fn ai(&self, request: AiRequest) -> ActionResult {
        self.invoke(&request.into()).await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::ClientError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::{Arc, Mutex, PoisonError};

    /// Records requests and answers each with a fixed outcome.
    #[derive(Clone)]
    pub(crate) struct RecordingEndpoint {
        reply: Result<ActionResult, ClientError>,
        pub(crate) seen: Arc<Mutex<Vec<ActionRequest>>>,
    }

    impl RecordingEndpoint {
        pub(crate) fn answering(reply: Result<ActionResult, ClientError>) -> Self {
            Self {
                reply,
                seen: Arc::default(),
            }
        }

        pub(crate) fn calls(&self) -> usize {
            self.seen.lock().unwrap_or_else(PoisonError::into_inner).len()
        }
    }

    #[async_trait]
    impl ProxyEndpoint for RecordingEndpoint {
        async fn call(
            &self,
            request: &ActionRequest,
        ) -> nodeflow_core::Result<ActionResult, ClientError> {
            self.seen
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(request.clone());
            self.reply.clone().map_err(Into::into)
        }
    }

    fn twitter_request(token: &str) -> TwitterRequest {
        TwitterRequest {
            action: "get_trending".to_string(),
            bearer_token: Some(token.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn malformed_token_never_reaches_proxy() {
        let endpoint = RecordingEndpoint::answering(Ok(ActionResult::success(json!({}))));
        let client = ProxyClient::new(endpoint.clone());

        let result = client.twitter(twitter_request("too short")).await;

        assert!(!result.success);
        assert_eq!(
            result.error.as_deref(),
            Some("Invalid Twitter bearer token format")
        );
        assert_eq!(endpoint.calls(), 0);
    }

    #[tokio::test]
    async fn envelope_is_passed_through_unchanged() {
        let envelope = ActionResult::failure("Twitter API error: Unauthorized");
        let endpoint = RecordingEndpoint::answering(Ok(envelope.clone()));
        let client = ProxyClient::new(endpoint.clone());

        let result = client.twitter(twitter_request(&"A".repeat(60))).await;

        assert_eq!(result, envelope);
        assert_eq!(endpoint.calls(), 1);
    }

    #[tokio::test]
    async fn endpoint_errors_become_failure_envelopes() {
        let endpoint = RecordingEndpoint::answering(Err(ClientError::Transport {
            reason: "connection refused".to_string(),
        }));
        let client = ProxyClient::new(endpoint);

        let result = client.twitter(twitter_request(&"A".repeat(60))).await;

        assert_eq!(
            result,
            ActionResult::failure("Proxy request failed: connection refused")
        );
    }
}
