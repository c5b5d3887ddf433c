//! A test double for [`HttpTransport`].
//!
//! Responses are matched by URL fragment, longest fragment first, and are
//! returned every time they match, so repeated calls see identical replies.
//! Every request is recorded for assertions.

use crate::error::TransportError;
use crate::transport::{HttpTransport, UpstreamRequest, UpstreamResponse};
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Clone)]
enum Reply {
    Respond(UpstreamResponse),
    Fail(String),
}

/// A transport that never touches the network.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    routes: Vec<(String, Reply)>,
    calls: Arc<Mutex<Vec<UpstreamRequest>>>,
}

impl MockTransport {
    /// Creates a mock with no routes; every request fails.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers requests whose URL contains `fragment` with `status` and a JSON body.
    #[must_use]
    pub fn on_json(self, fragment: impl Into<String>, status: u16, body: JsonValue) -> Self {
        self.on_text(fragment, status, body.to_string())
    }

    /// Answers requests whose URL contains `fragment` with `status` and a raw body.
    #[must_use]
    pub fn on_text(mut self, fragment: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        self.routes.push((
            fragment.into(),
            Reply::Respond(UpstreamResponse {
                status,
                body: body.into(),
            }),
        ));
        self
    }

    /// Fails requests whose URL contains `fragment` as if the connection broke.
    #[must_use]
    pub fn on_failure(mut self, fragment: impl Into<String>, reason: impl Into<String>) -> Self {
        self.routes.push((fragment.into(), Reply::Fail(reason.into())));
        self
    }

    /// All requests seen so far, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<UpstreamRequest> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of requests seen so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn reply_for(&self, url: &str) -> Option<&Reply> {
        self.routes
            .iter()
            .filter(|(fragment, _)| url.contains(fragment.as_str()))
            .max_by_key(|(fragment, _)| fragment.len())
            .map(|(_, reply)| reply)
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(
        &self,
        request: UpstreamRequest,
    ) -> nodeflow_core::Result<UpstreamResponse, TransportError> {
        let url = request.url.clone();
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);

        match self.reply_for(&url) {
            Some(Reply::Respond(response)) => Ok(response.clone()),
            Some(Reply::Fail(reason)) => Err(TransportError::Request {
                url,
                reason: reason.clone(),
            }
            .into()),
            None => Err(TransportError::Request {
                url,
                reason: "no mock route".to_string(),
            }
            .into()),
        }
    }
}
