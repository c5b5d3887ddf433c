//! The generic dispatcher.
//!
//! A provider request goes through three steps:
//!
//! 1. [`ProviderRequest::prepare`] validates the loose request and turns it
//!    into a typed action plus the descriptor and credential to use. Nothing
//!    touches the network if this fails.
//! 2. [`ProviderAction::run`] builds the provider's requests and extracts the
//!    fields it reports, using [`Upstream`] to send them.
//! 3. [`Proxy::respond`] maps the outcome onto the envelope and an HTTP status.
//!
//! [`Upstream::send`] is the only place that attaches credentials, interprets
//! status codes and extracts provider error messages.

use crate::descriptor::{Provider, ProviderDescriptor};
use crate::endpoints::Endpoints;
use crate::envelope::{ActionResult, ProxyResponse};
use crate::error::{ProxyError, ProxyErrorKind};
use crate::request::ActionRequest;
use crate::transport::{HttpTransport, UpstreamRequest};
use async_trait::async_trait;
use nodeflow_core::{Clock, SystemClock};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A validated request, ready to run.
#[derive(Debug)]
pub struct Prepared<A> {
    pub descriptor: &'static ProviderDescriptor,
    pub credential: String,
    pub action: A,
}

/// A loose wire request that knows how to validate itself.
pub trait ProviderRequest: Send {
    /// The typed action this request parses into.
    type Action: ProviderAction;

    /// The provider this request type belongs to.
    const PROVIDER: Provider;

    /// Validates required fields and parses the action.
    ///
    /// Checks run credential first, then provider-wide fields, then the action
    /// string, then the action's own fields.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError::MissingField`], [`ProxyError::UnsupportedAction`]
    /// or [`ProxyError::UnsupportedAiProvider`].
    fn prepare(self) -> Result<Prepared<Self::Action>, ProxyError>;
}

/// A typed provider action.
#[async_trait]
pub trait ProviderAction: Send + Sync {
    /// The wire name of the action.
    fn name(&self) -> &'static str;

    /// Performs the upstream calls and returns the envelope's `data`.
    async fn run(&self, upstream: &Upstream<'_>) -> Result<JsonValue, ProxyError>;
}

/// Everything an action needs to talk to its provider.
pub struct Upstream<'a> {
    transport: &'a dyn HttpTransport,
    descriptor: &'static ProviderDescriptor,
    credential: &'a str,
    action: &'static str,
    endpoints: &'a Endpoints,
    clock: &'a dyn Clock,
}

impl Upstream<'_> {
    /// Configured base URLs.
    #[must_use]
    pub fn endpoints(&self) -> &Endpoints {
        self.endpoints
    }

    /// Current time as an RFC 3339 string.
    #[must_use]
    pub fn now(&self) -> String {
        self.clock.now_rfc3339()
    }

    /// Label used in error messages.
    #[must_use]
    pub fn label(&self) -> &'static str {
        self.descriptor.label()
    }

    fn transport_error(&self, reason: impl Into<String>) -> ProxyError {
        ProxyError::Transport {
            provider: self.label(),
            reason: reason.into(),
        }
    }

    /// Sends `request` with the descriptor's auth and headers applied.
    ///
    /// A 2xx response is parsed as JSON (an empty body yields `null`). Any
    /// other status becomes [`ProxyError::Upstream`] carrying the provider's
    /// error message, or the status hint if the descriptor has one.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError::Upstream`] for non-2xx statuses and
    /// [`ProxyError::Transport`] when no parseable response was received.
    pub async fn send(&self, request: UpstreamRequest) -> Result<JsonValue, ProxyError> {
        let request = self
            .descriptor
            .headers
            .iter()
            .fold(request, |request, (name, value)| {
                request.with_header(*name, *value)
            });
        let request = self.descriptor.auth.apply(request, self.credential);

        debug!(
            provider = %self.descriptor.provider,
            action = self.action,
            method = ?request.method,
            url = %request.url,
            "Sending upstream request"
        );

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|report| self.transport_error(report.current_context().to_string()))?;

        if !response.is_success() {
            let body: JsonValue = serde_json::from_str(&response.body).unwrap_or(JsonValue::Null);
            let message = (self.descriptor.status_hint)(self.action, response.status)
                .map(str::to_string)
                .or_else(|| (self.descriptor.error_message)(&body))
                .unwrap_or_else(|| reason_phrase(response.status));

            warn!(
                provider = %self.descriptor.provider,
                action = self.action,
                status = response.status,
                error = %message,
                "Upstream returned an error"
            );

            return Err(ProxyError::Upstream {
                provider: self.label(),
                status: response.status,
                message,
            });
        }

        if response.body.trim().is_empty() {
            return Ok(JsonValue::Null);
        }
        serde_json::from_str(&response.body)
            .map_err(|e| self.transport_error(format!("invalid JSON response: {e}")))
    }

    /// Like [`send`](Self::send), deserializing the body into `T`.
    ///
    /// An empty body deserializes as `{}`.
    ///
    /// # Errors
    ///
    /// As [`send`](Self::send), plus [`ProxyError::Transport`] when the body
    /// does not have the expected shape.
    pub async fn send_as<T: DeserializeOwned>(
        &self,
        request: UpstreamRequest,
    ) -> Result<T, ProxyError> {
        let value = match self.send(request).await? {
            JsonValue::Null => JsonValue::Object(serde_json::Map::new()),
            value => value,
        };
        serde_json::from_value(value)
            .map_err(|e| self.transport_error(format!("unexpected response shape: {e}")))
    }
}

fn reason_phrase(status: u16) -> String {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|status| status.canonical_reason())
        .unwrap_or("Unknown error")
        .to_string()
}

/// The provider proxy.
///
/// Holds no per-request state; one instance is shared by every request.
#[derive(Clone)]
pub struct Proxy {
    transport: Arc<dyn HttpTransport>,
    endpoints: Endpoints,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for Proxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Proxy")
            .field("endpoints", &self.endpoints)
            .finish_non_exhaustive()
    }
}

impl Proxy {
    /// Creates a proxy using the system clock.
    #[must_use]
    pub fn new(transport: Arc<dyn HttpTransport>, endpoints: Endpoints) -> Self {
        Self {
            transport,
            endpoints,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the clock used for timestamps in `data`.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Configured base URLs.
    #[must_use]
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Validates and runs one provider request.
    ///
    /// # Errors
    ///
    /// Returns whichever [`ProxyError`] stopped the request.
    pub async fn execute<R: ProviderRequest>(&self, request: R) -> Result<JsonValue, ProxyError> {
        let Prepared {
            descriptor,
            credential,
            action,
        } = request.prepare()?;

        let upstream = Upstream {
            transport: self.transport.as_ref(),
            descriptor,
            credential: &credential,
            action: action.name(),
            endpoints: &self.endpoints,
            clock: self.clock.as_ref(),
        };
        action.run(&upstream).await
    }

    /// Runs one provider request and wraps the outcome in an envelope.
    pub async fn respond<R: ProviderRequest>(&self, request: R) -> ProxyResponse {
        match self.execute(request).await {
            Ok(data) => ProxyResponse {
                status: 200,
                result: ActionResult::success(data),
            },
            Err(err) => {
                match err.kind() {
                    ProxyErrorKind::Validation | ProxyErrorKind::Unsupported => {
                        info!(provider = %R::PROVIDER, error = %err, "Rejected provider request");
                    }
                    _ => {
                        warn!(provider = %R::PROVIDER, error = %err, "Provider request failed");
                    }
                }
                ProxyResponse {
                    status: err.status_code(),
                    result: ActionResult::failure(err.to_string()),
                }
            }
        }
    }

    /// Routes a request for any provider.
    pub async fn dispatch(&self, request: ActionRequest) -> ProxyResponse {
        match request {
            ActionRequest::Gmail(r) => self.respond(r).await,
            ActionRequest::Drive(r) => self.respond(r).await,
            ActionRequest::Discord(r) => self.respond(r).await,
            ActionRequest::Twitter(r) => self.respond(r).await,
            ActionRequest::Youtube(r) => self.respond(r).await,
            ActionRequest::Linkedin(r) => self.respond(r).await,
            ActionRequest::Ai(r) => self.respond(r).await,
        }
    }
}
