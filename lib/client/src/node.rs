//! Per-node configuration and execution state.
//!
//! ```text
//! Unconfigured --configure--> Configured --execute--> Executing
//!                                  ^                      |
//!                                  +---- Success/Error ---+
//! ```
//!
//! State lives only as long as the node does. Nothing here is persisted.

use crate::endpoint::ProxyEndpoint;
use crate::error::NodeStateError;
use crate::helper::ProxyClient;
use chrono::{DateTime, Utc};
use nodeflow_core::{Clock, NodeId};
use nodeflow_integration::{ActionRequest, ActionResult, Provider};
use serde::{Deserialize, Serialize};

/// Outcome of the most recent execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    Success,
    Error,
}

/// What the node shows after an execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastExecution {
    pub status: ExecutionStatus,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// One node on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeConfig {
    pub id: NodeId,
    pub title: String,
    /// Provider this node represents, fixed at creation.
    pub provider: Provider,
    #[serde(rename = "config")]
    pub request: Option<ActionRequest>,
    /// Set once a request has been saved.
    #[serde(default)]
    pub is_configured: bool,
    pub is_executing: bool,
    pub last_execution: Option<LastExecution>,
}

/// Noun used in the node's success message.
fn subject(provider: Provider) -> &'static str {
    match provider {
        Provider::Gmail => "Email",
        Provider::Drive => "Drive",
        other => other.label(),
    }
}

impl NodeConfig {
    /// Creates an unconfigured node.
    #[must_use]
    pub fn new(provider: Provider, title: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(),
            title: title.into(),
            provider,
            request: None,
            is_configured: false,
            is_executing: false,
            last_execution: None,
        }
    }

    /// Saves the node's request, replacing any previous one.
    ///
    /// The request's provider wins over the node's if they differ.
    pub fn configure(&mut self, request: ActionRequest) {
        self.provider = request.provider();
        self.request = Some(request);
        self.is_configured = true;
    }

    /// Whether [`begin_execution`](Self::begin_execution) would succeed.
    #[must_use]
    pub fn can_execute(&self) -> bool {
        self.is_configured && self.request.is_some() && !self.is_executing
    }

    /// Moves the node into `Executing` and returns the request to run.
    ///
    /// # Errors
    ///
    /// Returns [`NodeStateError`] if the node is unconfigured or busy.
    pub fn begin_execution(&mut self) -> Result<ActionRequest, NodeStateError> {
        let node = self.provider.label().to_string();
        if self.is_executing {
            return Err(NodeStateError::AlreadyExecuting { node });
        }
        let request = self
            .request
            .clone()
            .ok_or(NodeStateError::NotConfigured { node })?;
        self.is_executing = true;
        Ok(request)
    }

    /// Records the outcome of an execution and leaves `Executing`.
    pub fn finish_execution(&mut self, result: &ActionResult, clock: &dyn Clock) {
        let (status, message) = if result.success {
            let action = self
                .request
                .as_ref()
                .map(ActionRequest::action_name)
                .unwrap_or_default();
            (
                ExecutionStatus::Success,
                format!("{} {action} completed successfully", subject(self.provider)),
            )
        } else {
            (
                ExecutionStatus::Error,
                result
                    .error
                    .clone()
                    .unwrap_or_else(|| "Unknown error occurred".to_string()),
            )
        };

        self.is_executing = false;
        self.last_execution = Some(LastExecution {
            status,
            message,
            timestamp: clock.now(),
        });
    }

    /// Runs the node's request through `client` and records the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`NodeStateError`] without calling the client if the node is
    /// unconfigured or busy. Provider failures are not errors; they are
    /// recorded in [`last_execution`](Self::last_execution).
    pub async fn execute<E: ProxyEndpoint>(
        &mut self,
        client: &ProxyClient<E>,
        clock: &dyn Clock,
    ) -> Result<ActionResult, NodeStateError> {
        let request = self.begin_execution()?;
        let result = client.invoke(&request).await;
        self.finish_execution(&result, clock);
        Ok(result)
    }
}
