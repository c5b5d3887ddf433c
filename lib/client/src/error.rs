//! Error types for the client crate.

use nodeflow_integration::CredentialKind;
use std::fmt;

/// Failure to obtain an envelope from the proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The proxy could not be reached.
    Transport { reason: String },
    /// The proxy answered with something that is not an envelope.
    MalformedResponse { status: u16, reason: String },
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport { reason } => write!(f, "Proxy request failed: {reason}"),
            Self::MalformedResponse { status, reason } => {
                write!(f, "Malformed proxy response (status {status}): {reason}")
            }
        }
    }
}

impl std::error::Error for ClientError {}

/// A credential that fails the local shape check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenFormatError {
    /// No credential was supplied.
    Missing { kind: CredentialKind },
    /// The credential does not look like one the provider issues.
    InvalidFormat { description: &'static str },
}

impl fmt::Display for TokenFormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { kind } => write!(f, "{} is required", kind.label()),
            Self::InvalidFormat { description } => write!(f, "Invalid {description} format"),
        }
    }
}

impl std::error::Error for TokenFormatError {}

/// A node lifecycle transition that is not allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeStateError {
    /// Execute was requested before the node was configured.
    NotConfigured { node: String },
    /// Execute was requested while a previous execution is still running.
    AlreadyExecuting { node: String },
}

impl fmt::Display for NodeStateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConfigured { node } => write!(f, "Please configure the {node} node first"),
            Self::AlreadyExecuting { node } => write!(f, "The {node} node is already executing"),
        }
    }
}

impl std::error::Error for NodeStateError {}
