//! Error types for the integration crate.
//!
//! - `ProxyError`: everything a provider call can fail with, mapped 1:1 onto
//!   the envelope's `error` string and an HTTP status
//! - `TransportError`: failures below the HTTP status line (connect, read),
//!   carried as a rootcause report out of [`HttpTransport`](crate::HttpTransport)

use std::fmt;

/// Coarse classification of a [`ProxyError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyErrorKind {
    /// A required field or credential was absent or unusable. No network call was made.
    Validation,
    /// The action or AI provider string is not recognised. No network call was made.
    Unsupported,
    /// The provider answered with a non-2xx status.
    Upstream,
    /// The provider could not be reached or answered with something unparseable.
    Transport,
    /// The provider answered but the requested resource does not exist.
    NotFound,
}

/// Errors from a proxied provider action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyError {
    /// A required field is missing or empty.
    MissingField { field: &'static str },
    /// A field holds a value that cannot be sent upstream.
    InvalidField { field: &'static str },
    /// The action is not supported by the provider.
    UnsupportedAction {
        provider: &'static str,
        action: String,
    },
    /// The AI provider name is not supported.
    UnsupportedAiProvider { name: String },
    /// The provider returned a non-2xx status.
    Upstream {
        provider: &'static str,
        status: u16,
        message: String,
    },
    /// The request never produced a usable response.
    Transport {
        provider: &'static str,
        reason: String,
    },
    /// The provider reported no matching resource.
    NotFound { message: String },
}

impl ProxyError {
    /// Returns the coarse kind of this error.
    #[must_use]
    pub fn kind(&self) -> ProxyErrorKind {
        match self {
            Self::MissingField { .. } | Self::InvalidField { .. } => ProxyErrorKind::Validation,
            Self::UnsupportedAction { .. } | Self::UnsupportedAiProvider { .. } => {
                ProxyErrorKind::Unsupported
            }
            Self::Upstream { .. } => ProxyErrorKind::Upstream,
            Self::Transport { .. } => ProxyErrorKind::Transport,
            Self::NotFound { .. } => ProxyErrorKind::NotFound,
        }
    }

    /// Returns the HTTP status the proxy answers with for this error.
    ///
    /// Upstream failures mirror the provider's status.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingField { .. }
            | Self::InvalidField { .. }
            | Self::UnsupportedAction { .. }
            | Self::UnsupportedAiProvider { .. } => 400,
            Self::Upstream { status, .. } => *status,
            Self::Transport { .. } => 500,
            Self::NotFound { .. } => 404,
        }
    }
}

impl fmt::Display for ProxyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField { field } => write!(f, "{field} is required"),
            Self::InvalidField { field } => write!(f, "Invalid {field}"),
            Self::UnsupportedAction { provider, action } => {
                write!(f, "Unsupported {provider} action: {action}")
            }
            Self::UnsupportedAiProvider { name } => {
                write!(f, "Unsupported AI provider: {name}")
            }
            Self::Upstream {
                provider, message, ..
            } => write!(f, "{provider} API error: {message}"),
            Self::Transport { provider, reason } => {
                write!(f, "{provider} request failed: {reason}")
            }
            Self::NotFound { message } => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for ProxyError {}

/// Errors from the HTTP transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The HTTP client could not be constructed.
    ClientBuild { reason: String },
    /// Sending the request or reading the response failed.
    Request { url: String, reason: String },
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClientBuild { reason } => write!(f, "failed to build HTTP client: {reason}"),
            Self::Request { url, reason } => write!(f, "request to {url} failed: {reason}"),
        }
    }
}

impl std::error::Error for TransportError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_error_mirrors_status_and_names_provider() {
        let err = ProxyError::Upstream {
            provider: "Discord",
            status: 403,
            message: "Missing Access".to_string(),
        };
        assert_eq!(err.status_code(), 403);
        assert_eq!(err.to_string(), "Discord API error: Missing Access");
        assert_eq!(err.kind(), ProxyErrorKind::Upstream);
    }

    #[test]
    fn local_errors_are_bad_requests() {
        let missing = ProxyError::MissingField { field: "Bot token" };
        assert_eq!(missing.status_code(), 400);
        assert_eq!(missing.to_string(), "Bot token is required");

        let unsupported = ProxyError::UnsupportedAction {
            provider: "Twitter",
            action: "like".to_string(),
        };
        assert_eq!(unsupported.status_code(), 400);
        assert_eq!(unsupported.to_string(), "Unsupported Twitter action: like");
    }

    #[test]
    fn transport_errors_are_internal() {
        let err = ProxyError::Transport {
            provider: "AI",
            reason: "connection reset".to_string(),
        };
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.kind(), ProxyErrorKind::Transport);
    }
}
