//! Credentials and the ways providers expect to receive them.
//!
//! Credentials arrive with every request and are never stored. They are not
//! logged either; only the [`CredentialKind`] label appears in messages.

use crate::transport::UpstreamRequest;
use serde::{Deserialize, Serialize};

/// The kind of credential a provider request carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialKind {
    /// OAuth 2.0 access token (`accessToken`).
    AccessToken,
    /// Discord bot token (`botToken`).
    BotToken,
    /// Twitter app-only bearer token (`bearerToken`).
    BearerToken,
    /// Provider API key (`apiKey`).
    ApiKey,
}

impl CredentialKind {
    /// Human-readable label, used in "... is required" messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::AccessToken => "Access token",
            Self::BotToken => "Bot token",
            Self::BearerToken => "Bearer token",
            Self::ApiKey => "API key",
        }
    }
}

/// How a credential is attached to an outbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// `Authorization: Bearer <token>`.
    Bearer,
    /// `Authorization: Bot <token>`.
    Bot,
    /// `<header>: <token>`.
    Header(&'static str),
    /// `?<param>=<token>`.
    QueryParam(&'static str),
}

impl AuthScheme {
    /// Attaches `credential` to `request`.
    #[must_use]
    pub fn apply(self, request: UpstreamRequest, credential: &str) -> UpstreamRequest {
        match self {
            Self::Bearer => request.with_header("Authorization", format!("Bearer {credential}")),
            Self::Bot => request.with_header("Authorization", format!("Bot {credential}")),
            Self::Header(name) => request.with_header(name, credential),
            Self::QueryParam(name) => request.with_query(name, credential),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_and_bot_use_authorization_header() {
        let bearer = AuthScheme::Bearer.apply(UpstreamRequest::get("https://x"), "ya29.abc");
        assert_eq!(bearer.header("Authorization"), Some("Bearer ya29.abc"));

        let bot = AuthScheme::Bot.apply(UpstreamRequest::get("https://x"), "tok");
        assert_eq!(bot.header("authorization"), Some("Bot tok"));
    }

    #[test]
    fn api_key_header_and_query_param() {
        let header = AuthScheme::Header("x-api-key").apply(UpstreamRequest::get("https://x"), "k");
        assert_eq!(header.header("x-api-key"), Some("k"));
        assert!(header.header("Authorization").is_none());

        let query = AuthScheme::QueryParam("key").apply(UpstreamRequest::get("https://x"), "k");
        assert_eq!(query.query_value("key"), Some("k"));
        assert!(query.headers.is_empty());
    }

    #[test]
    fn labels_read_as_sentences() {
        assert_eq!(CredentialKind::BotToken.label(), "Bot token");
        assert_eq!(CredentialKind::ApiKey.label(), "API key");
    }
}
