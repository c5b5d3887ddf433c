//! Credential shape heuristics.
//!
//! These checks only catch obvious mistakes (a Discord token pasted into the
//! Gmail node, a truncated key) before a request leaves the client. They say
//! nothing about whether a credential is valid; only the provider knows that.

use crate::error::TokenFormatError;
use nodeflow_integration::{ActionRequest, Provider};

/// Google OAuth access token (Gmail, Drive, YouTube).
#[must_use]
pub fn is_google_access_token(token: &str) -> bool {
    token.len() > 10 && token.contains("ya29.")
}

/// Discord bot token: three dot-separated segments.
#[must_use]
pub fn is_discord_bot_token(token: &str) -> bool {
    token.len() > 50 && token.contains('.')
}

/// Twitter app-only bearer token.
#[must_use]
pub fn is_twitter_bearer_token(token: &str) -> bool {
    token.len() >= 50 && !token.contains(char::is_whitespace)
}

/// LinkedIn OAuth access token.
#[must_use]
pub fn is_linkedin_access_token(token: &str) -> bool {
    token.len() > 20 && !token.contains(char::is_whitespace)
}

/// API key for the named AI vendor.
///
/// Vendors without a known key prefix are accepted; the proxy rejects
/// unsupported vendors itself.
#[must_use]
pub fn is_ai_api_key(vendor: &str, key: &str) -> bool {
    let prefix = match vendor {
        "openai" => "sk-",
        "anthropic" => "sk-ant-",
        "groq" => "gsk_",
        "google" => "AIza",
        _ => return true,
    };
    key.starts_with(prefix) && key.len() > 20
}

/// Checks that `request` carries a credential of plausible shape.
///
/// # Errors
///
/// Returns [`TokenFormatError::Missing`] when the credential is absent or
/// blank, and [`TokenFormatError::InvalidFormat`] when it fails the heuristic.
pub fn validate_credential(request: &ActionRequest) -> Result<(), TokenFormatError> {
    let (kind, credential) = request.credential();
    let token = match credential.map(str::trim) {
        Some(token) if !token.is_empty() => token,
        _ => return Err(TokenFormatError::Missing { kind }),
    };

    let (plausible, description) = match request.provider() {
        Provider::Gmail | Provider::Drive => (is_google_access_token(token), "access token"),
        Provider::Youtube => (is_google_access_token(token), "Google access token"),
        Provider::Discord => (is_discord_bot_token(token), "Discord bot token"),
        Provider::Twitter => (is_twitter_bearer_token(token), "Twitter bearer token"),
        Provider::Linkedin => (is_linkedin_access_token(token), "LinkedIn access token"),
        Provider::Ai => (is_ai_api_key(request.action_name(), token), "API key"),
    };

    if plausible {
        Ok(())
    } else {
        Err(TokenFormatError::InvalidFormat { description })
    }
}
