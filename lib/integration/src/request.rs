//! Loose provider requests, as they arrive on the wire.
//!
//! Every field except `action` is optional here. Turning one of these into a
//! typed action (and thereby validating it) happens in the provider modules;
//! see [`ProviderRequest`](crate::proxy::ProviderRequest).

use crate::credential::CredentialKind;
use crate::descriptor::Provider;
use crate::error::ProxyError;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/gmail`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GmailRequest {
    /// `send`, `read` or `search`.
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

/// Body of `POST /api/drive`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DriveRequest {
    /// `upload`, `download`, `list`, `search` or `create_folder`.
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

/// Body of `POST /api/discord`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiscordRequest {
    /// `send_message`, `send_embed` or `get_channel_messages`.
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embed_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embed_description: Option<String>,
    /// `#RRGGBB`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embed_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bot_token: Option<String>,
}

/// Body of `POST /api/twitter`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TwitterRequest {
    /// `get_timeline`, `get_trending` or `get_user_tweets`.
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bearer_token: Option<String>,
}

/// Body of `POST /api/youtube`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct YoutubeRequest {
    /// `search_videos` or `get_channel_videos`.
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

/// Body of `POST /api/linkedin`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinkedinRequest {
    /// `create_post` or `get_profile_posts`.
    pub action: String,
    /// `urn:li:person:…` or `urn:li:organization:…`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_urn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

/// Body of `POST /api/ai`.
///
/// There is no `action`; the model vendor plays that role.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AiRequest {
    /// `openai`, `anthropic`, `google` or `groq`.
    pub provider: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

/// A request for any provider.
///
/// Serialized as `{"type": "<provider>", "config": {...}}`; the `config`
/// object is exactly the body the matching proxy route accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "config", rename_all = "lowercase")]
pub enum ActionRequest {
    Gmail(GmailRequest),
    Drive(DriveRequest),
    Discord(DiscordRequest),
    Twitter(TwitterRequest),
    Youtube(YoutubeRequest),
    Linkedin(LinkedinRequest),
    Ai(AiRequest),
}

impl ActionRequest {
    /// The provider this request is for.
    #[must_use]
    pub fn provider(&self) -> Provider {
        match self {
            Self::Gmail(_) => Provider::Gmail,
            Self::Drive(_) => Provider::Drive,
            Self::Discord(_) => Provider::Discord,
            Self::Twitter(_) => Provider::Twitter,
            Self::Youtube(_) => Provider::Youtube,
            Self::Linkedin(_) => Provider::Linkedin,
            Self::Ai(_) => Provider::Ai,
        }
    }

    /// The action string; for AI requests, the model vendor.
    #[must_use]
    pub fn action_name(&self) -> &str {
        match self {
            Self::Gmail(r) => &r.action,
            Self::Drive(r) => &r.action,
            Self::Discord(r) => &r.action,
            Self::Twitter(r) => &r.action,
            Self::Youtube(r) => &r.action,
            Self::Linkedin(r) => &r.action,
            Self::Ai(r) => &r.provider,
        }
    }

    /// The credential carried by this request, with its kind.
    #[must_use]
    pub fn credential(&self) -> (CredentialKind, Option<&str>) {
        match self {
            Self::Gmail(r) => (CredentialKind::AccessToken, r.access_token.as_deref()),
            Self::Drive(r) => (CredentialKind::AccessToken, r.access_token.as_deref()),
            Self::Discord(r) => (CredentialKind::BotToken, r.bot_token.as_deref()),
            Self::Twitter(r) => (CredentialKind::BearerToken, r.bearer_token.as_deref()),
            Self::Youtube(r) => (CredentialKind::AccessToken, r.access_token.as_deref()),
            Self::Linkedin(r) => (CredentialKind::AccessToken, r.access_token.as_deref()),
            Self::Ai(r) => (CredentialKind::ApiKey, r.api_key.as_deref()),
        }
    }
}

macro_rules! impl_from_request {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for ActionRequest {
                fn from(request: $ty) -> Self {
                    Self::$variant(request)
                }
            }
        )*
    };
}

impl_from_request!(
    Gmail(GmailRequest),
    Drive(DriveRequest),
    Discord(DiscordRequest),
    Twitter(TwitterRequest),
    Youtube(YoutubeRequest),
    Linkedin(LinkedinRequest),
    Ai(AiRequest),
);

/// Takes a required field, treating empty and whitespace-only values as absent.
///
/// # Errors
///
/// Returns [`ProxyError::MissingField`] naming `field`.
pub fn require(value: Option<String>, field: &'static str) -> Result<String, ProxyError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ProxyError::MissingField { field }),
    }
}

/// Takes a required field that will become one URL path segment.
///
/// # Errors
///
/// Returns [`ProxyError::MissingField`] if absent, or
/// [`ProxyError::InvalidField`] if the value is `.` or `..`, which URL
/// parsers resolve as relative path steps even when percent-encoded.
pub fn require_segment(value: Option<String>, field: &'static str) -> Result<String, ProxyError> {
    let value = require(value, field)?;
    if value.trim().chars().all(|c| c == '.') {
        return Err(ProxyError::InvalidField { field });
    }
    Ok(value)
}

/// Takes the request credential.
///
/// # Errors
///
/// Returns [`ProxyError::MissingField`] naming the credential kind.
pub fn require_credential(value: Option<String>, kind: CredentialKind) -> Result<String, ProxyError> {
    require(value, kind.label())
}
