//! Per-provider descriptors.
//!
//! A [`ProviderDescriptor`] is the table entry the dispatcher consults for
//! everything that differs between providers at the HTTP level: how the
//! credential is attached, which headers always go along, where the error
//! message lives in a failure body, and which statuses deserve a friendlier
//! hint. Provider modules declare one `static` descriptor each (AI declares
//! one per model vendor).

use crate::credential::AuthScheme;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;

/// The providers nodeflow can proxy to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Gmail,
    Drive,
    Discord,
    Twitter,
    Youtube,
    Linkedin,
    Ai,
}

impl Provider {
    /// Every provider, in route order.
    pub const ALL: [Provider; 7] = [
        Self::Gmail,
        Self::Drive,
        Self::Discord,
        Self::Twitter,
        Self::Youtube,
        Self::Linkedin,
        Self::Ai,
    ];

    /// Route/wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gmail => "gmail",
            Self::Drive => "drive",
            Self::Discord => "discord",
            Self::Twitter => "twitter",
            Self::Youtube => "youtube",
            Self::Linkedin => "linkedin",
            Self::Ai => "ai",
        }
    }

    /// Display name used in error messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Gmail => "Gmail",
            Self::Drive => "Google Drive",
            Self::Discord => "Discord",
            Self::Twitter => "Twitter",
            Self::Youtube => "YouTube",
            Self::Linkedin => "LinkedIn",
            Self::Ai => "AI",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|provider| provider.as_str() == s)
            .ok_or_else(|| format!("unknown provider: {s}"))
    }
}

/// Static description of how to talk to one provider.
#[derive(Debug)]
pub struct ProviderDescriptor {
    pub provider: Provider,
    pub auth: AuthScheme,
    /// Headers sent with every request.
    pub headers: &'static [(&'static str, &'static str)],
    /// Pulls the human-readable message out of a failure body.
    pub error_message: fn(&JsonValue) -> Option<String>,
    /// Replaces the upstream message for well-known statuses.
    pub status_hint: fn(action: &str, status: u16) -> Option<&'static str>,
}

impl ProviderDescriptor {
    /// Display name used in error messages.
    #[must_use]
    pub fn label(&self) -> &'static str {
        self.provider.label()
    }
}

/// `{"error": {"message": "..."}}`, used by Google APIs and most AI vendors.
pub fn nested_error_message(body: &JsonValue) -> Option<String> {
    body.pointer("/error/message")
        .and_then(JsonValue::as_str)
        .map(str::to_string)
}

/// `{"message": "..."}`, used by Discord and LinkedIn.
pub fn top_level_message(body: &JsonValue) -> Option<String> {
    body.get("message")
        .and_then(JsonValue::as_str)
        .map(str::to_string)
}

/// `{"detail": "..."}`, used by Twitter v2.
pub fn detail_message(body: &JsonValue) -> Option<String> {
    body.get("detail")
        .and_then(JsonValue::as_str)
        .map(str::to_string)
}

/// No status gets special treatment.
pub fn no_hint(_action: &str, _status: u16) -> Option<&'static str> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn provider_round_trips_through_str() {
        for provider in Provider::ALL {
            assert_eq!(provider.as_str().parse::<Provider>(), Ok(provider));
        }
        assert!("myspace".parse::<Provider>().is_err());
    }

    #[test]
    fn error_extractors_read_their_field_only() {
        let google = json!({"error": {"code": 401, "message": "Invalid Credentials"}});
        let discord = json!({"code": 50001, "message": "Missing Access"});
        let twitter = json!({"title": "Unauthorized", "detail": "Unauthorized"});

        assert_eq!(nested_error_message(&google).as_deref(), Some("Invalid Credentials"));
        assert_eq!(top_level_message(&discord).as_deref(), Some("Missing Access"));
        assert_eq!(detail_message(&twitter).as_deref(), Some("Unauthorized"));

        assert!(nested_error_message(&discord).is_none());
        assert!(top_level_message(&twitter).is_none());
    }
}
