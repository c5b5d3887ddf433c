//! Upstream base URLs.
//!
//! Defaults point at the real provider APIs. Each can be overridden from
//! configuration, which is how a staging gateway or a local fake is wired in.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};

/// Base URL for every upstream API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    #[serde(default = "default_gmail")]
    pub gmail: String,
    /// Google APIs host; Drive paths include `/drive/v3` and `/upload/drive/v3`.
    #[serde(default = "default_drive")]
    pub drive: String,
    #[serde(default = "default_discord")]
    pub discord: String,
    #[serde(default = "default_twitter")]
    pub twitter: String,
    #[serde(default = "default_youtube")]
    pub youtube: String,
    #[serde(default = "default_linkedin")]
    pub linkedin: String,
    #[serde(default = "default_openai")]
    pub openai: String,
    #[serde(default = "default_anthropic")]
    pub anthropic: String,
    #[serde(default = "default_google_ai")]
    pub google_ai: String,
    #[serde(default = "default_groq")]
    pub groq: String,
}

fn default_gmail() -> String {
    "https://gmail.googleapis.com/gmail/v1/users/me".to_string()
}

fn default_drive() -> String {
    "https://www.googleapis.com".to_string()
}

fn default_discord() -> String {
    "https://discord.com/api/v10".to_string()
}

fn default_twitter() -> String {
    "https://api.twitter.com/2".to_string()
}

fn default_youtube() -> String {
    "https://www.googleapis.com/youtube/v3".to_string()
}

fn default_linkedin() -> String {
    "https://api.linkedin.com/v2".to_string()
}

fn default_openai() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_anthropic() -> String {
    "https://api.anthropic.com/v1".to_string()
}

fn default_google_ai() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_groq() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            gmail: default_gmail(),
            drive: default_drive(),
            discord: default_discord(),
            twitter: default_twitter(),
            youtube: default_youtube(),
            linkedin: default_linkedin(),
            openai: default_openai(),
            anthropic: default_anthropic(),
            google_ai: default_google_ai(),
            groq: default_groq(),
        }
    }
}

/// Bytes escaped in a single path segment: everything outside RFC 3986
/// `unreserved`.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encodes a caller-supplied value for use as one path segment.
///
/// Dot-only values are rejected before this point by
/// [`require_segment`](crate::request::require_segment).
#[must_use]
pub fn segment(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT).to_string()
}

/// Joins a base URL and a path with exactly one slash between them.
#[must_use]
pub fn join(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
