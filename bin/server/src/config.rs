//! Centralized server configuration.
//!
//! Loaded via the `config` crate from environment variables, with `__`
//! separating nested keys (`WEBHOOKS__GITHUB_SECRET`, `UPSTREAM__DISCORD`).
//! Every field has a default, so the server starts with no configuration.

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError};
use nodeflow_integration::Endpoints;
use serde::Deserialize;

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to listen on.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Webhook receiver settings.
    #[serde(default)]
    pub webhooks: WebhookConfig,

    /// Upstream API base URLs.
    #[serde(default)]
    pub upstream: Endpoints,
}

/// Webhook receiver settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookConfig {
    /// Shared secret for `x-hub-signature-256`.
    /// Unset means GitHub deliveries are accepted unverified.
    #[serde(default)]
    pub github_secret: Option<String>,

    /// Token Gmail push verification requests must present.
    /// Unset means every verification request is rejected.
    #[serde(default)]
    pub gmail_verification_token: Option<String>,
}

fn default_bind_addr() -> String {
    "127.0.0.1:3000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            webhooks: WebhookConfig::default(),
            upstream: Endpoints::default(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but cannot be deserialized.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(config::Config::builder().add_source(
            config::Environment::default()
                .separator("__")
                .try_parsing(true),
        ))
    }

    fn load(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_source_yields_defaults() {
        let config = ServerConfig::load(config::Config::builder()).expect("load");
        assert_eq!(config.bind_addr, "127.0.0.1:3000");
        assert!(config.webhooks.github_secret.is_none());
        assert_eq!(config.upstream, Endpoints::default());
    }

    #[test]
    fn nested_keys_override_single_fields() {
        let builder = config::Config::builder()
            .set_override("webhooks.github_secret", "s3cret")
            .and_then(|b| b.set_override("upstream.discord", "http://127.0.0.1:9000"))
            .expect("overrides");
        let config = ServerConfig::load(builder).expect("load");

        assert_eq!(config.webhooks.github_secret.as_deref(), Some("s3cret"));
        assert_eq!(config.upstream.discord, "http://127.0.0.1:9000");
        assert_eq!(config.upstream.gmail, Endpoints::default().gmail);
    }
}
