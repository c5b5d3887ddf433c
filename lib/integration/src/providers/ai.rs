//! Single-turn text completion against several model vendors.
//!
//! Each vendor has its own descriptor because they disagree on how the API
//! key is attached. All of them report errors as `error.message` and are
//! labelled "AI" in messages.

use crate::credential::{AuthScheme, CredentialKind};
use crate::descriptor::{Provider, ProviderDescriptor, nested_error_message, no_hint};
use crate::endpoints::{join, segment};
use crate::error::ProxyError;
use crate::proxy::{Prepared, ProviderAction, ProviderRequest, Upstream};
use crate::request::{AiRequest, require, require_credential, require_segment};
use crate::transport::UpstreamRequest;
use async_trait::async_trait;
use serde_json::{Value as JsonValue, json};
use std::str::FromStr;

pub static OPENAI: ProviderDescriptor = ProviderDescriptor {
    provider: Provider::Ai,
    auth: AuthScheme::Bearer,
    headers: &[],
    error_message: nested_error_message,
    status_hint: no_hint,
};

pub static ANTHROPIC: ProviderDescriptor = ProviderDescriptor {
    provider: Provider::Ai,
    auth: AuthScheme::Header("x-api-key"),
    headers: &[("anthropic-version", "2023-06-01")],
    error_message: nested_error_message,
    status_hint: no_hint,
};

pub static GOOGLE_AI: ProviderDescriptor = ProviderDescriptor {
    provider: Provider::Ai,
    auth: AuthScheme::QueryParam("key"),
    headers: &[],
    error_message: nested_error_message,
    status_hint: no_hint,
};

pub static GROQ: ProviderDescriptor = ProviderDescriptor {
    provider: Provider::Ai,
    auth: AuthScheme::Bearer,
    headers: &[],
    error_message: nested_error_message,
    status_hint: no_hint,
};

const DEFAULT_MAX_TOKENS: u32 = 1000;
const DEFAULT_TEMPERATURE: f64 = 0.7;
const NO_RESPONSE: &str = "No response";

/// Model vendors the AI route can talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiVendor {
    OpenAi,
    Anthropic,
    Google,
    Groq,
}

impl AiVendor {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Google => "google",
            Self::Groq => "groq",
        }
    }

    fn descriptor(self) -> &'static ProviderDescriptor {
        match self {
            Self::OpenAi => &OPENAI,
            Self::Anthropic => &ANTHROPIC,
            Self::Google => &GOOGLE_AI,
            Self::Groq => &GROQ,
        }
    }
}

impl FromStr for AiVendor {
    type Err = ProxyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "openai" => Ok(Self::OpenAi),
            "anthropic" => Ok(Self::Anthropic),
            "google" => Ok(Self::Google),
            "groq" => Ok(Self::Groq),
            _ => Err(ProxyError::UnsupportedAiProvider {
                name: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub vendor: AiVendor,
    pub model: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl ProviderRequest for AiRequest {
    type Action = Completion;
    const PROVIDER: Provider = Provider::Ai;

    fn prepare(self) -> Result<Prepared<Completion>, ProxyError> {
        let credential = require_credential(self.api_key, CredentialKind::ApiKey)?;
        let prompt = require(self.prompt, "Prompt")?;
        let vendor: AiVendor = self.provider.parse()?;
        let model = require_segment(self.model, "Model")?;
        Ok(Prepared {
            descriptor: vendor.descriptor(),
            credential,
            action: Completion {
                vendor,
                model,
                prompt,
                max_tokens: self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
                temperature: self.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            },
        })
    }
}

impl Completion {
    fn request(&self, upstream: &Upstream<'_>) -> UpstreamRequest {
        let endpoints = upstream.endpoints();
        let chat = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": self.prompt }],
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
        });
        match self.vendor {
            AiVendor::OpenAi => {
                UpstreamRequest::post(join(&endpoints.openai, "chat/completions")).with_json(chat)
            }
            AiVendor::Groq => {
                UpstreamRequest::post(join(&endpoints.groq, "chat/completions")).with_json(chat)
            }
            AiVendor::Anthropic => UpstreamRequest::post(join(&endpoints.anthropic, "messages"))
                .with_json(chat),
            AiVendor::Google => UpstreamRequest::post(join(
                &endpoints.google_ai,
                &format!("models/{}:generateContent", segment(&self.model)),
            ))
            .with_json(json!({
                "contents": [{ "parts": [{ "text": self.prompt }] }],
                "generationConfig": {
                    "maxOutputTokens": self.max_tokens,
                    "temperature": self.temperature,
                },
            })),
        }
    }

    /// Pulls the reply text out of a vendor response.
    fn reply(&self, body: &JsonValue) -> String {
        let pointer = match self.vendor {
            AiVendor::OpenAi | AiVendor::Groq => "/choices/0/message/content",
            AiVendor::Anthropic => "/content/0/text",
            AiVendor::Google => "/candidates/0/content/parts/0/text",
        };
        body.pointer(pointer)
            .and_then(JsonValue::as_str)
            .filter(|text| !text.is_empty())
            .unwrap_or(NO_RESPONSE)
            .to_string()
    }
}

#[async_trait]
impl ProviderAction for Completion {
    fn name(&self) -> &'static str {
        self.vendor.as_str()
    }

    async fn run(&self, upstream: &Upstream<'_>) -> Result<JsonValue, ProxyError> {
        let body = upstream.send(self.request(upstream)).await?;
        let usage = body
            .get("usage")
            .or_else(|| body.get("usageMetadata"))
            .cloned()
            .unwrap_or_else(|| json!({}));
        Ok(json!({
            "provider": self.vendor.as_str(),
            "model": self.model,
            "prompt": self.prompt,
            "response": self.reply(&body),
            "usage": usage,
            "timestamp": upstream.now(),
        }))
    }
}
