//! Discord: plain messages, embeds and recent channel history via a bot.

use crate::credential::{AuthScheme, CredentialKind};
use crate::descriptor::{Provider, ProviderDescriptor, top_level_message};
use crate::endpoints::{join, segment};
use crate::error::ProxyError;
use crate::proxy::{Prepared, ProviderAction, ProviderRequest, Upstream};
use crate::request::{DiscordRequest, require, require_credential, require_segment};
use crate::transport::UpstreamRequest;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value as JsonValue, json};

pub static DISCORD: ProviderDescriptor = ProviderDescriptor {
    provider: Provider::Discord,
    auth: AuthScheme::Bot,
    headers: &[],
    error_message: top_level_message,
    status_hint,
};

/// Discord blurple.
const DEFAULT_EMBED_COLOR: u32 = 0x0058_65F2;
const HISTORY_LIMIT: u32 = 10;

fn status_hint(action: &str, status: u16) -> Option<&'static str> {
    match (status, action) {
        (401, _) => Some("Invalid bot token. Please check your bot token"),
        (404, _) => Some("Channel not found. Check your channel ID and ensure bot is in the server"),
        (403, "send_message") => Some(
            "Bot lacks permissions. Check: 1) Bot has \"Send Messages\" permission \
             2) Bot role is above channel permissions 3) Channel allows bot access",
        ),
        (403, "send_embed") => Some(
            "Bot lacks permissions. Check: 1) Bot has \"Send Messages\" and \"Embed Links\" \
             permissions 2) Bot role is above channel permissions",
        ),
        (403, "get_channel_messages") => Some(
            "Bot lacks permissions. Check: 1) Bot has \"Read Message History\" permission \
             2) Bot role is above channel permissions",
        ),
        _ => None,
    }
}

/// Parses `#RRGGBB` (the `#` is optional), falling back to the default colour.
fn parse_color(color: Option<&str>) -> u32 {
    color
        .map(|color| color.trim().trim_start_matches('#'))
        .filter(|hex| !hex.is_empty())
        .and_then(|hex| u32::from_str_radix(hex, 16).ok())
        .unwrap_or(DEFAULT_EMBED_COLOR)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscordAction {
    SendMessage {
        channel_id: String,
        content: String,
    },
    SendEmbed {
        channel_id: String,
        content: String,
        title: String,
        description: String,
        color: u32,
    },
    GetChannelMessages {
        channel_id: String,
    },
}

impl ProviderRequest for DiscordRequest {
    type Action = DiscordAction;
    const PROVIDER: Provider = Provider::Discord;

    fn prepare(self) -> Result<Prepared<DiscordAction>, ProxyError> {
        let credential = require_credential(self.bot_token, CredentialKind::BotToken)?;
        let channel_id = require_segment(self.channel_id, "Channel ID")?;
        let action = match self.action.as_str() {
            "send_message" => DiscordAction::SendMessage {
                channel_id,
                content: require(self.message, "Message content")?,
            },
            "send_embed" => DiscordAction::SendEmbed {
                channel_id,
                content: require(self.message, "Message content")?,
                title: require(self.embed_title, "Embed title")?,
                description: require(self.embed_description, "Embed description")?,
                color: parse_color(self.embed_color.as_deref()),
            },
            "get_channel_messages" => DiscordAction::GetChannelMessages { channel_id },
            _ => {
                return Err(ProxyError::UnsupportedAction {
                    provider: DISCORD.label(),
                    action: self.action,
                });
            }
        };
        Ok(Prepared {
            descriptor: &DISCORD,
            credential,
            action,
        })
    }
}

#[derive(Debug, Deserialize)]
struct PostedMessage {
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChannelMessage {
    id: Option<String>,
    content: Option<String>,
    author: Option<Author>,
    timestamp: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Author {
    username: Option<String>,
}

fn messages_url(base: &str, channel_id: &str) -> String {
    join(base, &format!("channels/{}/messages", segment(channel_id)))
}

#[async_trait]
impl ProviderAction for DiscordAction {
    fn name(&self) -> &'static str {
        match self {
            Self::SendMessage { .. } => "send_message",
            Self::SendEmbed { .. } => "send_embed",
            Self::GetChannelMessages { .. } => "get_channel_messages",
        }
    }

    async fn run(&self, upstream: &Upstream<'_>) -> Result<JsonValue, ProxyError> {
        let base = &upstream.endpoints().discord;
        match self {
            Self::SendMessage {
                channel_id,
                content,
            } => {
                let request =
                    UpstreamRequest::post(messages_url(base, channel_id))
                        .with_json(json!({ "content": content }));
                let posted: PostedMessage = upstream.send_as(request).await?;
                Ok(json!({
                    "messageId": posted.id,
                    "channelId": channel_id,
                    "content": content,
                    "sentAt": upstream.now(),
                }))
            }
            Self::SendEmbed {
                channel_id,
                content,
                title,
                description,
                color,
            } => {
                let sent_at = upstream.now();
                let request =
                    UpstreamRequest::post(messages_url(base, channel_id))
                        .with_json(json!({
                            "content": content,
                            "embeds": [{
                                "title": title,
                                "description": description,
                                "color": color,
                                "timestamp": sent_at,
                            }],
                        }));
                let posted: PostedMessage = upstream.send_as(request).await?;
                Ok(json!({
                    "messageId": posted.id,
                    "channelId": channel_id,
                    "embedTitle": title,
                    "embedDescription": description,
                    "sentAt": sent_at,
                }))
            }
            Self::GetChannelMessages { channel_id } => {
                let request =
                    UpstreamRequest::get(messages_url(base, channel_id))
                        .with_query("limit", HISTORY_LIMIT);
                let messages: Vec<ChannelMessage> = upstream.send_as(request).await?;
                let messages: Vec<JsonValue> = messages
                    .into_iter()
                    .map(|message| {
                        json!({
                            "id": message.id,
                            "content": message.content,
                            "author": message.author.and_then(|author| author.username),
                            "timestamp": message.timestamp,
                        })
                    })
                    .collect();
                Ok(json!({ "channelId": channel_id, "messages": messages }))
            }
        }
    }
}
