//! YouTube Data API v3 search.

use crate::credential::{AuthScheme, CredentialKind};
use crate::descriptor::{Provider, ProviderDescriptor, nested_error_message, no_hint};
use crate::endpoints::join;
use crate::error::ProxyError;
use crate::proxy::{Prepared, ProviderAction, ProviderRequest, Upstream};
use crate::request::{YoutubeRequest, require, require_credential};
use crate::transport::UpstreamRequest;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value as JsonValue, json};

pub static YOUTUBE: ProviderDescriptor = ProviderDescriptor {
    provider: Provider::Youtube,
    auth: AuthScheme::Bearer,
    headers: &[],
    error_message: nested_error_message,
    status_hint: no_hint,
};

const DEFAULT_MAX_RESULTS: u32 = 10;
/// Upper bound the search endpoint accepts.
const MAX_RESULTS_CAP: u32 = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YoutubeAction {
    SearchVideos { query: String, max_results: u32 },
    ChannelVideos { channel_id: String, max_results: u32 },
}

impl ProviderRequest for YoutubeRequest {
    type Action = YoutubeAction;
    const PROVIDER: Provider = Provider::Youtube;

    fn prepare(self) -> Result<Prepared<YoutubeAction>, ProxyError> {
        let credential = require_credential(self.access_token, CredentialKind::AccessToken)?;
        let max_results = self
            .max_results
            .unwrap_or(DEFAULT_MAX_RESULTS)
            .min(MAX_RESULTS_CAP);
        let action = match self.action.as_str() {
            "search_videos" => YoutubeAction::SearchVideos {
                query: require(self.query, "Query")?,
                max_results,
            },
            "get_channel_videos" => YoutubeAction::ChannelVideos {
                channel_id: require(self.channel_id, "channelId")?,
                max_results,
            },
            _ => {
                return Err(ProxyError::UnsupportedAction {
                    provider: YOUTUBE.label(),
                    action: self.action,
                });
            }
        };
        Ok(Prepared {
            descriptor: &YOUTUBE,
            credential,
            action,
        })
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: Option<ItemId>,
    snippet: Option<Snippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemId {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    title: Option<String>,
    channel_title: Option<String>,
    published_at: Option<String>,
    thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Deserialize)]
struct Thumbnails {
    default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: Option<String>,
}

impl SearchItem {
    fn video_id(&self) -> Option<&str> {
        self.id.as_ref()?.video_id.as_deref()
    }

    fn thumbnail(&self) -> Option<&str> {
        self.snippet
            .as_ref()?
            .thumbnails
            .as_ref()?
            .default
            .as_ref()?
            .url
            .as_deref()
    }
}

#[async_trait]
impl ProviderAction for YoutubeAction {
    fn name(&self) -> &'static str {
        match self {
            Self::SearchVideos { .. } => "search_videos",
            Self::ChannelVideos { .. } => "get_channel_videos",
        }
    }

    async fn run(&self, upstream: &Upstream<'_>) -> Result<JsonValue, ProxyError> {
        let search = UpstreamRequest::get(join(&upstream.endpoints().youtube, "search"))
            .with_query("part", "snippet");
        match self {
            Self::SearchVideos { query, max_results } => {
                let request = search
                    .with_query("type", "video")
                    .with_query("maxResults", max_results)
                    .with_query("q", query);
                let response: SearchResponse = upstream.send_as(request).await?;
                let items: Vec<JsonValue> = response
                    .items
                    .iter()
                    .map(|item| {
                        let snippet = item.snippet.as_ref();
                        json!({
                            "id": item.video_id(),
                            "title": snippet.and_then(|s| s.title.as_deref()),
                            "channelTitle": snippet.and_then(|s| s.channel_title.as_deref()),
                            "publishedAt": snippet.and_then(|s| s.published_at.as_deref()),
                            "thumbnail": item.thumbnail(),
                        })
                    })
                    .collect();
                Ok(json!({ "action": self.name(), "query": query, "items": items }))
            }
            Self::ChannelVideos {
                channel_id,
                max_results,
            } => {
                let request = search
                    .with_query("channelId", channel_id)
                    .with_query("order", "date")
                    .with_query("type", "video")
                    .with_query("maxResults", max_results);
                let response: SearchResponse = upstream.send_as(request).await?;
                let items: Vec<JsonValue> = response
                    .items
                    .iter()
                    .map(|item| {
                        let snippet = item.snippet.as_ref();
                        json!({
                            "id": item.video_id(),
                            "title": snippet.and_then(|s| s.title.as_deref()),
                            "publishedAt": snippet.and_then(|s| s.published_at.as_deref()),
                            "thumbnail": item.thumbnail(),
                        })
                    })
                    .collect();
                Ok(json!({ "action": self.name(), "channelId": channel_id, "items": items }))
            }
        }
    }
}
