//! `POST /api/webhooks/youtube`.

use super::{ChallengeQuery, WebhookAck, event_type, parse, parse_body, probe_response};
use crate::error::WebhookError;
use axum::Json;
use axum::body::Bytes;
use axum::extract::Query;
use axum::response::Response;
use nodeflow_core::WebhookDeliveryId;
use serde::Deserialize;
use tracing::info;

const SOURCE: &str = "youtube";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct VideoData {
    video_id: Option<String>,
    title: Option<String>,
    channel_id: Option<String>,
    channel_title: Option<String>,
    published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoUploaded {
    video_data: VideoData,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ChannelData {
    channel_id: Option<String>,
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelUpdate {
    channel_data: ChannelData,
}

pub(crate) fn process(
    delivery: &WebhookDeliveryId,
    body: &[u8],
) -> Result<WebhookAck, WebhookError> {
    let payload = parse_body(SOURCE, body)?;
    match event_type(&payload).as_deref() {
        Some("video_uploaded") => {
            let VideoUploaded { video_data: video } = parse(SOURCE, payload)?;
            info!(
                %delivery,
                video_id = video.video_id.as_deref().unwrap_or_default(),
                title = video.title.as_deref().unwrap_or_default(),
                channel_id = video.channel_id.as_deref().unwrap_or_default(),
                channel_title = video.channel_title.as_deref().unwrap_or_default(),
                published_at = video.published_at.as_deref().unwrap_or_default(),
                "New YouTube video"
            );
            Ok(WebhookAck::triggered("YouTube webhook processed"))
        }
        Some("channel_update") => {
            let ChannelUpdate { channel_data: channel } = parse(SOURCE, payload)?;
            info!(
                %delivery,
                channel_id = channel.channel_id.as_deref().unwrap_or_default(),
                title = channel.title.as_deref().unwrap_or_default(),
                "YouTube channel updated"
            );
            Ok(WebhookAck::received("YouTube channel webhook processed"))
        }
        _ => Ok(WebhookAck::received("YouTube webhook received")),
    }
}

pub async fn receive(body: Bytes) -> Result<Json<WebhookAck>, WebhookError> {
    process(&WebhookDeliveryId::new(), &body).map(Json)
}

pub async fn probe(Query(query): Query<ChallengeQuery>) -> Response {
    probe_response("YouTube", query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(body: &serde_json::Value) -> Result<WebhookAck, WebhookError> {
        let bytes = serde_json::to_vec(body).expect("encode");
        process(&WebhookDeliveryId::new(), &bytes)
    }

    #[test]
    fn uploaded_video_is_triggered() {
        let ack = run(&json!({
            "type": "video_uploaded",
            "videoData": {"videoId": "dQw4w9WgXcQ", "title": "Launch", "channelId": "UC1"}
        }))
        .expect("processed");

        assert_eq!(ack, WebhookAck::triggered("YouTube webhook processed"));
    }

    #[test]
    fn channel_update_is_processed() {
        let ack = run(&json!({
            "type": "channel_update",
            "channelData": {"channelId": "UC1", "title": "Renamed"}
        }))
        .expect("processed");

        assert_eq!(ack, WebhookAck::received("YouTube channel webhook processed"));
    }

    #[test]
    fn upload_without_video_data_is_malformed() {
        let err = run(&json!({"type": "video_uploaded"})).expect_err("malformed");
        assert!(matches!(err, WebhookError::MalformedPayload { .. }));
    }

    #[test]
    fn non_string_type_is_received() {
        let ack = run(&json!({"type": ["video_uploaded"]})).expect("processed");
        assert_eq!(ack, WebhookAck::received("YouTube webhook received"));
    }

    #[test]
    fn untyped_body_is_received() {
        let ack = run(&json!({"hello": "world"})).expect("processed");
        assert_eq!(ack, WebhookAck::received("YouTube webhook received"));
    }
}
