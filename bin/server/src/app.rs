//! The axum router: provider proxy routes, webhook receivers and health.

use crate::config::WebhookConfig;
use crate::webhooks::{github, gmail, youtube};
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use nodeflow_integration::{
    ActionResult, AiRequest, DiscordRequest, DriveRequest, GmailRequest, LinkedinRequest,
    ProviderRequest, Proxy, TwitterRequest, YoutubeRequest,
};
use serde::de::DeserializeOwned;
use serde_json::{Value as JsonValue, json};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::debug;

/// State shared by every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub proxy: Arc<Proxy>,
    pub webhooks: Arc<WebhookConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(proxy: Proxy, webhooks: WebhookConfig) -> Self {
        Self {
            proxy: Arc::new(proxy),
            webhooks: Arc::new(webhooks),
        }
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/gmail", post(proxy_action::<GmailRequest>))
        .route("/api/drive", post(proxy_action::<DriveRequest>))
        .route("/api/discord", post(proxy_action::<DiscordRequest>))
        .route("/api/twitter", post(proxy_action::<TwitterRequest>))
        .route("/api/youtube", post(proxy_action::<YoutubeRequest>))
        .route("/api/linkedin", post(proxy_action::<LinkedinRequest>))
        .route("/api/ai", post(proxy_action::<AiRequest>))
        .route(
            "/api/webhooks/github",
            post(github::receive).get(github::probe),
        )
        .route("/api/webhooks/gmail", post(gmail::receive).get(gmail::probe))
        .route(
            "/api/webhooks/youtube",
            post(youtube::receive).get(youtube::probe),
        )
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<JsonValue> {
    Json(json!({ "status": "ok" }))
}

/// Runs one provider request and answers with its envelope.
async fn proxy_action<R>(
    State(state): State<AppState>,
    body: Result<Json<R>, JsonRejection>,
) -> (StatusCode, Json<ActionResult>)
where
    R: ProviderRequest + DeserializeOwned + 'static,
{
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => {
            debug!(provider = %R::PROVIDER, error = %rejection, "Rejected request body");
            return (
                StatusCode::BAD_REQUEST,
                Json(ActionResult::failure(format!(
                    "Invalid request body: {}",
                    rejection.body_text()
                ))),
            );
        }
    };

    let response = state.proxy.respond(request).await;
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::BAD_GATEWAY);
    (status, Json(response.result))
}
