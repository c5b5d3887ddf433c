//! `POST /api/webhooks/github`.

use super::signature::{SignatureCheck, check_github_signature};
use super::{WebhookAck, describe, parse, parse_body};
use crate::app::AppState;
use crate::error::WebhookError;
use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Response;
use nodeflow_core::WebhookDeliveryId;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::{debug, info};

const SOURCE: &str = "github";

#[derive(Debug, Deserialize)]
struct Repository {
    full_name: String,
}

#[derive(Debug, Deserialize)]
struct Account {
    login: String,
}

#[derive(Debug, Deserialize)]
struct Issue {
    number: u64,
    title: String,
    user: Account,
    #[serde(default)]
    created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IssueOpened {
    issue: Issue,
    repository: Repository,
}

#[derive(Debug, Deserialize)]
struct Pusher {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Push {
    #[serde(rename = "ref")]
    git_ref: String,
    commits: Vec<JsonValue>,
    pusher: Pusher,
    repository: Repository,
}

#[derive(Debug, Deserialize)]
struct PullRequest {
    number: u64,
    title: String,
    user: Account,
}

#[derive(Debug, Deserialize)]
struct PullRequestOpened {
    pull_request: PullRequest,
    repository: Repository,
}

fn is_opened(payload: &JsonValue) -> bool {
    payload.get("action").and_then(JsonValue::as_str) == Some("opened")
}

/// Handles one delivery whose signature has already been accepted.
pub(crate) fn process(
    delivery: &WebhookDeliveryId,
    event: Option<&str>,
    body: &[u8],
) -> Result<WebhookAck, WebhookError> {
    let payload = parse_body(SOURCE, body)?;

    match event {
        Some("issues") if is_opened(&payload) => {
            let opened: IssueOpened = parse(SOURCE, payload)?;
            info!(
                %delivery,
                issue = opened.issue.number,
                title = %opened.issue.title,
                repository = %opened.repository.full_name,
                author = %opened.issue.user.login,
                created_at = opened.issue.created_at.as_deref().unwrap_or_default(),
                "New GitHub issue"
            );
            return Ok(WebhookAck::triggered("GitHub issue webhook processed"));
        }
        Some("push") => {
            let push: Push = parse(SOURCE, payload)?;
            info!(
                %delivery,
                repository = %push.repository.full_name,
                commits = push.commits.len(),
                pusher = %push.pusher.name,
                git_ref = %push.git_ref,
                "GitHub push"
            );
            return Ok(WebhookAck::received("GitHub push webhook processed"));
        }
        Some("pull_request") if is_opened(&payload) => {
            let opened: PullRequestOpened = parse(SOURCE, payload)?;
            info!(
                %delivery,
                pull_request = opened.pull_request.number,
                title = %opened.pull_request.title,
                repository = %opened.repository.full_name,
                author = %opened.pull_request.user.login,
                "New GitHub pull request"
            );
            return Ok(WebhookAck::received("GitHub PR webhook processed"));
        }
        other => {
            debug!(%delivery, event = other.unwrap_or_default(), "Unhandled GitHub event");
        }
    }

    Ok(WebhookAck::received("GitHub webhook received"))
}

pub async fn receive(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, WebhookError> {
    let delivery = WebhookDeliveryId::new();
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

    match check_github_signature(
        state.webhooks.github_secret.as_deref(),
        header("x-hub-signature-256"),
        &body,
    ) {
        SignatureCheck::Mismatch => return Err(WebhookError::InvalidSignature),
        SignatureCheck::Skipped => debug!(%delivery, "GitHub delivery accepted unverified"),
        SignatureCheck::Verified => {}
    }

    process(&delivery, header("x-github-event"), &body).map(Json)
}

pub async fn probe() -> Response {
    describe("GitHub")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(event: &str, body: &JsonValue) -> Result<WebhookAck, WebhookError> {
        let bytes = serde_json::to_vec(body).expect("encode");
        process(&WebhookDeliveryId::new(), Some(event), &bytes)
    }

    fn repository() -> JsonValue {
        json!({"full_name": "acme/widgets"})
    }

    #[test]
    fn opened_issue_is_triggered() {
        let ack = run(
            "issues",
            &json!({
                "action": "opened",
                "issue": {"number": 7, "title": "Broken", "user": {"login": "octocat"},
                          "created_at": "2024-05-01T12:00:00Z"},
                "repository": repository(),
            }),
        )
        .expect("processed");

        assert_eq!(ack, WebhookAck::triggered("GitHub issue webhook processed"));
    }

    #[test]
    fn closed_issue_falls_through() {
        let ack = run("issues", &json!({"action": "closed"})).expect("processed");
        assert_eq!(ack, WebhookAck::received("GitHub webhook received"));
    }

    #[test]
    fn push_is_processed_without_trigger() {
        let ack = run(
            "push",
            &json!({
                "ref": "refs/heads/main",
                "commits": [{"id": "a"}, {"id": "b"}],
                "pusher": {"name": "octocat"},
                "repository": repository(),
            }),
        )
        .expect("processed");

        assert_eq!(ack, WebhookAck::received("GitHub push webhook processed"));
        assert_eq!(ack.triggered, None);
    }

    #[test]
    fn opened_pull_request_is_processed() {
        let ack = run(
            "pull_request",
            &json!({
                "action": "opened",
                "pull_request": {"number": 3, "title": "Fix", "user": {"login": "octocat"}},
                "repository": repository(),
            }),
        )
        .expect("processed");

        assert_eq!(ack, WebhookAck::received("GitHub PR webhook processed"));
    }

    #[test]
    fn push_missing_fields_is_malformed() {
        let err = run("push", &json!({"ref": "refs/heads/main"})).expect_err("malformed");
        assert!(matches!(err, WebhookError::MalformedPayload { .. }));
    }

    #[test]
    fn unknown_event_is_received() {
        let ack = run("star", &json!({"action": "created"})).expect("processed");
        assert_eq!(ack, WebhookAck::received("GitHub webhook received"));
    }
}
