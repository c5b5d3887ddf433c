//! Google Drive: upload, download, list, search and folder creation.

use crate::credential::{AuthScheme, CredentialKind};
use crate::descriptor::{Provider, ProviderDescriptor, nested_error_message, no_hint};
use crate::endpoints::join;
use crate::error::ProxyError;
use crate::proxy::{Prepared, ProviderAction, ProviderRequest, Upstream};
use crate::request::{DriveRequest, require, require_credential};
use crate::transport::UpstreamRequest;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value as JsonValue, json};

pub static DRIVE: ProviderDescriptor = ProviderDescriptor {
    provider: Provider::Drive,
    auth: AuthScheme::Bearer,
    headers: &[],
    error_message: nested_error_message,
    status_hint: no_hint,
};

const BOUNDARY: &str = "-------314159265358979323846";
const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";
const FILE_FIELDS: &str = "files(id,name,mimeType,size,createdTime,webViewLink)";
const DEFAULT_CONTENT: &str = "Empty file content";
const PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriveAction {
    Upload {
        file_name: String,
        content: String,
        folder_id: Option<String>,
    },
    Download {
        file_name: String,
    },
    List,
    Search {
        query: String,
    },
    CreateFolder {
        name: String,
    },
}

impl ProviderRequest for DriveRequest {
    type Action = DriveAction;
    const PROVIDER: Provider = Provider::Drive;

    fn prepare(self) -> Result<Prepared<DriveAction>, ProxyError> {
        let credential = require_credential(self.access_token, CredentialKind::AccessToken)?;
        let action = match self.action.as_str() {
            "upload" => DriveAction::Upload {
                file_name: require(self.file_name, "File name")?,
                content: self
                    .file_content
                    .filter(|content| !content.is_empty())
                    .unwrap_or_else(|| DEFAULT_CONTENT.to_string()),
                folder_id: self.folder_id.filter(|id| !id.trim().is_empty()),
            },
            "download" => DriveAction::Download {
                file_name: require(self.file_name, "File name")?,
            },
            "list" => DriveAction::List,
            "search" => DriveAction::Search {
                query: require(self.search_query, "Search query")?,
            },
            "create_folder" => DriveAction::CreateFolder {
                name: require(self.file_name, "Folder name")?,
            },
            _ => {
                return Err(ProxyError::UnsupportedAction {
                    provider: DRIVE.label(),
                    action: self.action,
                });
            }
        };
        Ok(Prepared {
            descriptor: &DRIVE,
            credential,
            action,
        })
    }
}

/// Builds a `multipart/related` body: JSON metadata, then the text content.
fn multipart_body(metadata: &JsonValue, content: &str) -> String {
    format!(
        "\r\n--{BOUNDARY}\r\nContent-Type: application/json\r\n\r\n{metadata}\
         \r\n--{BOUNDARY}\r\nContent-Type: text/plain\r\n\r\n{content}\
         \r\n--{BOUNDARY}--"
    )
}

/// Quotes a value for use inside a Drive `q` string literal.
fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedFile {
    id: Option<String>,
    name: Option<String>,
    web_view_link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<FileEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileEntry {
    id: Option<String>,
    name: Option<String>,
    mime_type: Option<String>,
    /// Drive reports sizes as decimal strings.
    size: Option<String>,
    created_time: Option<String>,
    web_view_link: Option<String>,
}

impl FileEntry {
    fn summary(&self) -> JsonValue {
        json!({
            "id": self.id,
            "name": self.name,
            "mimeType": self.mime_type,
            "size": self.size.as_deref().and_then(|s| s.parse::<u64>().ok()).unwrap_or(0),
            "createdTime": self.created_time,
            "webViewLink": self.web_view_link,
        })
    }
}

async fn list_files(
    upstream: &Upstream<'_>,
    query: Option<&str>,
) -> Result<Vec<JsonValue>, ProxyError> {
    let mut request = UpstreamRequest::get(join(&upstream.endpoints().drive, "drive/v3/files"));
    if let Some(query) = query {
        request = request.with_query("q", query);
    }
    let list: FileList = upstream
        .send_as(
            request
                .with_query("pageSize", PAGE_SIZE)
                .with_query("fields", FILE_FIELDS),
        )
        .await?;
    Ok(list.files.iter().map(FileEntry::summary).collect())
}

#[async_trait]
impl ProviderAction for DriveAction {
    fn name(&self) -> &'static str {
        match self {
            Self::Upload { .. } => "upload",
            Self::Download { .. } => "download",
            Self::List => "list",
            Self::Search { .. } => "search",
            Self::CreateFolder { .. } => "create_folder",
        }
    }

    async fn run(&self, upstream: &Upstream<'_>) -> Result<JsonValue, ProxyError> {
        let base = &upstream.endpoints().drive;
        match self {
            Self::Upload {
                file_name,
                content,
                folder_id,
            } => {
                let mut metadata = json!({ "name": file_name, "mimeType": "text/plain" });
                if let Some(folder_id) = folder_id {
                    metadata["parents"] = json!([folder_id]);
                }
                let request = UpstreamRequest::post(join(base, "upload/drive/v3/files"))
                    .with_query("uploadType", "multipart")
                    .with_query("fields", "id,name,webViewLink")
                    .with_raw_body(
                        format!("multipart/related; boundary={BOUNDARY}"),
                        multipart_body(&metadata, content),
                    );
                let file: CreatedFile = upstream.send_as(request).await?;
                let id = file.id.unwrap_or_default();
                Ok(json!({
                    "webViewLink": file
                        .web_view_link
                        .unwrap_or_else(|| format!("https://drive.google.com/file/d/{id}/view")),
                    "fileId": id,
                    "fileName": file.name.as_deref().unwrap_or(file_name),
                    "size": content.len(),
                    "uploadedAt": upstream.now(),
                }))
            }
            Self::Download { file_name } => {
                let request = UpstreamRequest::get(join(base, "drive/v3/files"))
                    .with_query("q", format!("name={}", quote_literal(file_name)))
                    .with_query("fields", "files(id,name)");
                let list: FileList = upstream.send_as(request).await?;
                let id = list
                    .files
                    .into_iter()
                    .find_map(|file| file.id)
                    .ok_or_else(|| ProxyError::NotFound {
                        message: format!("File '{file_name}' not found"),
                    })?;
                Ok(json!({
                    "downloadUrl": format!("https://drive.google.com/uc?export=download&id={id}"),
                    "fileId": id,
                    "fileName": file_name,
                    "downloadedAt": upstream.now(),
                }))
            }
            Self::List => {
                let files = list_files(upstream, None).await?;
                Ok(json!({ "files": files }))
            }
            Self::Search { query } => {
                let results = list_files(upstream, Some(query)).await?;
                Ok(json!({ "query": query, "results": results }))
            }
            Self::CreateFolder { name } => {
                let request = UpstreamRequest::post(join(base, "drive/v3/files"))
                    .with_query("fields", "id,name,webViewLink")
                    .with_json(json!({ "name": name, "mimeType": FOLDER_MIME_TYPE }));
                let folder: CreatedFile = upstream.send_as(request).await?;
                let id = folder.id.unwrap_or_default();
                Ok(json!({
                    "webViewLink": folder
                        .web_view_link
                        .unwrap_or_else(|| format!("https://drive.google.com/drive/folders/{id}")),
                    "folderId": id,
                    "name": folder.name.as_deref().unwrap_or(name),
                    "createdTime": upstream.now(),
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;
    use crate::providers::test_support::{NOW, proxy};
    use crate::transport::RequestBody;

    fn request(action: &str) -> DriveRequest {
        DriveRequest {
            action: action.to_string(),
            access_token: Some("ya29.token".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn upload_sends_multipart_and_falls_back_to_view_link() {
        let mock = MockTransport::new().on_json(
            "/upload/drive/v3/files",
            200,
            json!({"id": "f1", "name": "notes.txt"}),
        );
        let response = proxy(&mock)
            .respond(DriveRequest {
                file_name: Some("notes.txt".to_string()),
                folder_id: Some("dir-9".to_string()),
                ..request("upload")
            })
            .await;

        assert_eq!(
            response.result.data,
            Some(json!({
                "fileId": "f1",
                "fileName": "notes.txt",
                "size": DEFAULT_CONTENT.len(),
                "uploadedAt": NOW,
                "webViewLink": "https://drive.google.com/file/d/f1/view",
            }))
        );

        let calls = mock.calls();
        assert_eq!(calls[0].query_value("uploadType"), Some("multipart"));
        match &calls[0].body {
            RequestBody::Raw { content_type, body } => {
                assert_eq!(
                    content_type,
                    "multipart/related; boundary=-------314159265358979323846"
                );
                assert!(body.contains(r#""parents":["dir-9"]"#), "{body}");
                assert!(body.contains("\r\n\r\nEmpty file content\r\n"), "{body}");
                assert!(body.ends_with("--"), "{body}");
            }
            other => panic!("expected raw body, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn download_without_match_is_not_found() {
        let mock = MockTransport::new().on_json("/drive/v3/files", 200, json!({"files": []}));
        let response = proxy(&mock)
            .respond(DriveRequest {
                file_name: Some("it's.txt".to_string()),
                ..request("download")
            })
            .await;

        assert_eq!(response.status, 404);
        assert_eq!(
            response.result.error.as_deref(),
            Some("File 'it's.txt' not found")
        );
        assert_eq!(mock.calls()[0].query_value("q"), Some(r"name='it\'s.txt'"));
    }

    #[tokio::test]
    async fn download_reports_direct_link() {
        let mock = MockTransport::new().on_json(
            "/drive/v3/files",
            200,
            json!({"files": [{"id": "abc", "name": "report.pdf"}]}),
        );
        let response = proxy(&mock)
            .respond(DriveRequest {
                file_name: Some("report.pdf".to_string()),
                ..request("download")
            })
            .await;

        let data = response.result.data.expect("data");
        assert_eq!(data["fileId"], "abc");
        assert_eq!(
            data["downloadUrl"],
            "https://drive.google.com/uc?export=download&id=abc"
        );
    }

    #[tokio::test]
    async fn list_parses_sizes_and_defaults_to_zero() {
        let mock = MockTransport::new().on_json(
            "/drive/v3/files",
            200,
            json!({"files": [
                {"id": "1", "name": "a", "mimeType": "text/plain", "size": "2048"},
                {"id": "2", "name": "folder", "mimeType": FOLDER_MIME_TYPE}
            ]}),
        );
        let response = proxy(&mock).respond(request("list")).await;

        let data = response.result.data.expect("data");
        assert_eq!(data["files"][0]["size"], 2048);
        assert_eq!(data["files"][1]["size"], 0);
        assert_eq!(mock.calls()[0].query_value("pageSize"), Some("10"));
    }

    #[tokio::test]
    async fn create_folder_requires_name() {
        let mock = MockTransport::new();
        let response = proxy(&mock).respond(request("create_folder")).await;

        assert_eq!(response.status, 400);
        assert_eq!(
            response.result.error.as_deref(),
            Some("Folder name is required")
        );
        assert_eq!(mock.call_count(), 0);
    }
}
