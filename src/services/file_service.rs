use futures::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::Stream;
use tokio_util::io::ReaderStream;

use crate::models::{FileMetadata, PagedResponse, SelectedFile, UploadReceipt};

/// Errors surfaced by the file-processor API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Non-2xx response; `message` is the server-provided error text.
    #[error("{message}")]
    Api { status: StatusCode, message: String },
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error body shape used by the backend: `{"error": ...}` for request
/// failures, `{"message": ...}` for framework-level ones.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

impl ApiError {
    async fn from_response(response: reqwest::Response) -> ApiError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|parsed| parsed.error.or(parsed.message))
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    format!("HTTP {}", status)
                } else {
                    body.trim().to_string()
                }
            });
        ApiError::Api { status, message }
    }
}

/// Progress and completion events observed while an upload is in flight.
#[derive(Debug, Clone)]
pub enum UploadEvent {
    Progress { bytes_sent: u64, total_bytes: u64 },
    Completed(UploadReceipt),
}

/// HTTP access layer for the file-processor backend. Stateless apart from the
/// configured base URL; callers own all retry/refresh decisions.
#[derive(Debug, Clone)]
pub struct FileServiceClient {
    client: Client,
    base_url: String,
}

impl FileServiceClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let client = Client::builder()
            .user_agent(concat!("fileproc-ui/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Upload one file as a multipart POST. Returns an event stream: zero or
    /// more `Progress` items while the body uploads, then exactly one
    /// terminal item, either `Completed` or the error.
    pub fn upload(
        &self,
        selection: &SelectedFile,
    ) -> impl Stream<Item = Result<UploadEvent, ApiError>> + Unpin {
        let (tx, rx) = mpsc::channel(16);
        let client = self.client.clone();
        let url = format!("{}/upload", self.base_url);
        let path = selection.path.clone();
        let file_name = selection.display_name().to_string();

        tokio::spawn(async move {
            let outcome = run_upload(client, url, path, file_name, tx.clone()).await;
            let terminal = match outcome {
                Ok(receipt) => Ok(UploadEvent::Completed(receipt)),
                Err(err) => Err(err),
            };
            let _ = tx.send(terminal).await;
        });

        ReceiverStream::new(rx)
    }

    /// Fetch one page of the file listing.
    pub async fn list(&self, page: u32, size: u32) -> Result<PagedResponse, ApiError> {
        let url = format!("{}/list?page={}&size={}", self.base_url, page, size);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(ApiError::from_response(response).await);
        }

        Ok(response.json::<PagedResponse>().await?)
    }

    /// Fetch the metadata record for a single file.
    pub async fn get_by_id(&self, id: i64) -> Result<FileMetadata, ApiError> {
        let url = format!("{}/{}", self.base_url, id);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(ApiError::from_response(response).await);
        }

        Ok(response.json::<FileMetadata>().await?)
    }
}

async fn run_upload(
    client: Client,
    url: String,
    path: PathBuf,
    file_name: String,
    progress: mpsc::Sender<Result<UploadEvent, ApiError>>,
) -> Result<UploadReceipt, ApiError> {
    let file = tokio::fs::File::open(&path).await.map_err(|source| ApiError::Io {
        path: path.clone(),
        source,
    })?;
    let total_bytes = file
        .metadata()
        .await
        .map_err(|source| ApiError::Io {
            path: path.clone(),
            source,
        })?
        .len();

    // Count bytes as chunks leave for the wire. Progress is advisory, so a
    // full channel drops the increment rather than stalling the upload.
    let mut bytes_sent = 0u64;
    let counted = ReaderStream::new(file).map(move |chunk| {
        if let Ok(bytes) = &chunk {
            bytes_sent += bytes.len() as u64;
            let _ = progress.try_send(Ok(UploadEvent::Progress {
                bytes_sent,
                total_bytes,
            }));
        }
        chunk
    });

    let part = Part::stream_with_length(reqwest::Body::wrap_stream(counted), total_bytes)
        .file_name(file_name)
        .mime_str(mime_guess::from_path(&path).first_or_octet_stream().as_ref())?;
    let form = Form::new().part("file", part);

    let response = client.post(&url).multipart(form).send().await?;
    if !response.status().is_success() {
        return Err(ApiError::from_response(response).await);
    }

    Ok(response.json::<UploadReceipt>().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = FileServiceClient::new(
            "http://localhost:8080/api/files/",
            Duration::from_secs(30),
        );
        assert_eq!(client.base_url, "http://localhost:8080/api/files");
    }

    #[test]
    fn test_api_error_display_is_server_message() {
        let err = ApiError::Api {
            status: StatusCode::BAD_REQUEST,
            message: "Only .txt or .csv files are allowed".to_string(),
        };
        assert_eq!(err.to_string(), "Only .txt or .csv files are allowed");
    }
}
