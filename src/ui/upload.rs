use futures::StreamExt;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::models::{SelectedFile, UploadReceipt};
use crate::services::{FileServiceClient, UploadEvent};

/// Sent once per successful upload; carries no payload. Consumed by the app
/// coordinator to trigger a listing refresh.
#[derive(Debug)]
pub struct UploadCompleted;

/// Selection-and-upload state machine. Holds at most one selected local file
/// and the last status message shown to the user.
pub struct UploadWidget {
    client: FileServiceClient,
    selected: Option<SelectedFile>,
    message: String,
    completed_tx: mpsc::UnboundedSender<UploadCompleted>,
    clear_after_upload: bool,
}

impl UploadWidget {
    pub fn new(
        client: FileServiceClient,
        completed_tx: mpsc::UnboundedSender<UploadCompleted>,
        clear_after_upload: bool,
    ) -> Self {
        Self {
            client,
            selected: None,
            message: String::new(),
            completed_tx,
            clear_after_upload,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    /// Replace the current selection with the given path.
    pub fn select(&mut self, path: &str) {
        let file = SelectedFile::new(path);
        self.message = format!("Selected file: {}", file.display_name());
        self.selected = Some(file);
    }

    /// Attempt to upload the current selection. All outcomes land in
    /// `message`; a completion event is sent on success only. The selection
    /// survives the attempt unless clearing after upload is configured.
    pub async fn upload(&mut self) {
        let Some(selection) = self.selected.clone() else {
            self.message = "No file selected".to_string();
            return;
        };

        let mut events = self.client.upload(&selection);
        while let Some(event) = events.next().await {
            match event {
                Ok(UploadEvent::Progress {
                    bytes_sent,
                    total_bytes,
                }) => {
                    debug!("Upload progress: {}/{} bytes", bytes_sent, total_bytes);
                }
                Ok(UploadEvent::Completed(receipt)) => {
                    let resolved = resolved_name(&receipt, &selection);
                    info!("Upload successful: {}", resolved);
                    self.message = format!("✅ Upload successful: {}", resolved);
                    let _ = self.completed_tx.send(UploadCompleted);
                    if self.clear_after_upload {
                        self.selected = None;
                    }
                    return;
                }
                Err(err) => {
                    self.message = format!("Upload failed: {}", err);
                    return;
                }
            }
        }

        // Stream ended without a terminal event; treat as a failed attempt.
        self.message = "Upload failed: connection closed".to_string();
    }
}

/// Name shown after a successful upload: the server-reported filename,
/// falling back to the local selection's name, falling back to a literal.
fn resolved_name(receipt: &UploadReceipt, selection: &SelectedFile) -> String {
    receipt
        .filename
        .clone()
        .or_else(|| selection.name.clone())
        .unwrap_or_else(|| "(unknown)".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection(path: &str) -> SelectedFile {
        SelectedFile::new(path)
    }

    #[test]
    fn test_resolved_name_prefers_server_filename() {
        let receipt = UploadReceipt {
            filename: Some("server.txt".to_string()),
        };
        assert_eq!(
            resolved_name(&receipt, &selection("/tmp/local.txt")),
            "server.txt"
        );
    }

    #[test]
    fn test_resolved_name_falls_back_to_local_name() {
        let receipt = UploadReceipt { filename: None };
        assert_eq!(
            resolved_name(&receipt, &selection("/tmp/local.txt")),
            "local.txt"
        );
    }

    #[test]
    fn test_resolved_name_falls_back_to_unknown() {
        let receipt = UploadReceipt { filename: None };
        assert_eq!(resolved_name(&receipt, &selection("/tmp/..")), "(unknown)");
    }

    #[tokio::test]
    async fn test_upload_without_selection_sets_message_and_sends_nothing() {
        let client = FileServiceClient::new(
            "http://localhost:9/api/files",
            std::time::Duration::from_secs(1),
        );
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut widget = UploadWidget::new(client, tx, false);

        widget.upload().await;

        assert_eq!(widget.message(), "No file selected");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_select_updates_message() {
        let client = FileServiceClient::new(
            "http://localhost:9/api/files",
            std::time::Duration::from_secs(1),
        );
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut widget = UploadWidget::new(client, tx, false);

        widget.select("/tmp/report.txt");

        assert_eq!(widget.message(), "Selected file: report.txt");
        assert!(widget.selected().is_some());
    }
}
