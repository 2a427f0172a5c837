use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Metadata record for one uploaded file, as returned by the backend.
/// The upload timestamp is zone-less on the wire (`2025-08-06T12:34:56`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    pub id: i64,
    pub file_name: String,
    pub line_count: i64,
    pub word_count: i64,
    pub uploaded_at: NaiveDateTime,
}

/// One page of the file listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResponse {
    pub content: Vec<FileMetadata>,
    pub total_pages: u32,
    pub total_elements: u64,
    /// Zero-based index of this page.
    pub number: u32,
    pub size: u32,
}

/// Body of a successful upload response. The backend may answer with a bare
/// `{"filename": ...}` object or with the stored metadata record, whose field
/// is `fileName`; both spellings are accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadReceipt {
    #[serde(default, alias = "fileName")]
    pub filename: Option<String>,
}

/// A local file chosen for upload. The name is taken from the final path
/// component and may be absent for paths without one.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: Option<String>,
}

impl SelectedFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned());
        Self { path, name }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("(unknown)")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_paged_response_deserializes_wire_names() {
        let body = json!({
            "content": [
                {
                    "id": 1,
                    "fileName": "notes.txt",
                    "lineCount": 10,
                    "wordCount": 42,
                    "uploadedAt": "2025-08-06T09:15:00"
                }
            ],
            "totalPages": 3,
            "totalElements": 12,
            "number": 0,
            "size": 5
        });

        let page: PagedResponse = serde_json::from_value(body).unwrap();
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_elements, 12);
        assert_eq!(page.number, 0);
        assert_eq!(page.size, 5);
        assert_eq!(page.content.len(), 1);
        assert_eq!(page.content[0].file_name, "notes.txt");
        assert_eq!(page.content[0].line_count, 10);
    }

    #[test]
    fn test_upload_receipt_accepts_both_filename_spellings() {
        let bare: UploadReceipt = serde_json::from_value(json!({"filename": "a.txt"})).unwrap();
        assert_eq!(bare.filename.as_deref(), Some("a.txt"));

        // Full metadata record, the way the backend actually answers
        let record: UploadReceipt = serde_json::from_value(json!({
            "id": 7,
            "fileName": "b.csv",
            "lineCount": 1,
            "wordCount": 2,
            "uploadedAt": "2025-08-06T09:15:00"
        }))
        .unwrap();
        assert_eq!(record.filename.as_deref(), Some("b.csv"));

        let empty: UploadReceipt = serde_json::from_value(json!({})).unwrap();
        assert!(empty.filename.is_none());
    }

    #[test]
    fn test_selected_file_name_from_path() {
        let file = SelectedFile::new("/tmp/data/report.txt");
        assert_eq!(file.name.as_deref(), Some("report.txt"));
        assert_eq!(file.display_name(), "report.txt");

        let nameless = SelectedFile::new("/tmp/data/..");
        assert!(nameless.name.is_none());
        assert_eq!(nameless.display_name(), "(unknown)");
    }
}
