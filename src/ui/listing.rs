use tracing::{debug, error};

use crate::models::{FileMetadata, PagedResponse};
use crate::services::FileServiceClient;

/// Paginated-listing state machine. Holds exactly one page of metadata at a
/// time; every navigation re-fetches from the backend.
pub struct ListingWidget {
    client: FileServiceClient,
    files: Vec<FileMetadata>,
    total_pages: u32,
    current_page: u32,
    page_size: u32,
    /// Stamp of the most recently issued request. Responses carrying an older
    /// stamp lost the race to a newer navigation and are discarded.
    generation: u64,
}

impl ListingWidget {
    pub fn new(client: FileServiceClient, page_size: u32) -> Self {
        Self {
            client,
            files: Vec::new(),
            total_pages: 0,
            current_page: 0,
            page_size,
            generation: 0,
        }
    }

    pub fn files(&self) -> &[FileMetadata] {
        &self.files
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Fetch the given page and replace the displayed state wholesale. On
    /// failure the error is logged and the prior state is left intact.
    pub async fn load_files(&mut self, page: u32) {
        let generation = self.begin_load();
        match self.client.list(page, self.page_size).await {
            Ok(response) => {
                self.apply_page(generation, response);
            }
            Err(err) => error!("Error loading files: {}", err),
        }
    }

    /// Navigate to `page` if it exists; out-of-range pages are a no-op and
    /// issue no request.
    pub async fn go_to_page(&mut self, page: u32) -> bool {
        if page >= self.total_pages {
            return false;
        }
        self.load_files(page).await;
        true
    }

    /// Stamp a new request. Issuing a load invalidates every earlier one.
    pub fn begin_load(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Apply a fetched page unless a newer request was issued meanwhile.
    /// Returns whether the response was applied.
    pub fn apply_page(&mut self, generation: u64, response: PagedResponse) -> bool {
        if generation != self.generation {
            debug!(
                "Discarding stale page response (generation {} < {})",
                generation, self.generation
            );
            return false;
        }
        self.files = response.content;
        self.total_pages = response.total_pages;
        self.current_page = response.number;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn widget() -> ListingWidget {
        let client =
            FileServiceClient::new("http://localhost:9/api/files", Duration::from_secs(1));
        ListingWidget::new(client, 5)
    }

    fn page(number: u32, total_pages: u32, names: &[&str]) -> PagedResponse {
        let content = names
            .iter()
            .enumerate()
            .map(|(i, name)| FileMetadata {
                id: i as i64 + 1,
                file_name: name.to_string(),
                line_count: 1,
                word_count: 1,
                uploaded_at: chrono::NaiveDate::from_ymd_opt(2025, 8, 6)
                    .unwrap()
                    .and_hms_opt(9, 0, 0)
                    .unwrap(),
            })
            .collect::<Vec<_>>();
        PagedResponse {
            total_elements: content.len() as u64,
            size: 5,
            content,
            total_pages,
            number,
        }
    }

    #[tokio::test]
    async fn test_go_to_page_rejects_out_of_range_without_request() {
        let mut listing = widget();
        let generation = listing.begin_load();
        listing.apply_page(generation, page(0, 3, &["a.txt"]));

        // Page 3 of 3 does not exist; the widget must not touch the network
        // (the client points at a dead port, so any request would fail loudly)
        assert!(!listing.go_to_page(3).await);
        assert_eq!(listing.current_page(), 0);
        assert_eq!(listing.total_pages(), 3);
        assert_eq!(listing.files().len(), 1);
    }

    #[tokio::test]
    async fn test_go_to_page_rejects_everything_when_empty() {
        let mut listing = widget();
        assert_eq!(listing.total_pages(), 0);
        assert!(!listing.go_to_page(0).await);
    }

    #[test]
    fn test_apply_page_replaces_state_wholesale() {
        let mut listing = widget();
        let generation = listing.begin_load();
        assert!(listing.apply_page(generation, page(2, 3, &["k.txt", "l.txt"])));

        assert_eq!(listing.current_page(), 2);
        assert_eq!(listing.total_pages(), 3);
        assert_eq!(listing.files().len(), 2);
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut listing = widget();
        let first = listing.begin_load();
        let second = listing.begin_load();

        // The older request resolves last in wall-clock order here, but its
        // stamp is stale either way
        assert!(listing.apply_page(second, page(1, 3, &["new.txt"])));
        assert!(!listing.apply_page(first, page(0, 3, &["old.txt"])));

        assert_eq!(listing.current_page(), 1);
        assert_eq!(listing.files()[0].file_name, "new.txt");
    }
}
