use anyhow::Result;
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::info;

use crate::config::{AppConfig, RefreshPolicy};
use crate::services::FileServiceClient;
use crate::ui::{ListingWidget, UploadCompleted, UploadWidget};

const HELP: &str = "Commands:
  select <path>   choose a local file to upload
  upload          upload the selected file
  list            reload the page currently shown
  page <n>        jump to page n (as shown in the footer)
  next / prev     step one page forward or back
  show <id>       print the metadata record for one file
  help            show this message
  quit            exit";

/// Root container: owns both widgets, consumes upload-completed events, and
/// drives the interactive command loop.
pub struct App {
    upload: UploadWidget,
    listing: ListingWidget,
    completed_rx: mpsc::UnboundedReceiver<UploadCompleted>,
    refresh_policy: RefreshPolicy,
    client: FileServiceClient,
}

impl App {
    pub fn new(config: &AppConfig) -> Self {
        let client = FileServiceClient::new(
            &config.api.base_url,
            Duration::from_secs(config.api.timeout_secs),
        );
        let (completed_tx, completed_rx) = mpsc::unbounded_channel();

        Self {
            upload: UploadWidget::new(
                client.clone(),
                completed_tx,
                config.ui.clear_selection_after_upload,
            ),
            listing: ListingWidget::new(client.clone(), config.ui.page_size),
            completed_rx,
            refresh_policy: config.ui.refresh_policy,
            client,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        self.listing.load_files(0).await;
        self.render_listing();
        println!("Type 'help' for a list of commands.");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            // Uploads announce completion over the event channel; apply any
            // pending refreshes before prompting again
            while let Ok(UploadCompleted) = self.completed_rx.try_recv() {
                self.refresh_after_upload().await;
            }

            self.prompt();
            let Some(line) = lines.next_line().await? else {
                break;
            };
            if !self.handle_command(line.trim()).await {
                break;
            }
        }

        Ok(())
    }

    async fn refresh_after_upload(&mut self) {
        let page = match self.refresh_policy {
            RefreshPolicy::FirstPage => 0,
            RefreshPolicy::CurrentPage => self.listing.current_page(),
        };
        info!("Refreshing file list after upload");
        self.listing.load_files(page).await;
        self.render_listing();
    }

    /// Returns false when the loop should exit.
    async fn handle_command(&mut self, line: &str) -> bool {
        let (verb, rest) = line
            .split_once(char::is_whitespace)
            .map(|(verb, rest)| (verb, rest.trim()))
            .unwrap_or((line, ""));

        match verb {
            "" => {}
            "select" => {
                if rest.is_empty() {
                    println!("usage: select <path>");
                } else {
                    self.upload.select(rest);
                    println!("{}", self.upload.message());
                }
            }
            "upload" => {
                self.upload.upload().await;
                println!("{}", self.upload.message());
            }
            "list" => {
                self.listing.load_files(self.listing.current_page()).await;
                self.render_listing();
            }
            "page" => match rest.parse::<u32>() {
                Ok(shown) if shown > 0 => self.go_to_page(shown - 1).await,
                _ => println!("usage: page <number>"),
            },
            "next" => self.go_to_page(self.listing.current_page() + 1).await,
            "prev" => match self.listing.current_page().checked_sub(1) {
                Some(page) => self.go_to_page(page).await,
                None => println!("Already on the first page"),
            },
            "show" => match rest.parse::<i64>() {
                Ok(id) => self.show_file(id).await,
                Err(_) => println!("usage: show <id>"),
            },
            "help" => println!("{}", HELP),
            "quit" | "exit" | "q" => return false,
            other => println!("Unknown command '{}', type 'help' for a list", other),
        }

        true
    }

    async fn go_to_page(&mut self, page: u32) {
        if self.listing.go_to_page(page).await {
            self.render_listing();
        } else {
            println!("Page {} is out of range", page + 1);
        }
    }

    async fn show_file(&mut self, id: i64) {
        match self.client.get_by_id(id).await {
            Ok(file) => {
                println!("{} (id {})", file.file_name, file.id);
                println!(
                    "  lines: {}  words: {}  uploaded: {}",
                    file.line_count,
                    file.word_count,
                    file.uploaded_at.format("%Y-%m-%d %H:%M:%S")
                );
            }
            Err(err) => println!("Error: {}", err),
        }
    }

    fn render_listing(&self) {
        if self.listing.total_pages() == 0 {
            println!("No files uploaded yet.");
            return;
        }

        println!(
            "{:>5}  {:<32} {:>8} {:>8}  {}",
            "ID", "NAME", "LINES", "WORDS", "UPLOADED"
        );
        for file in self.listing.files() {
            println!(
                "{:>5}  {:<32} {:>8} {:>8}  {}",
                file.id,
                file.file_name,
                file.line_count,
                file.word_count,
                file.uploaded_at.format("%Y-%m-%d %H:%M:%S")
            );
        }
        println!(
            "Page {} of {}",
            self.listing.current_page() + 1,
            self.listing.total_pages()
        );
    }

    fn prompt(&self) {
        print!("> ");
        let _ = std::io::stdout().flush();
    }
}
