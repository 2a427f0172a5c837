use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fileproc_ui::app::App;
use fileproc_ui::config::{AppConfig, RefreshPolicy};

#[derive(Parser)]
#[command(name = "fileproc-ui")]
#[command(about = "Terminal front-end for the file-processor service", long_about = None)]
struct Cli {
    /// Base URL of the file-processor API
    #[arg(long)]
    api_url: Option<String>,

    /// Number of files per listing page
    #[arg(long)]
    page_size: Option<u32>,

    /// Page reloaded after a successful upload: first-page or current-page
    #[arg(long)]
    refresh_policy: Option<RefreshPolicy>,

    /// Clear the selected file after a successful upload
    #[arg(long)]
    clear_selection: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing; logs go to stderr so the prompt stays readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fileproc_ui=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    // Load configuration, then apply command-line overrides
    let mut config = AppConfig::new()?;
    if let Some(api_url) = cli.api_url {
        config.api.base_url = api_url;
    }
    if let Some(page_size) = cli.page_size {
        config.ui.page_size = page_size;
    }
    if let Some(refresh_policy) = cli.refresh_policy {
        config.ui.refresh_policy = refresh_policy;
    }
    if cli.clear_selection {
        config.ui.clear_selection_after_upload = true;
    }

    info!("Using file-processor API at {}", config.api.base_url);

    App::new(&config).run().await
}
