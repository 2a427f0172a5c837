use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    pub page_size: u32,
    pub refresh_policy: RefreshPolicy,
    pub clear_selection_after_upload: bool,
}

/// Which page the listing reloads after a successful upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RefreshPolicy {
    /// Jump back to the first page (historical behavior).
    FirstPage,
    /// Stay on the page currently being viewed.
    CurrentPage,
}

impl FromStr for RefreshPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "first-page" | "first" => Ok(RefreshPolicy::FirstPage),
            "current-page" | "current" => Ok(RefreshPolicy::CurrentPage),
            other => Err(anyhow!(
                "invalid refresh policy '{}', expected 'first-page' or 'current-page'",
                other
            )),
        }
    }
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let config = Self {
            api: ApiConfig {
                base_url: std::env::var("FILEPROC_API_URL")
                    .unwrap_or_else(|_| "http://localhost:8080/api/files".to_string()),
                timeout_secs: std::env::var("FILEPROC_HTTP_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .unwrap_or(30),
            },
            ui: UiConfig {
                page_size: std::env::var("FILEPROC_PAGE_SIZE")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()
                    .unwrap_or(5),
                refresh_policy: std::env::var("FILEPROC_REFRESH_POLICY")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(RefreshPolicy::FirstPage),
                clear_selection_after_upload: std::env::var("FILEPROC_CLEAR_SELECTION")
                    .map(|v| v.to_lowercase() == "true")
                    .unwrap_or(false),
            },
        };

        Ok(config)
    }
}
