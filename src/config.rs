//! Run configuration
//!
//! Loaded once at startup from a JSON file; read-only afterwards. Credentials
//! are deliberately not part of the file, they come from the environment (see
//! `login`).

use crate::error::{BotError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_locale")]
    pub locale: String,

    pub base_url: String,

    /// Search keywords, OR-combined into a single query.
    pub keywords: Vec<String>,

    pub location: String,

    /// Selectors of the workplace-type filter options to enable.
    #[serde(default)]
    pub workplace_types: Vec<String>,

    /// Explicit Chrome executable; system discovery when absent.
    #[serde(default)]
    pub browser_path: Option<String>,

    /// Extra window-size argument, e.g. "--window-size=1920,1080".
    #[serde(default)]
    pub resolution: Option<String>,

    #[serde(default = "default_jobs_per_page")]
    pub jobs_per_page: u32,

    /// Title patterns rejected by whole-word match.
    #[serde(default)]
    pub avoid_job_titles: Vec<String>,

    /// Company-name substrings rejected case-insensitively.
    #[serde(default)]
    pub avoid_companies: Vec<String>,

    #[serde(default = "default_start_page")]
    pub start_page: u32,

    #[serde(default)]
    pub headless: bool,

    /// Persistent profile directory so sign-in survives runs. A unique temp
    /// dir (removed on exit) is used when absent.
    #[serde(default)]
    pub user_data_dir: Option<PathBuf>,
}

fn default_locale() -> String {
    "en".to_string()
}

fn default_jobs_per_page() -> u32 {
    7
}

fn default_start_page() -> u32 {
    1
}

impl Config {
    pub async fn from_file(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            BotError::InvalidConfig(format!("cannot read {}: {e}", path.display()))
        })?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|e| BotError::InvalidConfig(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(BotError::InvalidConfig("baseUrl cannot be empty".into()));
        }
        if self.keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(BotError::InvalidConfig(
                "at least one search keyword is required".into(),
            ));
        }
        if self.jobs_per_page == 0 {
            return Err(BotError::InvalidConfig("jobsPerPage must be >= 1".into()));
        }
        if self.start_page == 0 {
            return Err(BotError::InvalidConfig("startPage must be >= 1".into()));
        }
        Ok(())
    }

    /// OR-combined search query.
    pub fn search_query(&self) -> String {
        self.keywords
            .iter()
            .filter(|k| !k.trim().is_empty())
            .cloned()
            .collect::<Vec<_>>()
            .join(" OR ")
    }
}
