//! User configuration
//!
//! Read from `config.toml` in the platform config directory (for example
//! `~/.config/cwlr/config.toml` on Linux) or from an explicit path. Every field has a
//! default, so a missing file or a partial file is fine:
//!
//! ```toml
//! [aws]
//! profile = "dev"
//! region = "eu-west-1"
//!
//! [pagination]
//! max_retries = 2
//! retry_backoff_ms = 250
//! page_timeout_secs = 30
//! max_pages = 500
//!
//! [display]
//! select_icon = ">"
//! page_size = 15
//! color = false
//! group_by_service = true
//! ```

#![warn(clippy::all, rust_2018_idioms)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::app::data_plane::cloudwatch_logs::RetryPolicy;

pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CwlrConfig {
    pub aws: AwsSettings,
    pub pagination: PaginationSettings,
    pub display: DisplaySettings,
}

/// Credential profile and region overrides; unset means the SDK's default chain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AwsSettings {
    pub profile: Option<String>,
    pub region: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationSettings {
    /// Retries of a single failed page fetch
    pub max_retries: u32,
    /// First retry delay, doubled on each further retry
    pub retry_backoff_ms: u64,
    /// Upper bound on one page fetch
    pub page_timeout_secs: Option<u64>,
    /// Upper bound on pages per listing; unset means no limit
    pub max_pages: Option<usize>,
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            max_retries: 0,
            retry_backoff_ms: 200,
            page_timeout_secs: None,
            max_pages: None,
        }
    }
}

impl PaginationSettings {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_retries,
            Duration::from_millis(self.retry_backoff_ms),
        )
    }

    pub fn page_timeout(&self) -> Option<Duration> {
        self.page_timeout_secs.map(Duration::from_secs)
    }
}

/// Presentation options handed to the selector and event renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Marker printed before the highlighted entry of a selection list
    pub select_icon: String,
    /// Entries shown per selection screen
    pub page_size: usize,
    pub color: bool,
    /// Pick a service before a log group
    pub group_by_service: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            select_icon: "▸".to_string(),
            page_size: 10,
            color: true,
            group_by_service: false,
        }
    }
}

impl CwlrConfig {
    /// Platform config file location, if a home directory can be resolved
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "", "cwlr")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Parse a config file; a missing file yields defaults
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            trace_debug!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: CwlrConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        trace_info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Load `path` if given, otherwise the platform default location
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => match Self::default_path() {
                Some(default) => Self::load_from_file(default),
                None => Ok(Self::default()),
            },
        }
    }
}
