use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::fetch::FetchOptions;
use crate::retry::RetryPolicy;

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per fetch (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.5 = 500ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_secs: 0.5,
            max_delay_secs: 30,
        }
    }
}

impl RetryConfig {
    fn to_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            base_delay: Duration::from_secs_f64(self.base_delay_secs.max(0.0)),
            max_delay: Duration::from_secs(self.max_delay_secs),
        }
    }
}

/// Global configuration loaded from `~/.config/vdm/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VdmConfig {
    /// Worker pool size (global concurrency cap).
    pub max_workers: usize,
    /// Maximum concurrent fetches per remote host.
    pub max_per_host: usize,
    /// Minimum spacing between fetch starts against one host, in milliseconds.
    pub pacing_ms: u64,
    /// Connect timeout per transfer, in seconds.
    pub connect_timeout_secs: u64,
    /// Overall timeout per transfer, in seconds.
    pub fetch_timeout_secs: u64,
    /// Size floor for hosted-video results; smaller files are treated as
    /// placeholders and discarded.
    pub min_video_bytes: u64,
    /// Workbook sheet names (exact match) that carry no download rows.
    #[serde(default)]
    pub skip_sheets: Vec<String>,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl Default for VdmConfig {
    fn default() -> Self {
        Self {
            max_workers: 4,
            max_per_host: 2,
            pacing_ms: 1000,
            connect_timeout_secs: 30,
            fetch_timeout_secs: 3600,
            min_video_bytes: 1024,
            skip_sheets: Vec::new(),
            retry: None,
        }
    }
}

impl VdmConfig {
    /// Transfer limits for the fetcher.
    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            timeout: Duration::from_secs(self.fetch_timeout_secs),
            min_video_bytes: self.min_video_bytes,
        }
    }

    /// Effective retry policy (configured or built-in defaults).
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
            .as_ref()
            .map(RetryConfig::to_policy)
            .unwrap_or_default()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("vdm")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<VdmConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = VdmConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: VdmConfig = toml::from_str(&data)?;
    Ok(cfg)
}
