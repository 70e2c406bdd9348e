// src/config.rs

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use tracing::{info, warn};

use crate::process::FeedKind;

pub const CONFIG_ENV: &str = "RBISTATS_CONFIG";
pub const INPUT_DIR_ENV: &str = "RBISTATS_INPUT_DIR";
pub const OUTPUT_DIR_ENV: &str = "RBISTATS_OUTPUT_DIR";
pub const DEFAULT_CONFIG_PATH: &str = "rbistats.yaml";

/// One publication to pick up from the input directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub kind: FeedKind,
    /// Glob relative to `input_dir`, e.g. `ATM*.xlsx`.
    pub pattern: String,
    /// Listing page the downloader scrapes for workbook links.
    #[serde(default)]
    pub listing_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub sources: Vec<SourceConfig>,
    pub retry: RetryConfig,
    pub download_concurrency: usize,
    /// Replaces the embedded bank reference table when set.
    pub reference_table: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("workbooks"),
            output_dir: PathBuf::from("data"),
            sources: vec![
                SourceConfig {
                    kind: FeedKind::AtmPosCard,
                    pattern: "*ATM*.xls*".to_string(),
                    listing_url: None,
                },
                SourceConfig {
                    kind: FeedKind::FundsTransfer,
                    pattern: "*NEFT*.xls*".to_string(),
                    listing_url: None,
                },
            ],
            retry: RetryConfig::default(),
            download_concurrency: 3,
            reference_table: None,
        }
    }
}

impl PipelineConfig {
    /// Parse a YAML file; a missing file yields the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: PipelineConfig = serde_yaml::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        info!(path = %path.display(), sources = config.sources.len(), "config loaded");
        Ok(config)
    }

    /// `$RBISTATS_CONFIG` (or `rbistats.yaml`), then directory overrides
    /// from the environment.
    pub fn from_env() -> Result<Self> {
        let path = env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Self::load(&path)?;
        config.apply_overrides(|key| env::var(key).ok());
        Ok(config)
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup(INPUT_DIR_ENV).filter(|v| !v.is_empty()) {
            self.input_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup(OUTPUT_DIR_ENV).filter(|v| !v.is_empty()) {
            self.output_dir = PathBuf::from(dir);
        }
    }
}
