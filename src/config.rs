//! Configuration loading.
//!
//! Resolution order, later layers winning:
//! 1. Defaults
//! 2. YAML file (explicit path, else ~/.config/pr-attention/pr-attention.yml, else ./pr-attention.yml)
//! 3. Environment (`PR_ATTENTION_ORGS`, `GH_HOST`)
//! 4. Command-line `--org`

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PrAttentionError, Result};
use crate::github::FilterPolicy;

/// Comma-separated org list overriding the config file.
pub const ORGS_ENV: &str = "PR_ATTENTION_ORGS";

/// GitHub host for `gh`, same variable `gh` itself reads.
pub const GH_HOST_ENV: &str = "GH_HOST";

const PROJECT_NAME: &str = "pr-attention";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    /// Organizations to search; empty searches everywhere
    pub orgs: Vec<String>,
    pub gh_host: Option<String>,
    pub exclude_drafts: bool,
    /// Exact, case-sensitive label names to ignore
    pub ignore_labels: Vec<String>,
    /// Exact author logins to ignore
    pub ignore_authors: Vec<String>,
    pub sound_enabled: bool,
    pub db_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
            orgs: Vec::new(),
            gh_host: None,
            exclude_drafts: true,
            ignore_labels: Vec::new(),
            ignore_authors: Vec::new(),
            sound_enabled: true,
            db_path: default_db_path(),
        }
    }
}

/// `<data_local_dir>/pr-attention/state.db`
pub fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(PROJECT_NAME)
        .join("state.db")
}

impl Config {
    /// Load configuration with fallback chain, then apply env and CLI overrides.
    pub fn load(config_path: Option<&PathBuf>, cli_orgs: &[String]) -> Result<Self> {
        let mut config = Self::load_file(config_path)?;
        config.apply_env(
            std::env::var(ORGS_ENV).ok().as_deref(),
            std::env::var(GH_HOST_ENV).ok().as_deref(),
        );
        config.apply_cli_orgs(cli_orgs);
        Ok(config)
    }

    fn load_file(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, it must load
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let primary = config_dir.join(PROJECT_NAME).join(format!("{}.yml", PROJECT_NAME));
            if primary.exists() {
                match Self::load_from_file(&primary) {
                    Ok(config) => return Ok(config),
                    Err(e) => warn!("Failed to load config from {}: {}", primary.display(), e),
                }
            }
        }

        let fallback = PathBuf::from(format!("{}.yml", PROJECT_NAME));
        if fallback.exists() {
            match Self::load_from_file(&fallback) {
                Ok(config) => return Ok(config),
                Err(e) => warn!("Failed to load config from {}: {}", fallback.display(), e),
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Parse a YAML config file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| PrAttentionError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        let config = Self::from_yaml(&content)
            .map_err(|e| PrAttentionError::Config(format!("Failed to parse {}: {}", path.display(), e)))?;

        info!("Loaded config from: {}", path.display());
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        // An empty file deserializes as null
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Apply environment overrides. Empty values are ignored.
    pub fn apply_env(&mut self, orgs: Option<&str>, gh_host: Option<&str>) {
        if let Some(orgs) = orgs.filter(|s| !s.trim().is_empty()) {
            self.orgs = split_and_trim(orgs, ',');
        }
        if let Some(host) = gh_host.filter(|s| !s.trim().is_empty()) {
            self.gh_host = Some(host.trim().to_string());
        }
    }

    /// `--org` flags replace every other org source.
    pub fn apply_cli_orgs(&mut self, cli_orgs: &[String]) {
        if !cli_orgs.is_empty() {
            self.orgs = cli_orgs.to_vec();
        }
    }

    /// Filter policy for one poll. `include_drafts` overrides `exclude_drafts`.
    pub fn filter_policy(&self, include_drafts: bool) -> FilterPolicy {
        FilterPolicy::new(
            self.exclude_drafts && !include_drafts,
            self.ignore_labels.iter().cloned(),
            self.ignore_authors.iter().cloned(),
        )
    }
}

fn split_and_trim(s: &str, sep: char) -> Vec<String> {
    s.split(sep)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}
