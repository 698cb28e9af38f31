//! Runtime configuration with compiled-in defaults.
//!
//! Values come from `<config_dir>/xpboard/config.toml` when present. Every
//! key is optional; anything missing keeps its default. The repository and
//! the page bounds are fixed and cannot be set from the file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    #[serde(skip)]
    pub repository: RepositoryConfig,
    pub fetch: FetchConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone)]
pub struct RepositoryConfig {
    /// Repository owner. Also the account excluded from scoring.
    pub owner: String,
    pub name: String,
    pub api_base: String,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            owner: "sayeeg-11".to_string(),
            name: "Pixel_Phantoms".to_string(),
            api_base: "https://api.github.com".to_string(),
        }
    }
}

impl RepositoryConfig {
    /// `<api-base>/repos/<owner>/<name>`
    pub fn repo_url(&self) -> String {
        format!(
            "{}/repos/{}/{}",
            self.api_base.trim_end_matches('/'),
            self.owner,
            self.name
        )
    }
}

pub const MAX_PAGES: u32 = 3;
pub const PER_PAGE: u32 = 100;

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchConfig {
    #[serde(skip)]
    pub max_pages: u32,
    #[serde(skip)]
    pub per_page: u32,
    pub timeout_secs: Option<u64>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_pages: MAX_PAGES,
            per_page: PER_PAGE,
            timeout_secs: None,
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// HTML page whose leaderboard rows are rewritten in place.
    pub page: Option<PathBuf>,
    pub terminal: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            page: None,
            terminal: true,
        }
    }
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("xpboard").join("config.toml"))
    }

    /// Load from the default location, falling back to defaults if there is
    /// no config directory or no file.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
