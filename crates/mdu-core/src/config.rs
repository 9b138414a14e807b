//! Endpoint and default settings.
//!
//! Sources, later overriding earlier: built-in defaults, an optional TOML
//! file, then the `MONGODB_VERSION` environment variable. The environment is
//! read here, once, and never by the normalizer.

use std::path::{Path, PathBuf};
use std::time::Duration;

use dirs::home_dir;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::naming::DownloadHosts;

/// Overrides the default version query when a query omits it.
pub const VERSION_ENV: &str = "MONGODB_VERSION";

/// Overrides the directory holding `config.toml`.
pub const HOME_ENV: &str = "MDU_HOME";

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Version query used when a query has none.
    pub default_version: String,
    /// Release feed listing every published version, newest first.
    pub catalog_url: String,
    /// Base URL of the CI build index REST API.
    pub build_index_url: String,
    /// Bucket holding CI build artifacts.
    pub build_bucket_url: String,
    /// Host serving community builds.
    pub community_host: String,
    /// Host serving enterprise builds.
    pub enterprise_host: String,
    /// Transport timeout for catalog and build-index requests.
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_version: "stable".to_string(),
            catalog_url: "https://downloads.mongodb.org/full.json".to_string(),
            build_index_url: "http://mci-motu.10gen.cc:9090".to_string(),
            build_bucket_url: "https://s3.amazonaws.com/mciuploads".to_string(),
            community_host: "fastdl.mongodb.org".to_string(),
            enterprise_host: "downloads.mongodb.com".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Directory holding `config.toml`: `$MDU_HOME`, else `~/.mongodb-download-url`.
pub fn config_home() -> Option<PathBuf> {
    if let Ok(val) = std::env::var(HOME_ENV) {
        return Some(PathBuf::from(val));
    }
    home_dir().map(|h| h.join(".mongodb-download-url"))
}

impl Config {
    /// Load defaults, then `path` (or `config_home()/config.toml` when it
    /// exists), then the `MONGODB_VERSION` override.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly given file cannot be read, or if
    /// any config file is not valid TOML.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(p) => Self::from_file(p)?,
            None => match config_home().map(|h| h.join("config.toml")) {
                Some(p) if p.exists() => Self::from_file(&p)?,
                _ => Self::default(),
            },
        };
        Ok(config.with_version_override(std::env::var(VERSION_ENV).ok()))
    }

    /// Read a TOML config file; missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply a default-version override; empty values are ignored.
    pub fn with_version_override(mut self, version: Option<String>) -> Self {
        if let Some(v) = version.filter(|v| !v.trim().is_empty()) {
            tracing::debug!("Default version overridden to `{v}`");
            self.default_version = v;
        }
        self
    }

    /// Download hosts for community and enterprise builds.
    pub fn hosts(&self) -> DownloadHosts {
        DownloadHosts {
            community: self.community_host.clone(),
            enterprise: self.enterprise_host.clone(),
        }
    }

    /// HTTP client shared by the catalog and build-index clients.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn http_client(&self) -> Result<reqwest::Client, ConfigError> {
        let client = reqwest::Client::builder()
            .user_agent(crate::USER_AGENT)
            .timeout(Duration::from_secs(self.timeout_secs))
            .build()?;
        Ok(client)
    }
}
