//! Configuration management for quakewatch
//!
//! Handles loading, saving, and validating configuration from TOML files.

mod defaults;

pub use defaults::*;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Feed fetching configuration
    #[serde(default)]
    pub feed: FeedConfig,

    /// API server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Query configuration
    #[serde(default)]
    pub query: QueryConfig,

    /// Paths configuration (internal, not user-editable)
    #[serde(skip)]
    pub paths: PathsConfig,
}

/// Feed fetching configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Base URL for the summary feed endpoints
    #[serde(default = "default_feed_base_url")]
    pub base_url: String,

    /// User agent string
    #[serde(default = "default_feed_user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "default_feed_timeout")]
    pub timeout_secs: u64,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address for `quakewatch serve`
    #[serde(default = "default_server_bind_addr")]
    pub bind_addr: String,
}

/// Query configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Maximum rows returned by listing endpoints when no limit is given
    #[serde(default = "default_query_max_results")]
    pub max_results: i64,

    /// Default recency window in hours
    #[serde(default = "default_recent_hours")]
    pub recent_hours: i64,

    /// Default retention window in days for age-based purges
    #[serde(default = "default_retention_days")]
    pub retention_days: i64,
}

/// Internal paths configuration
#[derive(Debug, Clone, Default)]
pub struct PathsConfig {
    /// Base directory for quakewatch data
    pub base_dir: PathBuf,

    /// Path to config file
    pub config_file: PathBuf,

    /// Path to SQLite database
    pub db_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feed: FeedConfig::default(),
            server: ServerConfig::default(),
            query: QueryConfig::default(),
            paths: PathsConfig::default(),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: default_feed_base_url(),
            user_agent: default_feed_user_agent(),
            timeout_secs: default_feed_timeout(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_server_bind_addr(),
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            max_results: default_query_max_results(),
            recent_hours: default_recent_hours(),
            retention_days: default_retention_days(),
        }
    }
}

impl Config {
    /// Get the default base directory for quakewatch (~/.quakewatch)
    pub fn default_base_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".quakewatch")
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        Self::default_base_dir().join("config.toml")
    }

    /// Initialize paths configuration
    fn init_paths(&mut self, base_dir: Option<PathBuf>) {
        let base = base_dir.unwrap_or_else(Self::default_base_dir);
        self.paths = PathsConfig {
            config_file: base.join("config.toml"),
            db_file: base.join("earthquakes.db"),
            base_dir: base,
        };
    }

    /// Load configuration from a specific file path
    pub fn load(config_path: &Path) -> Result<Self> {
        debug!("Loading config from {:?}", config_path);

        if !config_path.exists() {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                config_path.display()
            )));
        }

        let content = std::fs::read_to_string(config_path)?;
        let mut config: Config = toml::from_str(&content)?;

        // Set up paths based on config file location
        let base = config_path.parent().unwrap_or(Path::new(".")).to_path_buf();
        config.paths = PathsConfig {
            config_file: config_path.to_path_buf(),
            db_file: base.join("earthquakes.db"),
            base_dir: base,
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific base directory, falling back to defaults
    pub fn load_from(base_dir: Option<PathBuf>) -> Result<Self> {
        let mut config = Config::default();
        config.init_paths(base_dir);

        if config.paths.config_file.exists() {
            debug!("Loading config from {:?}", config.paths.config_file);
            let content = std::fs::read_to_string(&config.paths.config_file)?;
            let mut loaded: Config = toml::from_str(&content)?;
            loaded.paths = config.paths;
            config = loaded;
        } else {
            debug!("No config file found, using defaults");
        }

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.paths.config_file.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&self.paths.config_file, content)?;
        info!("Saved config to {:?}", self.paths.config_file);
        Ok(())
    }

    /// Check if quakewatch is initialized (config and DB exist)
    pub fn is_initialized(&self) -> bool {
        self.paths.config_file.exists() && self.paths.db_file.exists()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.feed.base_url.is_empty() {
            return Err(Error::Config("feed.base_url must not be empty".to_string()));
        }

        url::Url::parse(&self.feed.base_url)
            .map_err(|e| Error::Config(format!("feed.base_url is not a valid URL: {}", e)))?;

        if self.feed.timeout_secs == 0 {
            return Err(Error::Config("feed.timeout_secs must be positive".to_string()));
        }

        if self.query.max_results <= 0 {
            return Err(Error::Config("query.max_results must be positive".to_string()));
        }

        if self.query.recent_hours <= 0 {
            return Err(Error::Config("query.recent_hours must be positive".to_string()));
        }

        Ok(())
    }
}
