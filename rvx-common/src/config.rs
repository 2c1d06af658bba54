//! Configuration loading and config file resolution
//!
//! Config file resolution follows this priority order:
//! 1. Command-line argument (highest priority)
//! 2. `RVX_CONFIG` environment variable
//! 3. Per-user config file (`<config dir>/rvx/config.toml`)
//! 4. Compiled defaults (fallback)
//!
//! A missing or broken config file never aborts startup: a warning is logged
//! and compiled defaults are used. `RVX_BACKEND_URL` overrides the backend URL
//! after the file has been read.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "RVX_CONFIG";
/// Environment variable overriding `backend_url`
pub const BACKEND_URL_ENV_VAR: &str = "RVX_BACKEND_URL";

/// Granularity of the top-codes aggregate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeLevel {
    /// Aggregate children into their group key
    #[default]
    Parent,
    /// Report individual child codes
    Child,
}

impl CodeLevel {
    pub const fn as_str(self) -> &'static str {
        match self {
            CodeLevel::Parent => "parent",
            CodeLevel::Child => "child",
        }
    }
}

/// Explorer configuration loaded from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplorerConfig {
    /// Base URL of the aggregation backend
    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    /// Quiet period before a facet edit triggers a reload
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Reviews per page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Review languages applied to new sides (empty = all languages)
    #[serde(default)]
    pub languages: Vec<String>,

    /// Number of entries requested from the top-codes aggregate
    #[serde(default = "default_top_codes_limit")]
    pub top_codes_limit: u32,

    /// Granularity of the top-codes aggregate
    #[serde(default)]
    pub top_codes_level: CodeLevel,

    /// Transport timeout for backend requests (no timeout when unset)
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Optional genre catalog file replacing the built-in catalog
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            debounce_ms: default_debounce_ms(),
            page_size: default_page_size(),
            languages: Vec::new(),
            top_codes_limit: default_top_codes_limit(),
            top_codes_level: CodeLevel::default(),
            request_timeout_secs: None,
            catalog_path: None,
            logging: LoggingConfig::default(),
        }
    }
}

fn default_backend_url() -> String {
    "http://127.0.0.1:8000/api".to_string()
}

fn default_debounce_ms() -> u64 {
    200
}

fn default_page_size() -> u32 {
    20
}

fn default_top_codes_limit() -> u32 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ExplorerConfig {
    /// Debounce quiet period
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Transport timeout, if configured
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ExplorerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML text
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }

    /// Read and parse a config file
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Reject values the explorer cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.backend_url.trim().is_empty() {
            return Err(Error::Config("backend_url must not be empty".to_string()));
        }
        if self.page_size == 0 {
            return Err(Error::Config("page_size must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Resolve which config file to read, if any
///
/// Returns `None` when no candidate exists; compiled defaults apply then.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: Per-user config file
    dirs::config_dir()
        .map(|d| d.join("rvx").join("config.toml"))
        .filter(|p| p.exists())
}

/// Load configuration with graceful degradation
///
/// Never fails: unreadable or invalid files fall back to defaults with a
/// warning. The backend URL environment override is applied last.
pub fn load_config(cli_arg: Option<&Path>) -> ExplorerConfig {
    let mut config = match resolve_config_path(cli_arg) {
        Some(path) => match ExplorerConfig::load_file(&path) {
            Ok(config) => {
                info!("Loaded configuration from {}", path.display());
                config
            }
            Err(e) => {
                warn!("Ignoring config file {}: {}", path.display(), e);
                ExplorerConfig::default()
            }
        },
        None => {
            info!("No config file found, using compiled defaults");
            ExplorerConfig::default()
        }
    };

    if let Ok(url) = std::env::var(BACKEND_URL_ENV_VAR) {
        if !url.trim().is_empty() {
            config.backend_url = url.trim().to_string();
        }
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExplorerConfig::default();
        assert_eq!(config.debounce(), Duration::from_millis(200));
        assert_eq!(config.page_size, 20);
        assert_eq!(config.top_codes_level, CodeLevel::Parent);
        assert_eq!(config.logging.level, "info");
        assert!(config.request_timeout().is_none());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = ExplorerConfig::from_toml_str("debounce_ms = 350\n").unwrap();
        assert_eq!(config.debounce_ms, 350);
        assert_eq!(config.page_size, 20);
        assert_eq!(config.backend_url, default_backend_url());
    }

    #[test]
    fn test_validation_rejects_zero_page_size() {
        let result = ExplorerConfig::from_toml_str("page_size = 0\n");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_toml_round_trip_preserves_level() {
        let config = ExplorerConfig {
            top_codes_level: CodeLevel::Child,
            ..ExplorerConfig::default()
        };
        let text = config.to_toml_string().unwrap();
        assert!(text.contains("top_codes_level = \"child\""));
        assert_eq!(ExplorerConfig::from_toml_str(&text).unwrap(), config);
    }
}
