//! Configuration management.
//!
//! Configuration is layered: built-in defaults, then an optional TOML file,
//! then `BOOK_FINDER_*` environment variables (nested keys separated by `__`,
//! e.g. `BOOK_FINDER_SERVICE__BASE_URL`).
//!
//! # Configuration File Format
//!
//! ```toml
//! [service]
//! base_url = "http://localhost:5000"
//! search_path = "/search"
//! health_path = "/health"
//!
//! [http]
//! timeout_seconds = 60
//! connect_timeout_seconds = 10
//!
//! [logging]
//! level = "info"
//! format = "json"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "book-finder.toml";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "BOOK_FINDER";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Lookup service endpoints
    #[serde(default)]
    pub service: ServiceConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Lookup service endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the lookup service
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the batch search endpoint
    #[serde(default = "default_search_path")]
    pub search_path: String,

    /// Path of the health endpoint
    #[serde(default = "default_health_path")]
    pub health_path: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            search_path: default_search_path(),
            health_path: default_health_path(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_search_path() -> String {
    "/search".to_string()
}

fn default_health_path() -> String {
    "/health".to_string()
}

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Overall timeout for a search, unset means wait indefinitely
    #[serde(default)]
    pub timeout_seconds: Option<u64>,

    /// Timeout for establishing a connection
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: None,
            connect_timeout_seconds: default_connect_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string()
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `"json"` for structured output, anything else for plain text
    #[serde(default)]
    pub format: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format
            .as_deref()
            .is_some_and(|f| f.eq_ignore_ascii_case("json"))
    }
}

impl Config {
    /// Full URL of the search endpoint
    pub fn search_url(&self) -> String {
        join_url(&self.service.base_url, &self.service.search_path)
    }

    /// Full URL of the health endpoint
    pub fn health_url(&self) -> String {
        join_url(&self.service.base_url, &self.service.health_path)
    }

    /// Check that the service URL is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        let parsed = url::Url::parse(&self.service.base_url)
            .map_err(|e| ConfigError::InvalidBaseUrl(format!("{}: {}", self.service.base_url, e)))?;

        match parsed.scheme() {
            "http" | "https" => Ok(()),
            other => Err(ConfigError::InvalidBaseUrl(format!(
                "unsupported scheme: {}",
                other
            ))),
        }
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Write the configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_toml()?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io(e.to_string()))?;
            }
        }
        std::fs::write(path, content).map_err(|e| ConfigError::Io(e.to_string()))
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid service URL: {0}")]
    InvalidBaseUrl(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialize error: {0}")]
    Serialize(String),
}

/// Load configuration from an optional file plus the environment
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    let config: Config = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

/// Locate a configuration file in the default locations
///
/// Checks `./book-finder.toml`, then `<config dir>/book-finder/config.toml`.
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }

    default_config_path().filter(|p| p.is_file())
}

/// The per-user configuration file path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("book-finder").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.service.base_url, "http://localhost:5000");
        assert_eq!(config.http.timeout_seconds, None);
        assert_eq!(config.http.connect_timeout_seconds, 10);
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.is_json());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_endpoint_urls() {
        let mut config = Config::default();
        assert_eq!(config.search_url(), "http://localhost:5000/search");
        assert_eq!(config.health_url(), "http://localhost:5000/health");

        config.service.base_url = "https://books.example.com/api/".to_string();
        config.service.search_path = "search_books".to_string();
        assert_eq!(config.search_url(), "https://books.example.com/api/search_books");
    }

    #[test]
    fn test_validate_rejects_bad_urls() {
        let mut config = Config::default();
        config.service.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        config.service.base_url = "ftp://example.com".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn test_load_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("book-finder.toml");
        std::fs::write(
            &path,
            r#"
[service]
base_url = "http://books.internal:8080"

[http]
timeout_seconds = 45

[logging]
level = "debug"
format = "json"
"#,
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.service.base_url, "http://books.internal:8080");
        assert_eq!(config.service.search_path, "/search");
        assert_eq!(config.http.timeout_seconds, Some(45));
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.is_json());
    }

    #[test]
    fn test_load_config_missing_file() {
        let path = PathBuf::from("/nonexistent/book-finder.toml");
        assert!(load_config(Some(&path)).is_err());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.service.base_url = "https://saved.example.com".to_string();
        config.http.timeout_seconds = Some(12);
        config.save(&path).unwrap();

        let loaded = load_config(Some(&path)).unwrap();
        assert_eq!(loaded.service.base_url, "https://saved.example.com");
        assert_eq!(loaded.http.timeout_seconds, Some(12));
    }
}
