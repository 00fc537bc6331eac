use super::Result;
use crate::api::client::{DEFAULT_MAX_RESULTS, DEFAULT_TIMEOUT_SECS, LookupOptions};
use crate::error::{ConfigError, StorageError};
use crate::utils::error_helpers::convert_file_error;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:4000";
pub const DEFAULT_DEBOUNCE_MS: u64 = 1000;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;
pub const DEFAULT_HISTORY_CAPACITY: usize = 5;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub lookup: LookupConfig,
    pub search: SearchConfig,
    pub history: HistoryConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LookupConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub max_results: usize,
    pub client_filter: bool,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            max_results: DEFAULT_MAX_RESULTS,
            client_filter: false,
        }
    }
}

impl LookupConfig {
    pub fn options(&self) -> LookupOptions {
        LookupOptions {
            max_results: self.max_results,
            client_filter: self.client_filter,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    pub debounce_ms: u64,
    pub cache_ttl_seconds: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            cache_ttl_seconds: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct HistoryConfig {
    pub capacity: usize,
    /// Persist recent searches to this file instead of process memory
    pub file: Option<PathBuf>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_HISTORY_CAPACITY,
            file: None,
        }
    }
}

impl Config {
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p,
            None => Self::config_file_path()?,
        };

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content =
            fs::read_to_string(&config_path).map_err(|e| convert_file_error(e, &config_path))?;

        let config: Config =
            toml::from_str(&content).map_err(|e| StorageError::ConfigParseError {
                message: e.to_string(),
            })?;

        Ok(config)
    }

    pub fn config_file_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or(StorageError::ConfigDirNotFound)?;
        Ok(config_dir.join("sick-search").join("config.toml"))
    }

    /// Default location of the TUI log file
    pub fn default_log_path() -> PathBuf {
        dirs::data_local_dir()
            .map(|dir| dir.join("sick-search"))
            .unwrap_or_else(std::env::temp_dir)
            .join("sick-search.log")
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let url = &self.lookup.base_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(invalid("lookup.base_url", url, "must start with http:// or https://"));
        }
        if self.lookup.timeout_seconds == 0 {
            return Err(invalid("lookup.timeout_seconds", "0", "must be positive"));
        }
        if self.search.debounce_ms == 0 {
            return Err(invalid("search.debounce_ms", "0", "must be positive"));
        }
        if self.history.capacity == 0 {
            return Err(invalid("history.capacity", "0", "must be positive"));
        }
        Ok(())
    }
}

fn invalid(field: &str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.lookup.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.search.debounce(), Duration::from_millis(1000));
        assert_eq!(config.search.cache_ttl(), Duration::from_secs(300));
        assert_eq!(config.history.capacity, 5);
        assert!(config.history.file.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_load_roundtrip() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.lookup.base_url = "http://example.test".to_string();
        config.lookup.client_filter = true;
        config.search.debounce_ms = 250;
        config.history.file = Some(temp_dir.path().join("history.json"));

        fs::write(&config_path, toml::to_string(&config).unwrap()).unwrap();

        let loaded_config = Config::load(Some(config_path)).expect("Failed to load config");
        assert_eq!(loaded_config, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "[search]\ndebounce_ms = 300\n").unwrap();

        let config = Config::load(Some(config_path)).expect("Failed to load config");
        assert_eq!(config.search.debounce_ms, 300);
        assert_eq!(config.search.cache_ttl_seconds, DEFAULT_CACHE_TTL_SECS);
        assert_eq!(config.lookup, LookupConfig::default());
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "[search\ndebounce_ms = ").unwrap();

        let result = Config::load(Some(config_path));
        assert!(matches!(result, Err(StorageError::ConfigParseError { .. })));
    }

    #[test]
    fn test_load_nonexistent_file() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config = Config::load(Some(temp_dir.path().join("missing.toml")))
            .expect("Failed to load default config");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.lookup.base_url = "localhost:4000".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "lookup.base_url"
        ));

        let mut config = Config::default();
        config.search.debounce_ms = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.history.capacity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_lookup_options_from_config() {
        let mut config = Config::default();
        config.lookup.max_results = 3;
        config.lookup.client_filter = true;

        let options = config.lookup.options();
        assert_eq!(options.max_results, 3);
        assert!(options.client_filter);
        assert!(!Config::default().lookup.options().client_filter);
    }
}
