use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::platform;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub board: BoardConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Schedules endpoint; the station key is appended as a path.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Unset means requests never time out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

/// Which persistence mechanism to try first for selected stations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Structured database, then flat file, then memory.
    #[default]
    Auto,
    Structured,
    Flat,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    /// Directory holding the station database and the flat fallback file.
    #[serde(default = "default_store_dir")]
    pub dir: PathBuf,
}

/// Offline copies of API responses, keyed by request URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
    #[serde(default = "default_cache_dir")]
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BoardConfig {
    /// Skip results older than what a card already shows.
    /// Off by default: the last delivery always wins.
    #[serde(default)]
    pub keep_newer: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Optional TOML list of stations offered by the add dialog.
    /// Defaults to `$XDG_CONFIG_HOME/transit/catalog.toml`.
    #[serde(default = "default_catalog_toml")]
    pub catalog_toml: PathBuf,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            request_timeout_secs: None,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            dir: default_store_dir(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            dir: default_cache_dir(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            catalog_toml: default_catalog_toml(),
        }
    }
}

fn default_base_url() -> String {
    "https://api-ratp.pierre-grimaud.fr/v3/schedules".to_string()
}

fn default_user_agent() -> String {
    format!("transit-board/{}", env!("CARGO_PKG_VERSION"))
}

fn default_store_dir() -> PathBuf {
    platform::data_dir()
}

fn default_cache_enabled() -> bool {
    true
}

fn default_cache_dir() -> PathBuf {
    platform::cache_dir().join("responses")
}

fn default_catalog_toml() -> PathBuf {
    platform::config_dir().join("catalog.toml")
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.api.base_url.starts_with("https://"));
        assert!(config.api.base_url.ends_with("/v3/schedules"));
        assert_eq!(config.api.request_timeout_secs, None);
        assert_eq!(config.store.backend, StoreBackend::Auto);
        assert!(config.cache.enabled);
        assert!(!config.board.keep_newer);
        assert!(config.catalog.catalog_toml.ends_with("transit/catalog.toml"));
    }

    #[test]
    fn partial_file_fills_defaults() {
        let content = r#"
            [store]
            backend = "flat"

            [board]
            keep_newer = true
        "#;
        let config: Config = toml::from_str(content).unwrap();
        assert_eq!(config.store.backend, StoreBackend::Flat);
        assert!(config.board.keep_newer);
        assert!(config.cache.enabled);
        assert_eq!(config.api.base_url, default_base_url());
    }

    #[test]
    fn default_config_survives_toml_round_trip() {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.store.backend, StoreBackend::Auto);
        assert_eq!(parsed.api.request_timeout_secs, None);
    }
}
