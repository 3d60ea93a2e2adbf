use crate::domain::CachePolicy;
use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub catalog: CatalogConfig,

    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,

    pub database_path: String,

    /// 0 keeps the tokio default.
    pub worker_threads: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            database_path: "sqlite:./data/tv2cal.db".to_string(),
            worker_threads: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub base_url: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub api_key: String,

    pub timeout_seconds: u64,

    pub user_agent: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.themoviedb.org/3/".to_string(),
            api_key: String::new(),
            timeout_seconds: 10,
            user_agent: "tv2cal/0.1".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Hours before a cached show is refreshed from the catalog.
    pub freshness_hours: u64,

    /// IANA zone in which staleness and "aired" are evaluated.
    pub reference_timezone: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            freshness_hours: 6,
            reference_timezone: "America/Los_Angeles".to_string(),
        }
    }
}

impl CacheConfig {
    pub fn reference_tz(&self) -> Result<Tz> {
        self.reference_timezone
            .parse::<Tz>()
            .map_err(|e| anyhow::anyhow!("Invalid reference timezone '{}': {e}", self.reference_timezone))
    }

    pub fn policy(&self) -> Result<CachePolicy> {
        let hours = i64::try_from(self.freshness_hours).context("freshness_hours is too large")?;
        let window = chrono::Duration::try_hours(hours).context("freshness_hours is too large")?;
        Ok(CachePolicy::new(window, self.reference_tz()?))
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let paths = Self::config_paths();

        let mut config = None;
        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                config = Some(Self::load_from_path(path)?);
                break;
            }
        }

        let mut config = config.unwrap_or_else(|| {
            info!("No config file found, using defaults");
            Self::default()
        });
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    /// Environment wins over the file. The unprefixed names are still honoured
    /// for older deployments.
    pub fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(key) = var("TV2CAL_API_KEY").or_else(|| var("API_KEY")) {
            self.catalog.api_key = key;
        }

        if let Some(path) = var("TV2CAL_DATABASE_PATH").or_else(|| var("DB_PATH")) {
            self.general.database_path = path;
        }
    }

    /// Writes the defaults to `./config.toml` unless a file is already there.
    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            Self::default().save_to_path(&path)?;
            Ok(true)
        }
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![Self::default_config_path()];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("tv2cal").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".tv2cal").join("config.toml"));
        }

        paths
    }

    pub fn validate(&self) -> Result<()> {
        if self.cache.freshness_hours == 0 {
            anyhow::bail!("cache.freshness_hours must be > 0");
        }

        self.cache.policy()?;

        if self.catalog.timeout_seconds == 0 {
            anyhow::bail!("catalog.timeout_seconds must be > 0");
        }

        url::Url::parse(&self.catalog.base_url)
            .with_context(|| format!("Invalid catalog base URL: {}", self.catalog.base_url))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.cache.freshness_hours, 6);
        assert_eq!(config.cache.reference_timezone, "America/Los_Angeles");
        assert_eq!(config.catalog.timeout_seconds, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            log_level = "debug"

            [cache]
            freshness_hours = 24
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.cache.freshness_hours, 24);
        assert_eq!(config.cache.reference_timezone, "America/Los_Angeles");

        let policy = config.cache.policy().unwrap();
        assert_eq!(policy.freshness_window, chrono::Duration::hours(24));
    }

    #[test]
    fn test_config_serialization_omits_empty_key() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[catalog]"));
        assert!(toml_str.contains("[cache]"));
        assert!(!toml_str.contains("api_key"));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.cache.reference_timezone = "Mars/Olympus".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.cache.freshness_hours = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.catalog.base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_env_overrides(|key| match key {
            "API_KEY" => Some("legacy".to_string()),
            "TV2CAL_DATABASE_PATH" => Some("sqlite::memory:".to_string()),
            _ => None,
        });
        assert_eq!(config.catalog.api_key, "legacy");
        assert_eq!(config.general.database_path, "sqlite::memory:");

        config.apply_env_overrides(|key| (key == "TV2CAL_API_KEY").then(|| "new".to_string()));
        assert_eq!(config.catalog.api_key, "new");
    }
}
