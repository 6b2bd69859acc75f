//! Configuration management for the anime portal.
//!
//! This module handles loading and parsing configuration from TOML files,
//! with sensible defaults for all settings.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Deployment environment (selects the provider set)
    #[serde(default)]
    pub environment: Environment,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Dub provider resolution settings
    #[serde(default)]
    pub providers: ProvidersConfig,

    /// Anime metadata (catalog) settings
    #[serde(default)]
    pub metadata: MetadataConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Deployment environment
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl Environment {
    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(anyhow!("Invalid environment: {}", s)),
        }
    }
}

/// Whether substituted fallback values are written to the response cache
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CachePolicy {
    /// Cache genuine results and fallbacks alike (negative caching)
    #[default]
    CacheAll,
    /// Cache only genuine provider results
    SuccessOnly,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address to bind
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Dub provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Upper bound for a single provider call in milliseconds
    pub timeout_ms: u64,

    /// How long a quality list stays fresh
    pub qualities_ttl_seconds: u64,

    /// How long a resolved episode URL stays fresh
    pub episode_ttl_seconds: u64,

    /// Caching of substituted fallback values
    pub cache_policy: CachePolicy,

    /// Override for the AniDub API base URL
    pub anidub_base_url: Option<String>,

    /// Override for the AnimeVost API base URL
    pub animevost_base_url: Option<String>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 3000,
            qualities_ttl_seconds: 120,
            episode_ttl_seconds: 300,
            cache_policy: CachePolicy::CacheAll,
            anidub_base_url: None,
            animevost_base_url: None,
        }
    }
}

impl ProvidersConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn qualities_ttl(&self) -> Duration {
        Duration::from_secs(self.qualities_ttl_seconds)
    }

    pub fn episode_ttl(&self) -> Duration {
        Duration::from_secs(self.episode_ttl_seconds)
    }
}

/// Metadata (Jikan) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataConfig {
    /// Jikan API base URL
    pub base_url: String,

    /// Overall request timeout for catalog searches in milliseconds
    pub request_timeout_ms: u64,

    /// Timeout for the full details request in milliseconds
    pub details_timeout_ms: u64,

    /// Timeout for the recommendations request in milliseconds
    pub recommendations_timeout_ms: u64,

    /// Maximum retries for failed search requests
    pub max_retries: u32,

    /// Retry delay in milliseconds, multiplied by the attempt number
    pub retry_backoff_ms: u64,

    /// How long search results, details and episode lists stay fresh
    pub cache_ttl_seconds: u64,

    /// Number of episodes listed per anime
    pub episode_count: u32,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.jikan.moe/v4".to_string(),
            request_timeout_ms: 30_000,
            details_timeout_ms: 5000,
            recommendations_timeout_ms: 3000,
            max_retries: 3,
            retry_backoff_ms: 300,
            cache_ttl_seconds: 300,
            episode_count: 24,
        }
    }
}

impl MetadataConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log directory path
    pub log_dir: String,

    /// Default log level (trace, debug, info, warn, error)
    pub default_level: String,

    /// Enable console output
    pub console: bool,

    /// Enable file output
    pub file: bool,

    /// Enable JSON formatting for file logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: "data/logs".to_string(),
            default_level: "info".to_string(),
            console: true,
            file: true,
            json_format: false,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// If the file doesn't exist, returns the default configuration.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "Config file not found, using defaults"
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            environment = %config.environment,
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = toml::to_string_pretty(self)
            .context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            "Configuration saved successfully"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.server.bind_addr, "127.0.0.1:3000");
        assert_eq!(config.providers.timeout(), Duration::from_millis(3000));
        assert_eq!(config.providers.qualities_ttl(), Duration::from_secs(120));
        assert_eq!(config.providers.episode_ttl(), Duration::from_secs(300));
        assert_eq!(config.providers.cache_policy, CachePolicy::CacheAll);
        assert_eq!(config.metadata.max_retries, 3);
        assert_eq!(config.metadata.episode_count, 24);
    }

    #[test]
    fn test_save_and_load_config() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");

        let mut original_config = Config::default();
        original_config.environment = Environment::Development;
        original_config.providers.anidub_base_url = Some("http://127.0.0.1:9000".to_string());
        original_config.save(&config_path)?;

        assert!(config_path.exists());

        let loaded_config = Config::from_file(&config_path)?;
        assert_eq!(loaded_config.environment, Environment::Development);
        assert_eq!(
            loaded_config.providers.anidub_base_url.as_deref(),
            Some("http://127.0.0.1:9000")
        );
        assert_eq!(
            loaded_config.metadata.base_url,
            original_config.metadata.base_url
        );

        Ok(())
    }

    #[test]
    fn test_partial_config_uses_defaults() -> Result<()> {
        let config: Config = toml::from_str(
            r#"
            environment = "development"

            [providers]
            timeout_ms = 500
            cache_policy = "success_only"
            "#,
        )?;

        assert!(config.environment.is_development());
        assert_eq!(config.providers.timeout_ms, 500);
        assert_eq!(config.providers.cache_policy, CachePolicy::SuccessOnly);
        assert_eq!(config.providers.episode_ttl_seconds, 300);
        assert_eq!(config.metadata.retry_backoff_ms, 300);
        Ok(())
    }

    #[test]
    fn test_load_nonexistent_config() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.environment, Environment::Production);
    }

    #[test]
    fn test_environment_from_str() {
        assert_eq!("development".parse::<Environment>().unwrap(), Environment::Development);
        assert_eq!("DEV".parse::<Environment>().unwrap(), Environment::Development);
        assert_eq!("production".parse::<Environment>().unwrap(), Environment::Production);
        assert!("staging".parse::<Environment>().is_err());
    }
}
