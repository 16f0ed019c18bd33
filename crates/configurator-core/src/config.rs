//! Configuration management for the configurator.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration.
///
/// This is loaded from `~/.config/configurator/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Remote data store settings
    pub api: ApiConfig,
    /// Session behavior settings
    pub session: SessionConfig,
    /// Price display settings
    pub display: DisplayConfig,
}

impl AppConfig {
    /// Load configuration from the default path, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from a specific file, falling back to defaults if it is absent.
    ///
    /// The result is not validated; call [`AppConfig::validate`] once overrides
    /// have been applied.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            tracing::debug!("Loading config from {}", path.display());
            let contents = fs::read_to_string(path)?;
            Ok(toml::from_str(&contents)?)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides, then validate.
    ///
    /// Reads `path` when given, else the default path. Supports the following
    /// environment variables:
    /// - `CONFIGURATOR_API_URL`: Override the data store base URL
    /// - `CONFIGURATOR_TIMEOUT_SECS`: Override the request timeout
    pub fn load_with_env(path: Option<&Path>) -> ConfigResult<Self> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// Load, apply overrides from `lookup`, and validate.
    pub fn load_with(
        path: Option<&Path>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> ConfigResult<Self> {
        let mut config = match path {
            Some(path) => Self::load_from(path)?,
            None => Self::load()?,
        };
        config.apply_env_overrides(lookup);
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup function.
    ///
    /// Values that fail to parse are ignored.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("CONFIGURATOR_API_URL") {
            tracing::debug!("Override api.base_url from env: {}", url);
            self.api.base_url = url;
        }

        if let Some(val) = lookup("CONFIGURATOR_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                self.api.timeout_secs = secs;
                tracing::debug!("Override api.timeout_secs from env: {}", secs);
            }
        }
    }

    /// Check values that cannot be expressed in the type system.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "api.base_url".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        if self.api.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "api.timeout_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.session.events_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "session.events_capacity".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/configurator/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs = ProjectDirs::from("com", "configurator", "configurator")
            .ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Remote data store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the configurator REST API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Session behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Capacity of the session event channel
    pub events_capacity: usize,
    /// Whether to publish an event when selections are auto-cleared
    pub notify_on_clear: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            events_capacity: 64,
            notify_on_clear: true,
        }
    }
}

/// Price display settings, used when the configurator payload carries none.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// ISO currency code
    pub currency: String,
    /// Symbol prefixed to formatted prices
    pub currency_symbol: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency: "USD".to_string(),
            currency_symbol: "$".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:3000");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.session.events_capacity, 64);
        assert!(config.session.notify_on_clear);
        assert_eq!(config.display.currency_symbol, "$");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("[api]"));
        assert!(toml_str.contains("[session]"));
        assert!(toml_str.contains("[display]"));

        let parsed: AppConfig = toml::from_str(&toml_str).expect("parse serialized config");
        assert_eq!(parsed.api.base_url, config.api.base_url);
    }

    #[test]
    fn test_load_from_file() {
        let tmp = TempDir::new().expect("create temp dir");
        let config_path = tmp.path().join("config.toml");
        fs::write(
            &config_path,
            "[api]\nbase_url = \"https://configurator.example.com\"\n\n[display]\ncurrency_symbol = \"€\"\n",
        )
        .expect("write config");

        let loaded = AppConfig::load_from(&config_path).expect("load config");
        assert_eq!(loaded.api.base_url, "https://configurator.example.com");
        assert_eq!(loaded.display.currency_symbol, "€");
    }

    #[test]
    fn test_load_with_overrides_then_validates() {
        let tmp = TempDir::new().expect("create temp dir");
        let config_path = tmp.path().join("config.toml");
        fs::write(&config_path, "[api]\ntimeout_secs = 0\n").expect("write config");

        // Invalid in the file, fixed by the environment
        let config = AppConfig::load_with(Some(config_path.as_path()), |key| {
            (key == "CONFIGURATOR_TIMEOUT_SECS").then(|| "5".to_string())
        })
        .expect("load config");
        assert_eq!(config.api.timeout_secs, 5);

        let result = AppConfig::load_with(Some(config_path.as_path()), |_| None);
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let tmp = TempDir::new().expect("create temp dir");
        let loaded = AppConfig::load_from(&tmp.path().join("absent.toml")).expect("load config");
        assert_eq!(loaded.api.timeout_secs, 30);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("CONFIGURATOR_API_URL", "https://api.example.com"),
            ("CONFIGURATOR_TIMEOUT_SECS", "5"),
        ]);

        let mut config = AppConfig::default();
        config.apply_env_overrides(|key| env.get(key).map(ToString::to_string));

        assert_eq!(config.api.base_url, "https://api.example.com");
        assert_eq!(config.api.timeout_secs, 5);
    }

    #[test]
    fn test_env_override_ignores_garbage() {
        let mut config = AppConfig::default();
        config.apply_env_overrides(|key| {
            (key == "CONFIGURATOR_TIMEOUT_SECS").then(|| "soon".to_string())
        });
        assert_eq!(config.api.timeout_secs, 30);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[api]
base_url = "https://staging.example.com"

[session]
notify_on_clear = false
"#;

        let config: AppConfig = toml::from_str(toml_str).expect("parse partial config");
        assert_eq!(config.api.base_url, "https://staging.example.com");
        assert!(!config.session.notify_on_clear);
        // These should be defaults
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.session.events_capacity, 64);
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = AppConfig::default();
        config.api.timeout_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
