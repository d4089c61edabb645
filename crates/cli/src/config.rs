//! CLI configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional
//! `healthtrack.{json,toml,yaml}` in the data directory (or an explicit
//! `--config` file), then `HEALTHTRACK_*` environment variables using `__`
//! between sections, e.g. `HEALTHTRACK_API__BASE_URL`.

use anyhow::Result;
use config::ConfigError;
use healthtrack_core::ValidateConfig;
use healthtrack_core::validation::validate_base_url;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Base name of the configuration file in the data directory
pub const CONFIG_FILE_STEM: &str = "healthtrack";

/// Default file holding the persisted session token
pub const TOKEN_FILE: &str = "session.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Remote API settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,

    /// Request timeout in seconds; unset means no timeout
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    #[serde(default)]
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Token file; defaults to `session.json` in the data directory
    #[serde(default)]
    pub token_file: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_secs: None,
            user_agent: None,
        }
    }
}

impl ValidateConfig for CliConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        validate_base_url(&self.api.base_url)?;
        if self.api.timeout_secs == Some(0) {
            return Err(ConfigError::Message(
                "api.timeout_secs must be positive; leave it unset to disable".to_string(),
            ));
        }
        Ok(())
    }
}

impl CliConfig {
    /// Token file location for this configuration
    pub fn token_file(&self, data_dir: &Path) -> PathBuf {
        self.storage
            .token_file
            .clone()
            .unwrap_or_else(|| data_dir.join(TOKEN_FILE))
    }
}

/// Load configuration from defaults, file and environment
pub fn load_config(config_file: Option<&Path>, data_dir: &Path) -> Result<CliConfig> {
    let defaults = CliConfig::default();

    let file = match config_file {
        Some(path) => config::File::from(path).required(true),
        None => config::File::from(data_dir.join(CONFIG_FILE_STEM)).required(false),
    };

    let settings = config::Config::builder()
        .set_default("api.base_url", defaults.api.base_url)?
        .add_source(file)
        .add_source(
            config::Environment::with_prefix("HEALTHTRACK")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    let config: CliConfig = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

/// Write the default configuration as JSON
pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
    let content = serde_json::to_string_pretty(&CliConfig::default())?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_file() {
        let dir = TempDir::new().unwrap();
        let config = load_config(None, dir.path()).unwrap();

        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.api.timeout_secs, None);
        assert_eq!(
            config.token_file(dir.path()),
            dir.path().join("session.json")
        );
    }

    #[test]
    fn test_file_in_data_dir_is_picked_up() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("healthtrack.json"),
            r#"{
                "api": { "base_url": "https://health.example.org", "timeout_secs": 15 },
                "storage": { "token_file": "/tmp/ht-token.json" }
            }"#,
        )
        .unwrap();

        let config = load_config(None, dir.path()).unwrap();
        assert_eq!(config.api.base_url, "https://health.example.org");
        assert_eq!(config.api.timeout_secs, Some(15));
        assert_eq!(
            config.token_file(dir.path()),
            PathBuf::from("/tmp/ht-token.json")
        );
    }

    #[test]
    fn test_generated_config_loads_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.json");
        generate_default_config(&path).unwrap();

        let config = load_config(Some(&path), dir.path()).unwrap();
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn test_explicit_file_must_exist() {
        let dir = TempDir::new().unwrap();
        assert!(load_config(Some(&dir.path().join("missing.json")), dir.path()).is_err());
    }

    #[test]
    fn test_validation() {
        let mut config = CliConfig::default();
        assert!(config.validate().is_ok());

        config.api.base_url = "localhost".to_string();
        assert!(config.validate().is_err());

        config.api.base_url = "http://localhost".to_string();
        config.api.timeout_secs = Some(0);
        assert!(config.validate().is_err());
    }
}
