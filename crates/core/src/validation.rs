//! Configuration validation support

use config::ConfigError;
use serde::{Deserialize, Serialize};

/// Trait for validating configuration values
pub trait ValidateConfig: Serialize + for<'de> Deserialize<'de> {
    /// Validate the configuration
    ///
    /// Returns Ok(()) if valid, or an error describing what's wrong
    fn validate(&self) -> Result<(), ConfigError>;
}

/// Check that a base URL is absolute http(s) with a host
pub fn validate_base_url(base_url: &str) -> Result<(), ConfigError> {
    let url = url::Url::parse(base_url)
        .map_err(|e| ConfigError::Message(format!("base_url: invalid URL - {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Message(format!(
            "base_url must be http(s): {base_url}"
        )));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(ConfigError::Message(format!("base_url has no host: {base_url}")));
    }
    Ok(())
}
