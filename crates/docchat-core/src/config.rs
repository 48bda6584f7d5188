//! Configuration management
//!
//! Settings are resolved in this order:
//! 1. Environment variables
//! 2. `docchat.toml` configuration file
//! 3. Defaults
//!
//! `${VAR_NAME}` inside the config file expands to the environment
//! variable's value.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Backend gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Base URL for the backend API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Use the in-process mock gateway instead of HTTP
    #[serde(default)]
    pub mock: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            mock: false,
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:3000/api".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Main configuration for docchat
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend gateway settings
    #[serde(default)]
    pub gateway: GatewayConfig,
}

impl Config {
    /// Expand `${VAR_NAME}` occurrences to environment variable values.
    /// Unset variables expand to the empty string.
    fn expand_env_vars(value: &str) -> String {
        let mut result = String::new();
        let mut chars = value.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '$' && chars.peek() == Some(&'{') {
                chars.next();

                let mut var_name = String::new();
                while let Some(&c) = chars.peek() {
                    if c == '}' {
                        chars.next();
                        break;
                    }
                    var_name.push(chars.next().unwrap());
                }

                if let Ok(env_value) = std::env::var(&var_name) {
                    result.push_str(&env_value);
                }
            } else {
                result.push(c);
            }
        }

        result
    }

    /// Load configuration from a TOML file, expanding `${VAR_NAME}`
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;
        let expanded = Self::expand_env_vars(&content);

        let mut config: Config = toml::from_str(&expanded)
            .map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load configuration from environment variables alone
    pub fn from_env() -> Result<Self> {
        let mut config = Config::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load configuration: `docchat.toml` if present, otherwise environment
    pub fn load() -> Result<Self> {
        let path = Path::new("docchat.toml");
        if path.exists() {
            Self::from_file(path)
        } else {
            Self::from_env()
        }
    }

    /// Environment variables take precedence over file values
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(url) = std::env::var("DOCCHAT_BASE_URL") {
            self.gateway.base_url = url;
        }
        if let Ok(timeout) = std::env::var("DOCCHAT_TIMEOUT_SECS") {
            self.gateway.timeout_secs = timeout
                .parse()
                .map_err(|_| Error::Config(format!("Invalid DOCCHAT_TIMEOUT_SECS: {}", timeout)))?;
        }
        if let Ok(mock) = std::env::var("DOCCHAT_MOCK") {
            self.gateway.mock = matches!(mock.to_lowercase().as_str(), "1" | "true" | "yes");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.gateway.base_url, "http://localhost:3000/api");
        assert_eq!(config.gateway.timeout_secs, 30);
        assert!(!config.gateway.mock);
    }

    #[test]
    fn test_expand_env_vars() {
        unsafe {
            std::env::set_var("DOCCHAT_TEST_VAR", "expanded");
        }

        let result = Config::expand_env_vars("prefix_${DOCCHAT_TEST_VAR}_suffix");
        assert_eq!(result, "prefix_expanded_suffix");

        let result = Config::expand_env_vars("prefix_${DOCCHAT_NONEXISTENT_VAR}_suffix");
        assert_eq!(result, "prefix__suffix");

        unsafe {
            std::env::remove_var("DOCCHAT_TEST_VAR");
        }
    }

    #[test]
    fn test_expand_env_vars_no_braces() {
        let result = Config::expand_env_vars("no variables here");
        assert_eq!(result, "no variables here");
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            [gateway]
            base_url = "https://example.com/api"
            timeout_secs = 5
            mock = true
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.gateway.base_url, "https://example.com/api");
        assert_eq!(config.gateway.timeout_secs, 5);
        assert!(config.gateway.mock);
    }
}
