//! Configuration loading from disk.

use std::path::Path;
use std::fs;
use crate::config::schema::ExplorerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable holding the secret API token.
pub const API_KEY_ENV: &str = "BLOCKCYPHER_API_KEY";
/// Environment variable holding the public (browser) API token.
pub const PUBLIC_KEY_ENV: &str = "BLOCKCYPHER_PUBLIC_KEY";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
///
/// API tokens from the environment take precedence over the file.
pub fn load_config(path: &Path) -> Result<ExplorerConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let mut config: ExplorerConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load from `path` when given, otherwise start from defaults.
pub fn load_or_default(path: Option<&Path>) -> Result<ExplorerConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => {
            let mut config = ExplorerConfig::default();
            apply_env_overrides(&mut config);
            validate_config(&config).map_err(ConfigError::Validation)?;
            Ok(config)
        }
    }
}

/// Overlay API tokens from the process environment.
pub fn apply_env_overrides(config: &mut ExplorerConfig) {
    if let Some(key) = non_empty_env(API_KEY_ENV) {
        config.blockcypher.api_key = Some(key);
    }
    if let Some(key) = non_empty_env(PUBLIC_KEY_ENV) {
        config.blockcypher.public_key = Some(key);
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
