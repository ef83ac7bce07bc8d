//! Workbench configuration
//!
//! Every field has a serde default so partial files are accepted.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming an explicit configuration file
pub const CONFIG_ENV_VAR: &str = "JWKDESK_CONFIG";

/// RSA modulus sizes accepted for generated keys
pub const SUPPORTED_MODULUS_BITS: [usize; 3] = [2048, 3072, 4096];

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the configuration file failed
    #[error("Failed to read config {path}: {source}")]
    Io {
        /// File that could not be read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for this schema
    #[error("Failed to parse config {path}: {source}")]
    Parse {
        /// File that could not be parsed
        path: PathBuf,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// A value is out of range
    #[error("Invalid config value for {field}: {reason}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// Why the value was rejected
        reason: String,
    },
}

/// Tunables for key generation and token issuance
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkbenchConfig {
    /// Modulus size for generated RSA keys
    #[serde(default = "default_modulus_bits")]
    pub rsa_modulus_bits: usize,
    /// Lifetime of signed tokens in seconds (`exp - iat`)
    #[serde(default = "default_token_lifetime")]
    pub token_lifetime_secs: i64,
    /// Number of random characters in generated key ids
    #[serde(default = "default_key_id_length")]
    pub key_id_length: usize,
    /// Optional `env_logger` filter overriding `RUST_LOG`
    #[serde(default)]
    pub log_filter: Option<String>,
}

fn default_modulus_bits() -> usize {
    2048
}

fn default_token_lifetime() -> i64 {
    2 * 60 * 60 // 2 hours
}

fn default_key_id_length() -> usize {
    12
}

impl Default for WorkbenchConfig {
    fn default() -> Self {
        Self {
            rsa_modulus_bits: default_modulus_bits(),
            token_lifetime_secs: default_token_lifetime(),
            key_id_length: default_key_id_length(),
            log_filter: None,
        }
    }
}

impl WorkbenchConfig {
    /// Load and validate a configuration file
    ///
    /// # Errors
    /// Returns `ConfigError` if the file cannot be read, parsed or validated.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Resolve the configuration from an explicit path, `JWKDESK_CONFIG`, or
    /// the per-user config directory, in that order
    ///
    /// A missing default file yields the defaults; an explicitly named file
    /// must exist.
    ///
    /// # Errors
    /// Returns `ConfigError` if a named or discovered file is unusable.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return Self::load(PathBuf::from(path));
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::load(path),
            _ => Ok(Self::default()),
        }
    }

    /// `<config dir>/jwkdesk/config.json`, when the platform has a config dir
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        match dirs::config_dir() {
            Some(mut dir) => {
                dir.push("jwkdesk");
                dir.push("config.json");
                Some(dir)
            }
            None => {
                warn!("Could not determine OS config directory");
                None
            }
        }
    }

    /// Check value ranges
    ///
    /// # Errors
    /// Returns `ConfigError::Invalid` naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !SUPPORTED_MODULUS_BITS.contains(&self.rsa_modulus_bits) {
            return Err(ConfigError::Invalid {
                field: "rsa_modulus_bits",
                reason: format!(
                    "expected one of {SUPPORTED_MODULUS_BITS:?}, got {}",
                    self.rsa_modulus_bits
                ),
            });
        }
        if self.token_lifetime_secs <= 0 {
            return Err(ConfigError::Invalid {
                field: "token_lifetime_secs",
                reason: format!("must be positive, got {}", self.token_lifetime_secs),
            });
        }
        if !(4..=64).contains(&self.key_id_length) {
            return Err(ConfigError::Invalid {
                field: "key_id_length",
                reason: format!("must be between 4 and 64, got {}", self.key_id_length),
            });
        }
        Ok(())
    }
}
