//! Workbench error types

use jwkdesk_common::ConfigError;
use jwkdesk_jwt::OperationError;
use jwkdesk_key::{ImportWarning, KeyError};
use thiserror::Error;

/// Errors surfaced by the workbench and CLI
#[derive(Debug, Error)]
pub enum WorkbenchError {
    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The key-set text is JSON but not a JWK Set
    #[error(transparent)]
    Key(#[from] KeyError),

    /// Key-set generation failed
    #[error("Failed to generate JWK Set: {0}")]
    Generation(KeyError),

    /// A JWT operation failed
    #[error(transparent)]
    Operation(#[from] OperationError),

    /// No tab with this id
    #[error("Unknown tab: {0}")]
    UnknownTab(String),

    /// Beautify was requested with no content
    #[error("No JWK Set to beautify. Please enter or generate a JWK Set first.")]
    EmptyContent,

    /// Beautify was requested on content that is not JSON
    #[error("Failed to beautify JWK Set: {0}. Please ensure the JSON is valid.")]
    Beautify(String),

    /// The set parsed but every key failed or was skipped
    #[error("JWK Set was parsed but no valid keys could be imported")]
    NoUsableKeys {
        /// Per-key failures
        warnings: Vec<ImportWarning>,
    },
}
