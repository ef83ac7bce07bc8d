//! Error handling for the key module

use thiserror::Error;

/// Key-specific errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// The outer JSON is not a JWK Set shape
    #[error("Invalid JWK Set format: {0}")]
    InvalidJwkSet(String),

    /// Only RSA keys can be imported
    #[error("Unsupported key type: {0}")]
    UnsupportedKeyType(String),

    /// Neither an algorithm hint nor a JWK `alg` member was available
    #[error("\"alg\" argument is required when \"jwk.alg\" is not present")]
    MissingAlgorithm,

    /// The algorithm is not one this toolkit imports keys for
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// A required RSA component is absent
    #[error("Missing required JWK member \"{0}\"")]
    MissingComponent(&'static str),

    /// A component is not valid base64url
    #[error("Invalid JWK member \"{field}\": {reason}")]
    InvalidComponent {
        /// Member name, e.g. `n` or `dp`
        field: &'static str,
        /// Decoder message
        reason: String,
    },

    /// The components decode but do not form a valid RSA key
    #[error("Invalid key material: {0}")]
    InvalidKeyMaterial(String),

    /// RSA key generation failed
    #[error("Key generation error: {0}")]
    KeyGeneration(String),

    /// Invalid key size requested
    #[error("Invalid key size: expected one of {expected:?}, got {actual}")]
    InvalidKeySize {
        /// Supported sizes in bits
        expected: Vec<usize>,
        /// Requested size in bits
        actual: usize,
    },

    /// JSON serialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Background task failed before producing a result
    #[error("Key task failed: {0}")]
    TaskFailed(String),
}

impl KeyError {
    /// Create an invalid JWK Set error
    pub fn invalid_jwk_set(msg: impl Into<String>) -> Self {
        Self::InvalidJwkSet(msg.into())
    }

    /// Create an invalid key material error
    pub fn invalid_key_material(msg: impl Into<String>) -> Self {
        Self::InvalidKeyMaterial(msg.into())
    }
}

/// Result type for key operations
pub type Result<T> = std::result::Result<T, KeyError>;
