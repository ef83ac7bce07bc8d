//! JWT error types

use std::fmt;
use thiserror::Error;

/// JWT operation result type
pub type JwtResult<T> = Result<T, JwtError>;

/// JWT error types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JwtError {
    /// Malformed compact serialization or header
    InvalidToken(String),
    /// RS256 signature did not verify
    InvalidSignature,
    /// `exp` is not in the future
    TokenExpired,
    /// `nbf` is in the future
    TokenNotYetValid,
    /// Claims set is not an object or a time claim is not a number
    InvalidClaims(String),
    /// Trimmed input was empty; carries the user-facing prompt
    EmptyInput(&'static str),
    /// Payload text is not acceptable for the operation
    InvalidPayload(String),
    /// No key of any kind for the operation
    MissingKey(&'static str),
    /// Only the public half is loaded for an operation needing the private key
    PublicKeyOnly(&'static str),
    /// Key handle is bound to a different algorithm
    KeyAlgorithmMismatch {
        /// Algorithm the operation needs
        expected: &'static str,
        /// Algorithm the handle was imported for
        actual: String,
    },
    /// Encryption failed
    Encryption(String),
    /// Decryption failed
    Decryption(String),
    /// Both decryption strategies failed
    DecryptFallback {
        /// Failure of the claims (JSON) attempt
        jwt: String,
        /// Failure of the compact (plain text) attempt
        jwe: String,
    },
    /// Background task failed
    TaskFailed,
}

impl fmt::Display for JwtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JwtError::InvalidToken(msg) => write!(f, "{msg}"),
            JwtError::InvalidSignature => write!(f, "signature verification failed"),
            JwtError::TokenExpired => write!(f, "\"exp\" claim timestamp check failed"),
            JwtError::TokenNotYetValid => write!(f, "\"nbf\" claim timestamp check failed"),
            JwtError::InvalidClaims(msg) => write!(f, "{msg}"),
            JwtError::EmptyInput(prompt) => write!(f, "{prompt}"),
            JwtError::InvalidPayload(msg) => write!(f, "Invalid payload: {msg}"),
            JwtError::MissingKey(msg) => write!(f, "{msg}"),
            JwtError::PublicKeyOnly(msg) => write!(f, "{msg}"),
            JwtError::KeyAlgorithmMismatch { expected, actual } => {
                write!(f, "Key is bound to {actual}, operation requires {expected}")
            }
            JwtError::Encryption(msg) => write!(f, "Encryption error: {msg}"),
            JwtError::Decryption(msg) => write!(f, "{msg}"),
            JwtError::DecryptFallback { jwt, jwe } => {
                write!(f, "Unable to decrypt as either JWT ({jwt}) or JWE ({jwe})")
            }
            JwtError::TaskFailed => write!(f, "Background task failed"),
        }
    }
}

impl std::error::Error for JwtError {}

impl JwtError {
    /// Create an invalid token error
    #[inline]
    #[must_use]
    pub fn invalid_token(msg: &str) -> Self {
        JwtError::InvalidToken(msg.to_string())
    }

    /// Create an invalid claims error
    #[inline]
    #[must_use]
    pub fn invalid_claims(msg: &str) -> Self {
        JwtError::InvalidClaims(msg.to_string())
    }

    /// Create a decryption error
    #[inline]
    #[must_use]
    pub fn decryption(msg: &str) -> Self {
        JwtError::Decryption(msg.to_string())
    }
}

/// The four JWT operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// RS256 signing
    Sign,
    /// RS256 verification
    Verify,
    /// RSA-OAEP-256 + A256GCM encryption
    Encrypt,
    /// RSA-OAEP-256 + A256GCM decryption
    Decrypt,
}

impl Operation {
    /// Lowercase verb
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Operation::Sign => "sign",
            Operation::Verify => "verify",
            Operation::Encrypt => "encrypt",
            Operation::Decrypt => "decrypt",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed operation, displayed with a stable `Failed to <op> JWT: ` prefix
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to {operation} JWT: {source}")]
pub struct OperationError {
    /// Operation that failed
    pub operation: Operation,
    /// Underlying failure
    #[source]
    pub source: JwtError,
}

impl OperationError {
    /// Wrap `source` as a failure of `operation`
    #[must_use]
    pub fn new(operation: Operation, source: JwtError) -> Self {
        Self { operation, source }
    }
}
