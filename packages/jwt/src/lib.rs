//! JSON Web Token (JWT) operations over imported RSA key handles
//!
//! This module provides:
//! - RS256 compact JWS signing and verification
//! - RSA-OAEP-256 + A256GCM compact JWE encryption and decryption
//! - JSON vs plain-text payload detection with a decryption fallback
//! - True async with channels, RSA work on the blocking pool

pub mod claims;
mod error;
mod futures;
pub mod jwe;
pub mod jws;
pub mod operations;
pub mod payload;

pub use error::*;
pub use futures::AsyncJwtResult;
pub use operations::{Decrypted, DecryptedValue, Encrypted, JwtOperations, VerifiedToken, VerifyOutcome};
pub use payload::{EncryptionPayload, PayloadFormat};
