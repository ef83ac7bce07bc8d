//! # jwkdesk key material
//!
//! JWK model, role classification, import and generation for dual-purpose
//! (signing + encryption) RSA key sets.
//!
//! ## Features
//!
//! - **Normalization**: padded or standard-alphabet base64 RSA members are
//!   rewritten as base64url before import
//! - **Classification**: keys are sorted into signing / encryption by `use`,
//!   `alg` and `kid`
//! - **Import with fallbacks**: keys without `alg` are retried with the
//!   algorithm their role implies
//! - **Generation**: one RS256 and one RSA-OAEP-256 keypair per set
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use jwkdesk_key::{KeySetGenerator, KeySetImporter};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let generated = KeySetGenerator::default().generate().await?;
//! let text = generated.jwk_set.to_pretty_string()?;
//!
//! let imported = KeySetImporter::new().import_text(&text).await?;
//! assert!(imported.handles.signing_private.is_some());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod algorithm;
pub mod base64url;
pub mod classify;
pub mod error;
pub mod generate;
pub mod handle;
pub mod import;
pub mod jwk;
pub mod key_id;
pub mod key_result;

pub use algorithm::JoseAlgorithm;
pub use base64url::normalize_base64url;
pub use classify::{classify, KeyRole, Placement};
pub use error::{KeyError, Result};
pub use generate::{GeneratedKeySet, KeySetGenerator};
pub use handle::{KeyHandles, PrivateKeyHandle, PublicKeyHandle};
pub use import::{
    import_jwk_set, import_private, import_private_with_fallback, import_public, ImportStage, ImportWarning,
    ImportedKeys, KeySetImporter,
};
pub use jwk::{Jwk, JwkSet};
pub use key_id::KeyIdGenerator;
pub use key_result::AsyncKeyResult;
