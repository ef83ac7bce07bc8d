//! JWK import with fallback strategies
//!
//! Keys produced by other JOSE libraries often lack `alg` or carry padded
//! base64. Each key is normalized first, then imported as an ordered list of
//! attempts. Failures of individual keys become warnings; only a malformed
//! outer document is an error.

use crate::algorithm::JoseAlgorithm;
use crate::base64url::decode_member;
use crate::classify::{classify, KeyRole, Placement};
use crate::error::{KeyError, Result};
use crate::handle::{KeyHandles, PrivateKeyHandle, PublicKeyHandle};
use crate::jwk::{Jwk, JwkSet};
use crate::key_result::AsyncKeyResult;
use jwkdesk_common::LoggingTransformer;
use log::{debug, info, warn};
use rsa::{BigUint, RsaPrivateKey, RsaPublicKey};
use serde::Serialize;
use std::fmt;

/// Which half of a key failed to import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportStage {
    /// The private key (all attempts exhausted)
    Private,
    /// The derived public view
    Public,
}

impl fmt::Display for ImportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Private => f.write_str("private"),
            Self::Public => f.write_str("public"),
        }
    }
}

/// Non-fatal failure importing one key of a set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportWarning {
    /// Position of the key in the set
    pub index: usize,
    /// `kid` of the key, if it had one
    pub kid: Option<String>,
    /// Role the key was classified as
    #[serde(serialize_with = "serialize_role")]
    pub role: KeyRole,
    /// Which import failed
    pub stage: ImportStage,
    /// Description of the failure
    pub message: String,
}

impl fmt::Display for ImportWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "key {} ({} {}, kid: {}): {}",
            self.index,
            self.role,
            self.stage,
            self.kid.as_deref().unwrap_or("none"),
            self.message
        )
    }
}

fn serialize_role<S: serde::Serializer>(role: &KeyRole, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(role.as_str())
}

/// Outcome of importing a JWK Set
#[derive(Debug, Clone, Default)]
pub struct ImportedKeys {
    /// Filled key slots
    pub handles: KeyHandles,
    /// Per-key failures
    pub warnings: Vec<ImportWarning>,
}

/// Import one JWK as a private key
///
/// The algorithm is `hint` when given, else the JWK's `alg`. The JWK is
/// expected to be normalized already.
///
/// # Errors
/// Returns a `KeyError` describing why the key is unusable.
pub fn import_private(jwk: &Jwk, hint: Option<JoseAlgorithm>) -> Result<PrivateKeyHandle> {
    require_rsa(jwk)?;
    let algorithm = resolve_algorithm(jwk, hint)?;

    let n = required_component(jwk, "n")?;
    let e = required_component(jwk, "e")?;
    let d = required_component(jwk, "d")?;
    let primes = match (optional_component(jwk, "p")?, optional_component(jwk, "q")?) {
        (Some(p), Some(q)) => vec![p, q],
        _ => Vec::new(),
    };

    let mut key = RsaPrivateKey::from_components(n, e, d, primes)
        .map_err(|e| KeyError::invalid_key_material(e.to_string()))?;
    key.validate()
        .map_err(|e| KeyError::invalid_key_material(e.to_string()))?;
    key.precompute()
        .map_err(|e| KeyError::invalid_key_material(e.to_string()))?;

    Ok(PrivateKeyHandle::new(algorithm, jwk.kid().map(str::to_string), key))
}

/// Import one JWK as a public key
///
/// Private members, if any, are ignored.
///
/// # Errors
/// Returns a `KeyError` describing why the key is unusable.
pub fn import_public(jwk: &Jwk, hint: Option<JoseAlgorithm>) -> Result<PublicKeyHandle> {
    require_rsa(jwk)?;
    let algorithm = resolve_algorithm(jwk, hint)?;

    let n = required_component(jwk, "n")?;
    let e = required_component(jwk, "e")?;
    let key = RsaPublicKey::new(n, e).map_err(|e| KeyError::invalid_key_material(e.to_string()))?;

    Ok(PublicKeyHandle::new(algorithm, jwk.kid().map(str::to_string), key))
}

/// Import a private key, first as-is, then with the role's algorithm
///
/// # Errors
/// Returns `KeyError::InvalidKeyMaterial` naming every failed attempt.
pub fn import_private_with_fallback(jwk: &Jwk, role: KeyRole) -> Result<PrivateKeyHandle> {
    let attempts = [None, role.canonical_algorithm()];
    let mut failures = Vec::with_capacity(attempts.len());

    for hint in attempts {
        match import_private(jwk, hint) {
            Ok(handle) => return Ok(handle),
            Err(e) => {
                debug!(
                    "Private import attempt failed (hint: {}): {e}",
                    hint.map_or("none", JoseAlgorithm::as_str)
                );
                failures.push(e.to_string());
            }
        }
    }

    Err(KeyError::invalid_key_material(failures.join("; ")))
}

/// Import every signing and encryption key of a set
///
/// Keys are processed in order; for each slot the last key that fills it
/// wins. Unknown-role keys are skipped.
#[must_use]
pub fn import_jwk_set(set: &JwkSet) -> ImportedKeys {
    let placement = match set {
        JwkSet::Keys(_) => Placement::SetMember,
        JwkSet::Single(_) => Placement::Standalone,
    };

    let mut imported = ImportedKeys::default();
    for (index, raw) in set.keys().iter().enumerate() {
        let jwk = raw.normalized();
        let role = classify(&jwk, placement);
        if role == KeyRole::Unknown {
            debug!("Skipping key {index}: role could not be determined");
            continue;
        }
        debug!("Key {index} classified as {role}");
        import_one(&mut imported, index, &jwk, role);
    }

    info!(
        "Imported {} key slot(s) with {} warning(s)",
        imported.handles.filled_slots(),
        imported.warnings.len()
    );
    imported
}

fn import_one(imported: &mut ImportedKeys, index: usize, jwk: &Jwk, role: KeyRole) {
    let warn_for = |stage: ImportStage, error: &KeyError| {
        warn!("Failed to import {stage} {role} key {index}: {error}");
        ImportWarning {
            index,
            kid: jwk.kid().map(str::to_string),
            role,
            stage,
            message: error.to_string(),
        }
    };

    if jwk.has_private_material() {
        match import_private_with_fallback(jwk, role) {
            Ok(handle) => {
                LoggingTransformer::log_key_event("import private", jwk.kid(), true);
                match role {
                    KeyRole::Signing => imported.handles.signing_private = Some(handle),
                    KeyRole::Encryption => imported.handles.encryption_private = Some(handle),
                    KeyRole::Unknown => {}
                }
            }
            Err(e) => imported.warnings.push(warn_for(ImportStage::Private, &e)),
        }
    }

    match import_public(&jwk.to_public(), None) {
        Ok(handle) => {
            LoggingTransformer::log_key_event("import public", jwk.kid(), true);
            match role {
                KeyRole::Signing => imported.handles.signing_public = Some(handle),
                KeyRole::Encryption => imported.handles.encryption_public = Some(handle),
                KeyRole::Unknown => {}
            }
        }
        Err(e) => imported.warnings.push(warn_for(ImportStage::Public, &e)),
    }
}

/// Async entry point for set import
#[derive(Debug, Clone, Copy, Default)]
pub struct KeySetImporter;

impl KeySetImporter {
    /// Create an importer
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Import `set` on the blocking pool
    pub fn import(&self, set: JwkSet) -> AsyncKeyResult<ImportedKeys> {
        AsyncKeyResult::spawn_blocking(move || Ok(import_jwk_set(&set)))
    }

    /// Parse and import JWK Set text on the blocking pool
    ///
    /// Resolves to `KeyError::InvalidJwkSet` if the text is not a JWK Set.
    pub fn import_text(&self, text: &str) -> AsyncKeyResult<ImportedKeys> {
        match JwkSet::parse(text) {
            Ok(set) => self.import(set),
            Err(e) => AsyncKeyResult::error(e),
        }
    }
}

fn require_rsa(jwk: &Jwk) -> Result<()> {
    match jwk.kty() {
        Some("RSA") => Ok(()),
        Some(other) => Err(KeyError::UnsupportedKeyType(other.to_string())),
        None => Err(KeyError::UnsupportedKeyType("missing \"kty\"".to_string())),
    }
}

fn resolve_algorithm(jwk: &Jwk, hint: Option<JoseAlgorithm>) -> Result<JoseAlgorithm> {
    match (hint, jwk.alg()) {
        (Some(algorithm), _) => Ok(algorithm),
        (None, Some(alg)) => alg.parse(),
        (None, None) => Err(KeyError::MissingAlgorithm),
    }
}

fn required_component(jwk: &Jwk, field: &'static str) -> Result<BigUint> {
    optional_component(jwk, field)?.ok_or(KeyError::MissingComponent(field))
}

fn optional_component(jwk: &Jwk, field: &'static str) -> Result<Option<BigUint>> {
    let value = match jwk.as_map().get(field) {
        None | Some(serde_json::Value::Null) => return Ok(None),
        Some(value) => value,
    };
    let encoded = value.as_str().ok_or_else(|| KeyError::InvalidComponent {
        field,
        reason: "expected a string".to_string(),
    })?;
    if encoded.is_empty() {
        return Ok(None);
    }
    let bytes = decode_member(encoded).map_err(|e| KeyError::InvalidComponent {
        field,
        reason: e.to_string(),
    })?;
    Ok(Some(BigUint::from_bytes_be(&bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn jwk(value: Value) -> Jwk {
        match value {
            Value::Object(map) => Jwk::from_map(map),
            _ => unreachable!("test fixture must be an object"),
        }
    }

    #[test]
    fn test_non_rsa_is_rejected() {
        let key = jwk(json!({"kty": "EC", "alg": "RS256"}));
        assert_eq!(
            import_public(&key, None).unwrap_err(),
            KeyError::UnsupportedKeyType("EC".to_string())
        );
    }

    #[test]
    fn test_algorithm_resolution() {
        let bare = jwk(json!({"kty": "RSA", "n": "AQAB", "e": "AQAB"}));
        assert_eq!(import_public(&bare, None).unwrap_err(), KeyError::MissingAlgorithm);

        let foreign = jwk(json!({"kty": "RSA", "alg": "PS512", "n": "AQAB", "e": "AQAB"}));
        assert_eq!(
            import_public(&foreign, None).unwrap_err(),
            KeyError::UnsupportedAlgorithm("PS512".to_string())
        );
    }

    #[test]
    fn test_missing_and_invalid_components_are_named() {
        let no_n = jwk(json!({"kty": "RSA", "alg": "RS256", "e": "AQAB"}));
        assert_eq!(import_public(&no_n, None).unwrap_err(), KeyError::MissingComponent("n"));

        let padded = jwk(json!({"kty": "RSA", "alg": "RS256", "n": "AQAB", "e": "AQ=="}));
        assert!(matches!(
            import_public(&padded, None).unwrap_err(),
            KeyError::InvalidComponent { field: "e", .. }
        ));
    }

    #[test]
    fn test_fallback_reports_every_attempt() {
        let key = jwk(json!({"kty": "RSA", "n": "AQAB", "e": "AQAB", "d": "!!"}));
        let err = import_private_with_fallback(&key, KeyRole::Signing).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("\"alg\" argument is required"));
        assert!(message.contains("; Invalid JWK member \"d\""));
    }

    #[test]
    fn test_unknown_keys_are_skipped_without_warnings() {
        let set = JwkSet::parse(r#"{"keys":[{"kty":"RSA","use":"other","n":"AQAB","e":"AQAB"}]}"#).unwrap();
        let imported = import_jwk_set(&set);
        assert!(imported.handles.is_empty());
        assert!(imported.warnings.is_empty());
    }

    #[test]
    fn test_broken_member_becomes_warning() {
        let set = JwkSet::parse(r#"{"keys":[{"kty":"RSA","use":"sig","alg":"RS256","kid":"k1","e":"AQAB"}]}"#)
            .unwrap();
        let imported = import_jwk_set(&set);
        assert!(imported.handles.is_empty());
        assert_eq!(imported.warnings.len(), 1);
        let warning = &imported.warnings[0];
        assert_eq!(warning.stage, ImportStage::Public);
        assert_eq!(warning.role, KeyRole::Signing);
        assert_eq!(warning.kid.as_deref(), Some("k1"));
    }
}
