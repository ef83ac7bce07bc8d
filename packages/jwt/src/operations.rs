//! Sign, verify, encrypt and decrypt over loaded key handles
//!
//! Key availability and empty input are checked up front; the RSA work then
//! runs on the blocking pool.

use crate::claims::{parse_claims_object, stamp_issued, validate_time_claims};
use crate::error::{JwtError, JwtResult, Operation, OperationError};
use crate::futures::AsyncJwtResult;
use crate::jwe::{decrypt_compact, encrypt_compact, rsa_oaep_header};
use crate::jws::{rs256_header, sign_compact, verify_compact};
use crate::payload::{EncryptionPayload, PayloadFormat};
use chrono::Utc;
use jwkdesk_common::{LoggingTransformer, WorkbenchConfig};
use jwkdesk_key::{JoseAlgorithm, KeyHandles, PrivateKeyHandle, PublicKeyHandle};
use log::info;
use serde::Serialize;
use serde_json::{Map, Value};

const NO_SIGNING_PRIVATE: &str =
    "No signing private key available. Please generate or input a JWK Set with signing key.";
const SIGNING_PUBLIC_ONLY: &str = "Cannot sign with public key only. Signing requires a private key. Only verify operation is available with public keys.";
const NO_SIGNING_PUBLIC: &str =
    "No signing public key available. Please generate or input a JWK Set with signing key.";
const NO_ENCRYPTION_PUBLIC: &str =
    "No encryption public key available. Please generate or input a JWK Set with encryption key.";
const NO_ENCRYPTION_PRIVATE: &str =
    "No encryption private key available. Please generate or input a JWK Set with encryption key.";
const ENCRYPTION_PUBLIC_ONLY: &str = "Cannot decrypt with public key only. Decryption requires a private key. Only encrypt operation is available with public keys.";

/// A successfully verified token
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedToken {
    /// Protected header
    pub header: Map<String, Value>,
    /// Claims set
    pub payload: Map<String, Value>,
}

/// Display record for a verification attempt
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerifyOutcome {
    /// Whether the token verified
    pub valid: bool,
    /// Protected header, when valid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<Value>,
    /// Claims set, when valid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    /// Human-readable result
    pub message: String,
}

impl VerifyOutcome {
    /// Turn a verification result into its display record
    #[must_use]
    pub fn from_result(result: Result<VerifiedToken, OperationError>) -> Self {
        match result {
            Ok(token) => Self {
                valid: true,
                header: Some(Value::Object(token.header)),
                payload: Some(Value::Object(token.payload)),
                message: "JWT signature is valid".to_string(),
            },
            Err(e) => Self {
                valid: false,
                header: None,
                payload: None,
                message: format!("JWT verification failed: {}", e.source),
            },
        }
    }
}

/// Result of encryption
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encrypted {
    /// Compact JWE
    pub token: String,
    /// How the payload was interpreted
    pub format: PayloadFormat,
}

/// Decrypted content
#[derive(Debug, Clone, PartialEq)]
pub enum DecryptedValue {
    /// JSON object or array
    Json(Value),
    /// UTF-8 text (invalid sequences replaced)
    Text(String),
}

/// Result of decryption
#[derive(Debug, Clone, PartialEq)]
pub struct Decrypted {
    /// The content
    pub value: DecryptedValue,
    /// `JSON` or `plain text`
    pub format: PayloadFormat,
}

impl Decrypted {
    /// Content as display text: pretty JSON or the raw text
    #[must_use]
    pub fn to_display_string(&self) -> String {
        match &self.value {
            DecryptedValue::Json(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
            DecryptedValue::Text(text) => text.clone(),
        }
    }
}

/// The four JWT operations
#[derive(Debug, Clone, Copy)]
pub struct JwtOperations {
    token_lifetime_secs: i64,
}

impl Default for JwtOperations {
    fn default() -> Self {
        Self::new(2 * 60 * 60)
    }
}

impl JwtOperations {
    /// Operations issuing tokens valid for `token_lifetime_secs`
    #[must_use]
    pub fn new(token_lifetime_secs: i64) -> Self {
        Self { token_lifetime_secs }
    }

    /// Operations configured from the workbench configuration
    #[must_use]
    pub fn from_config(config: &WorkbenchConfig) -> Self {
        Self::new(config.token_lifetime_secs)
    }

    /// Lifetime of signed tokens
    #[must_use]
    pub fn token_lifetime_secs(&self) -> i64 {
        self.token_lifetime_secs
    }

    /// Sign a JSON object payload with the signing private key
    pub fn sign(&self, payload: &str, keys: &KeyHandles, kid: Option<&str>) -> AsyncJwtResult<String> {
        let key = match signing_private(keys) {
            Ok(key) => key,
            Err(e) => return AsyncJwtResult::error(Operation::Sign, e),
        };
        let payload = payload.trim();
        if payload.is_empty() {
            return AsyncJwtResult::error(Operation::Sign, JwtError::EmptyInput("Please enter a payload to sign."));
        }

        let payload = payload.to_string();
        let kid = kid.map(str::to_string);
        let lifetime = self.token_lifetime_secs;
        AsyncJwtResult::spawn_blocking(Operation::Sign, move || {
            let token = sign_at(&payload, &key, kid.as_deref(), Utc::now().timestamp(), lifetime)?;
            LoggingTransformer::log_token_operation("sign", &token);
            info!("Signed JWT");
            Ok(token)
        })
    }

    /// Verify an RS256 token with the signing public key
    pub fn verify(&self, token: &str, keys: &KeyHandles) -> AsyncJwtResult<VerifiedToken> {
        let key = match signing_public(keys) {
            Ok(key) => key,
            Err(e) => return AsyncJwtResult::error(Operation::Verify, e),
        };
        let token = token.trim();
        if token.is_empty() {
            return AsyncJwtResult::error(Operation::Verify, JwtError::EmptyInput("Please enter a JWT to verify."));
        }

        let token = token.to_string();
        AsyncJwtResult::spawn_blocking(Operation::Verify, move || {
            LoggingTransformer::log_token_operation("verify", &token);
            let verified = verify_at(&token, &key, Utc::now().timestamp());
            if let Err(e) = &verified {
                LoggingTransformer::log_crypto_failure("verify", e);
            }
            verified
        })
    }

    /// Encrypt a JSON or plain-text payload with the encryption public key
    pub fn encrypt(&self, payload: &str, keys: &KeyHandles, kid: Option<&str>) -> AsyncJwtResult<Encrypted> {
        let key = match encryption_public(keys) {
            Ok(key) => key,
            Err(e) => return AsyncJwtResult::error(Operation::Encrypt, e),
        };
        if payload.trim().is_empty() {
            return AsyncJwtResult::error(
                Operation::Encrypt,
                JwtError::EmptyInput("Please enter a payload to encrypt."),
            );
        }

        let payload = EncryptionPayload::classify(payload);
        let kid = kid.map(str::to_string);
        AsyncJwtResult::spawn_blocking(Operation::Encrypt, move || {
            let token = encrypt_compact(&rsa_oaep_header(kid.as_deref()), &payload.to_plaintext(), key.rsa_key())?;
            LoggingTransformer::log_token_operation("encrypt", &token);
            info!("Encrypted {} payload", payload.format());
            Ok(Encrypted {
                token,
                format: payload.format(),
            })
        })
    }

    /// Decrypt a compact JWE with the encryption private key
    ///
    /// The claims form is tried first, then the plain-text form.
    pub fn decrypt(&self, token: &str, keys: &KeyHandles) -> AsyncJwtResult<Decrypted> {
        let key = match encryption_private(keys) {
            Ok(key) => key,
            Err(e) => return AsyncJwtResult::error(Operation::Decrypt, e),
        };
        let token = token.trim();
        if token.is_empty() {
            return AsyncJwtResult::error(
                Operation::Decrypt,
                JwtError::EmptyInput("Please enter an encrypted JWT to decrypt."),
            );
        }

        let token = token.to_string();
        AsyncJwtResult::spawn_blocking(Operation::Decrypt, move || {
            LoggingTransformer::log_token_operation("decrypt", &token);
            let decrypted = decrypt_at(&token, &key, Utc::now().timestamp());
            match &decrypted {
                Ok(d) => info!("Decrypted {} payload", d.format),
                Err(e) => LoggingTransformer::log_crypto_failure("decrypt", e),
            }
            decrypted
        })
    }
}

/// Sign `payload` as of `now`
///
/// # Errors
/// `InvalidPayload` if the payload is not a JSON object, `InvalidToken` if
/// signing fails.
pub fn sign_at(payload: &str, key: &PrivateKeyHandle, kid: Option<&str>, now: i64, lifetime_secs: i64) -> JwtResult<String> {
    let mut claims = match serde_json::from_str::<Value>(payload.trim()) {
        Ok(Value::Object(claims)) => claims,
        Ok(_) => return Err(JwtError::InvalidPayload("JWT Claims Set must be a JSON object".to_string())),
        Err(e) => return Err(JwtError::InvalidPayload(e.to_string())),
    };
    stamp_issued(&mut claims, now, lifetime_secs);

    let body = serde_json::to_vec(&claims).map_err(|e| JwtError::InvalidPayload(e.to_string()))?;
    sign_compact(&rs256_header(kid), &body, key.rsa_key())
}

/// Verify `token` and its time claims as of `now`
///
/// # Errors
/// Any signature, format or claims failure.
pub fn verify_at(token: &str, key: &PublicKeyHandle, now: i64) -> JwtResult<VerifiedToken> {
    let parts = verify_compact(token, key.rsa_key())?;
    let payload = parse_claims_object(&parts.payload)?;
    validate_time_claims(&payload, now)?;
    Ok(VerifiedToken {
        header: parts.header,
        payload,
    })
}

/// Decrypt `token` as of `now`, trying the claims form then plain text
///
/// # Errors
/// `DecryptFallback` naming both failures.
pub fn decrypt_at(token: &str, key: &PrivateKeyHandle, now: i64) -> JwtResult<Decrypted> {
    let claims_error = match decrypt_claims(token, key, now) {
        Ok(value) => {
            return Ok(Decrypted {
                value: DecryptedValue::Json(value),
                format: PayloadFormat::Json,
            })
        }
        Err(e) => e,
    };

    match decrypt_compact(token, key.rsa_key()) {
        Ok((_, plaintext)) => Ok(Decrypted {
            value: DecryptedValue::Text(String::from_utf8_lossy(&plaintext).into_owned()),
            format: PayloadFormat::PlainText,
        }),
        Err(compact_error) => Err(JwtError::DecryptFallback {
            jwt: claims_error.to_string(),
            jwe: compact_error.to_string(),
        }),
    }
}

fn decrypt_claims(token: &str, key: &PrivateKeyHandle, now: i64) -> JwtResult<Value> {
    let (_, plaintext) = decrypt_compact(token, key.rsa_key())?;
    match serde_json::from_slice::<Value>(&plaintext) {
        Ok(Value::Object(claims)) => {
            validate_time_claims(&claims, now)?;
            Ok(Value::Object(claims))
        }
        Ok(array @ Value::Array(_)) => Ok(array),
        _ => Err(JwtError::invalid_claims("JWT Claims Set must be a top-level JSON object")),
    }
}

fn signing_private(keys: &KeyHandles) -> JwtResult<PrivateKeyHandle> {
    match (&keys.signing_private, &keys.signing_public) {
        (Some(key), _) => bound_to(key.algorithm(), JoseAlgorithm::Rs256).map(|()| key.clone()),
        (None, Some(_)) if !keys.has_private() => Err(JwtError::PublicKeyOnly(SIGNING_PUBLIC_ONLY)),
        (None, _) => Err(JwtError::MissingKey(NO_SIGNING_PRIVATE)),
    }
}

fn signing_public(keys: &KeyHandles) -> JwtResult<PublicKeyHandle> {
    let key = keys
        .signing_public
        .as_ref()
        .ok_or(JwtError::MissingKey(NO_SIGNING_PUBLIC))?;
    bound_to(key.algorithm(), JoseAlgorithm::Rs256)?;
    Ok(key.clone())
}

fn encryption_public(keys: &KeyHandles) -> JwtResult<PublicKeyHandle> {
    let key = keys
        .encryption_public
        .as_ref()
        .ok_or(JwtError::MissingKey(NO_ENCRYPTION_PUBLIC))?;
    bound_to(key.algorithm(), JoseAlgorithm::RsaOaep256)?;
    Ok(key.clone())
}

fn encryption_private(keys: &KeyHandles) -> JwtResult<PrivateKeyHandle> {
    match (&keys.encryption_private, &keys.encryption_public) {
        (Some(key), _) => bound_to(key.algorithm(), JoseAlgorithm::RsaOaep256).map(|()| key.clone()),
        (None, Some(_)) if !keys.has_private() => Err(JwtError::PublicKeyOnly(ENCRYPTION_PUBLIC_ONLY)),
        (None, _) => Err(JwtError::MissingKey(NO_ENCRYPTION_PRIVATE)),
    }
}

fn bound_to(actual: JoseAlgorithm, expected: JoseAlgorithm) -> JwtResult<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(JwtError::KeyAlgorithmMismatch {
            expected: expected.as_str(),
            actual: actual.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_keys_are_distinguished_from_public_only() {
        let empty = KeyHandles::default();
        assert_eq!(
            signing_private(&empty).unwrap_err(),
            JwtError::MissingKey(NO_SIGNING_PRIVATE)
        );
        assert_eq!(
            encryption_private(&empty).unwrap_err(),
            JwtError::MissingKey(NO_ENCRYPTION_PRIVATE)
        );
        assert_eq!(signing_public(&empty).unwrap_err(), JwtError::MissingKey(NO_SIGNING_PUBLIC));
        assert_eq!(
            encryption_public(&empty).unwrap_err(),
            JwtError::MissingKey(NO_ENCRYPTION_PUBLIC)
        );
    }

    #[test]
    fn test_verify_outcome_for_failure() {
        let outcome = VerifyOutcome::from_result(Err(OperationError::new(
            Operation::Verify,
            JwtError::InvalidSignature,
        )));
        assert!(!outcome.valid);
        assert_eq!(outcome.message, "JWT verification failed: signature verification failed");
        assert_eq!(
            serde_json::to_string(&outcome).unwrap(),
            r#"{"valid":false,"message":"JWT verification failed: signature verification failed"}"#
        );
    }
}
