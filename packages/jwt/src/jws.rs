//! Compact JWS with RS256

use crate::error::{JwtError, JwtResult};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::sha2::Sha256;
use rsa::signature::{SignatureEncoding, Signer, Verifier};
use rsa::{RsaPrivateKey, RsaPublicKey};
use serde_json::{Map, Value};

/// `alg` value of every token this module produces
pub const RS256: &str = "RS256";

/// Decoded parts of a verified compact JWS
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedParts {
    /// Protected header
    pub header: Map<String, Value>,
    /// Decoded payload bytes
    pub payload: Vec<u8>,
}

/// Protected header `{"alg":"RS256","kid":...}`; `kid` omitted when absent
#[must_use]
pub fn rs256_header(kid: Option<&str>) -> Map<String, Value> {
    let mut header = Map::new();
    header.insert("alg".to_string(), Value::from(RS256));
    if let Some(kid) = kid {
        header.insert("kid".to_string(), Value::from(kid));
    }
    header
}

/// Produce `b64u(header).b64u(payload).b64u(signature)`
///
/// # Errors
/// Returns `JwtError::InvalidToken` if signing fails.
pub fn sign_compact(header: &Map<String, Value>, payload: &[u8], key: &RsaPrivateKey) -> JwtResult<String> {
    let header_json = serde_json::to_vec(header).map_err(|e| JwtError::InvalidToken(e.to_string()))?;
    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(header_json),
        URL_SAFE_NO_PAD.encode(payload)
    );

    let signing_key = SigningKey::<Sha256>::new(key.clone());
    let signature = signing_key
        .try_sign(signing_input.as_bytes())
        .map_err(|e| JwtError::InvalidToken(format!("signing failed: {e}")))?;

    Ok(format!(
        "{signing_input}.{}",
        URL_SAFE_NO_PAD.encode(signature.to_bytes())
    ))
}

/// Verify an RS256 compact JWS and return its decoded parts
///
/// # Errors
/// Returns `JwtError::InvalidToken` for malformed input or a header `alg`
/// other than RS256, `JwtError::InvalidSignature` if the signature does not
/// verify.
pub fn verify_compact(token: &str, key: &RsaPublicKey) -> JwtResult<VerifiedParts> {
    let parts: Vec<&str> = token.split('.').collect();
    let [header_b64, payload_b64, signature_b64] = parts.as_slice() else {
        return Err(JwtError::invalid_token("Invalid Compact JWS"));
    };

    let header = decode_header(header_b64)?;
    match header.get("alg").and_then(Value::as_str) {
        Some(RS256) => {}
        Some(other) => {
            return Err(JwtError::InvalidToken(format!(
                "\"alg\" (Algorithm) Header Parameter value not allowed: {other}"
            )))
        }
        None => {
            return Err(JwtError::invalid_token(
                "JWS \"alg\" (Algorithm) Header Parameter missing or invalid",
            ))
        }
    }

    let signature_bytes = URL_SAFE_NO_PAD
        .decode(signature_b64)
        .map_err(|_| JwtError::invalid_token("Failed to base64url decode the signature"))?;
    let signature = Signature::try_from(signature_bytes.as_slice()).map_err(|_| JwtError::InvalidSignature)?;

    let verifying_key = VerifyingKey::<Sha256>::new(key.clone());
    let signing_input = format!("{header_b64}.{payload_b64}");
    verifying_key
        .verify(signing_input.as_bytes(), &signature)
        .map_err(|_| JwtError::InvalidSignature)?;

    let payload = URL_SAFE_NO_PAD
        .decode(payload_b64)
        .map_err(|_| JwtError::invalid_token("Failed to base64url decode the payload"))?;

    Ok(VerifiedParts { header, payload })
}

/// Decode a base64url protected header into a JSON object
pub(crate) fn decode_header(encoded: &str) -> JwtResult<Map<String, Value>> {
    let bytes = URL_SAFE_NO_PAD
        .decode(encoded)
        .map_err(|_| JwtError::invalid_token("Failed to base64url decode the protected header"))?;
    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(header)) => Ok(header),
        _ => Err(JwtError::invalid_token("Failed to parse the protected header")),
    }
}
