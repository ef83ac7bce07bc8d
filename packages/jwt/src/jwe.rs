//! Compact JWE with RSA-OAEP-256 key wrapping and A256GCM content encryption

use crate::error::{JwtError, JwtResult};
use crate::jws::decode_header;
use aes_gcm::aead::{Aead, Payload};
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::rngs::OsRng;
use rand::RngCore;
use rsa::sha2::Sha256;
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use serde_json::{Map, Value};
use zeroize::Zeroizing;

/// Key management algorithm
pub const RSA_OAEP_256: &str = "RSA-OAEP-256";
/// Content encryption algorithm
pub const A256GCM: &str = "A256GCM";

const CEK_LEN: usize = 32;
const IV_LEN: usize = 12;
const TAG_LEN: usize = 16;

/// Protected header `{"alg":"RSA-OAEP-256","enc":"A256GCM","kid":...}`
#[must_use]
pub fn rsa_oaep_header(kid: Option<&str>) -> Map<String, Value> {
    let mut header = Map::new();
    header.insert("alg".to_string(), Value::from(RSA_OAEP_256));
    header.insert("enc".to_string(), Value::from(A256GCM));
    if let Some(kid) = kid {
        header.insert("kid".to_string(), Value::from(kid));
    }
    header
}

/// Encrypt `plaintext` into `header.encrypted_key.iv.ciphertext.tag`
///
/// # Errors
/// Returns `JwtError::Encryption` if key wrapping or content encryption fails.
pub fn encrypt_compact(header: &Map<String, Value>, plaintext: &[u8], key: &RsaPublicKey) -> JwtResult<String> {
    let header_json = serde_json::to_vec(header).map_err(|e| JwtError::Encryption(e.to_string()))?;
    let header_b64 = URL_SAFE_NO_PAD.encode(header_json);

    let mut cek = Zeroizing::new([0u8; CEK_LEN]);
    OsRng.fill_bytes(&mut cek[..]);
    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut iv);

    let encrypted_key = key
        .encrypt(&mut OsRng, Oaep::new::<Sha256>(), &cek[..])
        .map_err(|e| JwtError::Encryption(format!("key wrapping failed: {e}")))?;

    let cipher = Aes256Gcm::new_from_slice(&cek[..]).map_err(|e| JwtError::Encryption(e.to_string()))?;
    let mut sealed = cipher
        .encrypt(
            Nonce::from_slice(&iv),
            Payload {
                msg: plaintext,
                aad: header_b64.as_bytes(),
            },
        )
        .map_err(|_| JwtError::Encryption("content encryption failed".to_string()))?;
    let tag = sealed.split_off(sealed.len() - TAG_LEN);

    Ok(format!(
        "{header_b64}.{}.{}.{}.{}",
        URL_SAFE_NO_PAD.encode(encrypted_key),
        URL_SAFE_NO_PAD.encode(iv),
        URL_SAFE_NO_PAD.encode(sealed),
        URL_SAFE_NO_PAD.encode(tag)
    ))
}

/// Decrypt a compact JWE produced by [`encrypt_compact`]
///
/// Returns the protected header and the plaintext.
///
/// # Errors
/// Returns `JwtError::InvalidToken` for malformed input or unexpected header
/// algorithms, `JwtError::Decryption` if unwrapping or authentication fails.
pub fn decrypt_compact(token: &str, key: &RsaPrivateKey) -> JwtResult<(Map<String, Value>, Vec<u8>)> {
    let parts: Vec<&str> = token.split('.').collect();
    let [header_b64, encrypted_key_b64, iv_b64, ciphertext_b64, tag_b64] = parts.as_slice() else {
        return Err(JwtError::invalid_token("Invalid Compact JWE"));
    };

    let header = decode_header(header_b64)?;
    if header.get("alg").and_then(Value::as_str) != Some(RSA_OAEP_256) {
        return Err(JwtError::invalid_token(
            "\"alg\" (Algorithm) Header Parameter value not allowed",
        ));
    }
    if header.get("enc").and_then(Value::as_str) != Some(A256GCM) {
        return Err(JwtError::invalid_token(
            "\"enc\" (Encryption Algorithm) Header Parameter value not allowed",
        ));
    }

    let encrypted_key = decode_segment(encrypted_key_b64, "encrypted_key")?;
    let iv = decode_segment(iv_b64, "iv")?;
    let mut sealed = decode_segment(ciphertext_b64, "ciphertext")?;
    let tag = decode_segment(tag_b64, "tag")?;
    if iv.len() != IV_LEN {
        return Err(JwtError::invalid_token("Invalid Initialization Vector length"));
    }
    if tag.len() != TAG_LEN {
        return Err(JwtError::invalid_token("Invalid Authentication Tag length"));
    }

    let cek = Zeroizing::new(
        key.decrypt(Oaep::new::<Sha256>(), &encrypted_key)
            .map_err(|_| JwtError::decryption("decryption operation failed"))?,
    );
    if cek.len() != CEK_LEN {
        return Err(JwtError::decryption("Invalid Content Encryption Key length"));
    }

    sealed.extend_from_slice(&tag);
    let cipher = Aes256Gcm::new_from_slice(&cek[..]).map_err(|e| JwtError::Decryption(e.to_string()))?;
    let plaintext = cipher
        .decrypt(
            Nonce::from_slice(&iv),
            Payload {
                msg: &sealed,
                aad: header_b64.as_bytes(),
            },
        )
        .map_err(|_| JwtError::decryption("decryption operation failed"))?;

    Ok((header, plaintext))
}

fn decode_segment(encoded: &str, name: &str) -> JwtResult<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(encoded)
        .map_err(|_| JwtError::InvalidToken(format!("Failed to base64url decode the {name}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_shape() {
        assert_eq!(
            serde_json::to_string(&rsa_oaep_header(Some("enc_1"))).unwrap(),
            r#"{"alg":"RSA-OAEP-256","enc":"A256GCM","kid":"enc_1"}"#
        );
    }

    #[test]
    fn test_round_trip_and_tamper() {
        let key = RsaPrivateKey::new(&mut OsRng, 2048).unwrap();
        let token = encrypt_compact(&rsa_oaep_header(None), b"hello", &key.to_public_key()).unwrap();
        assert_eq!(token.split('.').count(), 5);

        let (header, plaintext) = decrypt_compact(&token, &key).unwrap();
        assert_eq!(plaintext, b"hello");
        assert_eq!(header["enc"], A256GCM);

        let mut segments: Vec<String> = token.split('.').map(str::to_string).collect();
        segments[3] = URL_SAFE_NO_PAD.encode(b"jello");
        let err = decrypt_compact(&segments.join("."), &key).unwrap_err();
        assert_eq!(err, JwtError::decryption("decryption operation failed"));
    }

    #[test]
    fn test_rejects_wrong_shape() {
        let key = RsaPrivateKey::new(&mut OsRng, 2048).unwrap();
        assert_eq!(
            decrypt_compact("a.b.c", &key).unwrap_err(),
            JwtError::invalid_token("Invalid Compact JWE")
        );
    }
}
