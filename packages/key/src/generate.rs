//! Dual-purpose RSA key-set generation

use crate::algorithm::JoseAlgorithm;
use crate::base64url::encode_member;
use crate::classify::KeyRole;
use crate::error::{KeyError, Result};
use crate::handle::{KeyHandles, PrivateKeyHandle};
use crate::jwk::{Jwk, JwkSet};
use crate::key_id::KeyIdGenerator;
use crate::key_result::AsyncKeyResult;
use jwkdesk_common::config::SUPPORTED_MODULUS_BITS;
use jwkdesk_common::{LoggingTransformer, WorkbenchConfig};
use log::info;
use rand::rngs::OsRng;
use rand::Rng;
use rsa::traits::{PrivateKeyParts, PublicKeyParts};
use rsa::{BigUint, RsaPrivateKey};

/// A fresh signing + encryption key set
#[derive(Debug, Clone)]
pub struct GeneratedKeySet {
    /// `{"keys": [signing, encryption]}`
    pub jwk_set: JwkSet,
    /// All four slots filled
    pub handles: KeyHandles,
}

/// Generates one RS256 and one RSA-OAEP-256 keypair
#[derive(Debug, Clone, Copy)]
pub struct KeySetGenerator {
    modulus_bits: usize,
    key_ids: KeyIdGenerator,
}

impl Default for KeySetGenerator {
    fn default() -> Self {
        Self {
            modulus_bits: 2048,
            key_ids: KeyIdGenerator::default(),
        }
    }
}

impl KeySetGenerator {
    /// Generator with an explicit modulus size and key id generator
    ///
    /// # Errors
    /// Returns `KeyError::InvalidKeySize` for unsupported modulus sizes.
    pub fn new(modulus_bits: usize, key_ids: KeyIdGenerator) -> Result<Self> {
        if !SUPPORTED_MODULUS_BITS.contains(&modulus_bits) {
            return Err(KeyError::InvalidKeySize {
                expected: SUPPORTED_MODULUS_BITS.to_vec(),
                actual: modulus_bits,
            });
        }
        Ok(Self { modulus_bits, key_ids })
    }

    /// Generator configured from the workbench configuration
    ///
    /// # Errors
    /// Returns `KeyError::InvalidKeySize` for unsupported modulus sizes.
    pub fn from_config(config: &WorkbenchConfig) -> Result<Self> {
        Self::new(config.rsa_modulus_bits, KeyIdGenerator::new(config.key_id_length))
    }

    /// Modulus size of generated keys
    #[must_use]
    pub fn modulus_bits(&self) -> usize {
        self.modulus_bits
    }

    /// Generate a key set on the blocking pool
    pub fn generate(&self) -> AsyncKeyResult<GeneratedKeySet> {
        let generator = *self;
        AsyncKeyResult::spawn_blocking(move || generator.generate_now())
    }

    /// Generate a key set on the current thread
    ///
    /// # Errors
    /// Returns `KeyError::KeyGeneration` if RSA generation fails.
    pub fn generate_now(&self) -> Result<GeneratedKeySet> {
        self.generate_with_rng(&mut rand::thread_rng())
    }

    /// Generate a key set drawing key ids from `id_rng`
    ///
    /// RSA primes always come from the operating system RNG.
    ///
    /// # Errors
    /// Returns `KeyError::KeyGeneration` if RSA generation fails.
    pub fn generate_with_rng<R: Rng + ?Sized>(&self, id_rng: &mut R) -> Result<GeneratedKeySet> {
        let signing_kid = self.key_ids.generate(KeyRole::Signing, id_rng);
        let encryption_kid = self.key_ids.generate(KeyRole::Encryption, id_rng);

        let signing = self.generate_key()?;
        let encryption = self.generate_key()?;

        let signing_jwk = export_private_jwk(&signing, "sig", &signing_kid, JoseAlgorithm::Rs256)?;
        let encryption_jwk =
            export_private_jwk(&encryption, "enc", &encryption_kid, JoseAlgorithm::RsaOaep256)?;

        let signing_private = PrivateKeyHandle::new(JoseAlgorithm::Rs256, Some(signing_kid), signing);
        let encryption_private =
            PrivateKeyHandle::new(JoseAlgorithm::RsaOaep256, Some(encryption_kid), encryption);

        let handles = KeyHandles {
            signing_public: Some(signing_private.to_public()),
            signing_private: Some(signing_private),
            encryption_public: Some(encryption_private.to_public()),
            encryption_private: Some(encryption_private),
        };

        LoggingTransformer::log_key_event("generate signing", signing_jwk.kid(), true);
        LoggingTransformer::log_key_event("generate encryption", encryption_jwk.kid(), true);
        info!("Generated {}-bit JWK Set", self.modulus_bits);

        Ok(GeneratedKeySet {
            jwk_set: JwkSet::Keys(vec![signing_jwk, encryption_jwk]),
            handles,
        })
    }

    fn generate_key(&self) -> Result<RsaPrivateKey> {
        RsaPrivateKey::new(&mut OsRng, self.modulus_bits).map_err(|e| KeyError::KeyGeneration(e.to_string()))
    }
}

/// Export a private key as a JWK tagged with `use`, `kid` and `alg`
fn export_private_jwk(key: &RsaPrivateKey, key_use: &str, kid: &str, algorithm: JoseAlgorithm) -> Result<Jwk> {
    let [p, q] = key.primes() else {
        return Err(KeyError::KeyGeneration(format!(
            "expected two primes, got {}",
            key.primes().len()
        )));
    };
    let crt_missing = || KeyError::KeyGeneration("CRT values were not precomputed".to_string());
    let dp = key.dp().ok_or_else(crt_missing)?;
    let dq = key.dq().ok_or_else(crt_missing)?;
    let qi = key.crt_coefficient().ok_or_else(crt_missing)?;

    let mut jwk = Jwk::default();
    jwk.set("kty", "RSA");
    jwk.set("n", uint(key.n()));
    jwk.set("e", uint(key.e()));
    jwk.set("d", uint(key.d()));
    jwk.set("p", uint(p));
    jwk.set("q", uint(q));
    jwk.set("dp", uint(dp));
    jwk.set("dq", uint(dq));
    jwk.set("qi", uint(&qi));
    jwk.set("use", key_use);
    jwk.set("kid", kid);
    jwk.set("alg", algorithm.as_str());
    Ok(jwk)
}

fn uint(value: &BigUint) -> String {
    encode_member(&value.to_bytes_be())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_modulus_is_rejected() {
        let err = KeySetGenerator::new(1024, KeyIdGenerator::default()).unwrap_err();
        assert!(matches!(err, KeyError::InvalidKeySize { actual: 1024, .. }));
    }

    #[test]
    fn test_config_drives_generator() {
        let config = WorkbenchConfig {
            rsa_modulus_bits: 3072,
            ..WorkbenchConfig::default()
        };
        let generator = KeySetGenerator::from_config(&config).unwrap();
        assert_eq!(generator.modulus_bits(), 3072);
    }
}
