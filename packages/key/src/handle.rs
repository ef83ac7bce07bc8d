//! Imported key handles

use crate::algorithm::JoseAlgorithm;
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use std::fmt;
use std::sync::Arc;

/// An imported RSA private key bound to one algorithm
#[derive(Clone)]
pub struct PrivateKeyHandle {
    algorithm: JoseAlgorithm,
    kid: Option<String>,
    key: Arc<RsaPrivateKey>,
}

impl PrivateKeyHandle {
    /// Bind a private key to an algorithm
    #[must_use]
    pub fn new(algorithm: JoseAlgorithm, kid: Option<String>, key: RsaPrivateKey) -> Self {
        Self {
            algorithm,
            kid,
            key: Arc::new(key),
        }
    }

    /// Algorithm the key was imported for
    #[must_use]
    pub fn algorithm(&self) -> JoseAlgorithm {
        self.algorithm
    }

    /// `kid` of the source JWK
    #[must_use]
    pub fn kid(&self) -> Option<&str> {
        self.kid.as_deref()
    }

    /// The RSA key
    #[must_use]
    pub fn rsa_key(&self) -> &RsaPrivateKey {
        &self.key
    }

    /// Public half of this key, bound to the same algorithm
    #[must_use]
    pub fn to_public(&self) -> PublicKeyHandle {
        PublicKeyHandle::new(self.algorithm, self.kid.clone(), self.key.to_public_key())
    }

    /// Modulus size in bits
    #[must_use]
    pub fn modulus_bits(&self) -> usize {
        self.key.size() * 8
    }
}

impl fmt::Debug for PrivateKeyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKeyHandle")
            .field("algorithm", &self.algorithm)
            .field("kid", &self.kid)
            .field("modulus_bits", &self.modulus_bits())
            .finish_non_exhaustive()
    }
}

/// An imported RSA public key bound to one algorithm
#[derive(Clone)]
pub struct PublicKeyHandle {
    algorithm: JoseAlgorithm,
    kid: Option<String>,
    key: Arc<RsaPublicKey>,
}

impl PublicKeyHandle {
    /// Bind a public key to an algorithm
    #[must_use]
    pub fn new(algorithm: JoseAlgorithm, kid: Option<String>, key: RsaPublicKey) -> Self {
        Self {
            algorithm,
            kid,
            key: Arc::new(key),
        }
    }

    /// Algorithm the key was imported for
    #[must_use]
    pub fn algorithm(&self) -> JoseAlgorithm {
        self.algorithm
    }

    /// `kid` of the source JWK
    #[must_use]
    pub fn kid(&self) -> Option<&str> {
        self.kid.as_deref()
    }

    /// The RSA key
    #[must_use]
    pub fn rsa_key(&self) -> &RsaPublicKey {
        &self.key
    }

    /// Modulus size in bits
    #[must_use]
    pub fn modulus_bits(&self) -> usize {
        self.key.size() * 8
    }
}

impl fmt::Debug for PublicKeyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicKeyHandle")
            .field("algorithm", &self.algorithm)
            .field("kid", &self.kid)
            .field("modulus_bits", &self.modulus_bits())
            .finish()
    }
}

/// The four key slots a loaded key set fills
#[derive(Debug, Clone, Default)]
pub struct KeyHandles {
    /// RS256 private key
    pub signing_private: Option<PrivateKeyHandle>,
    /// RS256 public key
    pub signing_public: Option<PublicKeyHandle>,
    /// RSA-OAEP-256 private key
    pub encryption_private: Option<PrivateKeyHandle>,
    /// RSA-OAEP-256 public key
    pub encryption_public: Option<PublicKeyHandle>,
}

impl KeyHandles {
    /// Whether every slot is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.signing_private.is_none()
            && self.signing_public.is_none()
            && self.encryption_private.is_none()
            && self.encryption_public.is_none()
    }

    /// Whether a private key is present in either role
    #[must_use]
    pub fn has_private(&self) -> bool {
        self.signing_private.is_some() || self.encryption_private.is_some()
    }

    /// Number of filled slots
    #[must_use]
    pub fn filled_slots(&self) -> usize {
        [
            self.signing_private.is_some(),
            self.signing_public.is_some(),
            self.encryption_private.is_some(),
            self.encryption_public.is_some(),
        ]
        .into_iter()
        .filter(|filled| *filled)
        .count()
    }
}
