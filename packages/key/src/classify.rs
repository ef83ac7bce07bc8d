//! Role classification for JWKs

use crate::algorithm::JoseAlgorithm;
use crate::jwk::Jwk;
use std::fmt;

/// What a key is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyRole {
    /// RS256 signatures
    Signing,
    /// RSA-OAEP-256 key wrapping
    Encryption,
    /// Neither; skipped during import
    Unknown,
}

impl KeyRole {
    /// Algorithm a key of this role is bound to
    #[must_use]
    pub const fn canonical_algorithm(self) -> Option<JoseAlgorithm> {
        match self {
            Self::Signing => Some(JoseAlgorithm::Rs256),
            Self::Encryption => Some(JoseAlgorithm::RsaOaep256),
            Self::Unknown => None,
        }
    }

    /// Lowercase name used in logs and warnings
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Signing => "signing",
            Self::Encryption => "encryption",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for KeyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the key was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// An entry of a `keys` array
    SetMember,
    /// A bare JWK supplied in place of a set
    Standalone,
}

/// Decide a key's role
///
/// Rules apply in order, first match wins:
/// 1. `use` is `sig`, `alg` is `RS256`, or an RSA key whose `kid` contains
///    `signing` is a signing key
/// 2. `use` is `enc` or `alg` is `RSA-OAEP-256` is an encryption key
/// 3. a standalone JWK without `use` defaults to signing
/// 4. anything else is unknown
#[must_use]
pub fn classify(jwk: &Jwk, placement: Placement) -> KeyRole {
    let key_use = jwk.key_use();
    let alg = jwk.alg();

    let signing_kid = jwk.kty() == Some("RSA") && jwk.kid().is_some_and(|kid| kid.contains("signing"));
    if key_use == Some("sig") || alg == Some(JoseAlgorithm::Rs256.as_str()) || signing_kid {
        return KeyRole::Signing;
    }

    if key_use == Some("enc") || alg == Some(JoseAlgorithm::RsaOaep256.as_str()) {
        return KeyRole::Encryption;
    }

    if placement == Placement::Standalone && !jwk.has_use() {
        return KeyRole::Signing;
    }

    KeyRole::Unknown
}
