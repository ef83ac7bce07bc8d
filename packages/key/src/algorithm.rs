//! JOSE algorithm identifiers handled by this toolkit

use crate::error::KeyError;
use std::fmt;
use std::str::FromStr;

/// Algorithms a key handle can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoseAlgorithm {
    /// RSASSA-PKCS1-v1_5 with SHA-256
    Rs256,
    /// RSAES-OAEP with SHA-256 and MGF1-SHA-256
    RsaOaep256,
}

impl JoseAlgorithm {
    /// The `alg` value as it appears in JWKs and JOSE headers
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rs256 => "RS256",
            Self::RsaOaep256 => "RSA-OAEP-256",
        }
    }
}

impl fmt::Display for JoseAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JoseAlgorithm {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RS256" => Ok(Self::Rs256),
            "RSA-OAEP-256" => Ok(Self::RsaOaep256),
            other => Err(KeyError::UnsupportedAlgorithm(other.to_string())),
        }
    }
}
