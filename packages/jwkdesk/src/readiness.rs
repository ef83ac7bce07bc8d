//! Which operations a tab's keys allow

use jwkdesk_jwt::Operation;
use jwkdesk_key::KeyHandles;
use serde::Serialize;
use std::fmt;

/// Readiness of a key set for the four operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Readiness {
    /// Full signing and encryption pairs
    Both,
    /// Full signing pair only
    SigningOnly,
    /// Full encryption pair only
    EncryptionOnly,
    /// Public signing and encryption keys from a public-only set
    PublicBoth,
    /// Public signing key from a public-only set
    PublicSigningOnly,
    /// Public encryption key from a public-only set
    PublicEncryptionOnly,
    /// Nothing usable
    NoKeys,
}

impl Readiness {
    /// Classify loaded handles
    ///
    /// `public_only` is whether the source set has no private exponent in
    /// any key; the public states require it.
    #[must_use]
    pub fn classify(handles: &KeyHandles, public_only: bool) -> Self {
        let signing_pair = handles.signing_private.is_some() && handles.signing_public.is_some();
        let encryption_pair = handles.encryption_private.is_some() && handles.encryption_public.is_some();
        let signing_public = public_only && handles.signing_private.is_none() && handles.signing_public.is_some();
        let encryption_public =
            public_only && handles.encryption_private.is_none() && handles.encryption_public.is_some();

        match (signing_pair, encryption_pair) {
            (true, true) => Self::Both,
            (true, false) => Self::SigningOnly,
            (false, true) => Self::EncryptionOnly,
            (false, false) => match (signing_public, encryption_public) {
                (true, true) => Self::PublicBoth,
                (true, false) => Self::PublicSigningOnly,
                (false, true) => Self::PublicEncryptionOnly,
                (false, false) => Self::NoKeys,
            },
        }
    }

    /// Short state name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Both => "both",
            Self::SigningOnly => "signing-only",
            Self::EncryptionOnly => "encryption-only",
            Self::PublicBoth => "public-both",
            Self::PublicSigningOnly => "public-signing-only",
            Self::PublicEncryptionOnly => "public-encryption-only",
            Self::NoKeys => "no-keys",
        }
    }

    /// Status line shown to the user
    #[must_use]
    pub const fn text(self) -> &'static str {
        match self {
            Self::Both => "Ready for signing & encryption",
            Self::SigningOnly => "Ready for signing only",
            Self::EncryptionOnly => "Ready for encryption only",
            Self::PublicBoth => "Public keys only - verify & encrypt available",
            Self::PublicSigningOnly => "Public key only - verify available",
            Self::PublicEncryptionOnly => "Public key only - encrypt available",
            Self::NoKeys => "No keys loaded",
        }
    }

    /// Operations the keys support
    #[must_use]
    pub const fn operations(self) -> &'static [Operation] {
        match self {
            Self::Both => &[Operation::Sign, Operation::Verify, Operation::Encrypt, Operation::Decrypt],
            Self::SigningOnly => &[Operation::Sign, Operation::Verify],
            Self::EncryptionOnly => &[Operation::Encrypt, Operation::Decrypt],
            Self::PublicBoth => &[Operation::Verify, Operation::Encrypt],
            Self::PublicSigningOnly => &[Operation::Verify],
            Self::PublicEncryptionOnly => &[Operation::Encrypt],
            Self::NoKeys => &[],
        }
    }

    /// Whether `operation` is available
    #[must_use]
    pub fn allows(self, operation: Operation) -> bool {
        self.operations().contains(&operation)
    }
}

impl fmt::Display for Readiness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}
