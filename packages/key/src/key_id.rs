//! Key identifier generation

use crate::classify::KeyRole;
use rand::Rng;

const KEY_ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Default number of random characters after the role prefix
pub const DEFAULT_KEY_ID_LENGTH: usize = 12;

/// Produces `sig_XXXXXXXXXXXX` / `enc_XXXXXXXXXXXX` key ids
#[derive(Debug, Clone, Copy)]
pub struct KeyIdGenerator {
    length: usize,
}

impl Default for KeyIdGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_ID_LENGTH)
    }
}

impl KeyIdGenerator {
    /// Generator emitting `length` random characters per id
    #[must_use]
    pub fn new(length: usize) -> Self {
        Self { length }
    }

    /// Random characters per id
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    /// Random suffix drawn uniformly from `[A-Za-z0-9]`
    pub fn random_suffix<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        (0..self.length)
            .map(|_| char::from(KEY_ID_ALPHABET[rng.gen_range(0..KEY_ID_ALPHABET.len())]))
            .collect()
    }

    /// Key id for a role; `Unknown` gets the `key_` prefix
    pub fn generate<R: Rng + ?Sized>(&self, role: KeyRole, rng: &mut R) -> String {
        let prefix = match role {
            KeyRole::Signing => "sig",
            KeyRole::Encryption => "enc",
            KeyRole::Unknown => "key",
        };
        format!("{prefix}_{}", self.random_suffix(rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_id_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let id = KeyIdGenerator::default().generate(KeyRole::Signing, &mut rng);
        assert!(id.starts_with("sig_"));
        assert_eq!(id.len(), 16);
        assert!(id[4..].chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let generator = KeyIdGenerator::new(20);
        let a = generator.generate(KeyRole::Encryption, &mut StdRng::seed_from_u64(99));
        let b = generator.generate(KeyRole::Encryption, &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
        assert_eq!(a.len(), 24);
    }
}
