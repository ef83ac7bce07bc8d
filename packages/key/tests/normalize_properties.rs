//! Property tests for base64url normalization

use base64::engine::general_purpose::{STANDARD, URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine as _;
use jwkdesk_key::normalize_base64url;
use proptest::prelude::*;

proptest! {
    #[test]
    fn normalized_output_has_no_padding_or_standard_alphabet(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        let normalized = normalize_base64url(&STANDARD.encode(&bytes));
        prop_assert!(!normalized.contains('='));
        prop_assert!(!normalized.contains('+'));
        prop_assert!(!normalized.contains('/'));
    }

    #[test]
    fn standard_encoding_normalizes_to_same_bytes(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        let normalized = normalize_base64url(&STANDARD.encode(&bytes));
        prop_assert_eq!(URL_SAFE_NO_PAD.decode(&normalized).unwrap(), bytes);
    }

    #[test]
    fn padded_urlsafe_normalizes_to_unpadded(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        let normalized = normalize_base64url(&URL_SAFE.encode(&bytes));
        prop_assert_eq!(normalized, URL_SAFE_NO_PAD.encode(&bytes));
    }

    #[test]
    fn normalization_is_idempotent(text in "[A-Za-z0-9+/=_-]{0,64}") {
        let once = normalize_base64url(&text);
        prop_assert_eq!(normalize_base64url(&once), once.clone());
    }
}
