//! Base64url repair for RSA key members
//!
//! JOSE libraries disagree on how they emit RSA integers: some keep `=`
//! padding, some use the standard alphabet. Import expects unpadded
//! base64url, so every RSA member is rewritten before decoding.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

/// RSA members carrying base64url-encoded integers
pub const RSA_COMPONENT_FIELDS: [&str; 8] = ["n", "e", "d", "p", "q", "dp", "dq", "qi"];

/// Rewrite a base64 or base64url string as unpadded base64url
///
/// Strips every `=`, maps `+` to `-` and `/` to `_`. Empty input is
/// returned unchanged.
#[must_use]
pub fn normalize_base64url(value: &str) -> String {
    value
        .chars()
        .filter(|c| *c != '=')
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect()
}

/// Decode a strict unpadded base64url member into bytes
pub(crate) fn decode_member(value: &str) -> std::result::Result<Vec<u8>, base64::DecodeError> {
    URL_SAFE_NO_PAD.decode(value)
}

/// Encode bytes as an unpadded base64url member
pub(crate) fn encode_member(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_padding_and_maps_alphabet() {
        assert_eq!(normalize_base64url("ab+/cd=="), "ab-_cd");
        assert_eq!(normalize_base64url("AQAB"), "AQAB");
    }

    #[test]
    fn test_empty_passes_through() {
        assert_eq!(normalize_base64url(""), "");
    }

    #[test]
    fn test_already_normalized_is_untouched() {
        let value = "sXchDaQebHnPiGvyDOAT4saGEUetSyo9MKLOoWFsueri23bOdgWp4Dy1Wl";
        assert_eq!(normalize_base64url(value), value);
    }
}
