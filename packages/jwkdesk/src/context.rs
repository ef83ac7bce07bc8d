//! Per-tab key-set state

use crate::readiness::Readiness;
use jwkdesk_key::{GeneratedKeySet, JwkSet, KeyHandles};

/// The key set owned by one tab
///
/// Updated only through the by-value `with_*` / `cleared` transformations.
#[derive(Debug, Clone, Default)]
pub struct KeySetContext {
    jwk_set: Option<JwkSet>,
    content: String,
    handles: KeyHandles,
}

impl KeySetContext {
    /// Empty context
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parsed set, if one was loaded or generated
    #[must_use]
    pub fn jwk_set(&self) -> Option<&JwkSet> {
        self.jwk_set.as_ref()
    }

    /// Editor text
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Imported key handles
    #[must_use]
    pub fn handles(&self) -> &KeyHandles {
        &self.handles
    }

    /// Replace the text only; set and handles are untouched
    #[must_use]
    pub fn with_content(self, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..self
        }
    }

    /// Replace set and handles; the text is untouched
    #[must_use]
    pub fn with_imported(self, jwk_set: JwkSet, handles: KeyHandles) -> Self {
        Self {
            jwk_set: Some(jwk_set),
            handles,
            ..self
        }
    }

    /// Replace everything with a freshly generated set and its text
    #[must_use]
    pub fn with_generated(self, generated: GeneratedKeySet, content: String) -> Self {
        Self {
            jwk_set: Some(generated.jwk_set),
            content,
            handles: generated.handles,
        }
    }

    /// Drop set and handles, keeping the text
    #[must_use]
    pub fn without_keys(self) -> Self {
        Self {
            jwk_set: None,
            handles: KeyHandles::default(),
            ..self
        }
    }

    /// Empty text, set and handles
    #[must_use]
    pub fn cleared(self) -> Self {
        Self::default()
    }

    /// Whether the loaded set has no private exponent anywhere
    ///
    /// `false` when no set is loaded.
    #[must_use]
    pub fn is_public_only(&self) -> bool {
        self.jwk_set.as_ref().is_some_and(JwkSet::is_public_only)
    }

    /// Readiness of the loaded handles
    #[must_use]
    pub fn readiness(&self) -> Readiness {
        Readiness::classify(&self.handles, self.is_public_only())
    }

    /// `kid` to put in signed token headers
    #[must_use]
    pub fn signing_key_id(&self) -> Option<&str> {
        self.jwk_set.as_ref().and_then(JwkSet::signing_key_id)
    }

    /// `kid` to put in encrypted token headers
    #[must_use]
    pub fn encryption_key_id(&self) -> Option<&str> {
        self.jwk_set.as_ref().and_then(JwkSet::encryption_key_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_context() {
        let context = KeySetContext::new();
        assert!(context.jwk_set().is_none());
        assert!(context.handles().is_empty());
        assert!(!context.is_public_only());
        assert_eq!(context.readiness(), Readiness::NoKeys);
    }

    #[test]
    fn test_transformations() {
        let set = JwkSet::parse(r#"{"keys":[{"kty":"RSA","use":"sig","kid":"sig_1","n":"AQAB","e":"AQAB"}]}"#).unwrap();
        let context = KeySetContext::new()
            .with_content("text")
            .with_imported(set, KeyHandles::default());
        assert_eq!(context.content(), "text");
        assert!(context.is_public_only());
        assert_eq!(context.signing_key_id(), Some("sig_1"));

        let context = context.without_keys();
        assert_eq!(context.content(), "text");
        assert!(context.jwk_set().is_none());

        let context = context.cleared();
        assert_eq!(context.content(), "");
    }
}
