//! JWK and JWK Set model
//!
//! A JWK is kept as an ordered JSON object so members the toolkit does not
//! interpret (`key_ops`, `ext`, `x5c`, ...) survive a round trip and
//! re-serialized sets keep their original member order.

use crate::base64url::{normalize_base64url, RSA_COMPONENT_FIELDS};
use crate::error::{KeyError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Members removed to derive the public view of an RSA key
pub const RSA_PRIVATE_FIELDS: [&str; 6] = ["d", "p", "q", "dp", "dq", "qi"];

/// A single JSON Web Key
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Jwk(Map<String, Value>);

impl Jwk {
    /// Wrap an existing JSON object
    #[must_use]
    pub fn from_map(members: Map<String, Value>) -> Self {
        Self(members)
    }

    /// Borrow the underlying members
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// String value of a member, if present and a string
    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    /// Set or replace a member, keeping its position if it already exists
    pub fn set(&mut self, name: &str, value: impl Into<Value>) {
        self.0.insert(name.to_string(), value.into());
    }

    /// `kty` member
    #[must_use]
    pub fn kty(&self) -> Option<&str> {
        self.get_str("kty")
    }

    /// `use` member
    #[must_use]
    pub fn key_use(&self) -> Option<&str> {
        self.get_str("use")
    }

    /// Whether a `use` member is present at all (a JSON `null` counts as absent)
    #[must_use]
    pub fn has_use(&self) -> bool {
        !matches!(self.0.get("use"), None | Some(Value::Null))
    }

    /// `alg` member
    #[must_use]
    pub fn alg(&self) -> Option<&str> {
        self.get_str("alg")
    }

    /// `kid` member
    #[must_use]
    pub fn kid(&self) -> Option<&str> {
        self.get_str("kid")
    }

    /// Whether the key carries a private exponent `d`
    ///
    /// An empty string or `null` does not count.
    #[must_use]
    pub fn has_private_material(&self) -> bool {
        match self.0.get("d") {
            None | Some(Value::Null) | Some(Value::Bool(false)) => false,
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
            Some(_) => true,
        }
    }

    /// Copy of the key with every RSA member rewritten as unpadded base64url
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut normalized = self.clone();
        for field in RSA_COMPONENT_FIELDS {
            if let Some(Value::String(value)) = normalized.0.get_mut(field) {
                if !value.is_empty() {
                    *value = normalize_base64url(value);
                }
            }
        }
        normalized
    }

    /// Copy of the key without its private members
    #[must_use]
    pub fn to_public(&self) -> Self {
        let mut public = self.clone();
        for field in RSA_PRIVATE_FIELDS {
            public.0.shift_remove(field);
        }
        public
    }
}

/// A JWK Set, or a bare JWK accepted in its place
#[derive(Debug, Clone, PartialEq)]
pub enum JwkSet {
    /// `{"keys": [...]}`
    Keys(Vec<Jwk>),
    /// A bare JWK object
    Single(Jwk),
}

impl JwkSet {
    /// Interpret a parsed JSON value as a JWK Set
    ///
    /// An object with a `keys` array is a set; any other object is a bare
    /// JWK.
    ///
    /// # Errors
    /// Returns `KeyError::InvalidJwkSet` if the value is not an object or a
    /// `keys` member is not an object.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut members) = value else {
            return Err(KeyError::invalid_jwk_set(format!(
                "expected a JSON object, got {}",
                json_type_name(&value)
            )));
        };

        if !matches!(members.get("keys"), Some(Value::Array(_))) {
            return Ok(Self::Single(Jwk(members)));
        }

        let Some(Value::Array(entries)) = members.shift_remove("keys") else {
            return Err(KeyError::invalid_jwk_set("\"keys\" must be an array"));
        };

        entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| match entry {
                Value::Object(key) => Ok(Jwk(key)),
                other => Err(KeyError::invalid_jwk_set(format!(
                    "keys[{index}] must be an object, got {}",
                    json_type_name(&other)
                ))),
            })
            .collect::<Result<Vec<_>>>()
            .map(Self::Keys)
    }

    /// Parse JWK Set text
    ///
    /// # Errors
    /// Returns `KeyError::InvalidJwkSet` for JSON syntax errors and bad shapes.
    pub fn parse(text: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(text.trim()).map_err(|e| KeyError::invalid_jwk_set(e.to_string()))?;
        Self::from_value(value)
    }

    /// The keys in iteration order
    #[must_use]
    pub fn keys(&self) -> &[Jwk] {
        match self {
            Self::Keys(keys) => keys,
            Self::Single(key) => std::slice::from_ref(key),
        }
    }

    /// Whether no key in the set carries a private exponent
    ///
    /// An empty `keys` array counts as public-only.
    #[must_use]
    pub fn is_public_only(&self) -> bool {
        self.keys().iter().all(|jwk| !jwk.has_private_material())
    }

    /// `kid` of the first signing entry of a `keys` array
    ///
    /// A bare JWK yields `None`.
    #[must_use]
    pub fn signing_key_id(&self) -> Option<&str> {
        self.first_kid(|jwk| jwk.key_use() == Some("sig") || jwk.alg() == Some("RS256"))
    }

    /// `kid` of the first encryption entry of a `keys` array
    ///
    /// A bare JWK yields `None`.
    #[must_use]
    pub fn encryption_key_id(&self) -> Option<&str> {
        self.first_kid(|jwk| jwk.key_use() == Some("enc") || jwk.alg() == Some("RSA-OAEP-256"))
    }

    fn first_kid(&self, matches: impl Fn(&Jwk) -> bool) -> Option<&str> {
        match self {
            Self::Keys(keys) => keys.iter().find(|jwk| matches(jwk)).and_then(Jwk::kid),
            Self::Single(_) => None,
        }
    }

    /// JSON value of the set
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Keys(keys) => {
                let keys = keys.iter().map(|jwk| Value::Object(jwk.0.clone())).collect();
                let mut members = Map::new();
                members.insert("keys".to_string(), Value::Array(keys));
                Value::Object(members)
            }
            Self::Single(jwk) => Value::Object(jwk.0.clone()),
        }
    }

    /// Pretty-printed JSON with two-space indentation
    ///
    /// # Errors
    /// Returns `KeyError::Serialization` if serialization fails.
    pub fn to_pretty_string(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.to_value()).map_err(|e| KeyError::Serialization(e.to_string()))
    }
}

impl Serialize for JwkSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for JwkSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(serde::de::Error::custom)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn jwk(value: Value) -> Jwk {
        match value {
            Value::Object(map) => Jwk::from_map(map),
            _ => unreachable!("test fixture must be an object"),
        }
    }

    #[test]
    fn test_keys_array_is_a_set() {
        let set = JwkSet::from_value(json!({"keys": [{"kty": "RSA"}, {"kty": "RSA"}]})).unwrap();
        assert!(matches!(set, JwkSet::Keys(ref keys) if keys.len() == 2));
    }

    #[test]
    fn test_bare_object_is_single() {
        let set = JwkSet::from_value(json!({"kty": "RSA", "n": "abc"})).unwrap();
        assert!(matches!(set, JwkSet::Single(_)));
        assert_eq!(set.keys().len(), 1);
    }

    #[test]
    fn test_non_array_keys_member_is_single() {
        let set = JwkSet::from_value(json!({"keys": "nope", "kty": "RSA"})).unwrap();
        assert!(matches!(set, JwkSet::Single(_)));
    }

    #[test]
    fn test_non_object_is_rejected() {
        let err = JwkSet::from_value(json!([1, 2])).unwrap_err();
        assert!(matches!(err, KeyError::InvalidJwkSet(_)));

        let err = JwkSet::from_value(json!({"keys": [{"kty": "RSA"}, 7]})).unwrap_err();
        assert!(err.to_string().contains("keys[1]"));
    }

    #[test]
    fn test_private_material_detection() {
        let private = jwk(json!({"kty": "RSA", "n": "x", "e": "AQAB", "d": "y"}));
        assert!(private.has_private_material());

        let public = private.to_public();
        assert!(!public.has_private_material());
        assert!(!jwk(json!({"kty": "RSA", "d": ""})).has_private_material());
        assert!(!jwk(json!({"kty": "RSA", "d": null})).has_private_material());
    }

    #[test]
    fn test_public_only_set() {
        let private = json!({"kty": "RSA", "n": "x", "e": "AQAB", "d": "y", "p": "p", "qi": "z"});
        let set = JwkSet::from_value(json!({"keys": [private.clone()]})).unwrap();
        assert!(!set.is_public_only());

        let public = jwk(private).to_public();
        for field in RSA_PRIVATE_FIELDS {
            assert!(public.as_map().get(field).is_none());
        }
        let set = JwkSet::Keys(vec![public]);
        assert!(set.is_public_only());
        assert!(JwkSet::Keys(Vec::new()).is_public_only());
    }

    #[test]
    fn test_normalized_rewrites_only_rsa_members() {
        let key = jwk(json!({"kty": "RSA", "kid": "a+b/c=", "n": "a+b/c==", "qi": "z/z="}));
        let normalized = key.normalized();
        assert_eq!(normalized.get_str("n"), Some("a-b_c"));
        assert_eq!(normalized.get_str("qi"), Some("z_z"));
        assert_eq!(normalized.kid(), Some("a+b/c="));
    }

    #[test]
    fn test_kid_lookup_takes_first_match_and_ignores_bare_keys() {
        let set = JwkSet::from_value(json!({"keys": [
            {"kty": "RSA", "use": "enc", "kid": "enc_1"},
            {"kty": "RSA", "alg": "RS256", "kid": "sig_1"},
            {"kty": "RSA", "use": "sig", "kid": "sig_2"},
        ]}))
        .unwrap();
        assert_eq!(set.signing_key_id(), Some("sig_1"));
        assert_eq!(set.encryption_key_id(), Some("enc_1"));

        let single = JwkSet::from_value(json!({"kty": "RSA", "use": "sig", "kid": "x"})).unwrap();
        assert_eq!(single.signing_key_id(), None);
    }

    #[test]
    fn test_pretty_output_keeps_member_order() {
        let set = JwkSet::parse(r#"{"keys":[{"kty":"RSA","use":"sig","alg":"RS256","kid":"k"}]}"#).unwrap();
        let pretty = set.to_pretty_string().unwrap();
        let kty = pretty.find("\"kty\"").unwrap();
        let kid = pretty.find("\"kid\"").unwrap();
        assert!(kty < kid);
        assert!(pretty.contains("\n  \"keys\": ["));
    }
}
