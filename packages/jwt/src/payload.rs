//! Payload classification for encryption

use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// How an encrypted payload is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PayloadFormat {
    /// JSON object or array, carried as a claims set
    #[serde(rename = "JSON")]
    Json,
    /// Raw UTF-8 text
    #[serde(rename = "plain text")]
    PlainText,
}

impl PayloadFormat {
    /// Display tag
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::PlainText => "plain text",
        }
    }
}

impl fmt::Display for PayloadFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A payload prepared for encryption
#[derive(Debug, Clone, PartialEq)]
pub enum EncryptionPayload {
    /// Parsed JSON object or array
    Json(Value),
    /// Trimmed text
    Text(String),
}

impl EncryptionPayload {
    /// Classify payload text
    ///
    /// Text is JSON when, trimmed, it starts with `{` or `[`, parses, and is
    /// an object or array. Anything else is plain text.
    #[must_use]
    pub fn classify(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.starts_with('{') || trimmed.starts_with('[') {
            if let Ok(value @ (Value::Object(_) | Value::Array(_))) = serde_json::from_str::<Value>(trimmed) {
                return Self::Json(value);
            }
        }
        Self::Text(trimmed.to_string())
    }

    /// Format of this payload
    #[must_use]
    pub fn format(&self) -> PayloadFormat {
        match self {
            Self::Json(_) => PayloadFormat::Json,
            Self::Text(_) => PayloadFormat::PlainText,
        }
    }

    /// Bytes to encrypt: compact JSON or the UTF-8 text
    #[must_use]
    pub fn to_plaintext(&self) -> Vec<u8> {
        match self {
            Self::Json(value) => value.to_string().into_bytes(),
            Self::Text(text) => text.as_bytes().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_objects_and_arrays_are_json() {
        let object = EncryptionPayload::classify("  {\"sub\": \"x\"}\n");
        assert_eq!(object, EncryptionPayload::Json(json!({"sub": "x"})));
        assert_eq!(object.to_plaintext(), br#"{"sub":"x"}"#.to_vec());

        let array = EncryptionPayload::classify("[1, 2]");
        assert_eq!(array.format(), PayloadFormat::Json);
    }

    #[test]
    fn test_everything_else_is_text() {
        assert_eq!(
            EncryptionPayload::classify("  hello world "),
            EncryptionPayload::Text("hello world".to_string())
        );
        assert_eq!(EncryptionPayload::classify("{not json").format(), PayloadFormat::PlainText);
        assert_eq!(EncryptionPayload::classify("42").format(), PayloadFormat::PlainText);
        assert_eq!(EncryptionPayload::classify("\"quoted\"").format(), PayloadFormat::PlainText);
    }

    #[test]
    fn test_format_tags() {
        assert_eq!(PayloadFormat::Json.to_string(), "JSON");
        assert_eq!(PayloadFormat::PlainText.to_string(), "plain text");
    }
}
