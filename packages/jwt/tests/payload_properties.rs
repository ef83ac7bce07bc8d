//! Property tests for payload classification

use jwkdesk_jwt::{EncryptionPayload, PayloadFormat};
use proptest::prelude::*;
use serde_json::json;

proptest! {
    #[test]
    fn text_not_opening_a_json_container_stays_text(text in "[^\\s\\{\\[][^\\n]{0,40}") {
        let payload = EncryptionPayload::classify(&text);
        prop_assert_eq!(payload.format(), PayloadFormat::PlainText);
        prop_assert_eq!(payload.to_plaintext(), text.trim().as_bytes().to_vec());
    }

    #[test]
    fn json_objects_are_reserialized_compactly(key in "[a-z]{1,8}", value in any::<i64>()) {
        let text = format!("{{ \"{key}\" : {value} }}");
        let payload = EncryptionPayload::classify(&text);
        prop_assert_eq!(payload.format(), PayloadFormat::Json);
        prop_assert_eq!(payload.to_plaintext(), json!({ key: value }).to_string().into_bytes());
    }
}
