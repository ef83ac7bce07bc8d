//! Session-level behavior of the workbench

use jwkdesk::{LoadOutcome, LoadSummary, Readiness, Workbench, WorkbenchError, DEFAULT_TAB_ID};
use jwkdesk_common::{LoggingTransformer, WorkbenchConfig};
use jwkdesk_jwt::{DecryptedValue, JwtError, Operation, PayloadFormat};
use jwkdesk_key::{Jwk, JwkSet, KeySetGenerator};
use serde_json::json;
use std::sync::OnceLock;

fn fixture() -> &'static JwkSet {
    static SET: OnceLock<JwkSet> = OnceLock::new();
    SET.get_or_init(|| KeySetGenerator::default().generate_now().expect("key generation").jwk_set)
}

fn text_of(keys: Vec<Jwk>) -> String {
    JwkSet::Keys(keys).to_pretty_string().unwrap()
}

fn signing() -> Jwk {
    fixture().keys()[0].clone()
}

fn encryption() -> Jwk {
    fixture().keys()[1].clone()
}

fn workbench() -> Workbench {
    LoggingTransformer::init_test();
    Workbench::new(&WorkbenchConfig::default()).unwrap()
}

async fn loaded(text: &str) -> (Workbench, LoadSummary) {
    let mut workbench = workbench();
    match workbench.load_text(text).await.unwrap() {
        LoadOutcome::Loaded(report) => (workbench, report.summary),
        other => panic!("expected a loaded set, got {other:?}"),
    }
}

#[tokio::test]
async fn test_generate_fills_active_tab() {
    let mut workbench = workbench();
    assert_eq!(workbench.status(), Readiness::NoKeys);

    let text = workbench.generate().await.unwrap();
    assert!(text.starts_with("{\n  \"keys\": ["));
    assert_eq!(workbench.active_context().content(), text);
    assert_eq!(workbench.status(), Readiness::Both);
    assert_eq!(workbench.status().text(), "Ready for signing & encryption");

    let kid = workbench.active_context().signing_key_id().unwrap().to_string();
    let token = workbench.sign(r#"{"sub":"alice"}"#).await.unwrap();
    let outcome = workbench.verify(&token).await;
    assert!(outcome.valid);
    assert_eq!(outcome.header.unwrap()["kid"], kid);

    let encrypted = workbench.encrypt("hello").await.unwrap();
    let decrypted = workbench.decrypt(&encrypted.token).await.unwrap();
    assert_eq!(decrypted.value, DecryptedValue::Text("hello".to_string()));
}

#[tokio::test]
async fn test_load_summaries() {
    let (workbench, summary) = loaded(&text_of(vec![signing(), encryption()])).await;
    assert_eq!(summary.message(), "JWK Set loaded successfully with signing and encryption keys!");
    assert_eq!(workbench.status(), Readiness::Both);

    let (workbench, summary) = loaded(&text_of(vec![signing()])).await;
    assert_eq!(summary.message(), "JWK Set loaded successfully with signing keys only!");
    assert_eq!(workbench.status(), Readiness::SigningOnly);

    let (_, summary) = loaded(&text_of(vec![encryption()])).await;
    assert_eq!(summary.message(), "JWK Set loaded successfully with encryption keys only!");

    let (workbench, summary) = loaded(&text_of(vec![signing().to_public(), encryption().to_public()])).await;
    assert_eq!(summary.message(), "JWK Set loaded successfully with public keys only! Features: verify & encrypt");
    assert_eq!(workbench.status(), Readiness::PublicBoth);
    assert_eq!(workbench.status().operations(), &[Operation::Verify, Operation::Encrypt]);

    let (_, summary) = loaded(&text_of(vec![signing().to_public()])).await;
    assert_eq!(summary.message(), "JWK Set loaded successfully with signing public key only! Features: verify");

    let (workbench, summary) = loaded(&text_of(vec![encryption().to_public()])).await;
    assert_eq!(summary.message(), "JWK Set loaded successfully with encryption public key only! Features: encrypt");
    assert_eq!(workbench.status().text(), "Public key only - encrypt available");
}

#[tokio::test]
async fn test_bare_jwk_loads_as_signing_key() {
    let mut bare = signing();
    let mut map = bare.as_map().clone();
    for member in ["use", "alg", "kid"] {
        map.shift_remove(member);
    }
    bare = Jwk::from_map(map);

    let mut workbench = workbench();
    let text = serde_json::to_string(&bare).unwrap();
    let outcome = workbench.load_text(&text).await;

    // The public half needs an algorithm, so only the private handle lands.
    let err = outcome.unwrap_err();
    match err {
        WorkbenchError::NoUsableKeys { warnings } => assert_eq!(warnings.len(), 1),
        other => panic!("unexpected error: {other}"),
    }
    assert!(workbench.active_context().handles().signing_private.is_some());
    assert_eq!(workbench.status(), Readiness::NoKeys);

    let token = workbench.sign(r#"{"sub":"bare"}"#).await.unwrap();
    assert_eq!(token.split('.').count(), 3);
}

#[tokio::test]
async fn test_empty_text_clears_and_partial_text_is_ignored() {
    let (mut workbench, _) = loaded(&text_of(vec![signing()])).await;

    assert_eq!(workbench.load_text("{").await.unwrap(), LoadOutcome::Incomplete);
    assert_eq!(workbench.active_context().content(), "{");
    assert_eq!(workbench.status(), Readiness::SigningOnly);

    assert_eq!(workbench.load_text("   ").await.unwrap(), LoadOutcome::Cleared);
    assert_eq!(workbench.active_context().content(), "   ");
    assert!(workbench.active_context().jwk_set().is_none());
    assert_eq!(workbench.status(), Readiness::NoKeys);
}

#[tokio::test]
async fn test_bad_shapes_and_useless_sets() {
    let mut workbench = workbench();
    let err = workbench.load_text("[1, 2]").await.unwrap_err();
    assert!(err.to_string().starts_with("Invalid JWK Set format: "));

    let err = workbench
        .load_text(r#"{"keys":[{"kty":"RSA","use":"other"}]}"#)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "JWK Set was parsed but no valid keys could be imported");
}

#[tokio::test]
async fn test_beautify_and_clear() {
    let mut workbench = workbench();
    assert!(matches!(workbench.beautify(), Err(WorkbenchError::EmptyContent)));

    workbench.load_text("{\"a\":").await.unwrap();
    let err = workbench.beautify().unwrap_err();
    assert!(err.to_string().starts_with("Failed to beautify JWK Set: "));
    assert!(err.to_string().ends_with(". Please ensure the JSON is valid."));

    workbench.tabs_mut().update_active(|context| context.with_content(r#"{"keys":[],"z":1}"#));
    let pretty = workbench.beautify().unwrap();
    assert_eq!(pretty, "{\n  \"keys\": [],\n  \"z\": 1\n}");
    assert_eq!(workbench.active_context().content(), pretty);

    workbench.clear();
    assert_eq!(workbench.active_context().content(), "");
    assert!(workbench.active_context().jwk_set().is_none());
}

#[tokio::test]
async fn test_operations_respect_key_availability() {
    let (workbench, _) = loaded(&text_of(vec![signing().to_public(), encryption().to_public()])).await;

    let err = workbench.sign(r#"{"a":1}"#).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Failed to sign JWT: Cannot sign with public key only. Signing requires a private key. Only verify operation is available with public keys."
    );

    let encrypted = workbench.encrypt(r#"{"a":1}"#).await.unwrap();
    assert_eq!(encrypted.format, PayloadFormat::Json);

    let err = workbench.decrypt(&encrypted.token).await.unwrap_err();
    match err {
        WorkbenchError::Operation(e) => assert!(matches!(e.source, JwtError::PublicKeyOnly(_))),
        other => panic!("unexpected error: {other}"),
    }

    let outcome = workbench.verify("").await;
    assert!(!outcome.valid);
    assert_eq!(outcome.message, "JWT verification failed: Please enter a JWT to verify.");
}

#[tokio::test]
async fn test_tabs_are_independent() {
    let mut workbench = workbench();
    workbench.load_text(&text_of(vec![signing()])).await.unwrap();

    let second = workbench.tabs_mut().add();
    assert_eq!(workbench.status(), Readiness::NoKeys);
    workbench.load_text(&text_of(vec![encryption()])).await.unwrap();
    assert_eq!(workbench.status(), Readiness::EncryptionOnly);

    assert!(workbench.tabs_mut().switch(DEFAULT_TAB_ID));
    assert_eq!(workbench.status(), Readiness::SigningOnly);
    let token = workbench.sign(&json!({"sub": "tab"}).to_string()).await.unwrap();

    workbench.tabs_mut().switch(&second);
    let outcome = workbench.verify(&token).await;
    assert!(!outcome.valid);
    assert_eq!(
        outcome.message,
        "JWT verification failed: No signing public key available. Please generate or input a JWK Set with signing key."
    );

    workbench.tabs_mut().remove(&second);
    assert_eq!(workbench.tabs().active_id(), DEFAULT_TAB_ID);
    assert!(workbench.verify(&token).await.valid);
}
