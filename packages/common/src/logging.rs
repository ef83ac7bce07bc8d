//! Structured logging bootstrap
//!
//! Provides env_logger-based logging with redaction of key identifiers and
//! tokens, on top of the standard `log` facade.

use log::{debug, info, warn};
use sha2::{Digest, Sha256};
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Logging entry points used by the library crates and the CLI
pub struct LoggingTransformer;

impl LoggingTransformer {
    /// Initialize logging from `RUST_LOG` (should be called once at startup)
    ///
    /// - `RUST_LOG=debug` - per-key classification and import details
    /// - `RUST_LOG=info` - completed operations (recommended)
    /// - `RUST_LOG=jwkdesk_key=debug,jwkdesk_jwt=info` - module-specific levels
    pub fn init() {
        INIT_LOGGER.call_once(|| {
            env_logger::Builder::from_default_env()
                .format_timestamp_micros()
                .init();

            info!("Structured logging initialized");
        });
    }

    /// Initialize logging with an explicit filter, falling back to `RUST_LOG`
    pub fn init_with_filter(filter: Option<&str>) {
        let Some(filter) = filter else {
            Self::init();
            return;
        };

        INIT_LOGGER.call_once(|| {
            env_logger::Builder::new()
                .parse_filters(filter)
                .format_timestamp_micros()
                .init();

            info!("Structured logging initialized (filter: {filter})");
        });
    }

    /// Initialize logging for test environments
    ///
    /// Safe to call from every test; repeated initialization is ignored.
    pub fn init_test() {
        let _ = env_logger::Builder::from_default_env()
            .is_test(true)
            .try_init();
    }

    /// Log a key lifecycle event (generate, import, export)
    ///
    /// Key identifiers are replaced by a fingerprint.
    pub fn log_key_event(operation: &str, kid: Option<&str>, success: bool) {
        let kid_hash = kid.map_or_else(|| "none".to_string(), Self::fingerprint);
        if success {
            info!("Key operation succeeded: {operation} (kid_hash: {kid_hash})");
        } else {
            warn!("Key operation failed: {operation} (kid_hash: {kid_hash})");
        }
    }

    /// Log a completed JOSE operation without exposing the token itself
    pub fn log_token_operation(operation: &str, token: &str) {
        debug!(
            "Token operation: {operation} (token_hash: {}, len: {})",
            Self::fingerprint(token),
            token.len()
        );
    }

    /// Log a cryptographic failure by error type and message
    pub fn log_crypto_failure(operation: &str, error: &dyn std::error::Error) {
        warn!(
            "Cryptographic operation failed: {} (error_type: {}): {}",
            operation,
            std::any::type_name_of_val(error),
            error
        );
    }

    /// SHA-256 fingerprint used in log lines
    ///
    /// Returns `#` followed by the first 12 hex characters of the digest.
    #[must_use]
    pub fn fingerprint(value: &str) -> String {
        let digest = hex::encode(Sha256::digest(value.as_bytes()));
        format!("#{}", &digest[..12])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_stable_and_short() {
        LoggingTransformer::init_test();

        let first = LoggingTransformer::fingerprint("sig_AbCdEfGhIjKl");
        let second = LoggingTransformer::fingerprint("enc_AbCdEfGhIjKl");

        assert_ne!(first, second);
        assert_eq!(first, LoggingTransformer::fingerprint("sig_AbCdEfGhIjKl"));
        assert!(first.starts_with('#'));
        assert_eq!(first.len(), 13);
    }

    #[test]
    fn test_logging_helpers_do_not_panic() {
        LoggingTransformer::init_test();

        LoggingTransformer::log_key_event("import", Some("sig_123"), true);
        LoggingTransformer::log_key_event("import", None, false);
        LoggingTransformer::log_token_operation("sign", "a.b.c");
        let err = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        LoggingTransformer::log_crypto_failure("decrypt", &err);
    }
}
