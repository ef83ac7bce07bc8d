//! Session facade: key-set editing and JWT operations on the active tab

use crate::context::KeySetContext;
use crate::error::WorkbenchError;
use crate::readiness::Readiness;
use crate::tabs::TabCollection;
use jwkdesk_common::WorkbenchConfig;
use jwkdesk_jwt::{Decrypted, Encrypted, JwtOperations, VerifyOutcome};
use jwkdesk_key::{ImportWarning, JwkSet, KeyHandles, KeySetGenerator, KeySetImporter};
use log::{debug, info, warn};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// What a successful load imported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoadSummary {
    /// Both private/public pairs
    SigningAndEncryption,
    /// Signing pair only
    SigningOnly,
    /// Encryption pair only
    EncryptionOnly,
    /// Public halves of both roles
    PublicBoth,
    /// Public signing key only
    PublicSigningOnly,
    /// Public encryption key only
    PublicEncryptionOnly,
}

impl LoadSummary {
    /// Classify imported handles; `None` when nothing usable was imported
    #[must_use]
    pub fn from_handles(handles: &KeyHandles, public_only: bool) -> Option<Self> {
        match Readiness::classify(handles, public_only) {
            Readiness::Both => Some(Self::SigningAndEncryption),
            Readiness::SigningOnly => Some(Self::SigningOnly),
            Readiness::EncryptionOnly => Some(Self::EncryptionOnly),
            Readiness::PublicBoth => Some(Self::PublicBoth),
            Readiness::PublicSigningOnly => Some(Self::PublicSigningOnly),
            Readiness::PublicEncryptionOnly => Some(Self::PublicEncryptionOnly),
            Readiness::NoKeys => None,
        }
    }

    /// Success message
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::SigningAndEncryption => "JWK Set loaded successfully with signing and encryption keys!",
            Self::SigningOnly => "JWK Set loaded successfully with signing keys only!",
            Self::EncryptionOnly => "JWK Set loaded successfully with encryption keys only!",
            Self::PublicBoth => "JWK Set loaded successfully with public keys only! Features: verify & encrypt",
            Self::PublicSigningOnly => "JWK Set loaded successfully with signing public key only! Features: verify",
            Self::PublicEncryptionOnly => {
                "JWK Set loaded successfully with encryption public key only! Features: encrypt"
            }
        }
    }
}

impl fmt::Display for LoadSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Result of a successful import
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// What was imported
    pub summary: LoadSummary,
    /// Keys that failed to import
    pub warnings: Vec<ImportWarning>,
}

/// What `load_text` did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Text was empty; keys were dropped
    Cleared,
    /// Text is not (yet) valid JSON; keys are unchanged
    Incomplete,
    /// A set was imported
    Loaded(LoadReport),
}

/// Tabbed key-set sessions plus the operations that use them
#[derive(Debug)]
pub struct Workbench {
    tabs: TabCollection,
    generator: KeySetGenerator,
    importer: KeySetImporter,
    operations: JwtOperations,
}

impl Workbench {
    /// Workbench with a single empty default tab
    ///
    /// # Errors
    /// Returns `WorkbenchError::Key` if the configured modulus size is unsupported.
    pub fn new(config: &WorkbenchConfig) -> Result<Self, WorkbenchError> {
        Ok(Self {
            tabs: TabCollection::new(),
            generator: KeySetGenerator::from_config(config)?,
            importer: KeySetImporter::new(),
            operations: JwtOperations::from_config(config),
        })
    }

    /// The tabs
    #[must_use]
    pub fn tabs(&self) -> &TabCollection {
        &self.tabs
    }

    /// The tabs, for adding, removing, renaming and switching
    pub fn tabs_mut(&mut self) -> &mut TabCollection {
        &mut self.tabs
    }

    /// Key-set state of the active tab
    #[must_use]
    pub fn active_context(&self) -> &KeySetContext {
        self.tabs.active().context()
    }

    /// Readiness of the active tab
    #[must_use]
    pub fn status(&self) -> Readiness {
        self.active_context().readiness()
    }

    /// Store edited key-set text and import it
    ///
    /// The raw text is always stored. Empty text drops the keys; text that
    /// is not valid JSON leaves them as they were.
    ///
    /// # Errors
    /// `WorkbenchError::Key` if the JSON is not a JWK Set shape,
    /// `WorkbenchError::NoUsableKeys` if nothing could be imported.
    pub async fn load_text(&mut self, text: &str) -> Result<LoadOutcome, WorkbenchError> {
        self.tabs.update_active(|context| context.with_content(text));

        let trimmed = text.trim();
        if trimmed.is_empty() {
            self.tabs.update_active(KeySetContext::without_keys);
            return Ok(LoadOutcome::Cleared);
        }

        let value: Value = match serde_json::from_str(trimmed) {
            Ok(value) => value,
            Err(e) => {
                debug!("Key-set text is not valid JSON yet: {e}");
                return Ok(LoadOutcome::Incomplete);
            }
        };

        let jwk_set = JwkSet::from_value(value)?;
        let public_only = jwk_set.is_public_only();
        let imported = self.importer.import(jwk_set.clone()).await?;
        let summary = LoadSummary::from_handles(&imported.handles, public_only);
        self.tabs
            .update_active(|context| context.with_imported(jwk_set, imported.handles));

        match summary {
            Some(summary) => {
                info!("{summary}");
                Ok(LoadOutcome::Loaded(LoadReport {
                    summary,
                    warnings: imported.warnings,
                }))
            }
            None => {
                warn!("JWK Set parsed but no keys were imported");
                Err(WorkbenchError::NoUsableKeys {
                    warnings: imported.warnings,
                })
            }
        }
    }

    /// Replace the active tab's keys with a freshly generated set
    ///
    /// Returns the pretty-printed set now held as the tab's text.
    ///
    /// # Errors
    /// `WorkbenchError::Generation` if key generation fails.
    pub async fn generate(&mut self) -> Result<String, WorkbenchError> {
        let generated = self.generator.generate().await.map_err(WorkbenchError::Generation)?;
        let content = generated
            .jwk_set
            .to_pretty_string()
            .map_err(WorkbenchError::Generation)?;

        let text = content.clone();
        self.tabs
            .update_active(move |context| context.with_generated(generated, content));
        info!("JWK Set with signing and encryption keys generated successfully");
        Ok(text)
    }

    /// Empty the active tab's text, set and keys
    pub fn clear(&mut self) {
        self.tabs.update_active(KeySetContext::cleared);
    }

    /// Reformat the active tab's text with two-space indentation
    ///
    /// # Errors
    /// `WorkbenchError::EmptyContent` for blank text, `WorkbenchError::Beautify`
    /// for text that is not JSON.
    pub fn beautify(&mut self) -> Result<String, WorkbenchError> {
        let content = self.active_context().content().trim();
        if content.is_empty() {
            return Err(WorkbenchError::EmptyContent);
        }

        let value: Value = serde_json::from_str(content).map_err(|e| WorkbenchError::Beautify(e.to_string()))?;
        let pretty = serde_json::to_string_pretty(&value).map_err(|e| WorkbenchError::Beautify(e.to_string()))?;

        let text = pretty.clone();
        self.tabs.update_active(move |context| context.with_content(pretty));
        Ok(text)
    }

    /// Sign a JSON object payload with the active tab's signing key
    ///
    /// # Errors
    /// `WorkbenchError::Operation` with the `Failed to sign JWT: ` prefix.
    pub async fn sign(&self, payload: &str) -> Result<String, WorkbenchError> {
        let context = self.active_context();
        let token = self
            .operations
            .sign(payload, context.handles(), context.signing_key_id())
            .await?;
        Ok(token)
    }

    /// Verify a token with the active tab's signing key
    ///
    /// Never fails; failures are reported in the record.
    pub async fn verify(&self, token: &str) -> VerifyOutcome {
        let result = self.operations.verify(token, self.active_context().handles()).await;
        if let Err(e) = &result {
            warn!("{e}");
        }
        VerifyOutcome::from_result(result)
    }

    /// Encrypt a payload with the active tab's encryption key
    ///
    /// # Errors
    /// `WorkbenchError::Operation` with the `Failed to encrypt JWT: ` prefix.
    pub async fn encrypt(&self, payload: &str) -> Result<Encrypted, WorkbenchError> {
        let context = self.active_context();
        let encrypted = self
            .operations
            .encrypt(payload, context.handles(), context.encryption_key_id())
            .await?;
        Ok(encrypted)
    }

    /// Decrypt a token with the active tab's encryption key
    ///
    /// # Errors
    /// `WorkbenchError::Operation` with the `Failed to decrypt JWT: ` prefix.
    pub async fn decrypt(&self, token: &str) -> Result<Decrypted, WorkbenchError> {
        let decrypted = self
            .operations
            .decrypt(token, self.active_context().handles())
            .await?;
        Ok(decrypted)
    }
}
