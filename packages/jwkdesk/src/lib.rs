//! # jwkdesk
//!
//! A workbench for JWK Sets: generate or paste a dual-purpose (signing +
//! encryption) RSA key set per tab, see which operations it supports, then
//! sign, verify, encrypt and decrypt JWTs with it.
//!
//! ```rust,no_run
//! use jwkdesk::Workbench;
//! use jwkdesk_common::WorkbenchConfig;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut workbench = Workbench::new(&WorkbenchConfig::default())?;
//! workbench.generate().await?;
//!
//! let token = workbench.sign(r#"{"sub":"alice"}"#).await?;
//! assert!(workbench.verify(&token).await.valid);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod cli;
pub mod context;
pub mod error;
pub mod readiness;
pub mod tabs;
pub mod workbench;

pub use context::KeySetContext;
pub use error::WorkbenchError;
pub use readiness::Readiness;
pub use tabs::{Tab, TabCollection, DEFAULT_TAB_ID};
pub use workbench::{LoadOutcome, LoadReport, LoadSummary, Workbench};
