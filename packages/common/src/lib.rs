//! Shared infrastructure for the jwkdesk crates
//!
//! This crate provides:
//! - Logging bootstrap and redacting log helpers
//! - Workbench configuration with file and environment loading

pub mod config;
pub mod logging;

pub use config::{ConfigError, WorkbenchConfig};
pub use logging::LoggingTransformer;
