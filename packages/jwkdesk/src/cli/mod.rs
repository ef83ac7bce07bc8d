//! Command-line front end

mod commands;

use clap::{Args, Parser, Subcommand};
use jwkdesk_common::WorkbenchConfig;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

pub use commands::run;

#[derive(Parser, Debug)]
#[command(name = "jwkdesk")]
#[command(about = "Generate JWK Sets and sign, verify, encrypt or decrypt JWTs with them")]
#[command(version)]
pub struct Cli {
    /// Path to a JSON configuration file (default: $JWKDESK_CONFIG, then the user config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Generate a JWK Set with one RS256 signing key and one RSA-OAEP-256 encryption key
    Generate {
        /// Write the set to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Import a JWK Set and report which operations it supports
    Inspect {
        /// JWK Set file
        jwks: PathBuf,
    },

    /// Pretty-print a JWK Set file
    Beautify {
        /// JWK Set file
        jwks: PathBuf,
    },

    /// Sign a JSON object payload as an RS256 JWT
    Sign {
        /// JWK Set file
        jwks: PathBuf,
        #[command(flatten)]
        payload: PayloadArgs,
    },

    /// Verify an RS256 JWT (exit status 1 if invalid)
    Verify {
        /// JWK Set file
        jwks: PathBuf,
        /// Compact JWT
        token: String,
    },

    /// Encrypt a JSON or plain-text payload as a compact JWE
    Encrypt {
        /// JWK Set file
        jwks: PathBuf,
        #[command(flatten)]
        payload: PayloadArgs,
    },

    /// Decrypt a compact JWE
    Decrypt {
        /// JWK Set file
        jwks: PathBuf,
        /// Compact JWE
        token: String,
    },
}

/// Payload given inline or as a file
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct PayloadArgs {
    /// Payload text
    #[arg(long)]
    pub payload: Option<String>,

    /// Read the payload from this file
    #[arg(long)]
    pub payload_file: Option<PathBuf>,
}

/// How a command finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    /// Completed
    Success,
    /// Completed, but the input was rejected (invalid token)
    Rejected,
}

impl From<CommandStatus> for ExitCode {
    fn from(status: CommandStatus) -> Self {
        match status {
            CommandStatus::Success => ExitCode::SUCCESS,
            CommandStatus::Rejected => ExitCode::from(1),
        }
    }
}

/// Parse arguments, load configuration and run against stdout
///
/// # Errors
/// Returns any configuration, I/O or operation failure.
pub async fn main_with_args<I, T>(args: I) -> anyhow::Result<CommandStatus>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = Cli::parse_from(args);
    let config = WorkbenchConfig::discover(cli.config.as_deref())?;
    jwkdesk_common::LoggingTransformer::init_with_filter(config.log_filter.as_deref());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let status = run(&cli, &config, &mut out).await?;
    out.flush()?;
    Ok(status)
}
