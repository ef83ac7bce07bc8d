//! CLI command handlers

use super::{Cli, CommandStatus, Commands, PayloadArgs};
use crate::workbench::{LoadOutcome, LoadReport, Workbench};
use anyhow::{bail, Context};
use jwkdesk_common::WorkbenchConfig;
use jwkdesk_key::ImportWarning;
use serde_json::json;
use std::io::Write;
use std::path::Path;

/// Execute a parsed command, writing results to `out`
///
/// # Errors
/// Returns I/O failures, unusable key sets and failed operations. An invalid
/// token passed to `verify` is not an error; it yields
/// `CommandStatus::Rejected` after the record is written.
pub async fn run<W: Write>(cli: &Cli, config: &WorkbenchConfig, out: &mut W) -> anyhow::Result<CommandStatus> {
    let mut workbench = Workbench::new(config)?;
    let use_json = cli.json;

    match &cli.command {
        Commands::Generate { out: path } => {
            let text = workbench.generate().await?;
            match path {
                Some(path) => {
                    std::fs::write(path, format!("{text}\n"))
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    if use_json {
                        writeln!(out, "{}", json!({"success": true, "operation": "generate", "path": path}))?;
                    } else {
                        writeln!(out, "JWK Set written to {}", path.display())?;
                    }
                }
                None => writeln!(out, "{text}")?,
            }
        }

        Commands::Inspect { jwks } => {
            let report = load(&mut workbench, jwks).await?;
            let status = workbench.status();
            let context = workbench.active_context();
            if use_json {
                let operations: Vec<&str> = status.operations().iter().map(|op| op.as_str()).collect();
                let kids = json!({
                    "signing": context.signing_key_id(),
                    "encryption": context.encryption_key_id(),
                });
                writeln!(
                    out,
                    "{}",
                    json!({
                        "success": true,
                        "operation": "inspect",
                        "summary": report.summary.message(),
                        "status": status.as_str(),
                        "status_text": status.text(),
                        "operations": operations,
                        "kids": kids,
                        "warnings": report.warnings,
                    })
                )?;
            } else {
                writeln!(out, "{}", report.summary)?;
                writeln!(out, "Status: {status}")?;
                if let Some(kid) = context.signing_key_id() {
                    writeln!(out, "Signing kid: {kid}")?;
                }
                if let Some(kid) = context.encryption_key_id() {
                    writeln!(out, "Encryption kid: {kid}")?;
                }
                write_warnings(out, &report.warnings)?;
            }
        }

        Commands::Beautify { jwks } => {
            let text = read_file(jwks)?;
            workbench.tabs_mut().update_active(|context| context.with_content(text));
            let pretty = workbench.beautify()?;
            writeln!(out, "{pretty}")?;
        }

        Commands::Sign { jwks, payload } => {
            load(&mut workbench, jwks).await?;
            let token = workbench.sign(&payload_text(payload)?).await?;
            if use_json {
                writeln!(out, "{}", json!({"success": true, "operation": "sign", "token": token}))?;
            } else {
                writeln!(out, "{token}")?;
            }
        }

        Commands::Verify { jwks, token } => {
            load(&mut workbench, jwks).await?;
            let outcome = workbench.verify(token).await;
            writeln!(out, "{}", serde_json::to_string_pretty(&outcome)?)?;
            if !outcome.valid {
                return Ok(CommandStatus::Rejected);
            }
        }

        Commands::Encrypt { jwks, payload } => {
            load(&mut workbench, jwks).await?;
            let encrypted = workbench.encrypt(&payload_text(payload)?).await?;
            if use_json {
                writeln!(
                    out,
                    "{}",
                    json!({
                        "success": true,
                        "operation": "encrypt",
                        "format": encrypted.format,
                        "token": encrypted.token,
                    })
                )?;
            } else {
                writeln!(out, "{}", encrypted.token)?;
            }
        }

        Commands::Decrypt { jwks, token } => {
            load(&mut workbench, jwks).await?;
            let decrypted = workbench.decrypt(token).await?;
            if use_json {
                writeln!(
                    out,
                    "{}",
                    json!({
                        "success": true,
                        "operation": "decrypt",
                        "format": decrypted.format,
                        "result": decrypted.to_display_string(),
                    })
                )?;
            } else {
                writeln!(out, "{}", decrypted.to_display_string())?;
            }
        }
    }

    Ok(CommandStatus::Success)
}

async fn load(workbench: &mut Workbench, path: &Path) -> anyhow::Result<LoadReport> {
    let text = read_file(path)?;
    match workbench.load_text(&text).await? {
        LoadOutcome::Loaded(report) => {
            for warning in &report.warnings {
                log::warn!("{}: {warning}", path.display());
            }
            Ok(report)
        }
        LoadOutcome::Cleared => bail!("{} is empty", path.display()),
        LoadOutcome::Incomplete => bail!("Invalid JWK Set format: {} is not valid JSON", path.display()),
    }
}

fn payload_text(args: &PayloadArgs) -> anyhow::Result<String> {
    match (&args.payload, &args.payload_file) {
        (Some(text), _) => Ok(text.clone()),
        (None, Some(path)) => read_file(path),
        (None, None) => bail!("Provide --payload or --payload-file"),
    }
}

fn read_file(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn write_warnings<W: Write>(out: &mut W, warnings: &[ImportWarning]) -> std::io::Result<()> {
    for warning in warnings {
        writeln!(out, "Warning: {warning}")?;
    }
    Ok(())
}
