//! Main entry point for the jwkdesk CLI application

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match jwkdesk::cli::main_with_args(std::env::args_os()).await {
        Ok(status) => status.into(),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(2)
        }
    }
}
