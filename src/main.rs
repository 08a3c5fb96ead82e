//! ghaudit CLI entrypoint for auditing repository access.

mod cli;

use std::io::{self, Write};
use std::process::ExitCode;

use ghaudit::{AuditConfig, AuditError};
use ortho_config::OrthoConfig;
use tracing::info;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), AuditError> {
    let config = load_config()?;
    cli::logging::init(config.debug);
    let settings = config.settings()?;

    tokio::select! {
        result = cli::audit::run(&settings) => result.map(|_| ()),
        name = cli::signals::termination() => {
            info!("Received {name}, exiting.");
            Ok(())
        }
    }
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`AuditError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<AuditConfig, AuditError> {
    AuditConfig::load().map_err(|error| AuditError::Configuration {
        message: error.to_string(),
    })
}
