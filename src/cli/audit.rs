//! Audit operation wiring the Octocrab gateways to the runner.

use std::io::{self, Write};

use ghaudit::audit::{ApiBackend, AuditRunner, AuditSettings, AuditSummary};
use ghaudit::github::gateway::build_octocrab_client;
use ghaudit::{AuditError, OctocrabGraphqlGateway, OctocrabRestGateway};
use tracing::debug;

/// Runs the audit described by `settings`, printing reports to stdout.
///
/// # Errors
///
/// Returns any error the runner surfaces, or a client construction error.
pub async fn run(settings: &AuditSettings) -> Result<AuditSummary, AuditError> {
    let mut stdout = io::stdout().lock();
    run_to(settings, &mut stdout).await
}

/// Runs the audit, writing reports to the given writer.
///
/// Both gateways share one Octocrab client; the REST gateway always serves
/// the per-repository sub-resources.
pub async fn run_to<W: Write>(
    settings: &AuditSettings,
    writer: &mut W,
) -> Result<AuditSummary, AuditError> {
    debug!(
        backend = settings.backend().as_str(),
        api_base = %settings.api_base(),
        "starting audit"
    );
    let client = build_octocrab_client(settings.token(), settings.api_base())?;
    let rest = OctocrabRestGateway::new(client.clone());

    match settings.backend() {
        ApiBackend::Rest => AuditRunner::new(settings, &rest, &rest).run(writer).await,
        ApiBackend::Graphql => {
            let graphql = OctocrabGraphqlGateway::new(client, settings.api_base());
            AuditRunner::new(settings, &graphql, &rest).run(writer).await
        }
    }
}
