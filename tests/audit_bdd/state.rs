//! Scenario state and the audit driver for the audit BDD tests.

use ghaudit::audit::ApiBackend;
use ghaudit::github::locator::RepositoryFilter;
use ghaudit::{
    AuditError, AuditRunner, AuditSettings, AuditSummary, OctocrabGraphqlGateway,
    OctocrabRestGateway, PersonalAccessToken,
};
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use url::Url;
use wiremock::MockServer;

use super::runtime::{self, SharedRuntime};

#[derive(ScenarioState, Default)]
pub(crate) struct AuditState {
    pub(crate) runtime: Slot<SharedRuntime>,
    pub(crate) server: Slot<MockServer>,
    pub(crate) summary: Slot<AuditSummary>,
    pub(crate) output: Slot<String>,
    pub(crate) error: Slot<AuditError>,
}

/// What the audit is restricted to.
pub(crate) enum AuditTarget<'a> {
    /// Comma-separated organisations, listed in bulk.
    Organisations(&'a str),
    /// A single `owner/name` or a name fragment.
    Repository(&'a str),
}

/// Ensures the runtime and server are initialised in `AuditState`.
pub(crate) fn ensure_runtime_and_server(audit_state: &AuditState) -> SharedRuntime {
    runtime::ensure_runtime_and_server(&audit_state.runtime, &audit_state.server)
        .unwrap_or_else(|error| panic!("failed to prepare runtime and server: {error}"))
}

/// Runs the audit against the mock server and records the outcome.
pub(crate) fn run_audit(audit_state: &AuditState, backend: ApiBackend, target: &AuditTarget<'_>) {
    let runtime = ensure_runtime_and_server(audit_state);
    let server_url = audit_state
        .server
        .with_ref(MockServer::uri)
        .unwrap_or_else(|| panic!("mock server URL missing"));
    let settings = settings_for(&server_url, backend, target)
        .unwrap_or_else(|error| panic!("scenario settings are invalid: {error}"));

    let mut buffer = Vec::new();
    let result = runtime.block_on(audit(&settings, &mut buffer));
    audit_state.output.set(
        String::from_utf8(buffer).unwrap_or_else(|error| panic!("output is not UTF-8: {error}")),
    );

    match result {
        Ok(summary) => {
            let _had_previous_error = audit_state.error.take().is_some();
            audit_state.summary.set(summary);
        }
        Err(error) => {
            let _had_previous_summary = audit_state.summary.take().is_some();
            audit_state.error.set(error);
        }
    }
}

fn settings_for(
    server_url: &str,
    backend: ApiBackend,
    target: &AuditTarget<'_>,
) -> Result<AuditSettings, AuditError> {
    let token = PersonalAccessToken::new("ghp_example")?;
    let api_base =
        Url::parse(server_url).map_err(|error| AuditError::InvalidUrl(error.to_string()))?;
    let settings = AuditSettings::new(token, api_base).with_backend(backend);

    Ok(match target {
        AuditTarget::Organisations(orgs) => settings.with_organisations(
            orgs.split(',')
                .map(str::trim)
                .filter(|org| !org.is_empty())
                .map(str::to_owned)
                .collect(),
        ),
        AuditTarget::Repository(repo) => {
            settings.with_filter(Some(RepositoryFilter::parse(repo)?))
        }
    })
}

async fn audit(
    settings: &AuditSettings,
    buffer: &mut Vec<u8>,
) -> Result<AuditSummary, AuditError> {
    let rest = OctocrabRestGateway::for_token(settings.token(), settings.api_base())?;
    match settings.backend() {
        ApiBackend::Rest => AuditRunner::new(settings, &rest, &rest).run(buffer).await,
        ApiBackend::Graphql => {
            let graphql = OctocrabGraphqlGateway::for_token(settings.token(), settings.api_base())?;
            AuditRunner::new(settings, &graphql, &rest).run(buffer).await
        }
    }
}
