//! Tests for field resolution (`resolve_token`, `organisations`, `backend`,
//! `api_base`).

use rstest::rstest;

use crate::AuditConfig;
use crate::audit::settings::ApiBackend;
use crate::github::error::AuditError;

#[rstest]
fn resolve_token_returns_value_when_present() {
    let config = AuditConfig {
        token: Some("my-token".to_owned()),
        ..Default::default()
    };

    assert_eq!(config.resolve_token().ok(), Some("my-token".to_owned()));
}

#[rstest]
fn resolve_token_falls_back_to_github_token() {
    let _guard = env_lock::lock_env([("GITHUB_TOKEN", Some("legacy-token"))]);
    let config = AuditConfig::default();

    assert_eq!(config.resolve_token().ok(), Some("legacy-token".to_owned()));
}

#[rstest]
fn resolve_token_returns_error_when_none() {
    let _guard = env_lock::lock_env([("GITHUB_TOKEN", None::<&str>)]);
    let config = AuditConfig::default();

    let result = config.resolve_token();
    assert!(
        matches!(result, Err(AuditError::MissingToken)),
        "expected MissingToken, got {result:?}"
    );
}

#[rstest]
#[case::unset(None, vec![])]
#[case::single(Some("genuinetools"), vec!["genuinetools"])]
#[case::spaced_and_empty(Some(" genuinetools, ,docker ,"), vec!["genuinetools", "docker"])]
fn splits_organisations(#[case] orgs: Option<&str>, #[case] expected: Vec<&str>) {
    let config = AuditConfig {
        orgs: orgs.map(str::to_owned),
        ..Default::default()
    };

    assert_eq!(config.organisations(), expected);
}

#[rstest]
#[case::default(None, ApiBackend::Graphql)]
#[case::rest(Some("rest"), ApiBackend::Rest)]
#[case::graphql(Some("GraphQL"), ApiBackend::Graphql)]
fn resolves_backend(#[case] api: Option<&str>, #[case] expected: ApiBackend) {
    let config = AuditConfig {
        api: api.map(str::to_owned),
        ..Default::default()
    };

    assert_eq!(config.backend().ok(), Some(expected));
}

#[rstest]
fn api_base_defaults_to_public_github() {
    let config = AuditConfig::default();

    let base = config.api_base().expect("default URL should parse");
    assert_eq!(base.as_str(), "https://api.github.com/");
}

#[rstest]
fn invalid_api_url_is_rejected() {
    let config = AuditConfig {
        api_url: Some("not a url".to_owned()),
        ..Default::default()
    };

    let result = config.api_base();
    assert!(
        matches!(result, Err(AuditError::InvalidUrl(_))),
        "expected InvalidUrl, got {result:?}"
    );
}
