//! Octocrab client construction shared by the REST and GraphQL gateways.

use http::Uri;
use octocrab::Octocrab;
use url::Url;

use crate::github::error::AuditError;
use crate::github::locator::PersonalAccessToken;

use super::error_mapping::map_octocrab_error;

/// Builds an Octocrab client for the given token and API base URL.
///
/// Both gateways share one client so they authenticate identically and
/// hit the same host.
///
/// # Errors
///
/// Returns `AuditError::InvalidUrl` when the base URI cannot be parsed or
/// `AuditError::Api` when Octocrab fails to construct a client.
pub fn build_octocrab_client(
    token: &PersonalAccessToken,
    api_base: &Url,
) -> Result<Octocrab, AuditError> {
    let base_uri: Uri = api_base
        .as_str()
        .trim_end_matches('/')
        .parse::<Uri>()
        .map_err(|error| AuditError::InvalidUrl(error.to_string()))?;

    Octocrab::builder()
        .personal_token(token.value())
        .base_uri(base_uri)
        .map_err(|error| AuditError::Api {
            message: format!("build client failed: {error}"),
        })?
        .build()
        .map_err(|error| map_octocrab_error("build client", &error))
}
