//! Application configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.ghaudit.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `GHAUDIT_TOKEN`, `GHAUDIT_ORGS`, ... or
//!    legacy `GITHUB_TOKEN`
//! 4. **Command-line arguments** – `--token`/`-t`, `--orgs`/`-g`, ...
//!
//! # Configuration File
//!
//! ```toml
//! token = "ghp_example"
//! orgs = "genuinetools,docker"
//! api = "rest"
//! api_url = "https://github.example.com/api/v3"
//! ```

use std::env;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::audit::settings::{ApiBackend, AuditSettings};
use crate::github::error::AuditError;
use crate::github::locator::{PersonalAccessToken, RepositoryFilter};
use crate::github::scope::Affiliation;

/// Public GitHub REST endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Example
///
/// ```no_run
/// use ghaudit::AuditConfig;
/// use ortho_config::OrthoConfig;
///
/// let config = AuditConfig::load().expect("failed to load configuration");
/// let settings = config.settings().expect("configuration should be consistent");
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "GHAUDIT",
    discovery(
        dotfile_name = ".ghaudit.toml",
        config_file_name = "ghaudit.toml",
        app_name = "ghaudit"
    )
)]
pub struct AuditConfig {
    /// Personal access token for GitHub API authentication.
    ///
    /// Can be provided via:
    /// - CLI: `--token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `GHAUDIT_TOKEN` or `GITHUB_TOKEN` (legacy)
    /// - Config file: `token = "..."`
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// Comma-separated organisations to audit instead of the token owner.
    ///
    /// Can be provided via:
    /// - CLI: `--orgs <ORGS>` or `-g <ORGS>`
    /// - Environment: `GHAUDIT_ORGS`
    /// - Config file: `orgs = "a,b"`
    #[ortho_config(cli_short = 'g')]
    pub orgs: Option<String>,

    /// Restricts the audit to `owner/name` or to names containing a
    /// fragment.
    ///
    /// Can be provided via:
    /// - CLI: `--repo <REPO>` or `-r <REPO>`
    /// - Environment: `GHAUDIT_REPO`
    /// - Config file: `repo = "..."`
    #[ortho_config(cli_short = 'r')]
    pub repo: Option<String>,

    /// Only audits repositories the token owner owns.
    ///
    /// Can be provided via:
    /// - CLI: `--owner-only` / `-o`
    /// - Config file: `owner_only = true`
    #[ortho_config(cli_short = 'o')]
    pub owner_only: bool,

    /// Enables debug logging.
    ///
    /// Can be provided via:
    /// - CLI: `--debug` / `-d`
    /// - Config file: `debug = true`
    #[ortho_config(cli_short = 'd')]
    pub debug: bool,

    /// Listing backend: `graphql` (default) or `rest`.
    ///
    /// Can be provided via:
    /// - CLI: `--api <API>` or `-a <API>`
    /// - Environment: `GHAUDIT_API`
    /// - Config file: `api = "rest"`
    #[ortho_config(cli_short = 'a')]
    pub api: Option<String>,

    /// Base URL of the GitHub REST API; GraphQL is posted to
    /// `<api-url>/graphql`.
    ///
    /// Can be provided via:
    /// - CLI: `--api-url <URL>` or `-u <URL>`
    /// - Environment: `GHAUDIT_API_URL`
    /// - Config file: `api_url = "..."`
    #[ortho_config(cli_short = 'u')]
    pub api_url: Option<String>,
}

impl AuditConfig {
    /// Resolves the token from configuration or the legacy `GITHUB_TOKEN`
    /// environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::MissingToken`] when no token source provides a
    /// value.
    pub fn resolve_token(&self) -> Result<String, AuditError> {
        self.token
            .clone()
            .or_else(|| env::var("GITHUB_TOKEN").ok())
            .ok_or(AuditError::MissingToken)
    }

    /// Organisations named in `orgs`, trimmed and without empty entries.
    #[must_use]
    pub fn organisations(&self) -> Vec<String> {
        self.orgs
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|org| !org.is_empty())
            .map(str::to_owned)
            .collect()
    }

    /// Checks that the scope flags do not contradict each other.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Configuration`] when `owner_only` is combined
    /// with organisations.
    pub fn validate(&self) -> Result<(), AuditError> {
        if self.owner_only && !self.organisations().is_empty() {
            return Err(AuditError::Configuration {
                message: "cannot filter by organization while restricting to repositories \
                          the token owner owns"
                    .to_owned(),
            });
        }
        Ok(())
    }

    /// Listing backend named by `api`.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Configuration`] for an unknown backend name.
    pub fn backend(&self) -> Result<ApiBackend, AuditError> {
        self.api
            .as_deref()
            .map_or(Ok(ApiBackend::default()), str::parse)
    }

    /// Base URL of the REST API.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::InvalidUrl`] when `api_url` does not parse.
    pub fn api_base(&self) -> Result<Url, AuditError> {
        let raw = self.api_url.as_deref().unwrap_or(DEFAULT_API_URL);
        Url::parse(raw).map_err(|error| AuditError::InvalidUrl(format!("{raw}: {error}")))
    }

    /// Resolves the configuration into immutable run settings.
    ///
    /// # Errors
    ///
    /// Returns the first configuration problem found: conflicting scope
    /// flags, a missing token, a malformed repository filter, an unknown
    /// backend, or an invalid API URL.
    pub fn settings(&self) -> Result<AuditSettings, AuditError> {
        self.validate()?;
        let token = PersonalAccessToken::new(self.resolve_token()?)?;
        let filter = self
            .repo
            .as_deref()
            .map(RepositoryFilter::parse)
            .transpose()?;
        let affiliation = if self.owner_only {
            Affiliation::Owner
        } else {
            Affiliation::All
        };

        Ok(AuditSettings::new(token, self.api_base()?)
            .with_organisations(self.organisations())
            .with_filter(filter)
            .with_affiliation(affiliation)
            .with_backend(self.backend()?))
    }
}

#[cfg(test)]
mod tests;
