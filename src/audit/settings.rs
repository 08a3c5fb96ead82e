//! Immutable settings shared by every stage of an audit run.

use std::str::FromStr;

use url::Url;

use crate::github::error::AuditError;
use crate::github::locator::{PersonalAccessToken, RepositoryFilter};
use crate::github::scope::{Affiliation, ListingScope};

/// GitHub API surface used for repository listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiBackend {
    /// GraphQL with nested inventories and cursor pagination.
    #[default]
    Graphql,
    /// REST with offset pagination and per-repository sub-requests.
    Rest,
}

impl ApiBackend {
    /// Configuration value naming this backend.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Graphql => "graphql",
            Self::Rest => "rest",
        }
    }
}

impl FromStr for ApiBackend {
    type Err = AuditError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "graphql" => Ok(Self::Graphql),
            "rest" => Ok(Self::Rest),
            other => Err(AuditError::Configuration {
                message: format!("unknown API backend `{other}`; expected `graphql` or `rest`"),
            }),
        }
    }
}

/// Resolved configuration for one audit run.
#[derive(Debug, Clone)]
pub struct AuditSettings {
    token: PersonalAccessToken,
    api_base: Url,
    organisations: Vec<String>,
    filter: Option<RepositoryFilter>,
    affiliation: Affiliation,
    backend: ApiBackend,
}

impl AuditSettings {
    /// Creates settings that audit every repository the token owner can
    /// reach through GraphQL.
    #[must_use]
    pub fn new(token: PersonalAccessToken, api_base: Url) -> Self {
        Self {
            token,
            api_base,
            organisations: Vec::new(),
            filter: None,
            affiliation: Affiliation::All,
            backend: ApiBackend::Graphql,
        }
    }

    /// Restricts listing to the named organisations.
    #[must_use]
    pub fn with_organisations(mut self, organisations: Vec<String>) -> Self {
        self.organisations = organisations;
        self
    }

    /// Restricts the audit to one repository or a name fragment.
    #[must_use]
    pub fn with_filter(mut self, filter: Option<RepositoryFilter>) -> Self {
        self.filter = filter;
        self
    }

    /// Sets the repository affiliations included in listings.
    #[must_use]
    pub const fn with_affiliation(mut self, affiliation: Affiliation) -> Self {
        self.affiliation = affiliation;
        self
    }

    /// Selects the listing backend.
    #[must_use]
    pub const fn with_backend(mut self, backend: ApiBackend) -> Self {
        self.backend = backend;
        self
    }

    /// Token used for every request.
    #[must_use]
    pub const fn token(&self) -> &PersonalAccessToken {
        &self.token
    }

    /// Base URL of the GitHub REST API.
    #[must_use]
    pub const fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Organisations to audit; empty means the token owner.
    #[must_use]
    pub fn organisations(&self) -> &[String] {
        &self.organisations
    }

    /// Repository restriction, if any.
    #[must_use]
    pub const fn filter(&self) -> Option<&RepositoryFilter> {
        self.filter.as_ref()
    }

    /// Affiliations included in listings.
    #[must_use]
    pub const fn affiliation(&self) -> Affiliation {
        self.affiliation
    }

    /// Listing backend.
    #[must_use]
    pub const fn backend(&self) -> ApiBackend {
        self.backend
    }

    /// True when the token owner's login is needed to build scopes.
    #[must_use]
    pub fn needs_viewer_login(&self) -> bool {
        self.organisations.is_empty()
    }

    /// Listing scopes for this run.
    ///
    /// `viewer_login` is only consulted when no organisation was named.
    #[must_use]
    pub fn listing_scopes(&self, viewer_login: Option<&str>) -> Vec<ListingScope> {
        if self.organisations.is_empty() {
            return viewer_login
                .map(|login| ListingScope::User {
                    login: login.to_owned(),
                    affiliation: self.affiliation,
                })
                .into_iter()
                .collect();
        }

        self.organisations
            .iter()
            .map(|login| ListingScope::Organization {
                login: login.clone(),
                affiliation: self.affiliation,
            })
            .collect()
    }
}
