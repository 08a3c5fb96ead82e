//! Listing scopes: whose repositories an audit walks through.

use std::fmt;

/// Repository affiliations included in a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Affiliation {
    /// Only repositories owned by the login.
    Owner,
    /// Owned repositories plus those reachable as collaborator or
    /// organisation member.
    #[default]
    All,
}

impl Affiliation {
    /// Value of the REST `affiliation` query parameter.
    #[must_use]
    pub const fn rest_value(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::All => "owner,collaborator,organization_member",
        }
    }

    /// Values of the GraphQL `RepositoryAffiliation` list.
    #[must_use]
    pub const fn graphql_values(self) -> &'static [&'static str] {
        match self {
            Self::Owner => &["OWNER"],
            Self::All => &["OWNER", "COLLABORATOR", "ORGANIZATION_MEMBER"],
        }
    }
}

/// One account whose repositories are listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingScope {
    /// The authenticated user.
    User {
        /// Login of the token owner.
        login: String,
        /// Affiliations to include.
        affiliation: Affiliation,
    },
    /// An organisation named on the command line.
    Organization {
        /// Organisation login.
        login: String,
        /// Affiliations to include.
        affiliation: Affiliation,
    },
}

impl ListingScope {
    /// Login of the user or organisation.
    #[must_use]
    pub fn login(&self) -> &str {
        match self {
            Self::User { login, .. } | Self::Organization { login, .. } => login,
        }
    }

    /// Affiliations requested for this scope.
    #[must_use]
    pub const fn affiliation(&self) -> Affiliation {
        match self {
            Self::User { affiliation, .. } | Self::Organization { affiliation, .. } => *affiliation,
        }
    }

    /// Whether repository search covers everything this scope lists.
    ///
    /// Search qualifiers match the owning account only, so a viewer scope
    /// that also includes collaborator and organisation-member repositories
    /// is not searchable.
    #[must_use]
    pub const fn is_searchable(&self) -> bool {
        !matches!(
            self,
            Self::User {
                affiliation: Affiliation::All,
                ..
            }
        )
    }

    /// Search qualifier restricting results to this scope.
    #[must_use]
    pub fn search_qualifier(&self) -> String {
        match self {
            Self::User { login, .. } => format!("user:{login}"),
            Self::Organization { login, .. } => format!("org:{login}"),
        }
    }
}

impl fmt::Display for ListingScope {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User { login, .. } => write!(formatter, "user {login}"),
            Self::Organization { login, .. } => write!(formatter, "organization {login}"),
        }
    }
}
