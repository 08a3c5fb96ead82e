//! Gateways for reading repository access configuration from GitHub.
//!
//! Listing is behind [`RepositoryGateway`] so the paginator does not care
//! whether pages come from REST or GraphQL. Per-repository sub-resources are
//! behind [`AuditGateway`], which only the REST adapter implements. Both
//! traits are mocked in tests while the Octocrab implementations handle real
//! HTTP requests.

mod client;
mod error_mapping;
mod graphql;
mod rest;

pub use client::build_octocrab_client;
pub use graphql::OctocrabGraphqlGateway;
pub use rest::OctocrabRestGateway;

use async_trait::async_trait;

use crate::github::error::AuditError;
use crate::github::locator::{RepositoryOwner, RepositoryRef};
use crate::github::models::{
    Branch, Collaborator, DeployKey, MembershipState, MergeStrategies, RepositoryPage,
    RepositoryRecord, Team, Webhook,
};
use crate::github::pagination::PageCursor;
use crate::github::scope::ListingScope;

/// Gateway that enumerates repositories.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RepositoryGateway: Send + Sync {
    /// Cursor for the first page of a listing.
    fn first_cursor(&self) -> PageCursor;

    /// Login of the token owner.
    async fn viewer_login(&self) -> Result<String, AuditError>;

    /// Fetch one page of repositories for the scope.
    async fn list_repositories(
        &self,
        scope: &ListingScope,
        cursor: &PageCursor,
    ) -> Result<RepositoryPage, AuditError>;

    /// Fetch a single repository by owner and name.
    async fn repository(&self, reference: &RepositoryRef) -> Result<RepositoryRecord, AuditError>;

    /// Search the scope for repositories whose name contains the fragment.
    async fn search_repositories(
        &self,
        scope: &ListingScope,
        fragment: &str,
    ) -> Result<Vec<RepositoryRecord>, AuditError>;
}

/// Gateway for the per-repository sub-resources an audit inspects.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuditGateway: Send + Sync {
    /// Teams with access to the repository.
    async fn teams(&self, repository: &RepositoryRef) -> Result<Vec<Team>, AuditError>;

    /// Membership state of a user within an organisation team.
    async fn team_membership(
        &self,
        organisation: &RepositoryOwner,
        team: &Team,
        login: &str,
    ) -> Result<MembershipState, AuditError>;

    /// Webhooks configured on the repository.
    async fn hooks(&self, repository: &RepositoryRef) -> Result<Vec<Webhook>, AuditError>;

    /// Collaborators and their effective tiers.
    async fn collaborators(
        &self,
        repository: &RepositoryRef,
    ) -> Result<Vec<Collaborator>, AuditError>;

    /// Deploy keys installed on the repository.
    async fn deploy_keys(&self, repository: &RepositoryRef) -> Result<Vec<DeployKey>, AuditError>;

    /// Merge strategies, for records listed without them.
    async fn merge_strategies(
        &self,
        repository: &RepositoryRef,
    ) -> Result<MergeStrategies, AuditError>;

    /// Branches of the repository.
    async fn branches(&self, repository: &RepositoryRef) -> Result<Vec<Branch>, AuditError>;

    /// Whether the branch carries protection; `Ok(true)` when it does.
    async fn branch_protected(
        &self,
        repository: &RepositoryRef,
        branch: &str,
    ) -> Result<bool, AuditError>;
}
