//! GitHub access for repository audits.
//!
//! This module wraps Octocrab to enumerate repositories over REST or
//! GraphQL and to read the sub-resources an audit inspects. Errors are mapped
//! into [`AuditError`] variants so callers can tell visibility failures apart
//! from rate limiting without touching Octocrab internals.

pub mod deploy_key;
pub mod error;
pub mod gateway;
pub mod locator;
pub mod models;
pub mod pagination;
pub mod rate_limit;
pub mod scope;

pub use error::AuditError;
pub use gateway::{AuditGateway, OctocrabGraphqlGateway, OctocrabRestGateway, RepositoryGateway};
pub use locator::{
    PersonalAccessToken, RepositoryFilter, RepositoryName, RepositoryOwner, RepositoryRef,
};
pub use models::{
    Branch, Collaborator, DeployKey, MembershipState, MergeStrategies, PermissionTier,
    RepositoryPage, RepositoryRecord, RepositorySnapshot, Team, Webhook,
};
pub use pagination::PageCursor;
pub use rate_limit::RateLimitInfo;
pub use scope::{Affiliation, ListingScope};

#[cfg(test)]
pub use gateway::{MockAuditGateway, MockRepositoryGateway};
