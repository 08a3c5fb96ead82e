//! ghaudit library crate for auditing GitHub repository access.
//!
//! The library enumerates the repositories a token can reach, inspects their
//! collaborators, teams, hooks, deploy keys and branch protection, and
//! renders a plain-text report for every repository worth a closer look.

pub mod audit;
pub mod config;
pub mod github;

pub use audit::{AuditReport, AuditRunner, AuditSettings, AuditSummary, render_report};
pub use config::AuditConfig;
pub use github::{
    AuditError, AuditGateway, OctocrabGraphqlGateway, OctocrabRestGateway, PersonalAccessToken,
    RepositoryGateway, RepositoryRef,
};
