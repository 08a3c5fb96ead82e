//! Per-repository audit report.

use crate::github::locator::RepositoryRef;
use crate::github::models::{DeployKey, MergeStrategies, PermissionTier, Webhook};

/// Collaborator with the teams that grant them their tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollaboratorRecord {
    /// User login.
    pub login: String,
    /// Highest tier the collaborator holds.
    pub tier: PermissionTier,
    /// Names of teams granting exactly this tier that the user actively
    /// belongs to.
    pub teams: Vec<String>,
}

/// Access-relevant configuration of one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditReport {
    /// Audited repository.
    pub repository: RepositoryRef,
    /// Collaborator total as reported by GitHub.
    pub collaborator_count: usize,
    /// Collaborators with admin access.
    pub admins: Vec<CollaboratorRecord>,
    /// Collaborators with write access.
    pub writers: Vec<CollaboratorRecord>,
    /// Collaborators with read access.
    pub readers: Vec<CollaboratorRecord>,
    /// Deploy keys.
    pub deploy_keys: Vec<DeployKey>,
    /// Webhooks.
    pub hooks: Vec<Webhook>,
    /// Protected branch names or protection rule patterns.
    pub protected_branches: Vec<String>,
    /// Branches without protection.
    pub unprotected_branches: Vec<String>,
    /// Branch total as reported by GitHub.
    pub branch_count: usize,
    /// Enabled merge strategies.
    pub merge_strategies: MergeStrategies,
}

impl AuditReport {
    /// Returns true when the report carries anything worth printing.
    ///
    /// A lone collaborator is the owner and does not count.
    #[must_use]
    pub fn is_noteworthy(&self) -> bool {
        self.collaborator_count > 1
            || !self.deploy_keys.is_empty()
            || !self.hooks.is_empty()
            || !self.protected_branches.is_empty()
            || !self.unprotected_branches.is_empty()
            || self.branch_count > 0
    }

    /// Collaborators bucketed by tier, highest first.
    #[must_use]
    pub fn tiers(&self) -> [(PermissionTier, &[CollaboratorRecord]); 3] {
        [
            (PermissionTier::Admin, self.admins.as_slice()),
            (PermissionTier::Write, self.writers.as_slice()),
            (PermissionTier::Read, self.readers.as_slice()),
        ]
    }
}
