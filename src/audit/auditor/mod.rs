//! Per-repository audit: sub-query fan-out and reconciliation.
//!
//! Teams and hooks act as visibility gates: when GitHub hides either from
//! the token, the repository is out of scope and produces no report.
//! Collaborators, deploy keys and branches are sections: a hidden section is
//! empty while the rest of the report still renders. Merge flags missing
//! from a listed record are read from the full repository once the gates
//! pass.

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use tracing::debug;

use crate::github::error::AuditError;
use crate::github::gateway::AuditGateway;
use crate::github::locator::RepositoryRef;
use crate::github::models::{
    Collaborator, DeployKey, PermissionTier, RepositoryRecord, RepositorySnapshot, Team,
};

use super::report::{AuditReport, CollaboratorRecord};


/// Collaborators, keys and branches gathered for one repository.
struct Inventory {
    collaborators: Vec<Collaborator>,
    collaborator_count: usize,
    deploy_keys: Vec<DeployKey>,
    protected_branches: Vec<String>,
    unprotected_branches: Vec<String>,
    branch_count: usize,
}

impl Inventory {
    fn from_snapshot(snapshot: &RepositorySnapshot) -> Self {
        Self {
            collaborators: snapshot.collaborators.clone(),
            collaborator_count: snapshot.collaborator_count,
            deploy_keys: snapshot.deploy_keys.clone(),
            protected_branches: snapshot.protection_rules.clone(),
            unprotected_branches: unmatched_branches(
                &snapshot.protection_rules,
                &snapshot.branches,
            ),
            branch_count: snapshot.branch_count,
        }
    }
}

/// Branches matching none of the protection rule patterns.
///
/// Patterns follow GitHub's fnmatch rules, so `*` stops at `/`. A pattern
/// that does not compile only matches a branch with the identical name.
fn unmatched_branches(patterns: &[String], branches: &[String]) -> Vec<String> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        match GlobBuilder::new(pattern).literal_separator(true).build() {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(error) => debug!(%pattern, %error, "protection rule is not a valid glob"),
        }
    }
    let globs = builder.build().unwrap_or_else(|_| GlobSet::empty());

    branches
        .iter()
        .filter(|branch| !globs.is_match(branch.as_str()) && !patterns.contains(*branch))
        .cloned()
        .collect()
}

/// Treats a 403/404 on a visibility gate as "no report".
fn gate<T>(
    result: Result<T, AuditError>,
    resource: &str,
    repository: &RepositoryRef,
) -> Result<Option<T>, AuditError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(error) if error.is_access_denied() => {
            debug!(%repository, resource, %error, "no administrative visibility");
            Ok(None)
        }
        Err(error) => Err(error),
    }
}

/// Treats a 403/404 on a report section as an empty section.
fn section<T>(
    result: Result<Vec<T>, AuditError>,
    resource: &str,
    repository: &RepositoryRef,
) -> Result<Vec<T>, AuditError> {
    gate(result, resource, repository).map(Option::unwrap_or_default)
}

/// Audits single repositories through an [`AuditGateway`].
pub struct RepositoryAuditor<'a, G: AuditGateway + ?Sized> {
    gateway: &'a G,
}

impl<'a, G: AuditGateway + ?Sized> RepositoryAuditor<'a, G> {
    /// Creates an auditor backed by the given gateway.
    #[must_use]
    pub const fn new(gateway: &'a G) -> Self {
        Self { gateway }
    }

    /// Builds the report for one repository.
    ///
    /// Returns `Ok(None)` when the token cannot see the repository's teams or
    /// hooks.
    ///
    /// # Errors
    ///
    /// Propagates every gateway error other than the tolerated 403/404
    /// responses, including rate limiting.
    pub async fn audit(
        &self,
        record: &RepositoryRecord,
    ) -> Result<Option<AuditReport>, AuditError> {
        let repository = &record.reference;
        debug!(%repository, "auditing repository");

        let Some(teams) = gate(self.gateway.teams(repository).await, "teams", repository)? else {
            return Ok(None);
        };
        let Some(hooks) = gate(self.gateway.hooks(repository).await, "hooks", repository)? else {
            return Ok(None);
        };

        let merge_strategies = match record.merge_strategies {
            Some(strategies) => strategies,
            None => gate(
                self.gateway.merge_strategies(repository).await,
                "merge strategies",
                repository,
            )?
            .unwrap_or_default(),
        };

        let inventory = match &record.snapshot {
            Some(snapshot) => Inventory::from_snapshot(snapshot),
            None => self.fetch_inventory(repository).await?,
        };

        let mut admins = Vec::new();
        let mut writers = Vec::new();
        let mut readers = Vec::new();
        let check_teams = inventory.collaborator_count > 1;
        for collaborator in inventory.collaborators {
            let granting = if check_teams {
                self.granting_teams(repository, &teams, &collaborator).await?
            } else {
                Vec::new()
            };
            let entry = CollaboratorRecord {
                login: collaborator.login,
                tier: collaborator.tier,
                teams: granting,
            };
            match entry.tier {
                PermissionTier::Admin => admins.push(entry),
                PermissionTier::Write => writers.push(entry),
                PermissionTier::Read => readers.push(entry),
            }
        }

        Ok(Some(AuditReport {
            repository: repository.clone(),
            collaborator_count: inventory.collaborator_count,
            admins,
            writers,
            readers,
            deploy_keys: inventory.deploy_keys,
            hooks,
            protected_branches: inventory.protected_branches,
            unprotected_branches: inventory.unprotected_branches,
            branch_count: inventory.branch_count,
            merge_strategies,
        }))
    }

    async fn fetch_inventory(&self, repository: &RepositoryRef) -> Result<Inventory, AuditError> {
        let collaborators = section(
            self.gateway.collaborators(repository).await,
            "collaborators",
            repository,
        )?;
        let deploy_keys = section(
            self.gateway.deploy_keys(repository).await,
            "deploy keys",
            repository,
        )?;
        let branches = section(self.gateway.branches(repository).await, "branches", repository)?;

        let branch_count = branches.len();
        let mut protected_branches = Vec::new();
        let mut unprotected_branches = Vec::new();
        for branch in branches {
            let protected = match branch.protected {
                Some(flag) => flag,
                None => self.branch_protected(repository, &branch.name).await?,
            };
            if protected {
                protected_branches.push(branch.name);
            } else {
                unprotected_branches.push(branch.name);
            }
        }

        Ok(Inventory {
            collaborator_count: collaborators.len(),
            collaborators,
            deploy_keys,
            protected_branches,
            unprotected_branches,
            branch_count,
        })
    }

    /// Protection detail lookup; 404 and 403 both count as unprotected.
    async fn branch_protected(
        &self,
        repository: &RepositoryRef,
        branch: &str,
    ) -> Result<bool, AuditError> {
        match self.gateway.branch_protected(repository, branch).await {
            Ok(protected) => Ok(protected),
            Err(error) if error.is_access_denied() => Ok(false),
            Err(error) => Err(error),
        }
    }

    /// Names of teams granting the collaborator's elevated tier that the
    /// collaborator actively belongs to.
    async fn granting_teams(
        &self,
        repository: &RepositoryRef,
        teams: &[Team],
        collaborator: &Collaborator,
    ) -> Result<Vec<String>, AuditError> {
        if collaborator.tier == PermissionTier::Read {
            return Ok(Vec::new());
        }

        let mut granting = Vec::new();
        for team in teams
            .iter()
            .filter(|team| team.permission == Some(collaborator.tier))
        {
            let membership = self
                .gateway
                .team_membership(repository.owner(), team, &collaborator.login)
                .await;
            match membership {
                Ok(state) if state.is_active() => granting.push(team.name.clone()),
                Ok(_) => {}
                Err(error) if error.is_access_denied() => {}
                Err(error) => return Err(error),
            }
        }
        Ok(granting)
    }
}
