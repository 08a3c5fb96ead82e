//! Data models for repositories and their access-relevant sub-resources.
//!
//! The public types are what the auditor works with regardless of the
//! upstream adapter. The `Api*` types mirror REST response bodies and are
//! converted at the gateway boundary.

use serde::Deserialize;

use super::locator::{RepositoryName, RepositoryOwner, RepositoryRef};
use super::pagination::PageCursor;

/// Permission tier used to bucket collaborators.
///
/// Variants are ordered so that `Admin > Write > Read`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PermissionTier {
    /// Pull access (REST `pull`/`triage`, GraphQL `READ`/`TRIAGE`).
    Read,
    /// Push access (REST `push`/`maintain`, GraphQL `WRITE`/`MAINTAIN`).
    Write,
    /// Administrative access.
    Admin,
}

impl PermissionTier {
    /// Maps a REST team permission name onto a tier.
    #[must_use]
    pub fn from_rest_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "maintain" | "push" | "write" => Some(Self::Write),
            "triage" | "pull" | "read" => Some(Self::Read),
            _ => None,
        }
    }

    /// Maps a GraphQL `RepositoryPermission` value onto a tier.
    #[must_use]
    pub fn from_graphql(permission: &str) -> Option<Self> {
        match permission {
            "ADMIN" => Some(Self::Admin),
            "MAINTAIN" | "WRITE" => Some(Self::Write),
            "TRIAGE" | "READ" => Some(Self::Read),
            _ => None,
        }
    }

    /// Picks the highest tier granted by a REST permission flag set.
    #[must_use]
    pub const fn from_flags(flags: &PermissionFlags) -> Option<Self> {
        if flags.admin {
            Some(Self::Admin)
        } else if flags.maintain || flags.push {
            Some(Self::Write)
        } else if flags.triage || flags.pull {
            Some(Self::Read)
        } else {
            None
        }
    }
}

/// Permission flags reported for a REST collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct PermissionFlags {
    /// Administrative access.
    pub admin: bool,
    /// Maintain access.
    pub maintain: bool,
    /// Push access.
    pub push: bool,
    /// Triage access.
    pub triage: bool,
    /// Pull access.
    pub pull: bool,
}

/// Merge strategies enabled on a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeStrategies {
    /// Merge commits allowed.
    pub merge_commit: bool,
    /// Squash merging allowed.
    pub squash: bool,
    /// Rebase merging allowed.
    pub rebase: bool,
}

/// Repository collaborator with their effective tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collaborator {
    /// User login.
    pub login: String,
    /// Highest tier the collaborator holds.
    pub tier: PermissionTier,
}

/// Team with access to a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    /// URL slug used in membership lookups.
    pub slug: String,
    /// Display name.
    pub name: String,
    /// Tier the team grants on the repository, if recognised.
    pub permission: Option<PermissionTier>,
}

/// Membership state of a user within a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipState {
    /// The user accepted the invitation and is a member.
    Active,
    /// The invitation is outstanding.
    Pending,
    /// The user is not a member, or the state is unknown.
    Absent,
}

impl MembershipState {
    /// Parses the `state` field of a membership response.
    #[must_use]
    pub fn from_state(state: Option<&str>) -> Self {
        match state {
            Some("active") => Self::Active,
            Some("pending") => Self::Pending,
            _ => Self::Absent,
        }
    }

    /// Returns true only for accepted memberships.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Repository webhook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Webhook {
    /// Hook name (`web` for ordinary webhooks, or an integration name).
    pub name: String,
    /// Whether deliveries are enabled.
    pub active: bool,
    /// Delivery target, falling back to the hook's API URL.
    pub url: Option<String>,
}

/// Repository deploy key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployKey {
    /// Key title.
    pub title: String,
    /// Whether the key is read-only.
    pub read_only: bool,
    /// API URL of the key, when it can be resolved.
    pub url: Option<String>,
}

/// Branch as reported by the branch listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    /// Branch name.
    pub name: String,
    /// Protection flag from the listing; `None` when not reported.
    pub protected: Option<bool>,
}

/// Access-relevant data fetched together with the repository listing.
///
/// GraphQL returns this nested inside each repository node so the auditor
/// does not need separate REST round trips for it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RepositorySnapshot {
    /// Collaborators with recognised tiers.
    pub collaborators: Vec<Collaborator>,
    /// Total collaborators reported by the connection.
    pub collaborator_count: usize,
    /// Deploy keys.
    pub deploy_keys: Vec<DeployKey>,
    /// Branch protection rule patterns.
    pub protection_rules: Vec<String>,
    /// Branch names.
    pub branches: Vec<String>,
    /// Total branches reported by the connection.
    pub branch_count: usize,
}

/// Repository yielded by a listing, lookup or search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRecord {
    /// Repository identity.
    pub reference: RepositoryRef,
    /// Merge strategies enabled on the repository; `None` when the listing
    /// payload omits them, as the minimal repository shape does.
    pub merge_strategies: Option<MergeStrategies>,
    /// Prefetched inventory, when the adapter supplies one.
    pub snapshot: Option<RepositorySnapshot>,
}

/// One page of a repository listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryPage {
    /// Repositories on this page.
    pub items: Vec<RepositoryRecord>,
    /// Cursor for the next page; `None` when the listing is exhausted.
    pub next: Option<PageCursor>,
}

// --- REST response bodies ---

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiUser {
    pub(crate) login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiRepository {
    pub(crate) name: String,
    pub(crate) owner: ApiUser,
    pub(crate) allow_merge_commit: Option<bool>,
    pub(crate) allow_squash_merge: Option<bool>,
    pub(crate) allow_rebase_merge: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiSearchResults {
    #[serde(default)]
    pub(crate) items: Vec<ApiRepository>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiTeam {
    pub(crate) slug: String,
    pub(crate) name: String,
    pub(crate) permission: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiMembership {
    pub(crate) state: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiCollaborator {
    pub(crate) login: String,
    pub(crate) permissions: Option<PermissionFlags>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiHookConfig {
    pub(crate) url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiHook {
    pub(crate) name: Option<String>,
    pub(crate) active: Option<bool>,
    pub(crate) url: Option<String>,
    pub(crate) config: Option<ApiHookConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiDeployKey {
    pub(crate) title: Option<String>,
    pub(crate) read_only: Option<bool>,
    pub(crate) url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiBranch {
    pub(crate) name: String,
    pub(crate) protected: Option<bool>,
}

impl ApiRepository {
    pub(crate) fn into_record(self) -> Option<RepositoryRecord> {
        let owner = RepositoryOwner::new(&self.owner.login).ok()?;
        let name = RepositoryName::new(&self.name).ok()?;
        Some(RepositoryRecord {
            reference: RepositoryRef::new(owner, name),
            merge_strategies: self.merge_strategies(),
            snapshot: None,
        })
    }

    /// Merge flags, present only on the full repository shape.
    pub(crate) fn merge_strategies(&self) -> Option<MergeStrategies> {
        if self.allow_merge_commit.is_none()
            && self.allow_squash_merge.is_none()
            && self.allow_rebase_merge.is_none()
        {
            return None;
        }
        Some(MergeStrategies {
            merge_commit: self.allow_merge_commit.unwrap_or(false),
            squash: self.allow_squash_merge.unwrap_or(false),
            rebase: self.allow_rebase_merge.unwrap_or(false),
        })
    }
}

impl From<ApiTeam> for Team {
    fn from(value: ApiTeam) -> Self {
        Self {
            slug: value.slug,
            name: value.name,
            permission: value
                .permission
                .as_deref()
                .and_then(PermissionTier::from_rest_name),
        }
    }
}

impl ApiCollaborator {
    pub(crate) fn into_collaborator(self) -> Option<Collaborator> {
        let tier = PermissionTier::from_flags(&self.permissions?)?;
        Some(Collaborator {
            login: self.login,
            tier,
        })
    }
}

impl From<ApiHook> for Webhook {
    fn from(value: ApiHook) -> Self {
        let target = value.config.and_then(|config| config.url);
        Self {
            name: value.name.unwrap_or_else(|| "web".to_owned()),
            active: value.active.unwrap_or(false),
            url: target.or(value.url),
        }
    }
}

impl From<ApiDeployKey> for DeployKey {
    fn from(value: ApiDeployKey) -> Self {
        Self {
            title: value.title.unwrap_or_default(),
            read_only: value.read_only.unwrap_or(false),
            url: value.url,
        }
    }
}

impl From<ApiBranch> for Branch {
    fn from(value: ApiBranch) -> Self {
        Self {
            name: value.name,
            protected: value.protected,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{
        ApiCollaborator, ApiHook, ApiRepository, MembershipState, MergeStrategies,
        PermissionFlags, PermissionTier,
    };

    #[rstest]
    #[case::admin_wins(PermissionFlags { admin: true, maintain: true, push: true, triage: true, pull: true }, Some(PermissionTier::Admin))]
    #[case::push_over_pull(PermissionFlags { push: true, pull: true, ..Default::default() }, Some(PermissionTier::Write))]
    #[case::maintain_is_write(PermissionFlags { maintain: true, ..Default::default() }, Some(PermissionTier::Write))]
    #[case::triage_is_read(PermissionFlags { triage: true, ..Default::default() }, Some(PermissionTier::Read))]
    #[case::nothing(PermissionFlags::default(), None)]
    fn highest_flag_selects_tier(
        #[case] flags: PermissionFlags,
        #[case] expected: Option<PermissionTier>,
    ) {
        assert_eq!(PermissionTier::from_flags(&flags), expected);
    }

    #[rstest]
    #[case("ADMIN", Some(PermissionTier::Admin))]
    #[case("MAINTAIN", Some(PermissionTier::Write))]
    #[case("WRITE", Some(PermissionTier::Write))]
    #[case("TRIAGE", Some(PermissionTier::Read))]
    #[case("READ", Some(PermissionTier::Read))]
    #[case("NONE", None)]
    fn graphql_permissions_map_to_tiers(
        #[case] permission: &str,
        #[case] expected: Option<PermissionTier>,
    ) {
        assert_eq!(PermissionTier::from_graphql(permission), expected);
    }

    #[rstest]
    fn tiers_are_ordered_by_privilege() {
        assert!(PermissionTier::Admin > PermissionTier::Write);
        assert!(PermissionTier::Write > PermissionTier::Read);
    }

    #[rstest]
    #[case(Some("active"), MembershipState::Active)]
    #[case(Some("pending"), MembershipState::Pending)]
    #[case(None, MembershipState::Absent)]
    fn parses_membership_state(#[case] state: Option<&str>, #[case] expected: MembershipState) {
        assert_eq!(MembershipState::from_state(state), expected);
    }

    #[rstest]
    fn collaborator_without_permissions_is_dropped() {
        let collaborator: ApiCollaborator =
            serde_json::from_value(serde_json::json!({ "login": "octocat" }))
                .expect("collaborator should deserialise");

        assert_eq!(collaborator.into_collaborator(), None);
    }

    #[rstest]
    fn hook_prefers_delivery_target_over_api_url() {
        let hook: ApiHook = serde_json::from_value(serde_json::json!({
            "name": "web",
            "active": true,
            "url": "https://api.github.com/repos/o/r/hooks/1",
            "config": { "url": "https://ci.example.com/hook" }
        }))
        .expect("hook should deserialise");

        let webhook = super::Webhook::from(hook);
        assert_eq!(webhook.url.as_deref(), Some("https://ci.example.com/hook"));
        assert!(webhook.active);
    }

    #[rstest]
    #[case::minimal_shape(
        serde_json::json!({ "name": "audit", "owner": { "login": "genuinetools" } }),
        None
    )]
    #[case::full_shape(
        serde_json::json!({
            "name": "audit",
            "owner": { "login": "genuinetools" },
            "allow_merge_commit": true,
            "allow_squash_merge": false,
            "allow_rebase_merge": true
        }),
        Some(MergeStrategies { merge_commit: true, squash: false, rebase: true })
    )]
    fn merge_flags_are_known_only_on_the_full_shape(
        #[case] body: serde_json::Value,
        #[case] expected: Option<MergeStrategies>,
    ) {
        let repository: ApiRepository =
            serde_json::from_value(body).expect("repository should deserialise");

        let record = repository.into_record().expect("owner and name are valid");
        assert_eq!(record.merge_strategies, expected);
    }
}
