//! Response shapes for the GraphQL repository queries.

use serde::Deserialize;

use crate::github::deploy_key::deploy_key_url;
use crate::github::locator::RepositoryRef;
use crate::github::models::{
    Collaborator, DeployKey, MergeStrategies, PermissionTier, RepositoryRecord,
    RepositorySnapshot,
};
use crate::github::pagination::CursorInfo;

/// Envelope of every GraphQL response.
#[derive(Debug, Deserialize)]
pub(super) struct GqlResponse<D> {
    pub(super) data: Option<D>,
    #[serde(default)]
    pub(super) errors: Vec<GqlError>,
}

#[derive(Debug, Deserialize)]
pub(super) struct GqlError {
    pub(super) message: String,
    #[serde(rename = "type")]
    pub(super) kind: Option<String>,
    #[serde(default)]
    pub(super) path: Vec<serde_json::Value>,
}

impl GqlError {
    pub(super) fn is_rate_limited(&self) -> bool {
        self.kind.as_deref() == Some("RATE_LIMITED")
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct Login {
    pub(super) login: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct ViewerData {
    pub(super) viewer: Login,
}

#[derive(Debug, Deserialize)]
pub(super) struct OwnerRepositoriesData {
    pub(super) owner: Option<OwnerNode>,
}

#[derive(Debug, Deserialize)]
pub(super) struct OwnerNode {
    pub(super) repositories: Connection<RepositoryNode>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RepositoryData {
    pub(super) repository: Option<RepositoryNode>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SearchData {
    pub(super) search: SearchConnection,
}

#[derive(Debug, Deserialize)]
pub(super) struct SearchConnection {
    #[serde(default)]
    pub(super) nodes: Vec<Option<SearchNode>>,
}

/// Search hits that are not repositories deserialise as empty objects.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum SearchNode {
    Repository(Box<RepositoryNode>),
    Other(serde_json::Value),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PageInfoNode {
    pub(super) end_cursor: Option<String>,
    #[serde(default)]
    pub(super) has_next_page: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct Connection<T> {
    #[serde(default)]
    pub(super) total_count: usize,
    pub(super) page_info: Option<PageInfoNode>,
    pub(super) nodes: Option<Vec<Option<T>>>,
}

impl<T> Connection<T> {
    pub(super) fn cursor_info(&self) -> CursorInfo {
        self.page_info
            .as_ref()
            .map_or_else(CursorInfo::default, |info| {
                CursorInfo::new(info.end_cursor.clone(), info.has_next_page)
            })
    }

    pub(super) fn into_nodes(self) -> impl Iterator<Item = T> {
        self.nodes.into_iter().flatten().flatten()
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct NameNode {
    pub(super) name: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct PatternNode {
    pub(super) pattern: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct DeployKeyNode {
    pub(super) id: String,
    pub(super) title: String,
    #[serde(default)]
    pub(super) read_only: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CollaboratorConnection {
    #[serde(default)]
    pub(super) total_count: usize,
    pub(super) edges: Option<Vec<Option<CollaboratorEdge>>>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CollaboratorEdge {
    pub(super) permission: String,
    pub(super) node: Login,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RepositoryNode {
    pub(super) owner: Login,
    pub(super) name: String,
    #[serde(default)]
    pub(super) merge_commit_allowed: bool,
    #[serde(default)]
    pub(super) squash_merge_allowed: bool,
    #[serde(default)]
    pub(super) rebase_merge_allowed: bool,
    pub(super) refs: Option<Connection<NameNode>>,
    pub(super) branch_protection_rules: Option<Connection<PatternNode>>,
    pub(super) deploy_keys: Option<Connection<DeployKeyNode>>,
    pub(super) collaborators: Option<CollaboratorConnection>,
}

impl RepositoryNode {
    /// Converts the node into a record carrying its nested inventory.
    ///
    /// Connections the token cannot read arrive as `null` and become empty
    /// sections.
    pub(super) fn into_record(self, api_base: &str) -> Option<RepositoryRecord> {
        let reference = RepositoryRef::from_owner_repo(&self.owner.login, &self.name).ok()?;

        let (collaborators, collaborator_count) =
            self.collaborators
                .map_or_else(|| (Vec::new(), 0), |connection| {
                    let count = connection.total_count;
                    let collaborators = connection
                        .edges
                        .into_iter()
                        .flatten()
                        .flatten()
                        .filter_map(|edge| {
                            PermissionTier::from_graphql(&edge.permission).map(|tier| {
                                Collaborator {
                                    login: edge.node.login,
                                    tier,
                                }
                            })
                        })
                        .collect();
                    (collaborators, count)
                });

        let deploy_keys = self
            .deploy_keys
            .into_iter()
            .flat_map(Connection::into_nodes)
            .map(|key| DeployKey {
                url: deploy_key_url(api_base, &reference, &key.id),
                title: key.title,
                read_only: key.read_only,
            })
            .collect();

        let protection_rules = self
            .branch_protection_rules
            .into_iter()
            .flat_map(Connection::into_nodes)
            .map(|rule| rule.pattern)
            .collect();

        let (branches, branch_count) = self.refs.map_or_else(
            || (Vec::new(), 0),
            |refs| {
                let count = refs.total_count;
                (refs.into_nodes().map(|node| node.name).collect(), count)
            },
        );

        Some(RepositoryRecord {
            reference,
            merge_strategies: Some(MergeStrategies {
                merge_commit: self.merge_commit_allowed,
                squash: self.squash_merge_allowed,
                rebase: self.rebase_merge_allowed,
            }),
            snapshot: Some(RepositorySnapshot {
                collaborators,
                collaborator_count,
                deploy_keys,
                protection_rules,
                branches,
                branch_count,
            }),
        })
    }
}
