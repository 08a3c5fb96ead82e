//! GraphQL gateway: cursor-paginated listings with nested inventories.
//!
//! One listing request returns up to a hundred repositories together with
//! their branches, protection rules, deploy keys and collaborators, so the
//! auditor only goes back to REST for teams, hooks and memberships.

use async_trait::async_trait;
use octocrab::Octocrab;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::github::error::AuditError;
use crate::github::locator::{PersonalAccessToken, RepositoryRef};
use crate::github::models::{RepositoryPage, RepositoryRecord};
use crate::github::pagination::PageCursor;
use crate::github::scope::ListingScope;

use super::RepositoryGateway;
use super::client::build_octocrab_client;
use super::error_mapping::{map_octocrab_error_with_rate_limit, rate_limit_error};

mod queries;
mod types;


use queries::OwnerKind;
use types::{
    GqlResponse, OwnerRepositoriesData, RepositoryData, RepositoryNode, SearchData, SearchNode,
    ViewerData,
};

/// Octocrab-backed GraphQL gateway.
#[derive(Clone)]
pub struct OctocrabGraphqlGateway {
    client: Octocrab,
    api_base: String,
}

impl OctocrabGraphqlGateway {
    /// Creates a new gateway; `api_base` prefixes reconstructed key URLs.
    #[must_use]
    pub fn new(client: Octocrab, api_base: &Url) -> Self {
        Self {
            client,
            api_base: api_base.as_str().trim_end_matches('/').to_owned(),
        }
    }

    /// Builds an Octocrab client for the given token and API base.
    ///
    /// # Errors
    ///
    /// Returns `AuditError::InvalidUrl` when the base URI cannot be parsed or
    /// `AuditError::Api` when Octocrab fails to construct a client.
    pub fn for_token(token: &PersonalAccessToken, api_base: &Url) -> Result<Self, AuditError> {
        let octocrab = build_octocrab_client(token, api_base)?;
        Ok(Self::new(octocrab, api_base))
    }

    /// Posts a query and unwraps the `data` member of the response.
    ///
    /// Partial errors are logged and otherwise ignored; the caller sees
    /// `null` for the fields they affected.
    async fn execute<D>(
        &self,
        operation: &str,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<D, AuditError>
    where
        D: DeserializeOwned + Send,
    {
        debug!(operation, %variables, "GitHub GraphQL request");
        let payload = json!({ "query": query, "variables": variables });
        let response: GqlResponse<D> = match self.client.graphql(&payload).await {
            Ok(response) => response,
            Err(error) => {
                return Err(map_octocrab_error_with_rate_limit(&self.client, operation, &error).await);
            }
        };

        for error in &response.errors {
            debug!(
                operation,
                kind = error.kind.as_deref().unwrap_or("UNKNOWN"),
                path = ?error.path,
                message = %error.message,
                "GraphQL error"
            );
        }

        if let Some(limited) = response.errors.iter().find(|error| error.is_rate_limited()) {
            let message = format!("{operation} failed: {}", limited.message);
            return Err(rate_limit_error(&self.client, message).await);
        }

        match response.data {
            Some(data) => Ok(data),
            None => Err(AuditError::Api {
                message: format!(
                    "{operation} returned no data: {}",
                    response
                        .errors
                        .iter()
                        .map(|error| error.message.as_str())
                        .collect::<Vec<_>>()
                        .join("; ")
                ),
            }),
        }
    }

    fn records<I>(&self, nodes: I) -> Vec<RepositoryRecord>
    where
        I: IntoIterator<Item = RepositoryNode>,
    {
        nodes
            .into_iter()
            .filter_map(|node| node.into_record(&self.api_base))
            .collect()
    }
}

#[async_trait]
impl RepositoryGateway for OctocrabGraphqlGateway {
    fn first_cursor(&self) -> PageCursor {
        PageCursor::first_cursor()
    }

    async fn viewer_login(&self) -> Result<String, AuditError> {
        let data: ViewerData = self
            .execute("get viewer login", queries::VIEWER_LOGIN, json!({}))
            .await?;
        Ok(data.viewer.login)
    }

    async fn list_repositories(
        &self,
        scope: &ListingScope,
        cursor: &PageCursor,
    ) -> Result<RepositoryPage, AuditError> {
        let PageCursor::After(after) = cursor else {
            return Err(AuditError::InvalidPagination {
                message: "GraphQL listings page by cursor, not by number".to_owned(),
            });
        };
        let kind = match scope {
            ListingScope::User { .. } => OwnerKind::User,
            ListingScope::Organization { .. } => OwnerKind::Organization,
        };
        let variables = json!({
            "login": scope.login(),
            "affiliations": scope.affiliation().graphql_values(),
            "cursor": after,
        });

        let data: OwnerRepositoriesData = self
            .execute("list repositories", &queries::owner_repositories(kind), variables)
            .await?;
        let Some(owner) = data.owner else {
            return Err(AuditError::AccessDenied {
                status: 404,
                message: format!("list repositories failed: {scope} could not be resolved"),
            });
        };

        let connection = owner.repositories;
        let next = connection.cursor_info().next_cursor();
        Ok(RepositoryPage {
            items: self.records(connection.into_nodes()),
            next,
        })
    }

    async fn repository(&self, reference: &RepositoryRef) -> Result<RepositoryRecord, AuditError> {
        let variables = json!({
            "owner": reference.owner().as_str(),
            "name": reference.name().as_str(),
        });
        let data: RepositoryData = self
            .execute("get repository", &queries::repository(), variables)
            .await?;

        data.repository
            .and_then(|node| node.into_record(&self.api_base))
            .ok_or_else(|| AuditError::AccessDenied {
                status: 404,
                message: format!("get repository failed: {reference} could not be resolved"),
            })
    }

    async fn search_repositories(
        &self,
        scope: &ListingScope,
        fragment: &str,
    ) -> Result<Vec<RepositoryRecord>, AuditError> {
        let query = format!(
            "{fragment} in:name {qualifier}",
            qualifier = scope.search_qualifier()
        );
        let data: SearchData = self
            .execute("search repositories", &queries::search(), json!({ "query": query }))
            .await?;

        let nodes = data.search.nodes.into_iter().flatten().filter_map(|node| match node {
            SearchNode::Repository(repository) => Some(*repository),
            SearchNode::Other(_) => None,
        });
        Ok(self.records(nodes))
    }
}
