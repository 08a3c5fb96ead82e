//! REST gateway: offset-paginated listings and per-repository sub-resources.

use async_trait::async_trait;
use octocrab::{Octocrab, Page};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::github::error::AuditError;
use crate::github::locator::{PersonalAccessToken, RepositoryOwner, RepositoryRef};
use crate::github::models::{
    ApiBranch, ApiCollaborator, ApiDeployKey, ApiHook, ApiMembership, ApiRepository,
    ApiSearchResults, ApiTeam, ApiUser, Branch, Collaborator, DeployKey, MembershipState,
    MergeStrategies, RepositoryPage, RepositoryRecord, Team, Webhook,
};
use crate::github::pagination::{PageCursor, PageInfo};
use crate::github::scope::ListingScope;

use super::client::build_octocrab_client;
use super::error_mapping::map_octocrab_error_with_rate_limit;
use super::{AuditGateway, RepositoryGateway};


/// Largest page size GitHub accepts.
const PER_PAGE: u8 = 100;

/// Octocrab-backed REST gateway.
#[derive(Clone)]
pub struct OctocrabRestGateway {
    client: Octocrab,
}

impl OctocrabRestGateway {
    /// Creates a new gateway from an Octocrab client.
    #[must_use]
    pub const fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Builds an Octocrab client for the given token and API base.
    ///
    /// # Errors
    ///
    /// Returns `AuditError::InvalidUrl` when the base URI cannot be parsed or
    /// `AuditError::Api` when Octocrab fails to construct a client.
    pub fn for_token(token: &PersonalAccessToken, api_base: &Url) -> Result<Self, AuditError> {
        let octocrab = build_octocrab_client(token, api_base)?;
        Ok(Self::new(octocrab))
    }

    async fn get_one<T>(&self, operation: &str, route: &str) -> Result<T, AuditError>
    where
        T: DeserializeOwned + Send,
    {
        debug!(operation, route, "GitHub REST request");
        match self.client.get::<T, _, _>(route, None::<&()>).await {
            Ok(value) => Ok(value),
            Err(error) => Err(self.map_error(operation, &error).await),
        }
    }

    async fn get_page<T>(
        &self,
        operation: &str,
        route: &str,
        params: &[(&str, &str)],
    ) -> Result<Page<T>, AuditError>
    where
        T: DeserializeOwned + Send,
    {
        debug!(operation, route, ?params, "GitHub REST request");
        match self.client.get::<Page<T>, _, _>(route, Some(params)).await {
            Ok(page) => Ok(page),
            Err(error) => Err(self.map_error(operation, &error).await),
        }
    }

    /// Fetches every page of a sub-resource listing.
    async fn get_all<T>(&self, operation: &str, route: &str) -> Result<Vec<T>, AuditError>
    where
        T: DeserializeOwned + Send,
    {
        let per_page = PER_PAGE.to_string();
        let first = self
            .get_page::<T>(operation, route, &[("per_page", per_page.as_str())])
            .await?;
        match self.client.all_pages(first).await {
            Ok(items) => Ok(items),
            Err(error) => Err(self.map_error(operation, &error).await),
        }
    }

    async fn map_error(&self, operation: &str, error: &octocrab::Error) -> AuditError {
        map_octocrab_error_with_rate_limit(&self.client, operation, error).await
    }
}

fn records_from(items: Vec<ApiRepository>) -> Vec<RepositoryRecord> {
    items
        .into_iter()
        .filter_map(ApiRepository::into_record)
        .collect()
}

#[async_trait]
impl RepositoryGateway for OctocrabRestGateway {
    fn first_cursor(&self) -> PageCursor {
        PageCursor::first_page()
    }

    async fn viewer_login(&self) -> Result<String, AuditError> {
        let user: ApiUser = self.get_one("get authenticated user", "/user").await?;
        Ok(user.login)
    }

    async fn list_repositories(
        &self,
        scope: &ListingScope,
        cursor: &PageCursor,
    ) -> Result<RepositoryPage, AuditError> {
        let &PageCursor::Page(page) = cursor else {
            return Err(AuditError::InvalidPagination {
                message: "REST listings page by number, not by cursor".to_owned(),
            });
        };
        if page == 0 {
            return Err(AuditError::InvalidPagination {
                message: "page must be at least 1".to_owned(),
            });
        }

        let page_str = page.to_string();
        let per_page_str = PER_PAGE.to_string();
        let (route, filter) = match scope {
            ListingScope::User { affiliation, .. } => {
                ("/user/repos".to_owned(), ("affiliation", affiliation.rest_value()))
            }
            ListingScope::Organization { login, .. } => {
                (format!("/orgs/{login}/repos"), ("type", "all"))
            }
        };
        let params = [
            filter,
            ("page", page_str.as_str()),
            ("per_page", per_page_str.as_str()),
        ];

        let page_result = self
            .get_page::<ApiRepository>("list repositories", &route, &params)
            .await?;

        // Extract pagination info before consuming items.
        let page_info = PageInfo::builder(page)
            .total_pages(page_result.number_of_pages())
            .has_next(page_result.next.is_some())
            .build();

        Ok(RepositoryPage {
            items: records_from(page_result.items),
            next: page_info.next_cursor(),
        })
    }

    async fn repository(&self, reference: &RepositoryRef) -> Result<RepositoryRecord, AuditError> {
        let repository: ApiRepository = self
            .get_one("get repository", &reference.repository_path())
            .await?;
        repository
            .into_record()
            .ok_or_else(|| AuditError::Decode {
                message: format!("get repository {reference}: owner or name is empty"),
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
        let per_page_str = PER_PAGE.to_string();
        let params = [("q", query.as_str()), ("per_page", per_page_str.as_str())];

        debug!(query = %query, "GitHub REST search");
        let results = match self
            .client
            .get::<ApiSearchResults, _, _>("/search/repositories", Some(&params))
            .await
        {
            Ok(results) => results,
            Err(error) => return Err(self.map_error("search repositories", &error).await),
        };

        Ok(records_from(results.items))
    }
}

#[async_trait]
impl AuditGateway for OctocrabRestGateway {
    async fn teams(&self, repository: &RepositoryRef) -> Result<Vec<Team>, AuditError> {
        let route = format!("{}/teams", repository.repository_path());
        let teams: Vec<ApiTeam> = self.get_all("list teams", &route).await?;
        Ok(teams.into_iter().map(Team::from).collect())
    }

    async fn team_membership(
        &self,
        organisation: &RepositoryOwner,
        team: &Team,
        login: &str,
    ) -> Result<MembershipState, AuditError> {
        let route = format!(
            "/orgs/{org}/teams/{slug}/memberships/{login}",
            org = organisation.as_str(),
            slug = team.slug
        );
        let membership: ApiMembership = self.get_one("get team membership", &route).await?;
        Ok(MembershipState::from_state(membership.state.as_deref()))
    }

    async fn hooks(&self, repository: &RepositoryRef) -> Result<Vec<Webhook>, AuditError> {
        let route = format!("{}/hooks", repository.repository_path());
        let hooks: Vec<ApiHook> = self.get_all("list hooks", &route).await?;
        Ok(hooks.into_iter().map(Webhook::from).collect())
    }

    async fn collaborators(
        &self,
        repository: &RepositoryRef,
    ) -> Result<Vec<Collaborator>, AuditError> {
        let route = format!("{}/collaborators", repository.repository_path());
        let collaborators: Vec<ApiCollaborator> =
            self.get_all("list collaborators", &route).await?;
        Ok(collaborators
            .into_iter()
            .filter_map(ApiCollaborator::into_collaborator)
            .collect())
    }

    async fn deploy_keys(&self, repository: &RepositoryRef) -> Result<Vec<DeployKey>, AuditError> {
        let route = format!("{}/keys", repository.repository_path());
        let keys: Vec<ApiDeployKey> = self.get_all("list deploy keys", &route).await?;
        Ok(keys.into_iter().map(DeployKey::from).collect())
    }

    async fn merge_strategies(
        &self,
        repository: &RepositoryRef,
    ) -> Result<MergeStrategies, AuditError> {
        let full: ApiRepository = self
            .get_one("get repository", &repository.repository_path())
            .await?;
        Ok(full.merge_strategies().unwrap_or_default())
    }

    async fn branches(&self, repository: &RepositoryRef) -> Result<Vec<Branch>, AuditError> {
        let route = format!("{}/branches", repository.repository_path());
        let branches: Vec<ApiBranch> = self.get_all("list branches", &route).await?;
        Ok(branches.into_iter().map(Branch::from).collect())
    }

    async fn branch_protected(
        &self,
        repository: &RepositoryRef,
        branch: &str,
    ) -> Result<bool, AuditError> {
        let route = format!(
            "{path}/branches/{branch}/protection",
            path = repository.repository_path(),
            branch = urlencoding::encode(branch)
        );
        self.get_one::<serde_json::Value>("get branch protection", &route)
            .await
            .map(|_| true)
    }
}
