//! Lazy page-by-page enumeration of a listing scope.

use tracing::debug;

use crate::github::error::AuditError;
use crate::github::gateway::RepositoryGateway;
use crate::github::models::RepositoryRecord;
use crate::github::pagination::PageCursor;
use crate::github::scope::ListingScope;

/// Walks a listing scope one page at a time until the gateway reports no
/// further pages.
///
/// The cursor only advances after a page was fetched successfully, so a
/// failed request can be retried by calling [`Self::next_page`] again.
pub struct RepositoryPaginator<'a, G: RepositoryGateway + ?Sized> {
    gateway: &'a G,
    scope: ListingScope,
    cursor: Option<PageCursor>,
    requests: usize,
}

impl<'a, G: RepositoryGateway + ?Sized> RepositoryPaginator<'a, G> {
    /// Starts a listing at the gateway's first page.
    #[must_use]
    pub fn new(gateway: &'a G, scope: ListingScope) -> Self {
        let cursor = Some(gateway.first_cursor());
        Self {
            gateway,
            scope,
            cursor,
            requests: 0,
        }
    }

    /// Scope being listed.
    #[must_use]
    pub const fn scope(&self) -> &ListingScope {
        &self.scope
    }

    /// Number of successful page requests so far.
    #[must_use]
    pub const fn requests(&self) -> usize {
        self.requests
    }

    /// Fetches the next page, or `None` once the listing is exhausted.
    ///
    /// # Errors
    ///
    /// Propagates any gateway error; the cursor stays on the failed page.
    pub async fn next_page(&mut self) -> Result<Option<Vec<RepositoryRecord>>, AuditError> {
        let Some(cursor) = self.cursor.as_ref() else {
            return Ok(None);
        };

        debug!(scope = %self.scope, ?cursor, "listing repositories");
        let page = self.gateway.list_repositories(&self.scope, cursor).await?;
        self.requests = self.requests.saturating_add(1);
        self.cursor = page.next;
        Ok(Some(page.items))
    }
}
