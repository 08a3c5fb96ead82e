//! Drives an audit run: scopes, pagination, per-repository audits and
//! output.

use std::io::Write;

use tracing::{debug, info, warn};

use crate::github::error::AuditError;
use crate::github::gateway::{AuditGateway, RepositoryGateway};
use crate::github::locator::RepositoryFilter;
use crate::github::models::RepositoryRecord;
use crate::github::scope::ListingScope;

use super::auditor::RepositoryAuditor;
use super::paginator::RepositoryPaginator;
use super::render::render_report;
use super::settings::AuditSettings;


/// Counters describing a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AuditSummary {
    /// Repositories handed to the auditor.
    pub audited: usize,
    /// Repositories that produced output.
    pub reported: usize,
    /// Repositories skipped after a non-fatal error.
    pub skipped: usize,
    /// Repositories whose teams or hooks the token cannot see.
    pub out_of_scope: usize,
    /// Listing scopes the token cannot see at all.
    pub hidden_scopes: usize,
}

/// How errors from a single repository audit are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ErrorPolicy {
    /// Every error ends the run.
    Propagate,
    /// Only rate limit and decode errors end the run.
    SkipNonFatal,
}

/// Runs an audit from settings through to rendered output.
pub struct AuditRunner<'a, R, A>
where
    R: RepositoryGateway + ?Sized,
    A: AuditGateway + ?Sized,
{
    settings: &'a AuditSettings,
    repositories: &'a R,
    auditor: RepositoryAuditor<'a, A>,
}

impl<'a, R, A> AuditRunner<'a, R, A>
where
    R: RepositoryGateway + ?Sized,
    A: AuditGateway + ?Sized,
{
    /// Creates a runner listing through `repositories` and auditing through
    /// `audits`.
    #[must_use]
    pub const fn new(settings: &'a AuditSettings, repositories: &'a R, audits: &'a A) -> Self {
        Self {
            settings,
            repositories,
            auditor: RepositoryAuditor::new(audits),
        }
    }

    /// Audits every repository in scope, writing report blocks to `writer`.
    ///
    /// # Errors
    ///
    /// In single-repository mode any error is returned. In bulk mode a scope
    /// the token cannot list is skipped, while other listing errors and
    /// rate limit or decode errors end the run; remaining per-repository
    /// errors are logged and the repository is skipped. Write failures map
    /// to [`AuditError::Io`].
    pub async fn run<W: Write>(&self, writer: &mut W) -> Result<AuditSummary, AuditError> {
        let mut summary = AuditSummary::default();

        match self.settings.filter() {
            Some(RepositoryFilter::Exact(reference)) => {
                debug!(%reference, "auditing a single repository");
                let record = self.repositories.repository(reference).await?;
                self.audit_one(&record, ErrorPolicy::Propagate, writer, &mut summary)
                    .await?;
            }
            Some(RepositoryFilter::Fragment(fragment)) => {
                for scope in self.scopes().await? {
                    let records = self.matching_repositories(scope, fragment).await?;
                    for record in &records {
                        self.audit_one(record, ErrorPolicy::Propagate, writer, &mut summary)
                            .await?;
                    }
                }
            }
            None => {
                for scope in self.scopes().await? {
                    self.audit_scope(scope, writer, &mut summary).await?;
                }
            }
        }

        info!(
            audited = summary.audited,
            reported = summary.reported,
            skipped = summary.skipped,
            out_of_scope = summary.out_of_scope,
            hidden_scopes = summary.hidden_scopes,
            "audit finished"
        );
        Ok(summary)
    }

    async fn scopes(&self) -> Result<Vec<ListingScope>, AuditError> {
        let viewer = if self.settings.needs_viewer_login() {
            let login = self.repositories.viewer_login().await?;
            debug!(%login, "resolved token owner");
            Some(login)
        } else {
            None
        };
        Ok(self.settings.listing_scopes(viewer.as_deref()))
    }

    /// Repositories in `scope` whose name contains `fragment`.
    ///
    /// Search only reaches repositories owned by the searched account, so a
    /// viewer scope that includes collaborator and organisation-member
    /// affiliations walks the full listing and filters by name instead.
    async fn matching_repositories(
        &self,
        scope: ListingScope,
        fragment: &str,
    ) -> Result<Vec<RepositoryRecord>, AuditError> {
        if scope.is_searchable() {
            debug!(%scope, fragment, "searching repositories");
            return self.repositories.search_repositories(&scope, fragment).await;
        }

        debug!(%scope, fragment, "filtering the listing by name");
        let needle = fragment.to_lowercase();
        let mut paginator = RepositoryPaginator::new(self.repositories, scope);
        let mut matches = Vec::new();
        while let Some(records) = paginator.next_page().await? {
            matches.extend(records.into_iter().filter(|record| {
                record
                    .reference
                    .name()
                    .as_str()
                    .to_lowercase()
                    .contains(&needle)
            }));
        }
        Ok(matches)
    }

    /// Audits every repository listed for one scope.
    ///
    /// A scope whose first page is hidden from the token is skipped; later
    /// listing failures end the run.
    async fn audit_scope<W: Write>(
        &self,
        scope: ListingScope,
        writer: &mut W,
        summary: &mut AuditSummary,
    ) -> Result<(), AuditError> {
        let mut paginator = RepositoryPaginator::new(self.repositories, scope);
        loop {
            let records = match paginator.next_page().await {
                Ok(Some(records)) => records,
                Ok(None) => break,
                Err(error) if paginator.requests() == 0 && error.is_access_denied() => {
                    warn!(scope = %paginator.scope(), %error, "skipping scope the token cannot list");
                    summary.hidden_scopes = summary.hidden_scopes.saturating_add(1);
                    return Ok(());
                }
                Err(error) => return Err(error),
            };
            for record in &records {
                self.audit_one(record, ErrorPolicy::SkipNonFatal, writer, summary)
                    .await?;
            }
        }
        debug!(
            scope = %paginator.scope(),
            pages = paginator.requests(),
            "listing exhausted"
        );
        Ok(())
    }

    async fn audit_one<W: Write>(
        &self,
        record: &RepositoryRecord,
        policy: ErrorPolicy,
        writer: &mut W,
        summary: &mut AuditSummary,
    ) -> Result<(), AuditError> {
        summary.audited = summary.audited.saturating_add(1);

        let report = match self.auditor.audit(record).await {
            Ok(Some(report)) => report,
            Ok(None) => {
                summary.out_of_scope = summary.out_of_scope.saturating_add(1);
                return Ok(());
            }
            Err(error) if policy == ErrorPolicy::SkipNonFatal && !error.is_fatal_in_bulk() => {
                warn!(repository = %record.reference, %error, "skipping repository");
                summary.skipped = summary.skipped.saturating_add(1);
                return Ok(());
            }
            Err(error) => return Err(error),
        };

        let rendered = render_report(&report);
        if rendered.is_empty() {
            debug!(repository = %record.reference, "nothing to report");
            return Ok(());
        }

        writer
            .write_all(rendered.as_bytes())
            .and_then(|()| writer.flush())
            .map_err(|error| io_error(&error))?;
        summary.reported = summary.reported.saturating_add(1);
        Ok(())
    }
}

fn io_error(error: &std::io::Error) -> AuditError {
    AuditError::Io {
        message: error.to_string(),
    }
}
