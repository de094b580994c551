//! Source enumeration: every open issue assigned to a user in scope.

use crate::client::{ClientError, IssueTracker};
use crate::config::{RepositoryName, Scope};
use crate::issues::SourceIssue;
use crate::pagination::{collect_pages, PaginationExhausted};
use std::collections::HashSet;
use tracing::{debug, info, info_span, Instrument};

/// Source issues found for a scope.
#[derive(Debug, Clone, Default)]
pub struct SourceEnumeration {
    /// Unique source issues in discovery order.
    pub issues: Vec<SourceIssue>,

    /// One entry per user whose listing hit the page limit.
    pub warnings: Vec<PaginationExhausted>,
}

/// Lists the issues assigned to every user in `scope`.
///
/// Users are queried in order. Results are de-duplicated by identity (an issue
/// assigned to two tracked users appears once), restricted to the scope's
/// organizations when any are set, and issues living in the tracking
/// repository itself are dropped.
///
/// # Errors
///
/// Returns [`ClientError`] if a listing request fails. Reaching the page
/// limit is not an error; it is reported in
/// [`SourceEnumeration::warnings`].
pub async fn enumerate_source_issues<C>(
    client: &C,
    scope: &Scope,
    tracking_repository: &RepositoryName,
) -> Result<SourceEnumeration, ClientError>
where
    C: IssueTracker + ?Sized,
{
    let span = info_span!("enumerate_sources", users = scope.users().len());

    async {
        let tracking_full_name = tracking_repository.full_name();
        let mut seen = HashSet::new();
        let mut enumeration = SourceEnumeration::default();

        for user in scope.users() {
            info!(user = %user, "Fetching assigned issues");

            let listing = format!("assigned issues for {user}");
            let page = collect_pages(&listing, scope.per_page(), scope.page_limit(), |page| {
                client.list_assigned_issues(user, scope.organizations(), page, scope.per_page())
            })
            .await?;

            debug!(user = %user, count = page.items.len(), "Fetched assigned issues");
            enumeration.warnings.extend(page.exhausted);

            for issue in page.items {
                if !in_organizations(&issue, scope.organizations()) {
                    continue;
                }
                if issue.id.repository.eq_ignore_ascii_case(&tracking_full_name) {
                    debug!(issue = %issue.id, "Skipping issue in tracking repository");
                    continue;
                }
                if seen.insert(issue.id.clone()) {
                    enumeration.issues.push(issue);
                }
            }
        }

        info!(count = enumeration.issues.len(), "Source enumeration complete");
        Ok(enumeration)
    }
    .instrument(span)
    .await
}

fn in_organizations(issue: &SourceIssue, organizations: &[String]) -> bool {
    organizations.is_empty()
        || organizations
            .iter()
            .any(|org| org.eq_ignore_ascii_case(issue.owner()))
}
