//! The tracking index: which tracking issues exist for which source issue.

use crate::client::{ClientError, IssueTracker};
use crate::config::{RepositoryName, Scope};
use crate::issues::{SourceIssueId, TrackingIssue};
use crate::pagination::{collect_pages, PaginationExhausted};
use std::collections::HashMap;
use tracing::{debug, info, info_span, Instrument};

/// Tracking issues keyed by the source issue they reference.
///
/// A source may map to several tracking issues: closed ones from earlier
/// rounds and, normally, at most one open one.
#[derive(Debug, Clone, Default)]
pub struct TrackingIndex {
    issues: Vec<TrackingIssue>,
    by_source: HashMap<SourceIssueId, Vec<usize>>,
}

impl TrackingIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a tracking issue.
    pub fn insert(&mut self, issue: TrackingIssue) {
        self.by_source
            .entry(issue.source.clone())
            .or_default()
            .push(self.issues.len());
        self.issues.push(issue);
    }

    /// Number of tracking issues in the index.
    #[must_use]
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Returns true if the index holds no tracking issues.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// All tracking issues in listing order.
    pub fn iter(&self) -> impl Iterator<Item = &TrackingIssue> {
        self.issues.iter()
    }

    /// Tracking issues referencing `source`, in listing order.
    pub fn trackers_for<'a>(
        &'a self,
        source: &SourceIssueId,
    ) -> impl Iterator<Item = &'a TrackingIssue> + 'a {
        self.by_source
            .get(source)
            .into_iter()
            .flatten()
            .map(|&position| &self.issues[position])
    }

    /// The open tracker kept for `source`: the lowest-numbered open one.
    #[must_use]
    pub fn primary_open_tracker(&self, source: &SourceIssueId) -> Option<&TrackingIssue> {
        self.trackers_for(source)
            .filter(|issue| issue.is_open())
            .min_by_key(|issue| issue.number)
    }
}

impl FromIterator<TrackingIssue> for TrackingIndex {
    fn from_iter<I: IntoIterator<Item = TrackingIssue>>(iter: I) -> Self {
        let mut index = Self::new();
        for issue in iter {
            index.insert(issue);
        }
        index
    }
}

/// Result of reading the tracking repository.
#[derive(Debug, Clone, Default)]
pub struct IndexBuild {
    /// The index.
    pub index: TrackingIndex,

    /// Labelled issues whose body carried no source reference.
    pub ignored: usize,

    /// Set when the listing hit the page limit. An incomplete index can lead
    /// to duplicate tracking issues being created.
    pub warning: Option<PaginationExhausted>,
}

/// Reads every issue labelled `label` in the tracking repository, open and
/// closed, and indexes those that reference a source issue.
///
/// # Errors
///
/// Returns [`ClientError`] if a listing request fails.
pub async fn build_tracking_index<C>(
    client: &C,
    repository: &RepositoryName,
    label: &str,
    scope: &Scope,
) -> Result<IndexBuild, ClientError>
where
    C: IssueTracker + ?Sized,
{
    let span = info_span!("build_index", repo = %repository, label);

    async {
        let listing = format!("tracking issues in {repository}");
        let page = collect_pages(&listing, scope.per_page(), scope.page_limit(), |page| {
            client.list_repository_issues(repository, label, page, scope.per_page())
        })
        .await?;

        let mut build = IndexBuild {
            warning: page.exhausted,
            ..IndexBuild::default()
        };

        for issue in &page.items {
            match TrackingIssue::from_repository_issue(issue) {
                Some(tracking) => build.index.insert(tracking),
                None => {
                    debug!(issue_number = issue.number, "No source reference, ignoring");
                    build.ignored += 1;
                }
            }
        }

        info!(
            count = build.index.len(),
            ignored = build.ignored,
            "Tracking index built"
        );
        Ok(build)
    }
    .instrument(span)
    .await
}
