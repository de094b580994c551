//! [`IssueTracker`] backed by the GitHub REST API.

use super::{ClientError, IssueTracker, NewIssue};
use crate::config::RepositoryName;
use crate::issues::{IssueState, RepositoryIssue, SourceIssue, SourceIssueId};
use crate::pagination::ListingPage;
use crate::rate_limit::{ensure_rate_limit, RateLimitResource};
use async_trait::async_trait;
use octocrab::models::issues::Issue;
use octocrab::{models, params, Octocrab};
use tracing::debug;
use url::Url;

/// GitHub client used for live runs.
#[derive(Clone)]
pub struct GitHubTracker {
    octocrab: Octocrab,
}

impl GitHubTracker {
    /// Builds a client authenticated with a personal access token.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client can't be constructed.
    pub fn new(token: impl Into<String>) -> Result<Self, octocrab::Error> {
        let octocrab = Octocrab::builder().personal_token(token.into()).build()?;
        Ok(Self { octocrab })
    }
}

#[async_trait]
impl IssueTracker for GitHubTracker {
    async fn list_assigned_issues(
        &self,
        user: &str,
        organizations: &[String],
        page: u32,
        per_page: u8,
    ) -> Result<ListingPage<SourceIssue>, ClientError> {
        let query = build_assigned_query(user, organizations);
        debug!(query = %query, page, "Searching assigned issues");

        ensure_rate_limit(&self.octocrab, RateLimitResource::Search).await?;
        let results = self
            .octocrab
            .search()
            .issues_and_pull_requests(&query)
            .sort("updated")
            .order("desc")
            .per_page(per_page)
            .page(page)
            .send()
            .await?;

        let issues = results.items.iter().filter_map(to_source_issue).collect();
        Ok(ListingPage::filtered(results.items.len(), issues).with_total(results.total_count))
    }

    async fn list_repository_issues(
        &self,
        repository: &RepositoryName,
        label: &str,
        page: u32,
        per_page: u8,
    ) -> Result<ListingPage<RepositoryIssue>, ClientError> {
        debug!(repo = %repository, label, page, "Listing repository issues");

        ensure_rate_limit(&self.octocrab, RateLimitResource::Core).await?;
        let labels = [label.to_string()];
        let results = self
            .octocrab
            .issues(&repository.owner, &repository.name)
            .list()
            .state(params::State::All)
            .labels(&labels)
            .per_page(per_page)
            .page(page)
            .send()
            .await?;

        let issues = results
            .items
            .iter()
            .filter(|issue| issue.pull_request.is_none())
            .map(to_repository_issue)
            .collect();
        Ok(ListingPage::filtered(results.items.len(), issues))
    }

    async fn create_issue(
        &self,
        repository: &RepositoryName,
        issue: &NewIssue,
    ) -> Result<RepositoryIssue, ClientError> {
        ensure_rate_limit(&self.octocrab, RateLimitResource::Core).await?;
        let created = self
            .octocrab
            .issues(&repository.owner, &repository.name)
            .create(&issue.title)
            .body(&issue.body)
            .labels(issue.labels.clone())
            .send()
            .await?;

        Ok(to_repository_issue(&created))
    }

    async fn close_issue(
        &self,
        repository: &RepositoryName,
        number: u64,
    ) -> Result<(), ClientError> {
        ensure_rate_limit(&self.octocrab, RateLimitResource::Core).await?;
        self.octocrab
            .issues(&repository.owner, &repository.name)
            .update(number)
            .state(models::IssueState::Closed)
            .send()
            .await?;
        Ok(())
    }

    async fn comment_on_issue(
        &self,
        repository: &RepositoryName,
        number: u64,
        body: &str,
    ) -> Result<(), ClientError> {
        ensure_rate_limit(&self.octocrab, RateLimitResource::Core).await?;
        self.octocrab
            .issues(&repository.owner, &repository.name)
            .create_comment(number, body)
            .await?;
        Ok(())
    }
}

/// Builds the issue search query for one user.
///
/// Format: `is:issue is:open assignee:{user} [org:{org} ...]`
fn build_assigned_query(user: &str, organizations: &[String]) -> String {
    let mut query = format!("is:issue is:open assignee:{user}");
    for org in organizations {
        query.push_str(" org:");
        query.push_str(org);
    }
    query
}

/// Extracts "owner/name" from an API repository URL such as
/// `https://api.github.com/repos/owner/name`.
fn repository_from_api_url(url: &Url) -> Option<String> {
    let mut segments = url.path_segments()?.skip_while(|segment| *segment != "repos");
    segments.next()?;
    let owner = segments.next().filter(|s| !s.is_empty())?;
    let name = segments.next().filter(|s| !s.is_empty())?;
    Some(format!("{owner}/{name}"))
}

fn to_state(state: &models::IssueState) -> IssueState {
    match state {
        models::IssueState::Open => IssueState::Open,
        _ => IssueState::Closed,
    }
}

fn to_source_issue(issue: &Issue) -> Option<SourceIssue> {
    if issue.pull_request.is_some() {
        return None;
    }
    let repository = repository_from_api_url(&issue.repository_url)?;

    Some(SourceIssue {
        id: SourceIssueId::new(repository, issue.number),
        title: issue.title.clone(),
        url: issue.html_url.to_string(),
        state: to_state(&issue.state),
        assignees: issue.assignees.iter().map(|a| a.login.clone()).collect(),
        body: issue.body.clone(),
        created_at: Some(issue.created_at),
        updated_at: Some(issue.updated_at),
    })
}

fn to_repository_issue(issue: &Issue) -> RepositoryIssue {
    RepositoryIssue {
        number: issue.number,
        title: issue.title.clone(),
        state: to_state(&issue.state),
        body: issue.body.clone(),
        url: issue.html_url.to_string(),
        labels: issue.labels.iter().map(|l| l.name.clone()).collect(),
        created_at: Some(issue.created_at),
    }
}
