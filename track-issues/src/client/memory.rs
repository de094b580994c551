//! In-process [`IssueTracker`] holding issues in memory.
//!
//! Useful for tests and for exercising the engine without network access.
//! Listing and pagination behave like the GitHub implementation: assigned
//! issue search only returns open issues, repository listing filters by label
//! and returns both states.

use super::{ClientError, IssueTracker, NewIssue};
use crate::config::RepositoryName;
use crate::issues::{IssueState, RepositoryIssue, SourceIssue};
use crate::pagination::ListingPage;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct State {
    source_issues: Vec<SourceIssue>,
    repositories: HashMap<RepositoryName, Vec<RepositoryIssue>>,
    comments: Vec<(u64, String)>,
    failing_users: HashSet<String>,
    failing_titles: HashSet<String>,
    failing_closes: HashSet<u64>,
    requests: usize,
}

/// Issue tracker kept entirely in memory.
#[derive(Default)]
pub struct InMemoryTracker {
    state: Mutex<State>,
}

impl InMemoryTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Adds an issue that the assigned-issue search can return.
    pub fn add_source_issue(&self, issue: SourceIssue) {
        self.lock().source_issues.push(issue);
    }

    /// Adds an existing issue to a repository.
    pub fn add_repository_issue(&self, repository: &RepositoryName, issue: RepositoryIssue) {
        self.lock()
            .repositories
            .entry(repository.clone())
            .or_default()
            .push(issue);
    }

    /// Sets the state of a source issue.
    pub fn set_source_state(&self, repository: &str, number: u64, state: IssueState) {
        let mut guard = self.lock();
        for issue in guard
            .source_issues
            .iter_mut()
            .filter(|i| i.id.repository == repository && i.id.number == number)
        {
            issue.state = state;
        }
    }

    /// Replaces the assignees of a source issue.
    pub fn set_source_assignees<I, S>(&self, repository: &str, number: u64, assignees: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let assignees: Vec<String> = assignees.into_iter().map(Into::into).collect();
        let mut guard = self.lock();
        for issue in guard
            .source_issues
            .iter_mut()
            .filter(|i| i.id.repository == repository && i.id.number == number)
        {
            issue.assignees = assignees.clone();
        }
    }

    /// Makes assigned-issue searches for `user` fail.
    pub fn fail_listing_for_user(&self, user: impl Into<String>) {
        self.lock().failing_users.insert(user.into());
    }

    /// Makes creating an issue with `title` fail.
    pub fn fail_create_with_title(&self, title: impl Into<String>) {
        self.lock().failing_titles.insert(title.into());
    }

    /// Makes closing issue `number` fail.
    pub fn fail_close(&self, number: u64) {
        self.lock().failing_closes.insert(number);
    }

    /// Returns the issues currently in a repository, ordered by number.
    #[must_use]
    pub fn repository_issues(&self, repository: &RepositoryName) -> Vec<RepositoryIssue> {
        let mut issues = self
            .lock()
            .repositories
            .get(repository)
            .cloned()
            .unwrap_or_default();
        issues.sort_by_key(|i| i.number);
        issues
    }

    /// Returns posted comments as `(issue number, body)` pairs.
    #[must_use]
    pub fn comments(&self) -> Vec<(u64, String)> {
        self.lock().comments.clone()
    }

    /// Returns how many requests have been made so far.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.lock().requests
    }
}

fn page_of<T: Clone>(items: &[T], page: u32, per_page: u8) -> Vec<T> {
    let per_page = usize::from(per_page);
    let start = (page.saturating_sub(1) as usize).saturating_mul(per_page);
    items.iter().skip(start).take(per_page).cloned().collect()
}

#[async_trait]
impl IssueTracker for InMemoryTracker {
    async fn list_assigned_issues(
        &self,
        user: &str,
        organizations: &[String],
        page: u32,
        per_page: u8,
    ) -> Result<ListingPage<SourceIssue>, ClientError> {
        let mut state = self.lock();
        state.requests += 1;

        if state.failing_users.contains(user) {
            return Err(ClientError::Rejected {
                message: format!("search failed for {user}"),
            });
        }

        let matching: Vec<SourceIssue> = state
            .source_issues
            .iter()
            .filter(|issue| issue.state.is_open())
            .filter(|issue| issue.assignees.iter().any(|a| a == user))
            .filter(|issue| {
                organizations.is_empty()
                    || organizations
                        .iter()
                        .any(|org| org.eq_ignore_ascii_case(issue.owner()))
            })
            .cloned()
            .collect();

        let total = matching.len() as u64;
        Ok(ListingPage::new(page_of(&matching, page, per_page)).with_total(Some(total)))
    }

    async fn list_repository_issues(
        &self,
        repository: &RepositoryName,
        label: &str,
        page: u32,
        per_page: u8,
    ) -> Result<ListingPage<RepositoryIssue>, ClientError> {
        let mut state = self.lock();
        state.requests += 1;

        let matching: Vec<RepositoryIssue> = state
            .repositories
            .get(repository)
            .map(|issues| {
                issues
                    .iter()
                    .filter(|issue| issue.labels.iter().any(|l| l == label))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        Ok(ListingPage::new(page_of(&matching, page, per_page)))
    }

    async fn create_issue(
        &self,
        repository: &RepositoryName,
        issue: &NewIssue,
    ) -> Result<RepositoryIssue, ClientError> {
        let mut state = self.lock();
        state.requests += 1;

        if state.failing_titles.contains(&issue.title) {
            return Err(ClientError::Rejected {
                message: format!("cannot create '{}'", issue.title),
            });
        }

        let issues = state.repositories.entry(repository.clone()).or_default();
        let number = issues.iter().map(|i| i.number).max().unwrap_or(0) + 1;
        let created = RepositoryIssue {
            number,
            title: issue.title.clone(),
            state: IssueState::Open,
            body: Some(issue.body.clone()),
            url: format!("https://github.com/{repository}/issues/{number}"),
            labels: issue.labels.clone(),
            created_at: Some(Utc::now()),
        };
        issues.push(created.clone());
        Ok(created)
    }

    async fn close_issue(
        &self,
        repository: &RepositoryName,
        number: u64,
    ) -> Result<(), ClientError> {
        let mut state = self.lock();
        state.requests += 1;

        if state.failing_closes.contains(&number) {
            return Err(ClientError::Rejected {
                message: format!("cannot close #{number}"),
            });
        }

        let issue = state
            .repositories
            .get_mut(repository)
            .and_then(|issues| issues.iter_mut().find(|i| i.number == number))
            .ok_or_else(|| ClientError::IssueNotFound {
                repository: repository.full_name(),
                number,
            })?;
        issue.state = IssueState::Closed;
        Ok(())
    }

    async fn comment_on_issue(
        &self,
        repository: &RepositoryName,
        number: u64,
        body: &str,
    ) -> Result<(), ClientError> {
        let mut state = self.lock();
        state.requests += 1;

        let exists = state
            .repositories
            .get(repository)
            .is_some_and(|issues| issues.iter().any(|i| i.number == number));
        if !exists {
            return Err(ClientError::IssueNotFound {
                repository: repository.full_name(),
                number,
            });
        }

        state.comments.push((number, body.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker_repo() -> RepositoryName {
        RepositoryName::new("me", "tracker")
    }

    #[tokio::test]
    async fn pages_assigned_issues() {
        let tracker = InMemoryTracker::new();
        for number in 1..=5 {
            tracker.add_source_issue(
                SourceIssue::new("acme/widgets", number, "t", IssueState::Open)
                    .with_assignees(["alice"]),
            );
        }

        let first = tracker
            .list_assigned_issues("alice", &[], 1, 2)
            .await
            .unwrap();
        let last = tracker
            .list_assigned_issues("alice", &[], 3, 2)
            .await
            .unwrap();
        let past_end = tracker
            .list_assigned_issues("alice", &[], 4, 2)
            .await
            .unwrap();

        assert_eq!(first.items.len(), 2);
        assert_eq!(first.total, Some(5));
        assert_eq!(last.items.len(), 1);
        assert!(past_end.items.is_empty());
        assert_eq!(tracker.request_count(), 3);
    }

    #[tokio::test]
    async fn filters_by_assignee_org_and_state() {
        let tracker = InMemoryTracker::new();
        tracker.add_source_issue(
            SourceIssue::new("acme/widgets", 1, "t", IssueState::Open).with_assignees(["alice"]),
        );
        tracker.add_source_issue(
            SourceIssue::new("other/thing", 2, "t", IssueState::Open).with_assignees(["alice"]),
        );
        tracker.add_source_issue(
            SourceIssue::new("acme/widgets", 3, "t", IssueState::Closed)
                .with_assignees(["alice"]),
        );
        tracker.add_source_issue(
            SourceIssue::new("acme/widgets", 4, "t", IssueState::Open).with_assignees(["bob"]),
        );

        let orgs = vec!["ACME".to_string()];
        let issues = tracker
            .list_assigned_issues("alice", &orgs, 1, 100)
            .await
            .unwrap();

        assert_eq!(issues.items.len(), 1);
        assert_eq!(issues.items[0].id.number, 1);
    }

    #[tokio::test]
    async fn creates_and_closes_issues() {
        let tracker = InMemoryTracker::new();
        let repo = tracker_repo();
        let created = tracker
            .create_issue(
                &repo,
                &NewIssue {
                    title: "one".to_string(),
                    body: "body".to_string(),
                    labels: vec!["tracked-issue".to_string()],
                },
            )
            .await
            .unwrap();
        assert_eq!(created.number, 1);

        tracker.close_issue(&repo, 1).await.unwrap();
        assert_eq!(tracker.repository_issues(&repo)[0].state, IssueState::Closed);

        assert!(matches!(
            tracker.close_issue(&repo, 9).await,
            Err(ClientError::IssueNotFound { number: 9, .. })
        ));
    }

    #[tokio::test]
    async fn lists_only_labelled_issues() {
        let tracker = InMemoryTracker::new();
        let repo = tracker_repo();
        for (number, label) in [(1, "tracked-issue"), (2, "bug")] {
            tracker.add_repository_issue(
                &repo,
                RepositoryIssue {
                    number,
                    title: "t".to_string(),
                    state: IssueState::Closed,
                    body: None,
                    url: String::new(),
                    labels: vec![label.to_string()],
                    created_at: None,
                },
            );
        }

        let issues = tracker
            .list_repository_issues(&repo, "tracked-issue", 1, 100)
            .await
            .unwrap();
        assert_eq!(issues.fetched, 1);
        assert_eq!(issues.items[0].number, 1);
    }
}
