//! The issue-tracker capability the engine reads from and writes to.
//!
//! The engine never reaches for the GitHub API directly; it is handed an
//! [`IssueTracker`] and works through it. [`GitHubTracker`] talks to GitHub
//! via octocrab, [`InMemoryTracker`] keeps everything in process.

mod error;
mod github;
mod memory;

pub use error::ClientError;
pub use github::GitHubTracker;
pub use memory::InMemoryTracker;

use crate::config::RepositoryName;
use crate::issues::{RepositoryIssue, SourceIssue};
use crate::pagination::ListingPage;
use async_trait::async_trait;

/// A new issue to open in the tracking repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIssue {
    /// Issue title.
    pub title: String,

    /// Issue body.
    pub body: String,

    /// Labels to attach.
    pub labels: Vec<String>,
}

/// Read/write access to the issue tracker.
///
/// Pages are 1-based. A page whose `fetched` count is below `per_page` marks
/// the end of data, so rows dropped client-side must still be counted there.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Lists open issues assigned to `user`, restricted to `organizations`
    /// when non-empty.
    async fn list_assigned_issues(
        &self,
        user: &str,
        organizations: &[String],
        page: u32,
        per_page: u8,
    ) -> Result<ListingPage<SourceIssue>, ClientError>;

    /// Lists issues in `repository` carrying `label`, open and closed.
    async fn list_repository_issues(
        &self,
        repository: &RepositoryName,
        label: &str,
        page: u32,
        per_page: u8,
    ) -> Result<ListingPage<RepositoryIssue>, ClientError>;

    /// Opens a new issue.
    async fn create_issue(
        &self,
        repository: &RepositoryName,
        issue: &NewIssue,
    ) -> Result<RepositoryIssue, ClientError>;

    /// Closes an issue.
    async fn close_issue(&self, repository: &RepositoryName, number: u64)
        -> Result<(), ClientError>;

    /// Posts a comment on an issue.
    async fn comment_on_issue(
        &self,
        repository: &RepositoryName,
        number: u64,
        body: &str,
    ) -> Result<(), ClientError>;
}
