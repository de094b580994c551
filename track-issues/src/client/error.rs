//! Issue tracker client error types.

use thiserror::Error;

/// Errors returned by an [`IssueTracker`](super::IssueTracker) implementation.
#[derive(Debug, Error)]
pub enum ClientError {
    /// GitHub API error.
    #[error("GitHub API error: {0}")]
    GitHubError(#[from] octocrab::Error),

    /// The tracker refused the request.
    #[error("Request rejected: {message}")]
    Rejected { message: String },

    /// The issue does not exist in the repository.
    #[error("Issue #{number} not found in {repository}")]
    IssueNotFound { repository: String, number: u64 },
}
