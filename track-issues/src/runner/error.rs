//! Runner error types.

use crate::client::ClientError;
use crate::config::ConfigError;
use crate::templates::TemplateError;

/// Errors that abort a run before any change is made.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Configuration and scope errors.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// GitHub API client initialization errors.
    #[error(transparent)]
    Octocrab(#[from] octocrab::Error),

    /// Invalid title format or body template.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// Listing assigned issues failed.
    #[error("Failed to enumerate assigned issues: {0}")]
    Enumerate(#[source] ClientError),

    /// Listing the tracking repository failed.
    #[error("Failed to read tracking issues: {0}")]
    Index(#[source] ClientError),
}
