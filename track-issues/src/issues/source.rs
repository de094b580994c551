//! Source issues and their identity.

use super::IssueState;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Stable identity of a source issue: repository full name plus issue number.
///
/// GitHub owner and repository names are case-insensitive, so identities
/// compare and hash the repository ignoring ASCII case. The original casing
/// is kept for display.
#[derive(Debug, Clone, Serialize)]
pub struct SourceIssueId {
    /// Repository full name in "owner/name" format.
    pub repository: String,

    /// Issue number within the repository.
    pub number: u64,
}

impl SourceIssueId {
    /// Creates an identity from a repository full name and issue number.
    pub fn new(repository: impl Into<String>, number: u64) -> Self {
        Self {
            repository: repository.into(),
            number,
        }
    }
}

impl PartialEq for SourceIssueId {
    fn eq(&self, other: &Self) -> bool {
        self.number == other.number && self.repository.eq_ignore_ascii_case(&other.repository)
    }
}

impl Eq for SourceIssueId {}

impl Hash for SourceIssueId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for byte in self.repository.bytes() {
            state.write_u8(byte.to_ascii_lowercase());
        }
        state.write_u8(0xff);
        self.number.hash(state);
    }
}

impl fmt::Display for SourceIssueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.repository, self.number)
    }
}

/// An issue in an external repository assigned to one of the tracked users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceIssue {
    /// Repository and number.
    pub id: SourceIssueId,

    /// Issue title.
    pub title: String,

    /// Browser URL of the issue.
    pub url: String,

    /// Current state.
    pub state: IssueState,

    /// Logins of the assignees.
    pub assignees: Vec<String>,

    /// Issue body, if any.
    pub body: Option<String>,

    /// When the issue was opened.
    pub created_at: Option<DateTime<Utc>>,

    /// When the issue was last updated.
    pub updated_at: Option<DateTime<Utc>>,
}

impl SourceIssue {
    /// Creates a source issue hosted on github.com with no body or timestamps.
    pub fn new(
        repository: impl Into<String>,
        number: u64,
        title: impl Into<String>,
        state: IssueState,
    ) -> Self {
        let id = SourceIssueId::new(repository, number);
        let url = format!("https://github.com/{}/issues/{}", id.repository, id.number);
        Self {
            id,
            title: title.into(),
            url,
            state,
            assignees: Vec::new(),
            body: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Sets the assignee list.
    #[must_use]
    pub fn with_assignees<I, S>(mut self, assignees: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.assignees = assignees.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the owner part of the repository full name.
    #[must_use]
    pub fn owner(&self) -> &str {
        self.id
            .repository
            .split_once('/')
            .map_or(self.id.repository.as_str(), |(owner, _)| owner)
    }
}
