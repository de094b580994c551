//! Issues living in the tracking repository.

use super::{IssueState, SourceIssueId};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// An issue as listed from (or created in) the tracking repository.
///
/// Not every repository issue is a tracking issue; the body decides.
#[derive(Debug, Clone, Serialize)]
pub struct RepositoryIssue {
    /// Issue number in the tracking repository.
    pub number: u64,

    /// Issue title.
    pub title: String,

    /// Current state.
    pub state: IssueState,

    /// Issue body, if any.
    pub body: Option<String>,

    /// Browser URL of the issue.
    pub url: String,

    /// Label names.
    pub labels: Vec<String>,

    /// When the issue was created.
    pub created_at: Option<DateTime<Utc>>,
}

/// A tracking issue whose body references the source issue it mirrors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackingIssue {
    /// Issue number in the tracking repository.
    pub number: u64,

    /// Current state.
    pub state: IssueState,

    /// Identity of the tracked source issue.
    pub source: SourceIssueId,

    /// When the tracking issue was created.
    pub created_at: Option<DateTime<Utc>>,
}

impl TrackingIssue {
    /// Parses a repository issue into a tracking issue.
    ///
    /// Returns `None` when the body carries no source reference, which means
    /// the issue is not a tracking issue.
    #[must_use]
    pub fn from_repository_issue(issue: &RepositoryIssue) -> Option<Self> {
        let source = super::parse_reference(issue.body.as_deref()?).ok()?;
        Some(Self {
            number: issue.number,
            state: issue.state,
            source,
            created_at: issue.created_at,
        })
    }

    /// Returns true when the tracking issue is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repository_issue(number: u64, body: Option<&str>) -> RepositoryIssue {
        RepositoryIssue {
            number,
            title: "title".to_string(),
            state: IssueState::Open,
            body: body.map(str::to_string),
            url: format!("https://github.com/me/tracker/issues/{number}"),
            labels: vec!["tracked-issue".to_string()],
            created_at: None,
        }
    }

    #[test]
    fn parses_tracking_issue() {
        let issue = repository_issue(
            5,
            Some("**Original Issue:** https://github.com/acme/widgets/issues/1\n\nbody"),
        );
        let tracking = TrackingIssue::from_repository_issue(&issue).unwrap();
        assert_eq!(tracking.number, 5);
        assert_eq!(tracking.source, SourceIssueId::new("acme/widgets", 1));
        assert!(tracking.is_open());
    }

    #[test]
    fn ignores_issue_without_reference() {
        assert!(TrackingIssue::from_repository_issue(&repository_issue(1, None)).is_none());
        assert!(
            TrackingIssue::from_repository_issue(&repository_issue(2, Some("just a note")))
                .is_none()
        );
    }
}
