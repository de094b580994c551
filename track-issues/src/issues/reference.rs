//! The source reference embedded in every tracking-issue body.
//!
//! This line is the only durable link between a tracking issue and its
//! source, so its format must stay stable across releases:
//!
//! ```text
//! **Original Issue:** https://github.com/<owner>/<repo>/issues/<number>
//! ```

use super::{ReferenceError, SourceIssue, SourceIssueId};
use url::Url;

/// Marker that starts the reference line.
pub const REFERENCE_PREFIX: &str = "**Original Issue:**";

/// Renders the reference line for a source issue.
#[must_use]
pub fn render_reference(issue: &SourceIssue) -> String {
    format!("{REFERENCE_PREFIX} {}", issue.url)
}

/// Extracts the source issue identity from a tracking-issue body.
///
/// The first reference line wins. The host is not checked, so GitHub
/// Enterprise URLs parse the same way as github.com ones.
///
/// # Errors
///
/// Returns [`ReferenceError`] when the body does not carry a usable reference.
pub fn parse_reference(body: &str) -> Result<SourceIssueId, ReferenceError> {
    let raw = body
        .lines()
        .find_map(|line| line.trim().strip_prefix(REFERENCE_PREFIX))
        .and_then(|rest| {
            rest.split(|c: char| c.is_whitespace() || c == ')')
                .find(|token| !token.is_empty())
        })
        .ok_or(ReferenceError::Missing)?;

    let url = Url::parse(raw).map_err(|source| ReferenceError::InvalidUrl {
        url: raw.to_string(),
        source,
    })?;

    let not_an_issue = || ReferenceError::NotAnIssue {
        url: raw.to_string(),
    };
    let segments: Vec<&str> = url
        .path_segments()
        .ok_or_else(not_an_issue)?
        .filter(|segment| !segment.is_empty())
        .collect();

    match segments.as_slice() {
        [owner, repo, "issues", number] => {
            let number: u64 = number.parse().map_err(|_| not_an_issue())?;
            if number == 0 {
                return Err(not_an_issue());
            }
            Ok(SourceIssueId::new(format!("{owner}/{repo}"), number))
        }
        _ => Err(not_an_issue()),
    }
}
