//! Source reference error types.

use thiserror::Error;

/// Reasons a tracking-issue body does not yield a source reference.
///
/// None of these are run failures; the issue is simply not a tracking issue.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReferenceError {
    /// The body has no reference line.
    #[error("body contains no source reference line")]
    Missing,

    /// The reference line does not hold a valid URL.
    #[error("invalid source reference URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The URL does not point at an issue.
    #[error("source reference '{url}' is not an issue URL")]
    NotAnIssue { url: String },
}
