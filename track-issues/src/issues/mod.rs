//! Source issues, tracking issues and the reference that links them.

mod error;
mod reference;
mod source;
mod state;
mod tracking;

pub use error::ReferenceError;
pub use reference::{parse_reference, render_reference, REFERENCE_PREFIX};
pub use source::{SourceIssue, SourceIssueId};
pub use state::IssueState;
pub use tracking::{RepositoryIssue, TrackingIssue};
