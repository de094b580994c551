#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod client;
pub mod config;
pub mod enumerator;
pub mod executor;
pub mod index;
pub mod issues;
pub mod pagination;
pub mod rate_limit;
pub mod reconcile;
pub mod runner;
pub mod summary;
pub mod templates;

pub use client::{ClientError, GitHubTracker, InMemoryTracker, IssueTracker, NewIssue};
pub use config::{
    parse_comma_list, ConfigError, RepositoryName, Scope, ScopeError, TrackerConfig,
};
pub use enumerator::{enumerate_source_issues, SourceEnumeration};
pub use executor::Executor;
pub use index::{build_tracking_index, IndexBuild, TrackingIndex};
pub use issues::{
    parse_reference, render_reference, IssueState, ReferenceError, RepositoryIssue, SourceIssue,
    SourceIssueId, TrackingIssue,
};
pub use pagination::{collect_pages, page_stream, ListingPage, Paginated, PaginationExhausted};
pub use rate_limit::{
    check_rate_limit, ensure_rate_limit, wait_if_needed, RateLimitInfo, RateLimitResource,
};
pub use reconcile::{reconcile, ActionKind, CloseReason, ReconciliationAction};
pub use runner::{Runner, RunnerConfig, RunnerError};
pub use summary::{ActionFailure, ActionOutcome, RunSummary};
pub use templates::{TemplateError, TrackingRenderer};
