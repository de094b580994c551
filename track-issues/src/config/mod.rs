//! Configuration loading and validation.
//!
//! Settings come from an optional `tracker.toml` and command-line overrides.
//! Everything is validated here, before the engine touches the API.

mod error;
mod file;
mod repository;
mod scope;

pub use error::{ConfigError, ScopeError};
pub use file::{TrackerConfig, DEFAULT_LABEL};
pub use repository::RepositoryName;
pub use scope::{
    parse_comma_list, Scope, DEFAULT_PAGE_LIMIT, DEFAULT_PER_PAGE, MAX_PER_PAGE,
};
