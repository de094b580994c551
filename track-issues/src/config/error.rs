//! Configuration error types.

use thiserror::Error;

/// Errors that can occur while loading or resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file.
    #[error("Failed to read file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML content.
    #[error("Failed to parse config file '{path}': {source}")]
    TomlError {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// Validation error in a config value.
    #[error("Validation error in '{field}': {message}")]
    ValidationError { field: String, message: String },

    /// The scope of the run is unusable.
    #[error(transparent)]
    ScopeInvalid(#[from] ScopeError),

    /// The tracking repository could not be determined.
    #[error("No tracking repository configured; pass --repository or set GITHUB_REPOSITORY")]
    MissingRepository,

    /// The tracking repository is not in "owner/name" form.
    #[error("Invalid repository '{value}', expected 'owner/name'")]
    InvalidRepository { value: String },
}

/// Reasons a scope is rejected before the run starts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScopeError {
    /// No usernames were given.
    #[error("At least one user is required")]
    NoUsers,

    /// Page size outside 1..=100.
    #[error("per_page must be between 1 and {max}, got {value}")]
    InvalidPerPage { value: u32, max: u32 },

    /// Page limit of zero.
    #[error("page_limit must be at least 1")]
    InvalidPageLimit,
}
