//! The tracking repository name.

use super::ConfigError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A repository in "owner/name" form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RepositoryName {
    /// Repository owner (user or organization).
    pub owner: String,

    /// Repository name.
    pub name: String,
}

impl RepositoryName {
    /// Creates a repository name from its parts.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Returns the full name in "owner/name" format.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// Derives the repository from a GitHub remote URL.
    ///
    /// Accepts `https://github.com/owner/name(.git)`,
    /// `git@github.com:owner/name(.git)` and `ssh://git@github.com/owner/name(.git)`.
    #[must_use]
    pub fn from_remote_url(remote: &str) -> Option<Self> {
        let (_, path) = remote.trim().split_once("github.com")?;
        let path = path.strip_prefix([':', '/'])?;
        let path = path.trim_end_matches('/');
        let path = path.strip_suffix(".git").unwrap_or(path);
        path.parse().ok()
    }
}

impl FromStr for RepositoryName {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidRepository {
            value: value.to_string(),
        };
        let (owner, name) = value.trim().split_once('/').ok_or_else(invalid)?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(invalid());
        }
        Ok(Self::new(owner, name))
    }
}

impl fmt::Display for RepositoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
