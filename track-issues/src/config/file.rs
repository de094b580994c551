//! `tracker.toml` deserialization.

use super::{ConfigError, RepositoryName, Scope};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default label attached to tracking issues.
pub const DEFAULT_LABEL: &str = "tracked-issue";

/// Settings read from a config file and/or command-line overrides.
///
/// Every field is optional so a file and the CLI can each supply a part.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct TrackerConfig {
    /// Usernames whose assigned issues are tracked.
    #[serde(default)]
    pub users: Vec<String>,

    /// Organizations to restrict the search to.
    #[serde(default)]
    pub organizations: Vec<String>,

    /// Results per page.
    pub per_page: Option<u32>,

    /// Maximum pages per query.
    pub page_limit: Option<u32>,

    /// Tracking repository in "owner/name" form.
    pub repository: Option<String>,

    /// Label attached to tracking issues (defaults to "tracked-issue").
    pub label: Option<String>,

    /// Comment posted on a tracking issue after closing it.
    pub close_comment: Option<String>,

    /// Handlebars format for tracking-issue titles.
    pub title_format: Option<String>,

    /// Path to a handlebars template for tracking-issue bodies.
    pub body_template: Option<PathBuf>,
}

impl TrackerConfig {
    /// Loads a config file.
    ///
    /// Relative `body-template` paths are resolved against the file's directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file can't be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "Loading tracker config");

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        let mut config: Self = toml::from_str(&content).map_err(|e| ConfigError::TomlError {
            path: path.display().to_string(),
            source: e,
        })?;

        if let (Some(template), Some(dir)) = (&config.body_template, path.parent()) {
            if template.is_relative() {
                config.body_template = Some(dir.join(template));
            }
        }

        Ok(config)
    }

    /// Overlays `overrides` on top of `self`. Set values in `overrides` win.
    #[must_use]
    pub fn merge(self, overrides: Self) -> Self {
        Self {
            users: if overrides.users.is_empty() {
                self.users
            } else {
                overrides.users
            },
            organizations: if overrides.organizations.is_empty() {
                self.organizations
            } else {
                overrides.organizations
            },
            per_page: overrides.per_page.or(self.per_page),
            page_limit: overrides.page_limit.or(self.page_limit),
            repository: overrides.repository.or(self.repository),
            label: overrides.label.or(self.label),
            close_comment: overrides.close_comment.or(self.close_comment),
            title_format: overrides.title_format.or(self.title_format),
            body_template: overrides.body_template.or(self.body_template),
        }
    }

    /// Builds the validated scope.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ScopeInvalid`] when the users list is empty or
    /// pagination values are out of range.
    pub fn scope(&self) -> Result<Scope, ConfigError> {
        let mut scope = Scope::new(&self.users)?.with_organizations(&self.organizations);
        if let Some(per_page) = self.per_page {
            scope = scope.with_per_page(per_page)?;
        }
        if let Some(page_limit) = self.page_limit {
            scope = scope.with_page_limit(page_limit)?;
        }
        Ok(scope)
    }

    /// Parses the configured tracking repository.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRepository`] when unset, or
    /// [`ConfigError::InvalidRepository`] when malformed.
    pub fn repository(&self) -> Result<RepositoryName, ConfigError> {
        self.repository
            .as_deref()
            .ok_or(ConfigError::MissingRepository)?
            .parse()
    }

    /// Returns the tracking label.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] for a blank label.
    pub fn label(&self) -> Result<String, ConfigError> {
        match self.label.as_deref().map(str::trim) {
            None => Ok(DEFAULT_LABEL.to_string()),
            Some("") => Err(ConfigError::ValidationError {
                field: "label".to_string(),
                message: "label must not be empty".to_string(),
            }),
            Some(label) => Ok(label.to_string()),
        }
    }

    /// Reads the body template file, if one is configured.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file can't be read or is empty.
    pub fn body_template(&self) -> Result<Option<String>, ConfigError> {
        let Some(path) = &self.body_template else {
            return Ok(None);
        };

        let template = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        if template.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: "body-template".to_string(),
                message: format!("{} is empty", path.display()),
            });
        }

        Ok(Some(template))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScopeError;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn loads_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tracker.toml");
        fs::write(
            &path,
            r#"
users = ["alice", "bob"]
organizations = ["acme"]
per-page = 50
page-limit = 2
repository = "alice/inbox"
body-template = "body.md"
"#,
        )
        .unwrap();

        let config = TrackerConfig::load(&path).unwrap();
        assert_eq!(config.users, ["alice", "bob"]);
        assert_eq!(config.body_template, Some(dir.path().join("body.md")));

        let scope = config.scope().unwrap();
        assert_eq!(scope.per_page(), 50);
        assert_eq!(scope.page_limit(), 2);
        assert_eq!(scope.organizations(), ["acme"]);
        assert_eq!(config.repository().unwrap().full_name(), "alice/inbox");
        assert_eq!(config.label().unwrap(), DEFAULT_LABEL);
    }

    #[test]
    fn rejects_unknown_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tracker.toml");
        fs::write(&path, "userz = [\"alice\"]\n").unwrap();

        assert!(matches!(
            TrackerConfig::load(&path),
            Err(ConfigError::TomlError { .. })
        ));
    }

    #[test]
    fn overrides_win_when_set() {
        let file = TrackerConfig {
            users: vec!["alice".to_string()],
            per_page: Some(30),
            label: Some("mirror".to_string()),
            ..Default::default()
        };
        let cli = TrackerConfig {
            users: vec!["bob".to_string()],
            page_limit: Some(4),
            ..Default::default()
        };

        let merged = file.merge(cli);
        assert_eq!(merged.users, ["bob"]);
        assert_eq!(merged.per_page, Some(30));
        assert_eq!(merged.page_limit, Some(4));
        assert_eq!(merged.label.as_deref(), Some("mirror"));
    }

    #[test]
    fn reports_invalid_scope() {
        let config = TrackerConfig::default();
        assert!(matches!(
            config.scope(),
            Err(ConfigError::ScopeInvalid(ScopeError::NoUsers))
        ));
        assert!(matches!(
            config.repository(),
            Err(ConfigError::MissingRepository)
        ));
    }

    #[test]
    fn rejects_blank_label() {
        let config = TrackerConfig {
            label: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            config.label(),
            Err(ConfigError::ValidationError { .. })
        ));
    }
}
