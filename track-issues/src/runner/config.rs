//! Runner configuration.

use crate::config::{ConfigError, RepositoryName, Scope, TrackerConfig, DEFAULT_LABEL};

/// Default number of actions applied concurrently.
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Configuration for a reconciliation run.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Users, organizations and pagination limits.
    scope: Scope,
    /// Repository holding the tracking issues.
    repository: RepositoryName,
    /// Label attached to tracking issues.
    label: String,
    /// Whether to preview changes without creating or closing issues.
    dry_run: bool,
    /// Maximum concurrent write requests.
    concurrency: usize,
    /// Comment posted after closing a tracking issue.
    close_comment: Option<String>,
    /// Handlebars format for tracking-issue titles.
    title_format: Option<String>,
    /// Handlebars template for tracking-issue bodies.
    body_template: Option<String>,
}

impl RunnerConfig {
    /// Creates a new configuration for a run.
    pub fn new(scope: Scope, repository: RepositoryName) -> Self {
        Self {
            scope,
            repository,
            label: DEFAULT_LABEL.to_string(),
            dry_run: false,
            concurrency: DEFAULT_CONCURRENCY,
            close_comment: None,
            title_format: None,
            body_template: None,
        }
    }

    /// Resolves and validates a merged tracker config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the scope, repository, label or body
    /// template is unusable.
    pub fn from_tracker_config(config: &TrackerConfig) -> Result<Self, ConfigError> {
        let mut runner_config = Self::new(config.scope()?, config.repository()?)
            .with_label(config.label()?)
            .with_close_comment(config.close_comment.clone());
        runner_config.title_format = config.title_format.clone();
        runner_config.body_template = config.body_template()?;
        Ok(runner_config)
    }

    /// Sets the tracking label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Enables or disables dry-run mode.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Sets the maximum concurrent write requests (minimum 1).
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Sets the comment posted after closing a tracking issue.
    #[must_use]
    pub fn with_close_comment(mut self, close_comment: Option<String>) -> Self {
        self.close_comment = close_comment.filter(|c| !c.trim().is_empty());
        self
    }

    /// Overrides the title format and body template.
    #[must_use]
    pub fn with_templates(
        mut self,
        title_format: Option<String>,
        body_template: Option<String>,
    ) -> Self {
        self.title_format = title_format;
        self.body_template = body_template;
        self
    }

    /// Returns the scope.
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Returns the tracking repository.
    pub fn repository(&self) -> &RepositoryName {
        &self.repository
    }

    /// Returns the tracking label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns whether dry-run mode is enabled.
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Returns the max concurrent write requests.
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Returns the close comment, if any.
    pub fn close_comment(&self) -> Option<&str> {
        self.close_comment.as_deref()
    }

    /// Returns the custom title format, if any.
    pub fn title_format(&self) -> Option<&str> {
        self.title_format.as_deref()
    }

    /// Returns the custom body template, if any.
    pub fn body_template(&self) -> Option<&str> {
        self.body_template.as_deref()
    }
}
