//! Orchestrates a reconciliation run.
//!
//! A run reads assigned issues and the tracking index concurrently, computes
//! the actions that converge them, then applies those actions. Only invalid
//! configuration and failed reads abort a run; failed actions and truncated
//! listings are reported in the [`RunSummary`].

mod config;
mod error;

pub use config::{RunnerConfig, DEFAULT_CONCURRENCY};
pub use error::RunnerError;

use crate::client::{GitHubTracker, IssueTracker};
use crate::config::RepositoryName;
use crate::enumerator::enumerate_source_issues;
use crate::executor::Executor;
use crate::index::build_tracking_index;
use crate::reconcile::{reconcile, ActionKind, ReconciliationAction};
use crate::summary::RunSummary;
use crate::templates::TrackingRenderer;
use futures::future::try_join;
use tracing::{info, warn};

/// Runs reconciliation against an issue tracker.
pub struct Runner<C = GitHubTracker> {
    config: RunnerConfig,
    client: C,
    renderer: TrackingRenderer,
}

impl Runner<GitHubTracker> {
    /// Builds a runner talking to GitHub with the given token.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if the client can't be built or the templates
    /// don't compile.
    pub fn new(config: RunnerConfig, token: &str) -> Result<Self, RunnerError> {
        let client = GitHubTracker::new(token)?;
        Self::with_client(config, client)
    }
}

impl<C: IssueTracker> Runner<C> {
    /// Builds a runner around any issue tracker.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Template`] if the templates don't compile.
    pub fn with_client(config: RunnerConfig, client: C) -> Result<Self, RunnerError> {
        let renderer =
            TrackingRenderer::with_templates(config.title_format(), config.body_template())?;
        Ok(Self {
            config,
            client,
            renderer,
        })
    }

    /// Returns the run configuration.
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Returns the issue tracker.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Executes the full reconciliation flow.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if either read step fails. No action has been
    /// applied in that case.
    pub async fn run(&self) -> Result<RunSummary, RunnerError> {
        let config = &self.config;
        let scope = config.scope();
        let repository = config.repository();
        let mut summary = RunSummary::new(config.dry_run());

        info!(
            users = ?scope.users(),
            organizations = ?scope.organizations(),
            per_page = scope.per_page(),
            page_limit = scope.page_limit(),
            repo = %repository,
            "Starting issue sync"
        );

        let (sources, build) = try_join(
            async {
                enumerate_source_issues(&self.client, scope, repository)
                    .await
                    .map_err(RunnerError::Enumerate)
            },
            async {
                build_tracking_index(&self.client, repository, config.label(), scope)
                    .await
                    .map_err(RunnerError::Index)
            },
        )
        .await?;

        summary.source_issues = sources.issues.len();
        summary.tracking_issues = build.index.len();
        summary.ignored_issues = build.ignored;
        summary.warnings.extend(sources.warnings);
        summary.warnings.extend(build.warning);

        if summary.has_warnings() {
            warn!(
                count = summary.warnings.len(),
                "Proceeding with partial listings"
            );
        }

        let actions = reconcile(&sources.issues, &build.index);
        summary.planned_creates = actions
            .iter()
            .filter(|a| a.kind() == ActionKind::Create)
            .count();
        summary.planned_closes = actions.len() - summary.planned_creates;

        info!(
            create = summary.planned_creates,
            close = summary.planned_closes,
            "Reconciliation planned"
        );

        if actions.is_empty() {
            info!("Tracking issues already up to date");
            return Ok(summary);
        }

        if config.dry_run() {
            print_dry_run_preview(repository, &actions, &self.renderer);
            return Ok(summary);
        }

        let outcomes = Executor::new(&self.client, repository, &self.renderer, config.label())
            .with_close_comment(config.close_comment())
            .with_concurrency(config.concurrency())
            .execute(actions)
            .await;

        for outcome in outcomes {
            summary.record_outcome(outcome);
        }

        info!(
            created = summary.created,
            closed = summary.closed,
            failed = summary.failures.len(),
            "Issue sync completed"
        );
        Ok(summary)
    }
}

fn print_dry_run_preview(
    repository: &RepositoryName,
    actions: &[ReconciliationAction],
    renderer: &TrackingRenderer,
) {
    println!("\n[DRY RUN] Tracking repository: {repository}");
    println!("  Planned actions: {}\n", actions.len());

    for (i, action) in actions.iter().enumerate() {
        match action {
            ReconciliationAction::CreateTracking(source) => {
                let title = renderer
                    .render_title(source)
                    .unwrap_or_else(|e| format!("<{e}>"));
                println!(
                    "  [{}/{}] Would create \"{title}\" for {}",
                    i + 1,
                    actions.len(),
                    source.url
                );
            }
            ReconciliationAction::CloseTracking { tracking, reason } => {
                println!(
                    "  [{}/{}] Would close #{} ({}): {reason}",
                    i + 1,
                    actions.len(),
                    tracking.number,
                    tracking.source
                );
            }
        }
    }

    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::InMemoryTracker;
    use crate::config::Scope;
    use crate::issues::{IssueState, SourceIssue};

    fn runner(client: InMemoryTracker, dry_run: bool) -> Runner<InMemoryTracker> {
        let scope = Scope::new(["alice"]).unwrap();
        let config = RunnerConfig::new(scope, RepositoryName::new("alice", "inbox"))
            .with_dry_run(dry_run);
        Runner::with_client(config, client).unwrap()
    }

    #[tokio::test]
    async fn dry_run_makes_no_changes() {
        let client = InMemoryTracker::new();
        client.add_source_issue(
            SourceIssue::new("acme/widgets", 1, "Crash", IssueState::Open)
                .with_assignees(["alice"]),
        );

        let runner = runner(client, true);
        let summary = runner.run().await.unwrap();

        assert!(summary.dry_run);
        assert_eq!(summary.planned_creates, 1);
        assert_eq!(summary.created, 0);
        assert!(runner
            .client()
            .repository_issues(&RepositoryName::new("alice", "inbox"))
            .is_empty());
    }

    #[tokio::test]
    async fn read_failure_aborts_before_writes() {
        let client = InMemoryTracker::new();
        client.fail_listing_for_user("alice");

        let runner = runner(client, false);
        let result = runner.run().await;

        assert!(matches!(result, Err(RunnerError::Enumerate(_))));
        assert!(runner
            .client()
            .repository_issues(&RepositoryName::new("alice", "inbox"))
            .is_empty());
    }

    #[test]
    fn invalid_template_is_rejected_up_front() {
        let scope = Scope::new(["alice"]).unwrap();
        let config = RunnerConfig::new(scope, RepositoryName::new("alice", "inbox"))
            .with_templates(Some("{{#each assignees}}unclosed".to_string()), None);
        assert!(matches!(
            Runner::with_client(config, InMemoryTracker::new()),
            Err(RunnerError::Template(_))
        ));
    }
}
