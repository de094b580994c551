//! Applying reconciliation actions to the tracking repository.

use crate::client::{IssueTracker, NewIssue};
use crate::config::RepositoryName;
use crate::issues::{SourceIssue, TrackingIssue};
use crate::reconcile::{ActionKind, CloseReason, ReconciliationAction};
use crate::summary::{ActionFailure, ActionOutcome};
use crate::templates::TrackingRenderer;
use futures::stream::{self, StreamExt};
use tracing::{error, info, info_span, warn, Instrument};

/// Applies actions one API call at a time, never stopping on a failure.
pub struct Executor<'a, C: ?Sized> {
    client: &'a C,
    repository: &'a RepositoryName,
    renderer: &'a TrackingRenderer,
    label: &'a str,
    close_comment: Option<&'a str>,
    concurrency: usize,
}

impl<'a, C> Executor<'a, C>
where
    C: IssueTracker + ?Sized,
{
    /// Creates an executor writing to `repository`.
    pub fn new(
        client: &'a C,
        repository: &'a RepositoryName,
        renderer: &'a TrackingRenderer,
        label: &'a str,
    ) -> Self {
        Self {
            client,
            repository,
            renderer,
            label,
            close_comment: None,
            concurrency: 1,
        }
    }

    /// Posts `comment` on each tracking issue after closing it.
    #[must_use]
    pub fn with_close_comment(mut self, comment: Option<&'a str>) -> Self {
        self.close_comment = comment;
        self
    }

    /// Sets how many actions may be in flight at once (minimum 1).
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Applies every action and returns one outcome per action, in order.
    ///
    /// All creations finish before the first closure starts. Failures are
    /// recorded as [`ActionOutcome::Failed`] and never retried.
    pub async fn execute(&self, actions: Vec<ReconciliationAction>) -> Vec<ActionOutcome> {
        let span = info_span!("execute", repo = %self.repository, actions = actions.len());

        async {
            let (creates, closes): (Vec<_>, Vec<_>) = actions
                .into_iter()
                .partition(|action| action.kind() == ActionKind::Create);

            let mut outcomes = self.apply_all(creates).await;
            outcomes.extend(self.apply_all(closes).await);
            outcomes
        }
        .instrument(span)
        .await
    }

    async fn apply_all(&self, actions: Vec<ReconciliationAction>) -> Vec<ActionOutcome> {
        stream::iter(actions)
            .map(|action| self.apply(action))
            .buffered(self.concurrency)
            .collect()
            .await
    }

    async fn apply(&self, action: ReconciliationAction) -> ActionOutcome {
        match action {
            ReconciliationAction::CreateTracking(source) => self.create(&source).await,
            ReconciliationAction::CloseTracking { tracking, reason } => {
                self.close(&tracking, reason).await
            }
        }
    }

    async fn create(&self, source: &SourceIssue) -> ActionOutcome {
        let failed = |error: String| {
            error!(source = %source.id, error = %error, "Failed to create tracking issue");
            ActionOutcome::Failed(ActionFailure {
                kind: ActionKind::Create,
                source: source.id.clone(),
                tracking_number: None,
                error,
            })
        };

        let rendered = self
            .renderer
            .render_title(source)
            .and_then(|title| Ok((title, self.renderer.render_body(source)?)));
        let (title, body) = match rendered {
            Ok(rendered) => rendered,
            Err(e) => return failed(e.to_string()),
        };

        let issue = NewIssue {
            title,
            body,
            labels: vec![self.label.to_string()],
        };

        match self.client.create_issue(self.repository, &issue).await {
            Ok(created) => {
                info!(
                    source = %source.id,
                    issue_number = created.number,
                    "Created tracking issue"
                );
                ActionOutcome::Created {
                    source: source.id.clone(),
                    number: created.number,
                    url: created.url,
                }
            }
            Err(e) => failed(e.to_string()),
        }
    }

    async fn close(&self, tracking: &TrackingIssue, reason: CloseReason) -> ActionOutcome {
        if let Err(e) = self
            .client
            .close_issue(self.repository, tracking.number)
            .await
        {
            error!(
                issue_number = tracking.number,
                error = %e,
                "Failed to close tracking issue"
            );
            return ActionOutcome::Failed(ActionFailure {
                kind: ActionKind::Close,
                source: tracking.source.clone(),
                tracking_number: Some(tracking.number),
                error: e.to_string(),
            });
        }

        info!(
            issue_number = tracking.number,
            source = %tracking.source,
            reason = %reason,
            "Closed tracking issue"
        );

        if let Some(comment) = self.close_comment {
            if let Err(e) = self
                .client
                .comment_on_issue(self.repository, tracking.number, comment)
                .await
            {
                warn!(
                    issue_number = tracking.number,
                    error = %e,
                    "Failed to comment on closed tracking issue"
                );
            }
        }

        ActionOutcome::Closed {
            source: tracking.source.clone(),
            number: tracking.number,
            reason,
        }
    }
}
