//! Run summary types.

use super::result::{ActionFailure, ActionOutcome};
use crate::pagination::PaginationExhausted;
use crate::reconcile::ActionKind;
use serde::Serialize;

/// Summary of a complete run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    /// Open source issues assigned to users in scope.
    pub source_issues: usize,

    /// Tracking issues found in the tracking repository.
    pub tracking_issues: usize,

    /// Labelled issues ignored because they carry no source reference.
    pub ignored_issues: usize,

    /// Tracking issues the reconciler asked to create.
    pub planned_creates: usize,

    /// Tracking issues the reconciler asked to close.
    pub planned_closes: usize,

    /// Number of tracking issues successfully created.
    pub created: usize,

    /// Number of tracking issues that failed to create.
    pub create_failed: usize,

    /// Number of tracking issues successfully closed.
    pub closed: usize,

    /// Number of tracking issues that failed to close.
    pub close_failed: usize,

    /// Failed actions with their causes.
    pub failures: Vec<ActionFailure>,

    /// Listings cut short by the page limit.
    pub warnings: Vec<PaginationExhausted>,

    /// Whether this was a dry run.
    pub dry_run: bool,
}

impl RunSummary {
    /// Creates a new empty summary.
    #[must_use]
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Default::default()
        }
    }

    /// Updates the summary with an action outcome.
    pub fn record_outcome(&mut self, outcome: ActionOutcome) {
        match outcome {
            ActionOutcome::Created { .. } => self.created += 1,
            ActionOutcome::Closed { .. } => self.closed += 1,
            ActionOutcome::Failed(failure) => {
                match failure.kind {
                    ActionKind::Create => self.create_failed += 1,
                    ActionKind::Close => self.close_failed += 1,
                }
                self.failures.push(failure);
            }
        }
    }

    /// Returns true if any action failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Returns true if any listing was truncated.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Returns true if all actions were successful.
    #[must_use]
    pub fn all_success(&self) -> bool {
        self.create_failed == 0 && self.close_failed == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issues::SourceIssueId;
    use crate::reconcile::CloseReason;

    #[test]
    fn can_record_outcomes() {
        let mut summary = RunSummary::new(false);
        let source = SourceIssueId::new("acme/widgets", 1);

        summary.record_outcome(ActionOutcome::Created {
            source: source.clone(),
            number: 3,
            url: "https://github.com/me/tracker/issues/3".to_string(),
        });
        summary.record_outcome(ActionOutcome::Closed {
            source: source.clone(),
            number: 2,
            reason: CloseReason::SourceClosed,
        });
        assert!(summary.all_success());

        summary.record_outcome(ActionOutcome::Failed(ActionFailure {
            kind: ActionKind::Close,
            source,
            tracking_number: Some(4),
            error: "boom".to_string(),
        }));

        assert_eq!(summary.created, 1);
        assert_eq!(summary.closed, 1);
        assert_eq!(summary.close_failed, 1);
        assert_eq!(summary.create_failed, 0);
        assert!(summary.has_failures());
        assert!(!summary.all_success());
        assert!(!summary.has_warnings());
    }
}
