//! Per-action outcomes.

use crate::issues::SourceIssueId;
use crate::reconcile::{ActionKind, CloseReason};
use serde::Serialize;

/// A create or close call that failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionFailure {
    /// What was attempted.
    pub kind: ActionKind,

    /// Source issue the action concerned.
    pub source: SourceIssueId,

    /// Tracking issue number, for closes.
    pub tracking_number: Option<u64>,

    /// Error message.
    pub error: String,
}

/// Result of applying a single reconciliation action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ActionOutcome {
    /// A tracking issue was created.
    Created {
        /// Source issue now tracked.
        source: SourceIssueId,
        /// New tracking issue number.
        number: u64,
        /// New tracking issue URL.
        url: String,
    },

    /// A tracking issue was closed.
    Closed {
        /// Source issue the tracker referenced.
        source: SourceIssueId,
        /// Closed tracking issue number.
        number: u64,
        /// Why it was closed.
        reason: CloseReason,
    },

    /// The action failed.
    Failed(ActionFailure),
}
