//! Computing the actions that converge tracking issues with source issues.

use crate::index::TrackingIndex;
use crate::issues::{IssueState, SourceIssue, SourceIssueId, TrackingIssue};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Why a tracking issue is being closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseReason {
    /// The source issue was closed.
    SourceClosed,

    /// The source issue is no longer assigned to anyone in scope.
    SourceUnassigned,

    /// Another open tracking issue already covers the same source issue.
    Duplicate,
}

impl CloseReason {
    /// Returns the reason as a short human-readable string.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SourceClosed => "source issue closed",
            Self::SourceUnassigned => "source issue no longer assigned",
            Self::Duplicate => "duplicate tracking issue",
        }
    }
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A change to apply to the tracking repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ReconciliationAction {
    /// Open a new tracking issue for a source issue.
    CreateTracking(SourceIssue),

    /// Close a tracking issue.
    CloseTracking {
        /// Tracking issue to close.
        tracking: TrackingIssue,
        /// Why it is closed.
        reason: CloseReason,
    },
}

impl ReconciliationAction {
    /// Returns the action kind.
    #[must_use]
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::CreateTracking(_) => ActionKind::Create,
            Self::CloseTracking { .. } => ActionKind::Close,
        }
    }
}

/// The kind of a [`ReconciliationAction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Creating a tracking issue.
    Create,

    /// Closing a tracking issue.
    Close,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Create => "create",
            Self::Close => "close",
        })
    }
}

/// Computes the actions that bring `index` in line with `sources`.
///
/// - An open source issue without an open tracker gets a new tracker. A
///   closed tracker is never reopened; a fresh one is created instead.
/// - An open tracker is closed when its source is closed or absent from
///   `sources`, and when it duplicates the source's lowest-numbered open
///   tracker.
///
/// All creations come before all closures. Within each group the order
/// follows `sources` and the index's listing order respectively.
#[must_use]
pub fn reconcile(sources: &[SourceIssue], index: &TrackingIndex) -> Vec<ReconciliationAction> {
    let mut current: HashMap<&SourceIssueId, IssueState> = HashMap::new();
    let mut queued: HashSet<&SourceIssueId> = HashSet::new();
    let mut actions = Vec::new();

    for source in sources {
        current.entry(&source.id).or_insert(source.state);

        if source.state.is_open()
            && index.primary_open_tracker(&source.id).is_none()
            && queued.insert(&source.id)
        {
            actions.push(ReconciliationAction::CreateTracking(source.clone()));
        }
    }

    for tracking in index.iter().filter(|t| t.is_open()) {
        let reason = match current.get(&tracking.source) {
            None => CloseReason::SourceUnassigned,
            Some(IssueState::Closed) => CloseReason::SourceClosed,
            Some(IssueState::Open) => {
                let primary = index.primary_open_tracker(&tracking.source);
                if primary.map(|p| p.number) == Some(tracking.number) {
                    continue;
                }
                CloseReason::Duplicate
            }
        };

        actions.push(ReconciliationAction::CloseTracking {
            tracking: tracking.clone(),
            reason,
        });
    }

    actions
}
