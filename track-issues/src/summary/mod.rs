//! What a run did: per-action outcomes and the aggregated [`RunSummary`].

mod result;
mod run_summary;

pub use result::{ActionFailure, ActionOutcome};
pub use run_summary::RunSummary;
