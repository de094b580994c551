//! Rate limiting utilities for GitHub API.
//!
//! Searches and core calls draw from separate GitHub quotas; each call site
//! checks the quota it is about to spend and sleeps until reset when it is
//! nearly empty.

mod info;

pub use info::{RateLimitInfo, MAX_WAIT_SECS, MIN_REMAINING_THRESHOLD};

use octocrab::Octocrab;
use tracing::{info, warn};

/// The GitHub rate limit bucket a request is charged to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitResource {
    /// Search API (assigned-issue queries).
    Search,

    /// Core REST API (listing, creating and closing issues).
    Core,
}

/// Checks the current rate limit status for a resource.
///
/// # Errors
///
/// Returns an error if the rate limit API call fails.
pub async fn check_rate_limit(
    octocrab: &Octocrab,
    resource: RateLimitResource,
) -> Result<RateLimitInfo, octocrab::Error> {
    let rate_limit = octocrab.ratelimit().get().await?;
    let rate = match resource {
        RateLimitResource::Search => &rate_limit.resources.search,
        RateLimitResource::Core => &rate_limit.resources.core,
    };

    Ok(RateLimitInfo {
        remaining: rate.remaining as u32,
        reset: rate.reset,
        limit: rate.limit as u32,
    })
}

/// Waits if the rate limit is low, returning true if we waited.
pub async fn wait_if_needed(info: &RateLimitInfo) -> bool {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    let Some(wait) = info.wait_duration(now) else {
        return false;
    };

    if info.reset.saturating_sub(now) > MAX_WAIT_SECS {
        warn!(
            max_wait = MAX_WAIT_SECS,
            "Rate limit reset too far in future, capping wait time"
        );
    }

    info!(
        remaining = info.remaining,
        wait_secs = wait.as_secs(),
        "Rate limit low, waiting for reset"
    );
    tokio::time::sleep(wait).await;
    true
}

/// Ensures there is quota left for `resource` before a request.
///
/// # Errors
///
/// Returns an error if the rate limit check fails.
pub async fn ensure_rate_limit(
    octocrab: &Octocrab,
    resource: RateLimitResource,
) -> Result<(), octocrab::Error> {
    let info = check_rate_limit(octocrab, resource).await?;
    wait_if_needed(&info).await;
    Ok(())
}
