//! Page-limited pagination.
//!
//! Pages are produced lazily as a finite stream that ends at the first short
//! page, the first error, or the page limit, whichever comes first. Hitting
//! the page limit is the only way a listing is cut short, and that single
//! condition is what [`collect_pages`] reports as [`PaginationExhausted`].

use futures::stream::{self, Stream, StreamExt};
use serde::Serialize;
use std::future::Future;
use std::pin::pin;
use thiserror::Error;
use tracing::warn;

/// The page limit was reached while more data remained.
///
/// Non-fatal: the caller continues with the items collected so far.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{listing}: page limit of {page_limit} x {per_page} reached, results are incomplete")]
pub struct PaginationExhausted {
    /// Which listing was truncated, e.g. "assigned issues for alice".
    pub listing: String,

    /// Page size used.
    pub per_page: u8,

    /// Pages fetched.
    pub page_limit: u32,
}

/// One page of a listing.
///
/// `fetched` counts the rows the server returned, before any client-side
/// filtering, and is what decides whether the listing continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPage<T> {
    /// Items kept from this page.
    pub items: Vec<T>,

    /// Rows the server returned for this page.
    pub fetched: usize,

    /// Total rows matching the listing, when the server reports it.
    pub total: Option<u64>,
}

impl<T> ListingPage<T> {
    /// A page whose items are exactly the rows the server returned.
    #[must_use]
    pub fn new(items: Vec<T>) -> Self {
        Self {
            fetched: items.len(),
            items,
            total: None,
        }
    }

    /// A page where some of the `fetched` rows were dropped client-side.
    #[must_use]
    pub fn filtered(fetched: usize, items: Vec<T>) -> Self {
        Self {
            items,
            fetched,
            total: None,
        }
    }

    /// Records the total number of matching rows.
    #[must_use]
    pub fn with_total(mut self, total: Option<u64>) -> Self {
        self.total = total;
        self
    }
}

/// Items gathered from a paginated listing.
#[derive(Debug, Clone)]
pub struct Paginated<T> {
    /// Every item fetched, in page order.
    pub items: Vec<T>,

    /// Set when the page limit cut the listing short.
    pub exhausted: Option<PaginationExhausted>,
}

/// Lazily fetches pages `1..=page_limit`, stopping early after a page that
/// fetched fewer than `per_page` rows or after the first error.
pub fn page_stream<T, E, F, Fut>(
    per_page: u8,
    page_limit: u32,
    fetch: F,
) -> impl Stream<Item = Result<ListingPage<T>, E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<ListingPage<T>, E>>,
{
    stream::unfold((1_u32, false, fetch), move |(page, done, mut fetch)| async move {
        if done || page > page_limit {
            return None;
        }
        match fetch(page).await {
            Ok(listing) => {
                let short = listing.fetched < usize::from(per_page);
                Some((Ok(listing), (page + 1, short, fetch)))
            }
            Err(e) => Some((Err(e), (page + 1, true, fetch))),
        }
    })
}

/// Collects every page of a listing.
///
/// When the last allowed page is full, the listing is truncated if the
/// reported total exceeds the rows fetched. Without a total, one extra page is
/// requested to tell a listing that ends exactly at the limit apart from a
/// truncated one. The extra page's items are never returned, so a truncated
/// result holds at most `per_page * page_limit` items.
///
/// # Errors
///
/// Returns the first error raised by `fetch` for pages within the limit.
pub async fn collect_pages<T, E, F, Fut>(
    listing: &str,
    per_page: u8,
    page_limit: u32,
    mut fetch: F,
) -> Result<Paginated<T>, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<ListingPage<T>, E>>,
    E: std::fmt::Display,
{
    let mut items = Vec::new();
    let mut pages = 0_u32;
    let mut fetched = 0_u64;
    let mut last_full = false;
    let mut total = None;

    {
        let mut stream = pin!(page_stream(per_page, page_limit, &mut fetch));
        while let Some(page) = stream.next().await {
            let page = page?;
            pages += 1;
            fetched += page.fetched as u64;
            last_full = page.fetched >= usize::from(per_page);
            total = page.total.or(total);
            items.extend(page.items);
        }
    }

    let more_remaining = match total {
        _ if pages < page_limit || !last_full => false,
        Some(total) => total > fetched,
        None => match fetch(page_limit + 1).await {
            Ok(extra) => extra.fetched > 0,
            Err(e) => {
                warn!(listing, error = %e, "Request past page limit failed, assuming truncation");
                true
            }
        },
    };

    let exhausted = more_remaining.then(|| {
        let exhausted = PaginationExhausted {
            listing: listing.to_string(),
            per_page,
            page_limit,
        };
        warn!(
            listing,
            per_page,
            page_limit,
            collected = items.len(),
            "Page limit reached before end of data, continuing with partial results"
        );
        exhausted
    });

    Ok(Paginated { items, exhausted })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn numbers(total: u32) -> impl Fn(u32, u8) -> Vec<u32> {
        move |page, per_page| {
            let per_page = u32::from(per_page);
            let start = (page - 1) * per_page + 1;
            (start..=total.min(page * per_page)).collect()
        }
    }

    async fn collect(total: u32, per_page: u8, page_limit: u32) -> (Paginated<u32>, u32) {
        let calls = Cell::new(0);
        let source = numbers(total);
        let result = collect_pages("numbers", per_page, page_limit, |page| {
            calls.set(calls.get() + 1);
            let items = source(page, per_page);
            async move { Ok::<_, String>(ListingPage::new(items)) }
        })
        .await
        .unwrap();
        (result, calls.get())
    }

    #[tokio::test]
    async fn stops_at_natural_end() {
        let (result, calls) = collect(25, 10, 10).await;
        assert_eq!(result.items.len(), 25);
        assert!(result.exhausted.is_none());
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn reports_truncation() {
        let (result, calls) = collect(35, 10, 3).await;
        assert_eq!(result.items, (1..=30).collect::<Vec<_>>());
        assert_eq!(
            result.exhausted,
            Some(PaginationExhausted {
                listing: "numbers".to_string(),
                per_page: 10,
                page_limit: 3,
            })
        );
        assert_eq!(calls, 4);
    }

    #[tokio::test]
    async fn exact_fit_is_not_truncated() {
        let (result, calls) = collect(30, 10, 3).await;
        assert_eq!(result.items.len(), 30);
        assert!(result.exhausted.is_none());
        assert_eq!(calls, 4);
    }

    #[tokio::test]
    async fn empty_listing() {
        let (result, calls) = collect(0, 10, 3).await;
        assert!(result.items.is_empty());
        assert!(result.exhausted.is_none());
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn failed_extra_request_counts_as_truncated() {
        let result = collect_pages("numbers", 2, 1, |page| async move {
            if page == 1 {
                Ok(ListingPage::new(vec![1, 2]))
            } else {
                Err("422 only the first 1000 results are available".to_string())
            }
        })
        .await
        .unwrap();

        assert_eq!(result.items, vec![1, 2]);
        assert!(result.exhausted.is_some());
    }

    #[tokio::test]
    async fn propagates_errors_within_limit() {
        let result: Result<Paginated<u32>, String> =
            collect_pages("numbers", 2, 5, |page| async move {
                if page == 2 {
                    Err("boom".to_string())
                } else {
                    Ok(ListingPage::new(vec![1, 2]))
                }
            })
            .await;

        assert_eq!(result.unwrap_err(), "boom");
    }

    #[tokio::test]
    async fn filtered_rows_do_not_end_the_listing() {
        // Page 1 returned two rows but one was dropped client-side.
        let calls = Cell::new(0);
        let result = collect_pages("numbers", 2, 5, |page| {
            calls.set(calls.get() + 1);
            let listing = match page {
                1 => ListingPage::filtered(2, vec![2]),
                2 => ListingPage::new(vec![3, 4]),
                3 => ListingPage::new(vec![5]),
                _ => ListingPage::new(Vec::new()),
            };
            async move { Ok::<_, String>(listing) }
        })
        .await
        .unwrap();

        assert_eq!(result.items, vec![2, 3, 4, 5]);
        assert!(result.exhausted.is_none());
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn filtered_last_page_still_detects_truncation() {
        let result = collect_pages("numbers", 2, 1, |page| async move {
            Ok::<_, String>(match page {
                1 => ListingPage::filtered(2, vec![1]),
                _ => ListingPage::new(vec![3]),
            })
        })
        .await
        .unwrap();

        assert_eq!(result.items, vec![1]);
        assert!(result.exhausted.is_some());
    }

    #[tokio::test]
    async fn reported_total_at_the_limit_skips_the_extra_request() {
        let calls = Cell::new(0);
        let result = collect_pages("search", 2, 2, |page| {
            calls.set(calls.get() + 1);
            let listing = if page <= 2 {
                ListingPage::new(vec![page * 10, page * 10 + 1]).with_total(Some(4))
            } else {
                ListingPage::new(Vec::new())
            };
            async move {
                if page > 2 {
                    return Err("422 only the first 1000 search results are available".to_string());
                }
                Ok(listing)
            }
        })
        .await
        .unwrap();

        assert_eq!(result.items.len(), 4);
        assert!(result.exhausted.is_none());
        assert_eq!(calls.get(), 2);
    }

    #[tokio::test]
    async fn reported_total_above_the_limit_is_truncated() {
        let result = collect_pages("search", 2, 2, |page| async move {
            Ok::<_, String>(ListingPage::new(vec![page, page]).with_total(Some(1500)))
        })
        .await
        .unwrap();

        assert_eq!(result.items.len(), 4);
        assert!(result.exhausted.is_some());
    }
}
