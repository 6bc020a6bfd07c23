//! Sequential paged retrieval of a remote ordered collection.
//!
//! The source reports the size of the whole collection on every page. The
//! value from the first page is latched and never re-read: the device is
//! trusted to keep it stable for the duration of one retrieval. The
//! collector only assumes that each page continues exactly where the items
//! received so far end, never that pages are full.

use thiserror::Error;

use super::{Collection, ItemSource};
use crate::protocol_constants::{DEFAULT_QUEUE_PAGE_SIZE, DEFAULT_STALL_SLACK};
use crate::sonos::soap::SoapError;

/// Errors that can occur while materializing a collection.
#[derive(Debug, Error)]
pub enum CollectError {
    /// A page size of zero can never make progress.
    #[error("page size must be at least 1")]
    InvalidPageSize,

    /// A page request failed; partial results are discarded.
    #[error("page request failed: {0}")]
    Source(#[from] SoapError),

    /// The source delivered more items than the total it declared.
    #[error("source declared {total} items but delivered {received}")]
    TotalMismatch {
        /// Total latched from the first page.
        total: u32,
        /// Items actually received.
        received: u32,
    },

    /// The declared total was not reached within the request budget.
    #[error("collection stalled after {requests} requests: {received} of {total} items received")]
    Stalled {
        requests: u32,
        received: u32,
        total: u32,
    },
}

/// Convenient Result alias for collection operations.
pub type CollectResult<T> = Result<T, CollectError>;

/// What to do when the items received overshoot the latched total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TotalPolicy {
    /// Fail with [`CollectError::TotalMismatch`].
    #[default]
    Strict,
    /// Keep every item received, as the device returned them.
    Lenient,
}

/// Tuning for one [`PagedCollector`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectOptions {
    /// Items requested per page.
    pub page_size: u32,
    /// Handling of a total that is exceeded by the pages received.
    pub total_policy: TotalPolicy,
    /// Consecutive empty pages tolerated before the total is considered
    /// unreachable.
    ///
    /// Also bounds the whole retrieval to `total + stall_slack` requests:
    /// every non-empty page advances by at least one item, so a healthy
    /// source never needs more than `total` requests.
    pub stall_slack: u32,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_QUEUE_PAGE_SIZE,
            total_policy: TotalPolicy::default(),
            stall_slack: DEFAULT_STALL_SLACK,
        }
    }
}

impl CollectOptions {
    /// Default options with the given page size.
    #[must_use]
    pub fn with_page_size(page_size: u32) -> Self {
        Self {
            page_size,
            ..Default::default()
        }
    }
}

/// Materializes complete collections from an [`ItemSource`].
///
/// # Example
/// ```ignore
/// let collector = PagedCollector::new(CollectOptions::with_page_size(400));
/// let queue = collector.collect(&TrackSource::queue(&client, ip)).await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct PagedCollector {
    options: CollectOptions,
}

impl PagedCollector {
    pub fn new(options: CollectOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CollectOptions {
        &self.options
    }

    /// Fetches every page of `source` in order and returns the concatenation.
    ///
    /// Requests `fetch(start, page_size)` with `start` equal to the number
    /// of items received so far, until `start` reaches the total reported
    /// by the first page. A total of zero ends after one (empty) page.
    ///
    /// # Errors
    /// - [`CollectError::InvalidPageSize`] for a page size of zero (no request is made)
    /// - [`CollectError::Source`] if any page request fails
    /// - [`CollectError::Stalled`] after `stall_slack` consecutive empty
    ///   pages short of the total, or once `total + stall_slack` requests
    ///   have not reached it
    /// - [`CollectError::TotalMismatch`] if more items than the total
    ///   arrive and the policy is [`TotalPolicy::Strict`]
    pub async fn collect<S>(&self, source: &S) -> CollectResult<Collection<S::Item>>
    where
        S: ItemSource + ?Sized,
    {
        let page_size = self.options.page_size;
        if page_size == 0 {
            return Err(CollectError::InvalidPageSize);
        }

        let mut latched: Option<u32> = None;
        let mut items: Vec<S::Item> = Vec::new();
        let mut start: u32 = 0;
        let mut requests: u32 = 0;
        let mut empty_pages: u32 = 0;

        let total = loop {
            let page = source.fetch(start, page_size).await?;
            requests += 1;

            let total = match latched {
                Some(total) => {
                    if page.total_matches != total {
                        log::debug!(
                            "[Collector] Page at {} reports total {} (keeping {})",
                            start,
                            page.total_matches,
                            total
                        );
                    }
                    total
                }
                None => {
                    log::debug!("[Collector] Collection has {} items", page.total_matches);
                    latched = Some(page.total_matches);
                    page.total_matches
                }
            };

            let received = page.items.len();
            if received == 0 {
                empty_pages += 1;
            } else {
                empty_pages = 0;
            }
            items.extend(page.items);
            start = u32::try_from(items.len()).unwrap_or(u32::MAX);

            log::trace!(
                "[Collector] Request {}: {} items, {}/{} collected",
                requests,
                received,
                start,
                total
            );

            if start >= total {
                break total;
            }

            let slack = self.options.stall_slack;
            let no_progress = empty_pages > 0 && empty_pages >= slack.max(1);
            if no_progress || requests >= total.saturating_add(slack) {
                log::warn!(
                    "[Collector] Giving up after {} requests, {} of them empty in a row ({}/{} items)",
                    requests,
                    empty_pages,
                    start,
                    total
                );
                return Err(CollectError::Stalled {
                    requests,
                    received: start,
                    total,
                });
            }
        };

        if start > total {
            match self.options.total_policy {
                TotalPolicy::Strict => {
                    return Err(CollectError::TotalMismatch {
                        total,
                        received: start,
                    });
                }
                TotalPolicy::Lenient => {
                    log::warn!(
                        "[Collector] Source declared {} items but delivered {}; keeping all",
                        total,
                        start
                    );
                }
            }
        }

        Ok(Collection {
            total_count: total,
            items,
        })
    }
}
