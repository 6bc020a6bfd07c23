//! Paginated collection retrieval and duplicate analysis.
//!
//! Remote ordered collections (a coordinator's queue, a saved playlist, the
//! saved-playlist index) can only be read in bounded windows. This module
//! materializes them completely and in order, then analyses the result.
//!
//! # Module Structure
//!
//! - `collector` - [`PagedCollector`]: sequential page fetching against a latched total
//! - `dedup` - [`dedup`]: first-occurrence / repeat partitioning by identity

use async_trait::async_trait;
use serde::Serialize;

use crate::sonos::soap::SoapResult;

pub mod collector;
pub mod dedup;

pub use collector::{CollectError, CollectOptions, CollectResult, PagedCollector, TotalPolicy};
pub use dedup::{dedup, DedupResult, Duplicate};

/// One bounded window of a remote collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Items in server order. May be shorter than requested.
    pub items: Vec<T>,
    /// Server-reported size of the whole collection.
    pub total_matches: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_matches: u32) -> Self {
        Self {
            items,
            total_matches,
        }
    }
}

/// Capability to read a remote ordered collection one window at a time.
///
/// Implementations must not reorder items between calls; the collector
/// requests windows strictly sequentially.
#[async_trait]
pub trait ItemSource: Send + Sync {
    /// Item type produced by this source.
    type Item: Send;

    /// Fetches up to `max_items` items starting at offset `start`.
    async fn fetch(&self, start: u32, max_items: u32) -> SoapResult<Page<Self::Item>>;
}

/// A fully materialized remote collection.
///
/// `items` holds the concatenation of all received pages in the order they
/// arrived; `total_count` is the total latched from the first page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection<T> {
    pub total_count: u32,
    pub items: Vec<T>,
}

impl<T> Collection<T> {
    /// Returns true when the number of items matches the latched total.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.items.len() == self.total_count as usize
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}
