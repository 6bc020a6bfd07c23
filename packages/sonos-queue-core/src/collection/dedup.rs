//! Duplicate detection over a materialized collection.
//!
//! A single left-to-right pass partitions the items into first occurrences
//! and repeats. Positions are 1-based, matching what a user sees in a queue.

use std::collections::HashMap;
use std::hash::Hash;

use serde::Serialize;

/// A repeat occurrence of an identity already seen earlier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Duplicate<T> {
    /// 1-based position of this occurrence in the original collection.
    pub position: usize,
    /// The repeated item itself (not just its identity).
    pub item: T,
    /// 1-based position of the first occurrence of the same identity.
    pub first_seen: usize,
}

/// Result of [`dedup`].
///
/// `unique.len() + duplicates.len()` always equals the input length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DedupResult<T> {
    /// First occurrence of every identity, in original relative order.
    pub unique: Vec<T>,
    /// Every repeat occurrence, in original order.
    pub duplicates: Vec<Duplicate<T>>,
}

impl<T> DedupResult<T> {
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        !self.duplicates.is_empty()
    }

    /// Number of items analysed.
    #[must_use]
    pub fn total(&self) -> usize {
        self.unique.len() + self.duplicates.len()
    }
}

/// Partitions `items` into first occurrences and repeats by identity.
///
/// `identity_of` must be pure; the output depends only on input order and
/// identity values, so running it twice on the same input gives the same
/// result, and running it on its own `unique` output finds no duplicates.
///
/// Accepts owned items or references (`items.iter()`) alike.
///
/// # Example
/// ```ignore
/// let result = dedup(tracks, |t: &Track| t.uri.clone());
/// for d in &result.duplicates {
///     println!("{} repeats {}", d.position, d.first_seen);
/// }
/// ```
pub fn dedup<I, K, F>(items: I, mut identity_of: F) -> DedupResult<I::Item>
where
    I: IntoIterator,
    K: Eq + Hash,
    F: FnMut(&I::Item) -> K,
{
    let mut first_seen: HashMap<K, usize> = HashMap::new();
    let mut unique = Vec::new();
    let mut duplicates = Vec::new();

    for (index, item) in items.into_iter().enumerate() {
        let position = index + 1;
        let key = identity_of(&item);
        match first_seen.get(&key) {
            Some(&first) => duplicates.push(Duplicate {
                position,
                item,
                first_seen: first,
            }),
            None => {
                first_seen.insert(key, position);
                unique.push(item);
            }
        }
    }

    DedupResult { unique, duplicates }
}
