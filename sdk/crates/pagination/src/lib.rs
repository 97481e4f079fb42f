//! Grouping primitives for merging paged list responses.
//!
//! Paged list screens load one page at a time and keep the grouping they
//! already computed. Each grouper takes the next page plus the previous
//! grouping and returns the merged result, so the caller never regroups
//! earlier pages.
//!
//! Two strategies are provided:
//!
//! - [`group_runs`] opens a new bucket every time the key changes. It is a
//!   run-length grouping and relies on the caller delivering items sorted by
//!   key.
//! - [`group_by_day`] buckets by calendar day, merges every item that falls
//!   on the same day and returns days newest first.
//!
//! Both treat an empty page as a no-op.

mod by_day;
mod runs;

use serde::{Deserialize, Serialize};

pub use by_day::{DayBucket, group_by_day};
pub use runs::group_runs;

/// One grouping bucket: a key and the items collected under it, in arrival
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket<K, T> {
    /// Grouping key shared by every item in the bucket.
    pub key: K,
    /// Items in the order they were appended.
    pub items: Vec<T>,
}

impl<K, T> Bucket<K, T> {
    /// Build a bucket from a key and its items.
    ///
    /// # Examples
    ///
    /// ```
    /// use pagination::Bucket;
    ///
    /// let bucket = Bucket::new("drinks", vec![1, 2]);
    /// assert_eq!(bucket.len(), 2);
    /// ```
    pub const fn new(key: K, items: Vec<T>) -> Self {
        Self { key, items }
    }

    /// Number of items held by the bucket.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the bucket holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
