//! `PriorityDispatchQueue`: max-heap of pending parcels.
//!
//! # Ordering
//!
//! Entries are ordered by `score` (larger first).  Among equal scores the
//! parcel with the smaller [`ParcelKey`] wins; keys are handed out in
//! creation order, so ties resolve FIFO by creation time.  A parcel that is
//! extracted and re-inserted keeps its place among equals.
//!
//! # Stale entries
//!
//! There is no decrease-key or remove-by-id.  The queue stores handles, not
//! parcels, so it cannot tell whether a parcel is still waiting; the
//! dispatch coordinator checks status on extraction and drops entries whose
//! parcel has moved on.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use pd_core::ParcelKey;

/// One queued parcel handle and the score it was queued with.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QueueEntry {
    pub score: u32,
    pub key:   ParcelKey,
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .cmp(&other.score)
            .then_with(|| other.key.cmp(&self.key))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Clone, Debug, Default)]
pub struct PriorityDispatchQueue {
    heap: BinaryHeap<QueueEntry>,
}

impl PriorityDispatchQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// O(log n).  Always succeeds.
    pub fn insert(&mut self, key: ParcelKey, score: u32) {
        self.heap.push(QueueEntry { score, key });
    }

    /// Remove and return the highest-score entry.  O(log n).
    pub fn extract_max(&mut self) -> Option<QueueEntry> {
        self.heap.pop()
    }

    pub fn peek(&self) -> Option<&QueueEntry> {
        self.heap.peek()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// `true` if any entry refers to `key`.  O(n).
    pub fn contains(&self, key: ParcelKey) -> bool {
        self.heap.iter().any(|e| e.key == key)
    }

    /// All entries in extraction order, without draining the queue.
    pub fn ordered(&self) -> Vec<QueueEntry> {
        let mut entries = self.heap.clone().into_sorted_vec();
        entries.reverse();
        entries
    }

    /// Drop every entry for which `keep` returns `false`.
    pub fn retain(&mut self, keep: impl FnMut(&QueueEntry) -> bool) {
        self.heap.retain(keep);
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }
}

impl Extend<QueueEntry> for PriorityDispatchQueue {
    fn extend<I: IntoIterator<Item = QueueEntry>>(&mut self, iter: I) {
        self.heap.extend(iter);
    }
}
