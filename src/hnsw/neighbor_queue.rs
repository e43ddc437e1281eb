//! Priority queues for the layer search, with a total ordering over f64 distances.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// A point id paired with its distance to the current query.
#[derive(Debug, Clone, Copy)]
pub struct Neighbor {
    pub distance: f64,
    pub id: usize,
}

impl Neighbor {
    pub fn new(id: usize, distance: f64) -> Self {
        Self { distance, id }
    }
}

impl PartialEq for Neighbor {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Neighbor {}

// Ties on distance fall back to the point id, so every heap operation is
// deterministic for a fixed insertion order.
impl PartialOrd for Neighbor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Neighbor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| self.id.cmp(&other.id))
    }
}

/// Result set of a layer search: farthest on top, bounded by ef on push.
#[derive(Debug)]
pub struct MaxHeap {
    heap: BinaryHeap<Neighbor>,
}

impl MaxHeap {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
        }
    }

    /// Push, then evict the farthest entry if the heap holds more than `limit`.
    pub fn push_bounded(&mut self, n: Neighbor, limit: usize) {
        self.heap.push(n);
        if self.heap.len() > limit {
            self.heap.pop();
        }
    }

    /// Current farthest result.
    pub fn peek(&self) -> Option<&Neighbor> {
        self.heap.peek()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Drain into a Vec sorted ascending by distance.
    pub fn into_sorted_vec(self) -> Vec<Neighbor> {
        self.heap.into_sorted_vec()
    }
}

/// Candidate frontier of a layer search: closest on top.
#[derive(Debug)]
pub struct MinHeap {
    heap: BinaryHeap<Reverse<Neighbor>>,
}

impl MinHeap {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, n: Neighbor) {
        self.heap.push(Reverse(n));
    }

    pub fn pop(&mut self) -> Option<Neighbor> {
        self.heap.pop().map(|Reverse(n)| n)
    }
}
