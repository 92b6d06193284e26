//! A fixed capacity min-heap used to pick the merge order while building the huffman tree.
//!
//! Entries are keyed by (weight, insertion sequence). Two nodes of equal weight therefore leave
//! the queue in the order they went in, which keeps tree construction (and so the archive bytes)
//! reproducible.

use std::fmt::{Display, Formatter};

use super::huffman::NodeId;

/// Maximum number of queued nodes. At most one leaf per byte value is ever queued at once.
pub const QUEUE_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    /// Insert into a full queue
    Overflow,
    /// Extract from an empty queue
    Underflow,
}

impl Display for QueueError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            QueueError::Overflow => write!(f, "queue overflow"),
            QueueError::Underflow => write!(f, "queue underflow"),
        }
    }
}

impl std::error::Error for QueueError {}

#[derive(Debug, Clone, Copy)]
struct Entry {
    weight: u64,
    seq: u64,
    node: NodeId,
}

impl Entry {
    #[inline(always)]
    fn key(&self) -> (u64, u64) {
        (self.weight, self.seq)
    }
}

/// Min-heap of tree node handles ordered by node weight.
#[derive(Debug)]
pub struct PriorityQueue {
    data: Vec<Entry>,
    capacity: usize,
    next_seq: u64,
}

impl PriorityQueue {
    /// Create an empty queue able to hold `capacity` nodes.
    pub fn new(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            capacity,
            next_seq: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Weights currently queued, in heap (not sorted) order.
    pub fn weights(&self) -> impl Iterator<Item = u64> + '_ {
        self.data.iter().map(|e| e.weight)
    }

    /// Add a node, sifting it up from the last position until its parent is no heavier.
    pub fn insert(&mut self, weight: u64, node: NodeId) -> Result<(), QueueError> {
        if self.data.len() == self.capacity {
            return Err(QueueError::Overflow);
        }
        self.data.push(Entry {
            weight,
            seq: self.next_seq,
            node,
        });
        self.next_seq += 1;

        let mut i = self.data.len() - 1;
        while i != 0 {
            let parent = (i - 1) / 2;
            if self.data[parent].key() <= self.data[i].key() {
                break;
            }
            self.data.swap(i, parent);
            i = parent;
        }
        Ok(())
    }

    /// Remove and return the lightest node as (weight, node).
    pub fn extract_min(&mut self) -> Result<(u64, NodeId), QueueError> {
        if self.data.is_empty() {
            return Err(QueueError::Underflow);
        }
        let min = self.data.swap_remove(0);
        self.sift_down(0);
        Ok((min.weight, min.node))
    }

    fn sift_down(&mut self, mut i: usize) {
        let size = self.data.len();
        loop {
            let left = 2 * i + 1;
            let right = 2 * i + 2;
            let mut smallest = i;

            if left < size && self.data[left].key() < self.data[smallest].key() {
                smallest = left;
            }
            if right < size && self.data[right].key() < self.data[smallest].key() {
                smallest = right;
            }
            if smallest == i {
                return;
            }
            self.data.swap(i, smallest);
            i = smallest;
        }
    }
}
