//! Thread-safe mergeable priority queue
//!
//! [`SkewHeap`] wraps a skew heap tree behind a single exclusive lock. Every
//! operation, including [`peek`](SkewHeap::peek), reads or writes the
//! `(len, root)` pair under that lock.
//!
//! # Time Complexity
//!
//! | Operation | Complexity                         |
//! |-----------|------------------------------------|
//! | `insert`  | O(log n) amortized                 |
//! | `extract` | O(log n) amortized                 |
//! | `peek`    | O(1)                               |
//! | `merge`   | O(n + m) copy, O(log(n + m)) merge |
//!
//! # Cross-queue merge
//!
//! [`SkewHeap::merge`] never mutates its operands. Each operand is locked and
//! copied on its own scoped thread, so no thread ever holds two queue locks
//! at once. Two merges of the same pair issued concurrently in opposite order
//! cannot deadlock, and merging a queue with itself is fine.
//!
//! # Example
//!
//! ```rust
//! use rust_skew_heap::{QueueError, SkewHeap};
//!
//! let evens: SkewHeap<i32> = [4, 0, 2].into_iter().collect();
//! let odds: SkewHeap<i32> = [3, 1].into_iter().collect();
//!
//! let all = evens.merge(&odds);
//! assert_eq!(all.len(), 5);
//! assert_eq!(evens.len(), 3);
//! assert_eq!(odds.len(), 2);
//!
//! assert_eq!(all.into_sorted_vec(), vec![0, 1, 2, 3, 4]);
//! assert_eq!(odds.peek(), Ok(1));
//!
//! let empty: SkewHeap<i32> = SkewHeap::new();
//! assert_eq!(empty.extract(), Err(QueueError::EmptyQueue));
//! ```

use std::fmt;
use std::thread::{self, ScopedJoinHandle};

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::node::Tree;
use crate::traits::{Prioritized, QueueError};

/// A min-priority queue with non-destructive merge
///
/// Items are ordered by [`Prioritized::priority`]; the smallest key comes out
/// first. Items with equal keys are returned in no particular order.
pub struct SkewHeap<T> {
    tree: Mutex<Tree<T>>,
}

impl<T> SkewHeap<T> {
    /// Creates a new empty queue
    pub fn new() -> Self {
        Self::from_tree(Tree::new())
    }

    fn from_tree(tree: Tree<T>) -> Self {
        Self {
            tree: Mutex::new(tree),
        }
    }

    /// Returns the number of items in the queue
    pub fn len(&self) -> usize {
        self.tree.lock().len()
    }

    /// Returns true if the queue holds no items
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every item
    pub fn clear(&self) {
        self.tree.lock().clear();
    }
}

impl<T: Prioritized> SkewHeap<T> {
    /// Inserts an item
    pub fn insert(&self, value: T) {
        let priority = value.priority();
        let mut tree = self.tree.lock();
        tree.push(value);
        trace!(priority, len = tree.len(), "inserted item");
    }

    /// Removes and returns the item with the smallest key
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::EmptyQueue`] if the queue holds no items.
    pub fn extract(&self) -> Result<T, QueueError> {
        let mut tree = self.tree.lock();
        let value = tree.pop().ok_or(QueueError::EmptyQueue)?;
        trace!(priority = value.priority(), len = tree.len(), "extracted item");
        Ok(value)
    }

    /// Calls `f` on the item with the smallest key without removing it
    ///
    /// The queue stays locked while `f` runs, so `f` must not call back into
    /// the same queue.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::EmptyQueue`] if the queue holds no items.
    pub fn peek_with<R>(&self, f: impl FnOnce(&T) -> R) -> Result<R, QueueError> {
        let tree = self.tree.lock();
        tree.peek().map(f).ok_or(QueueError::EmptyQueue)
    }

    /// Drains the queue into a vector in ascending key order
    pub fn into_sorted_vec(self) -> Vec<T> {
        let mut tree = self.tree.into_inner();
        let mut items = Vec::with_capacity(tree.len());
        while let Some(value) = tree.pop() {
            items.push(value);
        }
        items
    }
}

impl<T: Prioritized + Clone> SkewHeap<T> {
    /// Returns a copy of the item with the smallest key without removing it
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::EmptyQueue`] if the queue holds no items.
    pub fn peek(&self) -> Result<T, QueueError> {
        self.peek_with(T::clone)
    }
}

impl<T: Clone> SkewHeap<T> {
    /// Copies the tree while holding this queue's lock, and nothing else
    fn snapshot(&self) -> Tree<T> {
        self.tree.lock().clone()
    }
}

impl<T: Prioritized + Clone + Send> SkewHeap<T> {
    /// Combines two queues into a new one, leaving both operands untouched
    ///
    /// The result holds `self.len() + other.len()` items, as observed at the
    /// moment each operand was copied.
    pub fn merge(&self, other: &Self) -> Self {
        let (ours, theirs) = thread::scope(|scope| {
            let ours = scope.spawn(|| self.snapshot());
            let theirs = scope.spawn(|| other.snapshot());
            (join_snapshot(ours), join_snapshot(theirs))
        });

        let (left_len, right_len) = (ours.len(), theirs.len());
        let tree = ours.meld(theirs);
        debug!(left_len, right_len, len = tree.len(), "merged queues");
        Self::from_tree(tree)
    }
}

/// Waits for a snapshot thread, re-raising its panic on the caller
fn join_snapshot<T>(handle: ScopedJoinHandle<'_, Tree<T>>) -> Tree<T> {
    match handle.join() {
        Ok(tree) => tree,
        Err(payload) => std::panic::resume_unwind(payload),
    }
}

/// Combines two queues into a new one, leaving both operands untouched
///
/// Equivalent to `a.merge(b)`.
pub fn merge_queues<T>(a: &SkewHeap<T>, b: &SkewHeap<T>) -> SkewHeap<T>
where
    T: Prioritized + Clone + Send,
{
    a.merge(b)
}

impl<T> Default for SkewHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for SkewHeap<T> {
    fn clone(&self) -> Self {
        Self::from_tree(self.snapshot())
    }
}

impl<T> fmt::Debug for SkewHeap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SkewHeap").field("len", &self.len()).finish()
    }
}

impl<T: Prioritized> FromIterator<T> for SkewHeap<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Tree::new();
        for value in iter {
            tree.push(value);
        }
        Self::from_tree(tree)
    }
}

impl<T: Prioritized> Extend<T> for SkewHeap<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let tree = self.tree.get_mut();
        for value in iter {
            tree.push(value);
        }
    }
}
