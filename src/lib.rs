//! Mergeable Priority Queue for Rust
//!
//! This crate provides a thread-safe min-priority queue built on the skew heap:
//! a self-adjusting binary tree with no balance invariant, where every
//! operation is defined in terms of a single merge primitive.
//!
//! # Features
//!
//! - **Insert / extract-min**: O(log n) amortized, done in place under the queue's lock
//! - **Peek**: O(1), taken under the same lock as every mutation
//! - **Non-destructive merge**: combine two queues into a third without touching either,
//!   copying each operand on its own thread so no thread ever holds two queue locks
//!
//! Items implement [`Prioritized`]; a lower key means a higher priority.
//!
//! # Example
//!
//! ```rust
//! use rust_skew_heap::{merge_queues, SkewHeap};
//!
//! let a = SkewHeap::new();
//! let b = SkewHeap::new();
//! for i in 0..5 {
//!     a.insert(i);
//!     b.insert(i + 5);
//! }
//!
//! let c = merge_queues(&a, &b);
//! assert_eq!(c.len(), 10);
//! assert_eq!(c.extract(), Ok(0));
//! assert_eq!(a.len(), 5);
//! ```

mod node;
pub mod skew;
pub mod traits;

// Re-export the main types for convenience
pub use skew::{merge_queues, SkewHeap};
pub use traits::{Prioritized, QueueError};
