//! Common traits and error types for the skew heap queue
//!
//! - [`Prioritized`]: the capability every queued item provides
//! - [`QueueError`]: the single error raised by the queue

use std::sync::Arc;

/// Error type for queue operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    /// The queue held no items when the call was made
    #[error("queue is empty")]
    EmptyQueue,
}

/// An item that can report its queue priority
///
/// A lower value indicates a higher priority: the item with the smallest
/// key is extracted first.
///
/// The key must not change while the item is stored in a queue. The tree is
/// never re-validated, so a key that moves after insertion silently breaks
/// the ordering of later extractions.
///
/// # Example
///
/// ```rust
/// use rust_skew_heap::{Prioritized, SkewHeap};
///
/// struct Job {
///     name: &'static str,
///     urgency: u8,
/// }
///
/// impl Prioritized for Job {
///     fn priority(&self) -> i64 {
///         // More urgent jobs come out first
///         -i64::from(self.urgency)
///     }
/// }
///
/// let queue = SkewHeap::new();
/// queue.insert(Job { name: "backup", urgency: 1 });
/// queue.insert(Job { name: "page oncall", urgency: 9 });
/// assert_eq!(queue.extract().unwrap().name, "page oncall");
/// ```
pub trait Prioritized {
    /// Returns the ordering key for this item
    fn priority(&self) -> i64;
}

macro_rules! impl_prioritized_for_int {
    ($($t:ty),*) => {
        $(
            impl Prioritized for $t {
                #[inline]
                fn priority(&self) -> i64 {
                    i64::from(*self)
                }
            }
        )*
    };
}

impl_prioritized_for_int!(i8, i16, i32, i64, u8, u16, u32);

/// A `(key, payload)` pair is ordered by its key alone
impl<V> Prioritized for (i64, V) {
    #[inline]
    fn priority(&self) -> i64 {
        self.0
    }
}

impl<P: Prioritized + ?Sized> Prioritized for &P {
    #[inline]
    fn priority(&self) -> i64 {
        (**self).priority()
    }
}

impl<P: Prioritized + ?Sized> Prioritized for Box<P> {
    #[inline]
    fn priority(&self) -> i64 {
        (**self).priority()
    }
}

/// Storing `Arc<P>` lets a merged queue share item identity with its sources
impl<P: Prioritized + ?Sized> Prioritized for Arc<P> {
    #[inline]
    fn priority(&self) -> i64 {
        (**self).priority()
    }
}
