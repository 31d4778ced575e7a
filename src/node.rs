//! Skew heap tree cells and the primitives every queue operation is built on
//!
//! All heap operations reduce to two primitives:
//!
//! - [`merge`]: destructively combines two trees into one, consuming both
//! - [`clone_tree`]: builds a disjoint deep copy of a tree
//!
//! Child links are single-owner `Option<Box<Node<T>>>` slots. Cutting a right
//! child and hanging a subtree on the left are `take()` moves, so a node can
//! never be reachable from two parents.
//!
//! # Merge
//!
//! This is the spine-decomposition form of the skew heap merge. Every right
//! link reachable from either root is cut, the fragments (each a node with
//! only its left subtree) are sorted by priority, and the sorted run is
//! relinked from the tail: each node's old left subtree moves to its right
//! and the previously relinked run becomes its left. The amortized bound
//! matches the classic recursive swap-merge, O(log n), but no recursion is
//! involved.
//!
//! Skew heaps carry no balance invariant, so a tree can be arbitrarily deep.
//! Cloning and teardown use explicit work stacks for that reason.

use std::collections::VecDeque;

use smallvec::SmallVec;

use crate::traits::Prioritized;

/// Inline capacity of the fragment buffer used by [`merge`]
///
/// Right spines of a skew heap are O(log n) long in the amortized sense, so
/// most merges never spill onto the heap.
pub(crate) const SPINE_INLINE: usize = 32;

/// Owned, optional child subtree
pub(crate) type Link<T> = Option<Box<Node<T>>>;

pub(crate) struct Node<T> {
    pub(crate) left: Link<T>,
    pub(crate) right: Link<T>,
    pub(crate) value: T,
}

impl<T> Node<T> {
    fn leaf(value: T) -> Box<Self> {
        Box::new(Self {
            left: None,
            right: None,
            value,
        })
    }
}

impl<T: Prioritized> Node<T> {
    #[inline]
    fn priority(&self) -> i64 {
        self.value.priority()
    }
}

/// Merges two trees destructively
///
/// If either side is absent the other is returned unchanged. The resulting
/// root holds the minimum key of both inputs. Items with equal keys come out
/// in no particular order.
pub(crate) fn merge<T: Prioritized>(a: Link<T>, b: Link<T>) -> Link<T> {
    let (a, b) = match (a, b) {
        (None, other) | (other, None) => return other,
        (Some(a), Some(b)) => (a, b),
    };

    // Cut the right subtree from every node on both spines
    let mut todo: VecDeque<Box<Node<T>>> = VecDeque::from([a, b]);
    let mut nodes: SmallVec<[Box<Node<T>>; SPINE_INLINE]> = SmallVec::new();

    while let Some(mut node) = todo.pop_front() {
        if let Some(right) = node.right.take() {
            todo.push_back(right);
        }
        nodes.push(node);
    }

    nodes.sort_unstable_by_key(|node| node.priority());

    // Relink from the largest key inward
    let mut root = nodes.pop()?;
    while let Some(mut prev) = nodes.pop() {
        prev.right = prev.left.take();
        prev.left = Some(root);
        root = prev;
    }

    Some(root)
}

/// Copies a tree into freshly allocated nodes
///
/// Values are duplicated with `T::clone`; with `T = Arc<_>` the copy shares
/// item identity with the source while sharing no tree cells.
pub(crate) fn clone_tree<T: Clone>(src: Option<&Node<T>>) -> Link<T> {
    let src = src?;

    // Post-order walk: children are finished before their parent is built.
    // `built` holds completed copies; a parent pops its right copy, then its
    // left copy.
    let mut pending: Vec<(&Node<T>, bool)> = vec![(src, false)];
    let mut built: Vec<Box<Node<T>>> = Vec::new();

    while let Some((node, children_done)) = pending.pop() {
        if children_done {
            let right = match node.right {
                Some(_) => built.pop(),
                None => None,
            };
            let left = match node.left {
                Some(_) => built.pop(),
                None => None,
            };
            built.push(Box::new(Node {
                left,
                right,
                value: node.value.clone(),
            }));
        } else {
            pending.push((node, true));
            if let Some(right) = node.right.as_deref() {
                pending.push((right, false));
            }
            if let Some(left) = node.left.as_deref() {
                pending.push((left, false));
            }
        }
    }

    built.pop()
}

/// Tears a tree down without recursing
fn dismantle<T>(root: Link<T>) {
    let mut stack: Vec<Box<Node<T>>> = root.into_iter().collect();
    while let Some(mut node) = stack.pop() {
        stack.extend(node.left.take());
        stack.extend(node.right.take());
    }
}

/// A skew heap without synchronization
///
/// Holds the `(len, root)` pair that a queue guards as a single unit.
/// Invariant: `root.is_none()` exactly when `len == 0`, and `len` is the
/// number of reachable nodes.
pub(crate) struct Tree<T> {
    root: Link<T>,
    len: usize,
}

impl<T> Tree<T> {
    pub(crate) const fn new() -> Self {
        Self { root: None, len: 0 }
    }

    #[inline]
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn peek(&self) -> Option<&T> {
        self.root.as_deref().map(|node| &node.value)
    }

    pub(crate) fn clear(&mut self) {
        dismantle(self.root.take());
        self.len = 0;
    }
}

impl<T: Prioritized> Tree<T> {
    pub(crate) fn push(&mut self, value: T) {
        self.root = merge(self.root.take(), Some(Node::leaf(value)));
        self.len += 1;
    }

    pub(crate) fn pop(&mut self) -> Option<T> {
        let root = self.root.take()?;
        let Node { left, right, value } = *root;
        self.root = merge(left, right);
        self.len -= 1;
        Some(value)
    }

    /// Combines two trees, consuming both
    pub(crate) fn meld(mut self, mut other: Self) -> Self {
        let len = self.len + other.len;
        let root = merge(self.root.take(), other.root.take());
        Self { root, len }
    }
}

impl<T: Clone> Clone for Tree<T> {
    fn clone(&self) -> Self {
        Self {
            root: clone_tree(self.root.as_deref()),
            len: self.len,
        }
    }
}

impl<T> Drop for Tree<T> {
    fn drop(&mut self) {
        dismantle(self.root.take());
    }
}

#[cfg(test)]
impl<T: Prioritized> Tree<T> {
    /// Counts reachable nodes and checks the min-heap property on each edge
    ///
    /// Returns the node count, or `None` if some child outranks its parent.
    pub(crate) fn checked_count(&self) -> Option<usize> {
        let mut count = 0;
        let mut stack: Vec<&Node<T>> = self.root.as_deref().into_iter().collect();
        while let Some(node) = stack.pop() {
            count += 1;
            for child in [node.left.as_deref(), node.right.as_deref()]
                .into_iter()
                .flatten()
            {
                if child.priority() < node.priority() {
                    return None;
                }
                stack.push(child);
            }
        }
        Some(count)
    }

    /// Longest root-to-leaf path, measured in nodes
    pub(crate) fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack: Vec<(&Node<T>, usize)> =
            self.root.as_deref().map(|node| (node, 1)).into_iter().collect();
        while let Some((node, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            for child in [node.left.as_deref(), node.right.as_deref()]
                .into_iter()
                .flatten()
            {
                stack.push((child, depth + 1));
            }
        }
        deepest
    }
}
