use alloc::vec::Vec;
use core::cmp::Ordering;
use core::iter::FusedIterator;

use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Node, compare_keys};

/// Unbalanced binary search tree keyed by ranking, one bucket of entries per distinct key.
///
/// Nodes live in an arena and link to their children by handle. No rebalancing is done: the
/// shape depends only on insertion order, and strictly monotonic keys degrade to a chain.
pub(crate) struct RawRankingTree<T> {
    /// Arena storing all tree nodes.
    nodes: Arena<Node<T>>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
    /// Total number of entries across all buckets.
    len: usize,
}

/// Path stack for in-order walks. Inline capacity covers reasonably shaped trees.
type Stack = SmallVec<[Handle; 32]>;

/// Where a node hangs: its parent and the side it hangs on. `None` means the root slot.
type Link = Option<(Handle, Ordering)>;

impl<T> RawRankingTree<T> {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            len: 0,
        }
    }

    /// Creates a new tree with room for `capacity` distinct rankings.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
            len: 0,
        }
    }

    /// Returns the number of entries in the tree.
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    /// Returns the number of nodes, i.e. distinct rankings.
    pub(crate) const fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Clears all nodes from the tree.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.len = 0;
    }

    /// Number of nodes on the longest root-to-leaf path; 0 for an empty tree.
    pub(crate) fn height(&self) -> usize {
        let mut tallest = 0;
        let mut pending: SmallVec<[(Handle, usize); 32]> = SmallVec::new();
        if let Some(root) = self.root {
            pending.push((root, 1));
        }

        while let Some((handle, depth)) = pending.pop() {
            tallest = tallest.max(depth);
            let node = self.nodes.get(handle);
            for child in [node.left(), node.right()].into_iter().flatten() {
                pending.push((child, depth + 1));
            }
        }
        tallest
    }

    /// Locates the node whose key is exactly `key`, together with the link it hangs from.
    fn find_node(&self, key: f64) -> Option<(Link, Handle)> {
        let mut parent = None;
        let mut current = self.root?;
        loop {
            let node = self.nodes.get(current);
            let ordering = compare_keys(key, node.key());
            let child = match ordering {
                Ordering::Equal => return Some((parent, current)),
                Ordering::Less => node.left()?,
                Ordering::Greater => node.right()?,
            };
            parent = Some((current, ordering));
            current = child;
        }
    }

    /// Points `link` at `child`.
    fn set_child(&mut self, link: Link, child: Option<Handle>) {
        match link {
            None => self.root = child,
            Some((parent, Ordering::Less)) => self.nodes.get_mut(parent).set_left(child),
            Some((parent, _)) => self.nodes.get_mut(parent).set_right(child),
        }
    }

    /// Returns the bucket stored under `key`, if any.
    pub(crate) fn get(&self, key: f64) -> Option<&[T]> {
        self.find_node(key).map(|(_, handle)| self.nodes.get(handle).bucket())
    }

    /// Returns a copy of the bucket stored under `key`; empty when no node matches.
    pub(crate) fn find_exact(&self, key: f64) -> Vec<T>
    where
        T: Clone,
    {
        self.get(key).map(<[T]>::to_vec).unwrap_or_default()
    }

    /// Inserts `entry` under `key`.
    ///
    /// An exact key match appends to that node's bucket; otherwise a new leaf is hung off the
    /// first empty child slot on the search path.
    pub(crate) fn insert(&mut self, key: f64, entry: T) {
        self.len += 1;

        let Some(mut current) = self.root else {
            let leaf = self.nodes.alloc(Node::new(key, entry));
            self.set_child(None, Some(leaf));
            return;
        };

        loop {
            let node = self.nodes.get(current);
            let ordering = compare_keys(key, node.key());
            let child = match ordering {
                Ordering::Equal => {
                    self.nodes.get_mut(current).push(entry);
                    return;
                }
                Ordering::Less => node.left(),
                Ordering::Greater => node.right(),
            };

            if let Some(child) = child {
                current = child;
                continue;
            }

            let leaf = self.nodes.alloc(Node::new(key, entry));
            self.set_child(Some((current, ordering)), Some(leaf));
            return;
        }
    }

    /// Removes one entry equal to `entry` from the bucket under `key`.
    ///
    /// When that empties the bucket the node itself is unlinked. Returns the removed entry, or
    /// `None` if there is no node for `key` or the bucket does not contain `entry`.
    pub(crate) fn remove(&mut self, key: f64, entry: &T) -> Option<T>
    where
        T: PartialEq,
    {
        let (link, handle) = self.find_node(key)?;
        let node = self.nodes.get_mut(handle);
        let removed = node.remove_entry(entry)?;
        self.len -= 1;

        if node.is_bucket_empty() {
            let replacement = self.delete_node(handle);
            self.set_child(link, replacement);
        }
        Some(removed)
    }

    /// Deletes `handle` from the subtree it roots and returns the subtree's new root.
    ///
    /// A node with at most one child is replaced by that child. A node with two children takes
    /// over the key and bucket of its in-order successor, which is then spliced out of the
    /// right subtree. Stack use is constant regardless of tree height.
    fn delete_node(&mut self, handle: Handle) -> Option<Handle> {
        let node = self.nodes.get(handle);
        let (left, right) = (node.left(), node.right());
        let (Some(_), Some(right)) = (left, right) else {
            self.nodes.free(handle);
            return left.or(right);
        };

        // The successor is the leftmost node of the right subtree, so it has no left child.
        let mut link = (handle, Ordering::Greater);
        let mut successor = right;
        while let Some(next) = self.nodes.get(successor).left() {
            link = (successor, Ordering::Less);
            successor = next;
        }

        let successor = self.nodes.take(successor);
        self.set_child(Some(link), successor.right());
        let (key, bucket) = successor.into_payload();
        self.nodes.get_mut(handle).set_payload(key, bucket);
        Some(handle)
    }

    /// Walks every entry in ascending key order, buckets in insertion order.
    pub(crate) fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }

    /// Materializes [`iter`](Self::iter) into an owned list.
    pub(crate) fn inorder(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().map(|(_, entry)| entry.clone()).collect()
    }
}

/// In-order iterator over a [`RawRankingTree`], yielding `(key, entry)` pairs.
pub(crate) struct Iter<'a, T> {
    nodes: &'a Arena<Node<T>>,
    stack: Stack,
    key: f64,
    bucket: core::slice::Iter<'a, T>,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    fn new(tree: &'a RawRankingTree<T>) -> Self {
        let mut iter = Self {
            nodes: &tree.nodes,
            stack: Stack::new(),
            key: 0.0,
            bucket: Default::default(),
            remaining: tree.len(),
        };
        iter.push_left_spine(tree.root);
        iter
    }

    fn push_left_spine(&mut self, mut current: Option<Handle>) {
        let nodes = self.nodes;
        while let Some(handle) = current {
            self.stack.push(handle);
            current = nodes.get(handle).left();
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (f64, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.bucket.next() {
                self.remaining -= 1;
                return Some((self.key, entry));
            }

            let nodes = self.nodes;
            let node = nodes.get(self.stack.pop()?);
            self.key = node.key();
            self.bucket = node.bucket().iter();
            self.push_left_spine(node.right());
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}
