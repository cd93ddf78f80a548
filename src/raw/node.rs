use core::cmp::Ordering;

use smallvec::SmallVec;

use super::handle::Handle;

#[cfg(test)]
pub(crate) const BUCKET_INLINE: usize = 1;
#[cfg(not(test))]
pub(crate) const BUCKET_INLINE: usize = 2;

/// Entries sharing one exact ranking, in insertion order.
pub(crate) type Bucket<T> = SmallVec<[T; BUCKET_INLINE]>;

/// Ordering used for every key comparison in the ranking tree.
///
/// `total_cmp` is exact: two keys are equal only when their bit patterns agree, so `0.1 + 0.2`
/// and `0.3` land in different nodes. It also gives NaN a fixed place in the order.
#[inline]
pub(crate) fn compare_keys(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}

// Binary search tree node. `key` is the shared ranking of everything in `bucket`.
pub(crate) struct Node<T> {
    key: f64,
    // Never empty while the node is linked into the tree.
    bucket: Bucket<T>,
    left: Option<Handle>,
    right: Option<Handle>,
}

impl<T> Node<T> {
    /// Creates a leaf holding a single entry.
    pub(crate) fn new(key: f64, entry: T) -> Self {
        let mut bucket = Bucket::new();
        bucket.push(entry);
        Self {
            key,
            bucket,
            left: None,
            right: None,
        }
    }

    #[inline]
    pub(crate) fn key(&self) -> f64 {
        self.key
    }

    #[inline]
    pub(crate) fn left(&self) -> Option<Handle> {
        self.left
    }

    #[inline]
    pub(crate) fn right(&self) -> Option<Handle> {
        self.right
    }

    pub(crate) fn set_left(&mut self, child: Option<Handle>) {
        self.left = child;
    }

    pub(crate) fn set_right(&mut self, child: Option<Handle>) {
        self.right = child;
    }

    pub(crate) fn bucket(&self) -> &[T] {
        &self.bucket
    }

    pub(crate) fn push(&mut self, entry: T) {
        self.bucket.push(entry);
    }

    /// Removes the first entry equal to `entry`, keeping the order of the rest.
    pub(crate) fn remove_entry(&mut self, entry: &T) -> Option<T>
    where
        T: PartialEq,
    {
        let index = self.bucket.iter().position(|e| e == entry)?;
        Some(self.bucket.remove(index))
    }

    pub(crate) fn is_bucket_empty(&self) -> bool {
        self.bucket.is_empty()
    }

    /// Consumes the node, returning its key and bucket. Used when promoting an in-order
    /// successor.
    pub(crate) fn into_payload(self) -> (f64, Bucket<T>) {
        (self.key, self.bucket)
    }

    pub(crate) fn set_payload(&mut self, key: f64, bucket: Bucket<T>) {
        self.key = key;
        self.bucket = bucket;
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn exact_comparison() {
        assert_eq!(compare_keys(3.75, 3.75), Ordering::Equal);
        assert_eq!(compare_keys(3.5, 3.75), Ordering::Less);
        assert_ne!(compare_keys(0.1 + 0.2, 0.3), Ordering::Equal);
        assert_ne!(compare_keys(-0.0, 0.0), Ordering::Equal);
        assert_eq!(compare_keys(f64::NAN, f64::NAN), Ordering::Equal);
    }

    #[test]
    fn remove_entry_keeps_order() {
        let mut node = Node::new(1.0, 'a');
        node.push('b');
        node.push('c');

        assert_eq!(node.remove_entry(&'b'), Some('b'));
        assert_eq!(node.remove_entry(&'z'), None);
        assert_eq!(node.bucket(), ['a', 'c']);
    }

    #[test]
    fn payload_moves_between_nodes() {
        let mut successor = Node::new(2.0, 'x');
        successor.push('y');
        let mut node = Node::new(1.0, 'z');
        node.set_right(Some(Handle::from_index(0)));

        let (key, bucket) = successor.into_payload();
        node.set_payload(key, bucket);

        assert_eq!(node.key(), 2.0);
        assert_eq!(node.bucket(), ['x', 'y']);
        assert_eq!(node.right(), Some(Handle::from_index(0)));
    }
}
