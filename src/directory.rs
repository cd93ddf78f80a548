//! The dual-indexed record store.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::iter::FusedIterator;

use crate::raw::{Arena, Handle, IdentityIndex, RankingIter, RawRankingTree};
use crate::record::Record;

/// A directory of student records indexed two ways: by identifier (NIM) and by ranking (GPA).
///
/// Point lookups by identifier go through a hash index and cost O(1) on average. Lookups and
/// ordered listing by ranking go through an unbalanced binary search tree whose nodes each hold
/// a *bucket* of every record sharing one exact ranking value.
///
/// Every record in the directory is present in both indexes, and only in them: all mutation
/// goes through [`insert`](Directory::insert) and [`delete_by_id`](Directory::delete_by_id),
/// which update the two together.
///
/// Rankings are compared exactly (see [`f64::total_cmp`]). Values that are mathematically
/// equal but differ in representation, such as `0.1 + 0.2` and `0.3`, are distinct keys.
///
/// # Examples
///
/// ```
/// use student_directory::Directory;
///
/// let mut directory = Directory::new();
/// assert!(directory.insert("1001", "A", 3.75));
/// assert!(directory.insert("1002", "B", 3.50));
/// assert!(directory.insert("1003", "C", 3.75));
///
/// // Duplicate identifiers are rejected.
/// assert!(!directory.insert("1001", "Z", 2.0));
///
/// let names = |records: Vec<&student_directory::Record>| {
///     records.iter().map(|r| r.name().to_owned()).collect::<Vec<_>>()
/// };
/// assert_eq!(names(directory.find_by_ranking(3.75)), ["A", "C"]);
/// assert_eq!(names(directory.list_ordered_by_ranking()), ["B", "A", "C"]);
///
/// assert!(directory.delete_by_id("1001"));
/// assert_eq!(names(directory.find_by_ranking(3.75)), ["C"]);
/// assert_eq!(directory.len(), 2);
/// ```
///
/// # Performance
///
/// The ranking tree is never rebalanced. Inserting records in strictly increasing (or
/// decreasing) ranking order degrades it to a chain, making ranking lookups and deletions
/// linear in the number of distinct rankings.
pub struct Directory {
    /// Owns every record; both indexes refer to records by handle.
    records: Arena<Record>,
    by_id: IdentityIndex<Handle>,
    by_ranking: RawRankingTree<Handle>,
}

impl Directory {
    /// Creates an empty directory.
    ///
    /// # Examples
    ///
    /// ```
    /// use student_directory::Directory;
    ///
    /// let directory = Directory::new();
    /// assert!(directory.is_empty());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Arena::new(),
            by_id: IdentityIndex::new(),
            by_ranking: RawRankingTree::new(),
        }
    }

    /// Creates an empty directory with room for at least `capacity` records.
    ///
    /// # Examples
    ///
    /// ```
    /// use student_directory::Directory;
    ///
    /// let directory = Directory::with_capacity(64);
    /// assert!(directory.capacity() >= 64);
    /// ```
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Arena::with_capacity(capacity),
            by_id: IdentityIndex::with_capacity(capacity),
            by_ranking: RawRankingTree::with_capacity(capacity),
        }
    }

    /// Returns how many records the directory can hold without reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.records.capacity().min(self.by_id.capacity()).min(self.by_ranking.capacity())
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Returns true if the directory holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns true if a record with identifier `id` is present.
    #[must_use]
    pub fn contains_id(&self, id: &str) -> bool {
        self.by_id.contains(id)
    }

    /// Inserts a new record with no tags.
    ///
    /// Returns `false`, leaving the directory untouched, if `id` is already present.
    ///
    /// # Panics
    ///
    /// Panics if the directory already holds the maximum number of records addressable by
    /// its internal handles.
    pub fn insert(&mut self, id: impl Into<String>, name: impl Into<String>, ranking: f64) -> bool {
        self.insert_tagged(id, name, ranking, core::iter::empty::<String>())
    }

    /// Inserts a new record carrying `tags` (duplicates among them are dropped).
    ///
    /// Returns `false`, leaving the directory untouched, if `id` is already present. An
    /// identifier becomes available again once its record has been deleted.
    ///
    /// # Examples
    ///
    /// ```
    /// use student_directory::Directory;
    ///
    /// let mut directory = Directory::new();
    /// assert!(directory.insert_tagged("1001", "A", 3.75, ["chess", "math", "chess"]));
    /// assert_eq!(directory.find_by_id("1001").unwrap().tags().as_slice(), ["chess", "math"]);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if the directory already holds the maximum number of records addressable by
    /// its internal handles.
    pub fn insert_tagged<I, S>(
        &mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        ranking: f64,
        tags: I,
    ) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let id = id.into();
        // Checked before anything is allocated so a duplicate leaves no trace.
        if self.by_id.contains(&id) {
            return false;
        }

        let record = Record::new(id.clone(), name.into(), ranking, tags.into_iter().collect());
        let handle = self.records.alloc(record);
        let inserted = self.by_id.insert(id, handle);
        debug_assert!(inserted, "identifier vanished between check and insert");
        self.by_ranking.insert(ranking, handle);
        true
    }

    /// Returns the record with identifier `id`.
    ///
    /// # Examples
    ///
    /// ```
    /// use student_directory::Directory;
    ///
    /// let mut directory = Directory::new();
    /// directory.insert("20231004", "Dina", 3.90);
    ///
    /// assert_eq!(directory.find_by_id("20231004").map(|r| r.ranking()), Some(3.90));
    /// assert!(directory.find_by_id("20239999").is_none());
    /// ```
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<&Record> {
        self.by_id.get(id).map(|&handle| self.records.get(handle))
    }

    /// Returns every record whose ranking is exactly `ranking`, in insertion order.
    ///
    /// The returned list is freshly built; it is empty when no record has that ranking.
    #[must_use]
    pub fn find_by_ranking(&self, ranking: f64) -> Vec<&Record> {
        self.resolve(self.by_ranking.find_exact(ranking))
    }

    /// Deletes the record with identifier `id`. Returns `false` if there is no such record.
    ///
    /// The record leaves both indexes; if it was the last one at its ranking, that ranking
    /// disappears from the tree altogether.
    ///
    /// # Examples
    ///
    /// ```
    /// use student_directory::Directory;
    ///
    /// let mut directory = Directory::new();
    /// directory.insert("1001", "A", 3.75);
    ///
    /// assert!(directory.delete_by_id("1001"));
    /// assert!(!directory.delete_by_id("1001"));
    /// assert!(directory.find_by_ranking(3.75).is_empty());
    ///
    /// // The identifier can be reused.
    /// assert!(directory.insert("1001", "A2", 3.10));
    /// ```
    pub fn delete_by_id(&mut self, id: &str) -> bool {
        let Some(&handle) = self.by_id.get(id) else {
            return false;
        };
        // The tree is keyed by ranking, so read it before the record goes away.
        let ranking = self.records.get(handle).ranking();

        self.by_id.remove(id);
        let removed = self.by_ranking.remove(ranking, &handle);
        debug_assert_eq!(removed, Some(handle), "record {id} missing from its ranking bucket");
        self.records.free(handle);
        true
    }

    /// Appends `tag` to the record with identifier `id`.
    ///
    /// Returns `false` if there is no such record or it already carries `tag`. Tags do not
    /// take part in either index.
    pub fn add_tag(&mut self, id: &str, tag: impl Into<String>) -> bool {
        match self.by_id.get(id) {
            Some(&handle) => self.records.get_mut(handle).tags_mut().insert(tag),
            None => false,
        }
    }

    /// Returns every record in ascending ranking order; records sharing a ranking appear in
    /// insertion order.
    ///
    /// This materializes the whole directory. Use [`iter`](Directory::iter) to walk it lazily.
    #[must_use]
    pub fn list_ordered_by_ranking(&self) -> Vec<&Record> {
        self.resolve(self.by_ranking.inorder())
    }

    fn resolve(&self, handles: Vec<Handle>) -> Vec<&Record> {
        handles.into_iter().map(|handle| self.records.get(handle)).collect()
    }

    /// Iterates over the records in the order of
    /// [`list_ordered_by_ranking`](Directory::list_ordered_by_ranking).
    ///
    /// # Examples
    ///
    /// ```
    /// use student_directory::Directory;
    ///
    /// let mut directory = Directory::new();
    /// directory.insert("a", "Eko", 3.20);
    /// directory.insert("b", "Ika", 2.95);
    ///
    /// let rankings: Vec<f64> = directory.iter().map(|r| r.ranking()).collect();
    /// assert_eq!(rankings, [2.95, 3.20]);
    /// ```
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            records: &self.records,
            inner: self.by_ranking.iter(),
        }
    }

    /// Returns the number of distinct rankings currently stored.
    #[must_use]
    pub fn distinct_rankings(&self) -> usize {
        self.by_ranking.node_count()
    }

    /// Returns the height of the ranking tree: the number of nodes on its longest path.
    ///
    /// Equal to [`distinct_rankings`](Directory::distinct_rankings) in the worst case, when
    /// rankings were inserted in sorted order.
    #[must_use]
    pub fn height(&self) -> usize {
        self.by_ranking.height()
    }

    /// Removes every record.
    pub fn clear(&mut self) {
        self.records.clear();
        self.by_id.clear();
        self.by_ranking.clear();
    }
}

impl Default for Directory {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Directory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a Directory {
    type Item = &'a Record;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the records of a [`Directory`] in ranking order.
///
/// This `struct` is created by [`Directory::iter`].
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a> {
    records: &'a Arena<Record>,
    inner: RankingIter<'a, Handle>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Record;

    fn next(&mut self) -> Option<Self::Item> {
        let records = self.records;
        self.inner.next().map(|(_, &handle)| records.get(handle))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use alloc::vec;

    impl Directory {
        /// Checks that both indexes describe exactly the records in the arena.
        fn validate_consistency(&self) {
            self.by_ranking.validate_invariants();
            assert_eq!(self.records.len(), self.by_id.len(), "arena and identity index disagree");
            assert_eq!(self.by_ranking.len(), self.by_id.len(), "ranking tree and identity index disagree");

            for (handle, record) in self.records.iter() {
                assert_eq!(self.by_id.get(record.id()), Some(&handle), "{} not indexed by id", record.id());
                let bucket = self.by_ranking.get(record.ranking()).unwrap_or_default();
                assert_eq!(
                    bucket.iter().filter(|&&h| h == handle).count(),
                    1,
                    "{} not in its ranking bucket exactly once",
                    record.id()
                );
            }
            for &handle in self.by_id.values() {
                let _ = self.records.get(handle);
            }
        }
    }

    fn names(records: &[&Record]) -> Vec<String> {
        records.iter().map(|r| String::from(r.name())).collect()
    }

    fn sample() -> Directory {
        let mut directory = Directory::new();
        for (id, name, ranking) in [
            ("20231001", "Alice", 3.75),
            ("20231002", "Bob", 3.50),
            ("20231003", "Charlie", 3.75),
            ("20231004", "Dina", 3.90),
            ("20231005", "Eko", 3.20),
            ("20231006", "Fani", 3.50),
            ("20231007", "Gina", 3.10),
            ("20231008", "Hadi", 3.90),
            ("20231009", "Ika", 2.95),
            ("20231010", "Joko", 3.40),
        ] {
            assert!(directory.insert(id, name, ranking));
        }
        directory.validate_consistency();
        directory
    }

    #[test]
    fn sample_listing() {
        let directory = sample();
        assert_eq!(directory.len(), 10);
        assert_eq!(directory.distinct_rankings(), 7);
        assert_eq!(
            names(&directory.list_ordered_by_ranking()),
            ["Ika", "Gina", "Eko", "Joko", "Bob", "Fani", "Alice", "Charlie", "Dina", "Hadi"]
        );
    }

    #[test]
    fn delete_two_child_node_keeps_consistency() {
        let mut directory = sample();
        // 3.75 is the root and has both subtrees.
        assert!(directory.delete_by_id("20231001"));
        directory.validate_consistency();
        assert!(directory.delete_by_id("20231003"));
        directory.validate_consistency();

        assert!(directory.find_by_ranking(3.75).is_empty());
        assert_eq!(directory.distinct_rankings(), 6);
        assert_eq!(
            names(&directory.list_ordered_by_ranking()),
            ["Ika", "Gina", "Eko", "Joko", "Bob", "Fani", "Dina", "Hadi"]
        );
    }

    #[test]
    fn duplicate_insert_leaves_no_trace() {
        let mut directory = sample();
        let before = names(&directory.list_ordered_by_ranking());

        assert!(!directory.insert("20231004", "Impostor", 1.0));
        directory.validate_consistency();
        assert_eq!(directory.len(), 10);
        assert_eq!(directory.find_by_id("20231004").unwrap().name(), "Dina");
        assert!(directory.find_by_ranking(1.0).is_empty());
        assert_eq!(names(&directory.list_ordered_by_ranking()), before);
    }

    #[test]
    fn handles_are_recycled_safely() {
        let mut directory = Directory::new();
        directory.insert("a", "A", 1.0);
        directory.insert("b", "B", 2.0);
        assert!(directory.delete_by_id("a"));

        // "c" takes over the slot "a" used to occupy.
        directory.insert("c", "C", 1.0);
        directory.validate_consistency();
        assert_eq!(names(&directory.find_by_ranking(1.0)), ["C"]);
        assert!(directory.find_by_id("a").is_none());
    }

    #[test]
    fn add_tag_only_touches_existing_records() {
        let mut directory = Directory::new();
        directory.insert_tagged("a", "A", 1.0, ["x"]);

        assert!(directory.add_tag("a", "y"));
        assert!(!directory.add_tag("a", "x"));
        assert!(!directory.add_tag("missing", "x"));
        assert_eq!(directory.find_by_id("a").unwrap().tags().as_slice(), ["x", "y"]);
        directory.validate_consistency();
    }

    #[test]
    fn clear_then_reuse() {
        let mut directory = sample();
        directory.clear();
        directory.validate_consistency();
        assert!(directory.is_empty());
        assert_eq!(directory.height(), 0);

        assert!(directory.insert("20231001", "Alice", 3.75));
        directory.validate_consistency();
    }

    #[test]
    fn iter_is_exact_size() {
        let directory = sample();
        let mut iter = directory.iter();
        assert_eq!(iter.len(), 10);
        iter.next();
        assert_eq!(iter.len(), 9);
        assert_eq!((&directory).into_iter().count(), 10);
    }

    #[test]
    fn debug_lists_records_in_order() {
        let mut directory = Directory::default();
        directory.insert("2", "B", 2.0);
        directory.insert("1", "A", 1.0);
        let rendered = alloc::format!("{directory:?}");
        assert!(rendered.find("\"A\"").unwrap() < rendered.find("\"B\"").unwrap());
        assert_eq!(vec![1.0, 2.0], directory.iter().map(Record::ranking).collect::<Vec<_>>());
    }
}
