//! A small undirected graph over category names, with breadth-first traversal.
//!
//! Independent of [`Directory`](crate::Directory): it stores names only.

use alloc::collections::VecDeque;
use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;
use smallvec::SmallVec;

/// Undirected adjacency graph keyed by category name.
///
/// Neighbours are kept in the order their edges were added, which fixes the order in which
/// [`bfs`](CategoryGraph::bfs) visits them.
///
/// # Examples
///
/// ```
/// use student_directory::CategoryGraph;
///
/// let mut graph = CategoryGraph::new();
/// graph.connect("Science", "Math");
/// graph.connect("Science", "Physics");
/// graph.connect("Math", "Statistics");
/// graph.add_category("Arts");
///
/// assert_eq!(graph.bfs("Science"), ["Science", "Math", "Physics", "Statistics"]);
/// assert_eq!(graph.bfs("Arts"), ["Arts"]);
/// assert!(graph.bfs("Music").is_empty());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CategoryGraph {
    /// Category names; a category's index never changes.
    names: Vec<String>,
    index: HashMap<String, usize>,
    adjacency: Vec<SmallVec<[usize; 4]>>,
}

impl CategoryGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if the graph has no categories.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Returns true if `name` is a category in the graph.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Adds `name` as an isolated category. Returns `false` if it already exists.
    pub fn add_category(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.intern(name);
        true
    }

    fn intern(&mut self, name: &str) -> usize {
        if let Some(&id) = self.index.get(name) {
            return id;
        }
        let id = self.names.len();
        self.names.push(String::from(name));
        self.index.insert(String::from(name), id);
        self.adjacency.push(SmallVec::new());
        id
    }

    /// Adds an undirected edge between `a` and `b`, creating either category if needed.
    ///
    /// Returns `false` when no edge was added: the edge already exists, or `a == b`.
    pub fn connect(&mut self, a: &str, b: &str) -> bool {
        let a = self.intern(a);
        let b = self.intern(b);
        if a == b || self.adjacency[a].contains(&b) {
            return false;
        }
        self.adjacency[a].push(b);
        self.adjacency[b].push(a);
        true
    }

    /// Returns the direct neighbours of `name` in connection order; empty if unknown.
    #[must_use]
    pub fn neighbors(&self, name: &str) -> Vec<&str> {
        self.index
            .get(name)
            .map(|&id| self.adjacency[id].iter().map(|&n| self.names[n].as_str()).collect())
            .unwrap_or_default()
    }

    /// Breadth-first traversal from `start`, returning every reachable category once, `start`
    /// first. Empty if `start` is not in the graph.
    #[must_use]
    pub fn bfs(&self, start: &str) -> Vec<&str> {
        let Some(&start) = self.index.get(start) else {
            return Vec::new();
        };

        let mut visited = alloc::vec![false; self.names.len()];
        let mut queue = VecDeque::from([start]);
        let mut order = Vec::new();
        visited[start] = true;

        while let Some(id) = queue.pop_front() {
            order.push(self.names[id].as_str());
            for &next in &self.adjacency[id] {
                if !visited[next] {
                    visited[next] = true;
                    queue.push_back(next);
                }
            }
        }
        order
    }
}
