//! core::graph
//!
//! Commit ancestry queries over a store snapshot.
//!
//! # Architecture
//!
//! The commit graph is a DAG where:
//! - Nodes are commits
//! - Edges point from child to parent (primary parent first)
//! - Roots are commits without parents
//!
//! The graph is rebuilt from a [`GraphStore`] whenever it is needed and is
//! never mutated afterwards.

use std::collections::{HashMap, HashSet, VecDeque};

use super::store::GraphStore;
use super::types::CommitId;

/// Parent/child adjacency derived from a store.
#[derive(Debug, Default)]
pub struct CommitGraph {
    /// Parent ids for each commit.
    parents: HashMap<CommitId, Vec<CommitId>>,
    /// Cached children sets (derived from parents).
    children: HashMap<CommitId, HashSet<CommitId>>,
}

impl CommitGraph {
    /// Create an empty commit graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph for every commit in the store.
    pub fn from_store(store: &GraphStore) -> Self {
        let mut graph = Self::new();
        for commit in store.commits() {
            graph.add_commit(commit.id.clone(), commit.parents.clone());
        }
        graph
    }

    /// Add a commit and its parent edges.
    ///
    /// This also updates the children cache.
    pub fn add_commit(&mut self, id: CommitId, parents: Vec<CommitId>) {
        for parent in &parents {
            self.children
                .entry(parent.clone())
                .or_default()
                .insert(id.clone());
        }
        self.parents.insert(id, parents);
    }

    /// Get the parents of a commit.
    pub fn parents(&self, id: &CommitId) -> &[CommitId] {
        self.parents.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Get the children of a commit.
    pub fn children(&self, id: &CommitId) -> Option<&HashSet<CommitId>> {
        self.children.get(id)
    }

    /// All commits reachable through parent edges (excluding `id` itself).
    ///
    /// # Example
    ///
    /// ```
    /// use gitgraph::core::graph::CommitGraph;
    /// use gitgraph::core::types::CommitId;
    ///
    /// let a = CommitId::new("a").unwrap();
    /// let b = CommitId::new("b").unwrap();
    /// let c = CommitId::new("c").unwrap();
    ///
    /// let mut graph = CommitGraph::new();
    /// graph.add_commit(a.clone(), vec![]);
    /// graph.add_commit(b.clone(), vec![a.clone()]);
    /// graph.add_commit(c.clone(), vec![b.clone()]);
    ///
    /// let ancestors = graph.ancestors(&c);
    /// assert!(ancestors.contains(&a));
    /// assert!(ancestors.contains(&b));
    /// ```
    pub fn ancestors(&self, id: &CommitId) -> HashSet<CommitId> {
        self.walk(id, |current| self.parents(current).iter().collect())
    }

    /// All commits reachable through child edges (excluding `id` itself).
    pub fn descendants(&self, id: &CommitId) -> HashSet<CommitId> {
        self.walk(id, |current| {
            self.children(current)
                .map(|c| c.iter().collect())
                .unwrap_or_default()
        })
    }

    /// Whether `ancestor` is reachable from `descendant` through parent edges.
    pub fn is_ancestor(&self, ancestor: &CommitId, descendant: &CommitId) -> bool {
        if ancestor == descendant {
            return false;
        }
        let mut seen = HashSet::new();
        let mut queue: VecDeque<&CommitId> = self.parents(descendant).iter().collect();
        while let Some(current) = queue.pop_front() {
            if current == ancestor {
                return true;
            }
            if seen.insert(current) {
                queue.extend(self.parents(current));
            }
        }
        false
    }

    /// Whether neither commit is an ancestor of the other.
    pub fn independent(&self, a: &CommitId, b: &CommitId) -> bool {
        a != b && !self.is_ancestor(a, b) && !self.is_ancestor(b, a)
    }

    fn walk<'a, F>(&'a self, start: &CommitId, next: F) -> HashSet<CommitId>
    where
        F: Fn(&CommitId) -> Vec<&'a CommitId>,
    {
        let mut result = HashSet::new();
        let mut queue: VecDeque<&CommitId> = next(start).into_iter().collect();

        while let Some(current) = queue.pop_front() {
            if result.insert(current.clone()) {
                queue.extend(next(current));
            }
        }

        result
    }
}
