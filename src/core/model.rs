//! core::model
//!
//! Commit and branch records owned by the [`GraphStore`](super::store::GraphStore).
//!
//! # Invariants
//!
//! - A commit's parents existed before the commit was created
//! - A commit is never mutated after creation except to attach a tag
//! - Every commit names a branch that existed when it was created

use serde::Serialize;

use super::types::{BranchName, CommitId, CommitKind};

/// A single commit in the synthetic history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Commit {
    /// Unique id (caller-supplied or generated).
    pub id: CommitId,
    /// Monotonic creation order.
    pub seq: u64,
    /// Parent ids: empty for a root, one for a normal commit, two for a
    /// merge or cherry-pick (primary parent first).
    pub parents: Vec<CommitId>,
    /// Branch the commit was created on.
    pub branch: BranchName,
    /// Structural kind.
    pub kind: CommitKind,
    /// Symbol override requested for a merge commit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_kind: Option<CommitKind>,
    /// Tags attached to the commit.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Commit message.
    pub message: String,
    /// Text drawn next to the marker instead of the id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Commit {
    /// The kind used to pick the commit marker.
    pub fn display_kind(&self) -> CommitKind {
        self.custom_kind.unwrap_or(self.kind)
    }

    /// The primary parent (the predecessor on the commit's own line).
    pub fn primary_parent(&self) -> Option<&CommitId> {
        self.parents.first()
    }

    /// Whether this commit joins two lines of history.
    pub fn is_merge(&self) -> bool {
        self.kind == CommitKind::Merge
    }

    /// Whether this commit was produced by a cherry-pick.
    pub fn is_cherry_pick(&self) -> bool {
        self.kind == CommitKind::CherryPick
    }

    /// Text drawn next to the commit marker.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(self.id.as_str())
    }

    /// Whether this commit has no parents.
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }
}

/// A branch record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Branch {
    /// Branch name.
    pub name: BranchName,
    /// Explicit display order, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    /// Current tip, `None` until the branch points at a commit.
    pub tip: Option<CommitId>,
    /// Creation position among all branches (0 for the default branch).
    pub created: usize,
}
