//! core::store
//!
//! The [`GraphStore`] aggregate and its mutating operations.
//!
//! # Ownership
//!
//! Each diagram owns exactly one store. There is no ambient or global state:
//! a store is created with [`GraphStore::new`], mutated through `&mut self`
//! operations and read by the layout engine through `&self`.
//!
//! # Atomicity
//!
//! Every operation validates all of its preconditions before touching any
//! field, so a failed operation leaves the store exactly as it was.
//!
//! # Example
//!
//! ```
//! use gitgraph::core::store::{CommitArgs, GraphStore, MergeArgs};
//!
//! let mut store = GraphStore::new();
//! store.commit(CommitArgs::new("root")).unwrap();
//! store.branch("feature", None).unwrap();
//! store.checkout("feature").unwrap();
//! store.commit(CommitArgs::new("f1")).unwrap();
//! store.checkout("main").unwrap();
//! let merge = store.merge(MergeArgs::new("feature")).unwrap();
//! assert_eq!(merge.parents.len(), 2);
//! ```

use std::collections::HashMap;

use sha2::{Digest, Sha256};
use tracing::debug;

use super::errors::GraphError;
use super::model::{Branch, Commit};
use super::types::{BranchName, CommitId, CommitKind, Orientation};

/// Arguments for [`GraphStore::commit`].
#[derive(Debug, Clone, Default)]
pub struct CommitArgs {
    pub message: String,
    pub kind: CommitKind,
    pub id: Option<String>,
    pub tags: Vec<String>,
    /// Display text; the id is drawn when unset.
    pub label: Option<String>,
}

impl CommitArgs {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_kind(mut self, kind: CommitKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Arguments for [`GraphStore::merge`].
#[derive(Debug, Clone)]
pub struct MergeArgs {
    pub branch: String,
    pub id: Option<String>,
    pub tags: Vec<String>,
    pub kind: CommitKind,
}

impl MergeArgs {
    pub fn new(branch: impl Into<String>) -> Self {
        Self {
            branch: branch.into(),
            id: None,
            tags: Vec::new(),
            kind: CommitKind::Merge,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_kind(mut self, kind: CommitKind) -> Self {
        self.kind = kind;
        self
    }
}

/// Arguments for [`GraphStore::cherry_pick`].
#[derive(Debug, Clone, Default)]
pub struct CherryPickArgs {
    /// Commit whose change is replayed.
    pub source: String,
    /// Commit to attach the new commit to; defaults to the current head.
    pub anchor: Option<String>,
    pub id: Option<String>,
    /// Tags for the new commit; a `cherry-pick:<source>` tag is used when empty.
    pub tags: Vec<String>,
    /// Which parent of a merge source to pick relative to.
    pub parent: Option<String>,
}

impl CherryPickArgs {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    pub fn onto(mut self, anchor: impl Into<String>) -> Self {
        self.anchor = Some(anchor.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }
}

/// The mutable commit graph of a single diagram.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphStore {
    commits: HashMap<CommitId, Commit>,
    branches: HashMap<BranchName, Branch>,
    head: Option<CommitId>,
    current_branch: BranchName,
    seq: u64,
    orientation: Orientation,
    default_branch: BranchName,
    default_order: i64,
    default_orientation: Orientation,
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphStore {
    /// Create an empty store with a `main` branch at order 0.
    pub fn new() -> Self {
        Self::with_default_branch(BranchName::main(), 0)
    }

    /// Create an empty store whose default branch has the given name and order.
    pub fn with_default_branch(name: BranchName, order: i64) -> Self {
        let mut store = Self {
            commits: HashMap::new(),
            branches: HashMap::new(),
            head: None,
            current_branch: name.clone(),
            seq: 0,
            orientation: Orientation::default(),
            default_branch: name,
            default_order: order,
            default_orientation: Orientation::default(),
        };
        store.clear();
        store
    }

    /// Use `orientation` now and after every [`clear`](Self::clear).
    pub fn with_default_orientation(mut self, orientation: Orientation) -> Self {
        self.set_default_orientation(orientation);
        self
    }

    /// Set the orientation that [`clear`](Self::clear) restores, and switch to it.
    pub fn set_default_orientation(&mut self, orientation: Orientation) {
        self.default_orientation = orientation;
        self.orientation = orientation;
    }

    /// Reset to the initial state: only the default branch, no commits,
    /// no head, a zero sequence counter and the default orientation.
    pub fn clear(&mut self) {
        self.commits.clear();
        self.branches.clear();
        self.branches.insert(
            self.default_branch.clone(),
            Branch {
                name: self.default_branch.clone(),
                order: Some(self.default_order),
                tip: None,
                created: 0,
            },
        );
        self.head = None;
        self.current_branch = self.default_branch.clone();
        self.seq = 0;
        self.orientation = self.default_orientation;
    }

    /// Create a commit on the current branch on top of `head`.
    ///
    /// # Errors
    ///
    /// - `ReservedKind` for `Merge`/`CherryPick` kinds
    /// - `InvalidName` for a malformed explicit id
    /// - `DuplicateId` if the explicit id is taken
    pub fn commit(&mut self, args: CommitArgs) -> Result<Commit, GraphError> {
        if args.kind.is_structural() {
            return Err(GraphError::ReservedKind(args.kind));
        }
        let id = self.resolve_id(args.id, &args.message)?;
        let parents = self.head.iter().cloned().collect();
        let branch = self.current_branch.clone();

        let commit = self.record(Commit {
            id,
            seq: self.seq,
            parents,
            branch: branch.clone(),
            kind: args.kind,
            custom_kind: None,
            tags: args.tags,
            message: args.message,
            label: args.label,
        });
        self.advance(&branch, &commit.id);
        debug!(id = %commit.id, branch = %branch, seq = commit.seq, "commit");
        Ok(commit)
    }

    /// Create a branch starting at the current head.
    ///
    /// The current branch and head are left unchanged; a separate
    /// [`checkout`](Self::checkout) switches onto the new branch.
    pub fn branch(&mut self, name: &str, order: Option<i64>) -> Result<(), GraphError> {
        let name = BranchName::new(name)?;
        if self.branches.contains_key(&name) {
            return Err(GraphError::DuplicateBranch(name));
        }
        debug!(branch = %name, tip = ?self.head, "branch");
        let created = self.branches.len();
        self.branches.insert(
            name.clone(),
            Branch {
                name,
                order,
                tip: self.head.clone(),
                created,
            },
        );
        Ok(())
    }

    /// Switch to an existing branch; head moves to the branch tip.
    pub fn checkout(&mut self, name: &str) -> Result<(), GraphError> {
        let branch = self
            .lookup_branch(name)
            .ok_or_else(|| GraphError::UnknownBranch(name.to_string()))?;
        let (name, tip) = (branch.name.clone(), branch.tip.clone());
        debug!(branch = %name, head = ?tip, "checkout");
        self.current_branch = name;
        self.head = tip;
        Ok(())
    }

    /// Merge another branch into the current one.
    ///
    /// Preconditions are checked in order: the branch exists, it is not the
    /// current branch, both branches point at a commit, they do not point at
    /// the same commit, and an explicit id is free.
    pub fn merge(&mut self, args: MergeArgs) -> Result<Commit, GraphError> {
        let other = self
            .lookup_branch(&args.branch)
            .ok_or_else(|| GraphError::UnknownBranch(args.branch.clone()))?;
        let other_name = other.name.clone();
        let other_tip = other.tip.clone();

        if other_name == self.current_branch {
            return Err(GraphError::SelfMerge(other_name));
        }
        let head = self
            .head
            .clone()
            .ok_or_else(|| GraphError::EmptyBranch(self.current_branch.clone()))?;
        let other_tip = other_tip.ok_or_else(|| GraphError::EmptyBranch(other_name.clone()))?;
        if head == other_tip {
            return Err(GraphError::NoOpMerge {
                current: self.current_branch.clone(),
                other: other_name,
                commit: head,
            });
        }
        if args.kind == CommitKind::CherryPick {
            return Err(GraphError::ReservedKind(args.kind));
        }

        let message = format!("merged branch {} into {}", other_name, self.current_branch);
        let id = self.resolve_id(args.id, &message)?;
        let branch = self.current_branch.clone();
        let custom_kind = (args.kind != CommitKind::Merge).then_some(args.kind);

        let commit = self.record(Commit {
            id,
            seq: self.seq,
            parents: vec![head, other_tip],
            branch: branch.clone(),
            kind: CommitKind::Merge,
            custom_kind,
            tags: args.tags,
            message,
            label: None,
        });
        self.advance(&branch, &commit.id);
        debug!(id = %commit.id, into = %branch, from = %other_name, "merge");
        Ok(commit)
    }

    /// Replay `source` on top of an anchor commit.
    ///
    /// The anchor is `args.anchor` when given, otherwise the current head. The
    /// new commit lands on the anchor's branch. Sources already on that branch
    /// (compared by name) or equal to the anchor are rejected with
    /// `SelfCherryPick`.
    pub fn cherry_pick(&mut self, args: CherryPickArgs) -> Result<Commit, GraphError> {
        let source = self
            .lookup_commit(&args.source)
            .ok_or_else(|| GraphError::UnknownCommit(args.source.clone()))?
            .clone();

        let (anchor, target) = match &args.anchor {
            Some(anchor) => {
                let anchor = self
                    .lookup_commit(anchor)
                    .ok_or_else(|| GraphError::UnknownCommit(anchor.clone()))?;
                (anchor.id.clone(), anchor.branch.clone())
            }
            None => {
                let head = self
                    .head
                    .clone()
                    .ok_or_else(|| GraphError::EmptyBranch(self.current_branch.clone()))?;
                (head, self.current_branch.clone())
            }
        };

        if source.branch == target || source.id == anchor {
            return Err(GraphError::SelfCherryPick {
                commit: source.id,
                branch: target,
            });
        }

        match (&args.parent, source.is_merge()) {
            (None, true) => return Err(GraphError::MergeSourceNeedsParent(source.id)),
            (Some(parent), true) if !source.parents.iter().any(|p| p.as_str() == parent) => {
                return Err(GraphError::InvalidCherryPickParent {
                    commit: source.id,
                    parent: parent.clone(),
                })
            }
            (Some(parent), false) => {
                return Err(GraphError::InvalidCherryPickParent {
                    commit: source.id,
                    parent: parent.clone(),
                })
            }
            _ => {}
        }

        let message = format!("cherry-picked {} into {}", source.id, target);
        let id = self.resolve_id(args.id, &message)?;
        let tags = if args.tags.is_empty() {
            match &args.parent {
                Some(parent) => vec![format!("cherry-pick:{}|parent:{}", source.id, parent)],
                None => vec![format!("cherry-pick:{}", source.id)],
            }
        } else {
            args.tags
        };

        let commit = self.record(Commit {
            id,
            seq: self.seq,
            parents: vec![anchor.clone(), source.id.clone()],
            branch: target.clone(),
            kind: CommitKind::CherryPick,
            custom_kind: None,
            tags,
            message,
            label: None,
        });

        if let Some(branch) = self.branches.get_mut(&target) {
            if branch.tip.as_ref() == Some(&anchor) {
                branch.tip = Some(commit.id.clone());
            }
        }
        if target == self.current_branch && self.head.as_ref() == Some(&anchor) {
            self.head = Some(commit.id.clone());
        }
        debug!(id = %commit.id, source = %source.id, onto = %anchor, "cherry-pick");
        Ok(commit)
    }

    /// Attach a tag to an existing commit. Re-adding a present tag is a no-op.
    pub fn tag(&mut self, commit: &str, tag: impl Into<String>) -> Result<(), GraphError> {
        let tag = tag.into();
        let id = CommitId::new(commit).map_err(|_| GraphError::UnknownCommit(commit.to_string()))?;
        let commit = self
            .commits
            .get_mut(&id)
            .ok_or_else(|| GraphError::UnknownCommit(id.to_string()))?;
        if !commit.tags.contains(&tag) {
            commit.tags.push(tag);
        }
        Ok(())
    }

    /// Set the direction in which the diagram is laid out.
    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }

    /// Diagram orientation.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// All commits ordered by `seq`.
    pub fn commits(&self) -> Vec<&Commit> {
        let mut commits: Vec<&Commit> = self.commits.values().collect();
        commits.sort_by(|a, b| a.seq.cmp(&b.seq).then_with(|| a.id.cmp(&b.id)));
        commits
    }

    /// Look up a commit by id.
    pub fn commit_by_id(&self, id: &CommitId) -> Option<&Commit> {
        self.commits.get(id)
    }

    /// Number of commits.
    pub fn commit_count(&self) -> usize {
        self.commits.len()
    }

    /// All branches in creation order.
    pub fn branches(&self) -> Vec<&Branch> {
        let mut branches: Vec<&Branch> = self.branches.values().collect();
        branches.sort_by_key(|b| b.created);
        branches
    }

    /// Look up a branch by name.
    pub fn branch_by_name(&self, name: &BranchName) -> Option<&Branch> {
        self.branches.get(name)
    }

    /// The commit a new commit on the current branch would build on.
    pub fn head(&self) -> Option<&CommitId> {
        self.head.as_ref()
    }

    /// The branch selected by the last checkout.
    pub fn current_branch(&self) -> &BranchName {
        &self.current_branch
    }

    /// The branch created by `new()`/`clear()`.
    pub fn default_branch(&self) -> &BranchName {
        &self.default_branch
    }

    /// Next sequence number to be assigned.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    fn lookup_branch(&self, name: &str) -> Option<&Branch> {
        let name = BranchName::new(name).ok()?;
        self.branches.get(&name)
    }

    fn lookup_commit(&self, id: &str) -> Option<&Commit> {
        let id = CommitId::new(id).ok()?;
        self.commits.get(&id)
    }

    fn resolve_id(&self, explicit: Option<String>, message: &str) -> Result<CommitId, GraphError> {
        match explicit {
            Some(id) => {
                let id = CommitId::new(id)?;
                if self.commits.contains_key(&id) {
                    return Err(GraphError::DuplicateId(id));
                }
                Ok(id)
            }
            None => Ok(self.generate_id(message)),
        }
    }

    /// Deterministic id of the form `<seq>-<7 hex chars>`.
    fn generate_id(&self, message: &str) -> CommitId {
        let mut salt = 0u32;
        loop {
            let mut hasher = Sha256::new();
            hasher.update(self.current_branch.as_str().as_bytes());
            hasher.update([0]);
            hasher.update(self.seq.to_be_bytes());
            hasher.update([0]);
            hasher.update(message.as_bytes());
            hasher.update(salt.to_be_bytes());
            let digest = hex::encode(hasher.finalize());
            let id = CommitId::generated(self.seq, &digest[..7]);
            if !self.commits.contains_key(&id) {
                return id;
            }
            salt += 1;
        }
    }

    fn record(&mut self, commit: Commit) -> Commit {
        self.seq += 1;
        self.commits.insert(commit.id.clone(), commit.clone());
        commit
    }

    fn advance(&mut self, branch: &BranchName, id: &CommitId) {
        if let Some(branch) = self.branches.get_mut(branch) {
            branch.tip = Some(id.clone());
        }
        self.head = Some(id.clone());
    }
}
