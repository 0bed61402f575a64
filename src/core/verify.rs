//! core::verify
//!
//! Fast verification of store invariants before layout.
//!
//! The store's operations make these violations unreachable. A failure here
//! therefore indicates a defect, and the layout engine refuses to guess
//! positions for a snapshot that does not verify.
//!
//! # Checks
//!
//! - Every parent id names an existing commit
//! - Every parent was created before its child
//! - Every commit names an existing branch
//! - Sequence numbers are unique
//! - Parent arity matches the commit kind
//!
//! # Invariants
//!
//! - Never mutates the store
//! - Must be deterministic

use std::collections::HashSet;

use thiserror::Error;

use super::store::GraphStore;
use super::types::CommitKind;

/// Errors from verification.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerifyError {
    #[error("commit '{commit}' references missing parent '{parent}'")]
    DanglingParent { commit: String, parent: String },

    #[error("commit '{commit}' references parent '{parent}' created after it")]
    ForwardReference { commit: String, parent: String },

    #[error("commit '{commit}' is on unknown branch '{branch}'")]
    UnknownBranch { commit: String, branch: String },

    #[error("sequence number {0} is used by more than one commit")]
    DuplicateSeq(u64),

    #[error("commit '{commit}' of kind {kind} has {count} parents")]
    ParentArity {
        commit: String,
        kind: CommitKind,
        count: usize,
    },

    #[error("branch '{branch}' points at missing commit '{commit}'")]
    DanglingTip { branch: String, commit: String },
}

/// Result of fast verification.
#[derive(Debug)]
pub struct VerifyResult {
    /// Whether verification passed
    pub ok: bool,
    /// Errors found during verification
    pub errors: Vec<VerifyError>,
}

impl VerifyResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            ok: true,
            errors: vec![],
        }
    }

    /// Create a failed result with errors.
    pub fn failure(errors: Vec<VerifyError>) -> Self {
        Self { ok: false, errors }
    }
}

/// Perform fast verification of a store snapshot.
pub fn fast_verify(store: &GraphStore) -> VerifyResult {
    let mut errors = Vec::new();
    let mut seqs = HashSet::new();

    for commit in store.commits() {
        if !seqs.insert(commit.seq) {
            errors.push(VerifyError::DuplicateSeq(commit.seq));
        }

        if store.branch_by_name(&commit.branch).is_none() {
            errors.push(VerifyError::UnknownBranch {
                commit: commit.id.to_string(),
                branch: commit.branch.to_string(),
            });
        }

        let arity_ok = match commit.kind {
            CommitKind::Normal | CommitKind::Reverse | CommitKind::Highlight => {
                commit.parents.len() <= 1
            }
            CommitKind::Merge | CommitKind::CherryPick => {
                commit.parents.len() == 2 && commit.parents[0] != commit.parents[1]
            }
        };
        if !arity_ok {
            errors.push(VerifyError::ParentArity {
                commit: commit.id.to_string(),
                kind: commit.kind,
                count: commit.parents.len(),
            });
        }

        for parent in &commit.parents {
            match store.commit_by_id(parent) {
                None => errors.push(VerifyError::DanglingParent {
                    commit: commit.id.to_string(),
                    parent: parent.to_string(),
                }),
                Some(p) if p.seq >= commit.seq => errors.push(VerifyError::ForwardReference {
                    commit: commit.id.to_string(),
                    parent: parent.to_string(),
                }),
                Some(_) => {}
            }
        }
    }

    for branch in store.branches() {
        if let Some(tip) = &branch.tip {
            if store.commit_by_id(tip).is_none() {
                errors.push(VerifyError::DanglingTip {
                    branch: branch.name.to_string(),
                    commit: tip.to_string(),
                });
            }
        }
    }

    if errors.is_empty() {
        VerifyResult::success()
    } else {
        VerifyResult::failure(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::{CherryPickArgs, CommitArgs, MergeArgs};

    #[test]
    fn empty_store_verifies() {
        assert!(fast_verify(&GraphStore::new()).ok);
    }

    #[test]
    fn store_built_by_operations_verifies() {
        let mut store = GraphStore::new();
        store.commit(CommitArgs::new("a").with_id("A")).unwrap();
        store.branch("dev", None).unwrap();
        store.checkout("dev").unwrap();
        store.commit(CommitArgs::new("b").with_id("B")).unwrap();
        store.checkout("main").unwrap();
        store.commit(CommitArgs::new("c")).unwrap();
        store.cherry_pick(CherryPickArgs::new("B")).unwrap();
        store.merge(MergeArgs::new("dev")).unwrap();

        let result = fast_verify(&store);
        assert!(result.ok, "{:?}", result.errors);
        assert!(result.errors.is_empty());
    }
}
