//! core::errors
//!
//! Validation errors raised by [`GraphStore`](super::store::GraphStore) operations.
//!
//! Every variant describes a caller mistake. The failing operation leaves the
//! store untouched, so the caller can correct its input and retry.

use thiserror::Error;

use super::types::{BranchName, CommitId, CommitKind, TypeError};

/// Errors from store operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("commit id '{0}' already exists")]
    DuplicateId(CommitId),

    #[error("branch '{0}' already exists")]
    DuplicateBranch(BranchName),

    #[error("branch '{0}' does not exist")]
    UnknownBranch(String),

    #[error("commit '{0}' does not exist")]
    UnknownCommit(String),

    #[error("cannot merge branch '{0}' into itself")]
    SelfMerge(BranchName),

    #[error("cannot cherry-pick '{commit}' onto branch '{branch}': nothing to cherry-pick")]
    SelfCherryPick { commit: CommitId, branch: BranchName },

    #[error("branch '{0}' has no commits")]
    EmptyBranch(BranchName),

    #[error("nothing to merge: '{current}' and '{other}' both point at '{commit}'")]
    NoOpMerge {
        current: BranchName,
        other: BranchName,
        commit: CommitId,
    },

    #[error("commit kind {0} is reserved for its dedicated operation")]
    ReservedKind(CommitKind),

    #[error("'{0}' is a merge commit: a parent must be chosen to cherry-pick it")]
    MergeSourceNeedsParent(CommitId),

    #[error("'{parent}' is not a valid cherry-pick parent for '{commit}'")]
    InvalidCherryPickParent { commit: CommitId, parent: String },

    #[error(transparent)]
    InvalidName(#[from] TypeError),
}
