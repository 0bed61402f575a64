//! core::ops
//!
//! Serializable operation scripts.
//!
//! A [`Script`] is the ordered call sequence a diagram source produces: each
//! [`Operation`] maps onto one [`GraphStore`] operation. Scripts are read from
//! JSON or TOML and applied in order, stopping at the first failure.
//!
//! # Example
//!
//! ```toml
//! orientation = "TB"
//!
//! [[operations]]
//! op = "commit"
//! id = "root"
//!
//! [[operations]]
//! op = "branch"
//! name = "feature"
//!
//! [[operations]]
//! op = "checkout"
//! name = "feature"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::errors::GraphError;
use super::store::{CherryPickArgs, CommitArgs, GraphStore, MergeArgs};
use super::types::{CommitKind, Orientation};

/// Errors from loading or applying a script.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read script '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse script '{path}': {message}")]
    Parse { path: PathBuf, message: String },

    #[error("operation {index} ({op}) failed: {source}")]
    Apply {
        index: usize,
        op: &'static str,
        #[source]
        source: GraphError,
    },
}

/// One store operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    Commit {
        #[serde(default)]
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        #[serde(default)]
        kind: CommitKind,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tags: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
    Branch {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        order: Option<i64>,
    },
    Checkout {
        name: String,
    },
    Merge {
        branch: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tags: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        kind: Option<CommitKind>,
    },
    CherryPick {
        source: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        anchor: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tags: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        parent: Option<String>,
    },
    Tag {
        commit: String,
        tag: String,
    },
    Orientation {
        direction: Orientation,
    },
    Clear,
}

impl Operation {
    /// Short name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Commit { .. } => "commit",
            Operation::Branch { .. } => "branch",
            Operation::Checkout { .. } => "checkout",
            Operation::Merge { .. } => "merge",
            Operation::CherryPick { .. } => "cherry_pick",
            Operation::Tag { .. } => "tag",
            Operation::Orientation { .. } => "orientation",
            Operation::Clear => "clear",
        }
    }

    /// Apply this operation to a store.
    pub fn apply(&self, store: &mut GraphStore) -> Result<(), GraphError> {
        match self.clone() {
            Operation::Commit {
                message,
                id,
                kind,
                tags,
                label,
            } => {
                store.commit(CommitArgs {
                    message,
                    kind,
                    id,
                    tags,
                    label,
                })?;
            }
            Operation::Branch { name, order } => store.branch(&name, order)?,
            Operation::Checkout { name } => store.checkout(&name)?,
            Operation::Merge {
                branch,
                id,
                tags,
                kind,
            } => {
                store.merge(MergeArgs {
                    branch,
                    id,
                    tags,
                    kind: kind.unwrap_or(CommitKind::Merge),
                })?;
            }
            Operation::CherryPick {
                source,
                anchor,
                id,
                tags,
                parent,
            } => {
                store.cherry_pick(CherryPickArgs {
                    source,
                    anchor,
                    id,
                    tags,
                    parent,
                })?;
            }
            Operation::Tag { commit, tag } => store.tag(&commit, tag)?,
            Operation::Orientation { direction } => store.set_orientation(direction),
            Operation::Clear => store.clear(),
        }
        Ok(())
    }
}

/// An ordered list of operations with an optional orientation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Script {
    /// Orientation applied before the operations run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Orientation>,
    pub operations: Vec<Operation>,
}

impl Script {
    /// Load a script, choosing the format by extension (`.toml` or JSON).
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ScriptError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        let is_toml = path.extension().and_then(|e| e.to_str()) == Some("toml");
        let parsed = if is_toml {
            toml::from_str(&contents).map_err(|e| e.to_string())
        } else {
            serde_json::from_str(&contents).map_err(|e| e.to_string())
        };

        parsed.map_err(|message| ScriptError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Apply every operation in order.
    ///
    /// Stops at the first failing operation. Operations before it stay
    /// applied; the failing one leaves the store untouched.
    pub fn apply(&self, store: &mut GraphStore) -> Result<(), ScriptError> {
        if let Some(orientation) = self.orientation {
            store.set_default_orientation(orientation);
        }
        for (index, op) in self.operations.iter().enumerate() {
            debug!(index, op = op.name(), "apply");
            op.apply(store).map_err(|source| ScriptError::Apply {
                index,
                op: op.name(),
                source,
            })?;
        }
        Ok(())
    }
}
