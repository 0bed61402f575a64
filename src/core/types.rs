//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`BranchName`] - Validated branch name (Git refname rules)
//! - [`CommitId`] - Non-empty commit identifier
//! - [`CommitKind`] - Closed set of commit kinds
//! - [`Orientation`] - Direction in which time flows across the diagram
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented, preventing entire classes of bugs.
//!
//! # Examples
//!
//! ```
//! use gitgraph::core::types::{BranchName, CommitId};
//!
//! let branch = BranchName::new("feature/my-branch").unwrap();
//! let id = CommitId::new("0-a1b2c3d").unwrap();
//!
//! assert!(BranchName::new("invalid..name").is_err());
//! assert!(CommitId::new("").is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the branch every store starts with unless configured otherwise.
pub const DEFAULT_BRANCH: &str = "main";

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid branch name: {0}")]
    InvalidBranchName(String),

    #[error("invalid commit id: {0}")]
    InvalidCommitId(String),
}

/// A validated branch name.
///
/// Branch names must conform to Git's refname rules (see `git check-ref-format`):
/// - Cannot be empty
/// - Cannot start with `.` or `-`
/// - Cannot end with `.lock` or `/`
/// - Cannot contain `..`, `@{`, `//`, or ASCII control characters
/// - Cannot contain spaces, `~`, `^`, `:`, `\`, `?`, `*`, `[`
/// - Cannot be exactly `@`
///
/// # Example
///
/// ```
/// use gitgraph::core::types::BranchName;
///
/// let name = BranchName::new("feature/my-branch").unwrap();
/// assert_eq!(name.as_str(), "feature/my-branch");
///
/// assert!(BranchName::new("").is_err());
/// assert!(BranchName::new(".hidden").is_err());
/// assert!(BranchName::new("has space").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BranchName(String);

impl BranchName {
    /// Create a new validated branch name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidBranchName` if the name violates Git's refname rules.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    fn validate(name: &str) -> Result<(), TypeError> {
        if name.is_empty() {
            return Err(TypeError::InvalidBranchName(
                "branch name cannot be empty".into(),
            ));
        }

        if name == "@" {
            return Err(TypeError::InvalidBranchName(
                "branch name cannot be '@' (reserved)".into(),
            ));
        }

        if name.starts_with('.') || name.starts_with('-') {
            return Err(TypeError::InvalidBranchName(format!(
                "branch name cannot start with '{}'",
                &name[..1]
            )));
        }

        if name.ends_with(".lock") {
            return Err(TypeError::InvalidBranchName(
                "branch name cannot end with '.lock'".into(),
            ));
        }
        if name.ends_with('/') {
            return Err(TypeError::InvalidBranchName(
                "branch name cannot end with '/'".into(),
            ));
        }

        for forbidden in ["..", "@{", "//"] {
            if name.contains(forbidden) {
                return Err(TypeError::InvalidBranchName(format!(
                    "branch name cannot contain '{forbidden}'"
                )));
            }
        }

        const INVALID_CHARS: [char; 8] = [' ', '~', '^', ':', '\\', '?', '*', '['];
        for c in INVALID_CHARS {
            if name.contains(c) {
                return Err(TypeError::InvalidBranchName(format!(
                    "branch name cannot contain '{c}'"
                )));
            }
        }

        if name.chars().any(|c| c.is_ascii_control()) {
            return Err(TypeError::InvalidBranchName(
                "branch name cannot contain control characters".into(),
            ));
        }

        for component in name.split('/').filter(|c| !c.is_empty()) {
            if component.starts_with('.') {
                return Err(TypeError::InvalidBranchName(
                    "path component cannot start with '.'".into(),
                ));
            }
            if component.ends_with(".lock") {
                return Err(TypeError::InvalidBranchName(
                    "path component cannot end with '.lock'".into(),
                ));
            }
        }

        Ok(())
    }

    /// The name of the branch every store starts with unless configured otherwise.
    pub fn main() -> Self {
        Self(DEFAULT_BRANCH.to_string())
    }

    /// Get the branch name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for BranchName {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<BranchName> for String {
    fn from(name: BranchName) -> Self {
        name.0
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A commit identifier.
///
/// Ids are opaque labels: either supplied by the caller or generated by the
/// store. The only rules are that an id is non-empty and free of control
/// characters and surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CommitId(String);

impl CommitId {
    /// Create a new commit id.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidCommitId` for empty ids, ids with leading or
    /// trailing whitespace, and ids containing control characters.
    pub fn new(id: impl Into<String>) -> Result<Self, TypeError> {
        let id = id.into();
        if id.is_empty() {
            return Err(TypeError::InvalidCommitId("commit id cannot be empty".into()));
        }
        if id.trim() != id {
            return Err(TypeError::InvalidCommitId(format!(
                "commit id '{id}' has surrounding whitespace"
            )));
        }
        if id.chars().any(|c| c.is_control()) {
            return Err(TypeError::InvalidCommitId(
                "commit id cannot contain control characters".into(),
            ));
        }
        Ok(Self(id))
    }

    /// Build a store-generated id of the form `<seq>-<digest>`.
    pub(crate) fn generated(seq: u64, digest: &str) -> Self {
        Self(format!("{seq}-{digest}"))
    }

    /// Get the commit id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CommitId {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<CommitId> for String {
    fn from(id: CommitId) -> Self {
        id.0
    }
}

impl AsRef<str> for CommitId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CommitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kind of a commit.
///
/// `Merge` and `CherryPick` are structural: they are only produced by the
/// `merge` and `cherry_pick` operations. The remaining kinds only affect how
/// the commit marker is drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommitKind {
    #[default]
    Normal,
    Reverse,
    Highlight,
    Merge,
    CherryPick,
}

impl CommitKind {
    /// Whether this kind may only be created by a dedicated operation.
    pub fn is_structural(self) -> bool {
        matches!(self, CommitKind::Merge | CommitKind::CherryPick)
    }
}

impl std::fmt::Display for CommitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CommitKind::Normal => "NORMAL",
            CommitKind::Reverse => "REVERSE",
            CommitKind::Highlight => "HIGHLIGHT",
            CommitKind::Merge => "MERGE",
            CommitKind::CherryPick => "CHERRY_PICK",
        };
        f.write_str(s)
    }
}

/// Direction in which time flows across the diagram.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Left to right: time along x, branch lanes along y.
    #[default]
    LR,
    /// Top to bottom: time along y, branch lanes along x.
    TB,
    /// Bottom to top: time along y (earliest at the bottom), lanes along x.
    BT,
}

impl Orientation {
    /// Whether time flows along the vertical axis.
    pub fn is_vertical(self) -> bool {
        matches!(self, Orientation::TB | Orientation::BT)
    }
}

impl std::str::FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "LR" => Ok(Orientation::LR),
            "TB" => Ok(Orientation::TB),
            "BT" => Ok(Orientation::BT),
            other => Err(format!("unknown orientation '{other}', expected LR, TB or BT")),
        }
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Orientation::LR => "LR",
            Orientation::TB => "TB",
            Orientation::BT => "BT",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod branch_name {
        use super::*;

        #[test]
        fn valid_branch_names() {
            assert!(BranchName::new("main").is_ok());
            assert!(BranchName::new("feature/foo").is_ok());
            assert!(BranchName::new("fix-123").is_ok());
            assert!(BranchName::new("user@feature").is_ok());
            assert!(BranchName::new("with.dot").is_ok());
        }

        #[test]
        fn empty_name_rejected() {
            assert!(BranchName::new("").is_err());
        }

        #[test]
        fn leading_dot_or_dash_rejected() {
            assert!(BranchName::new(".hidden").is_err());
            assert!(BranchName::new("foo/.hidden").is_err());
            assert!(BranchName::new("-flag").is_err());
        }

        #[test]
        fn lock_suffix_and_trailing_slash_rejected() {
            assert!(BranchName::new("branch.lock").is_err());
            assert!(BranchName::new("foo/bar.lock").is_err());
            assert!(BranchName::new("branch/").is_err());
        }

        #[test]
        fn forbidden_sequences_rejected() {
            assert!(BranchName::new("bad..path").is_err());
            assert!(BranchName::new("foo@{bar").is_err());
            assert!(BranchName::new("foo//bar").is_err());
            assert!(BranchName::new("@").is_err());
            assert!(BranchName::new("has space").is_err());
            assert!(BranchName::new("tab\there").is_err());
        }

        #[test]
        fn serde_uses_plain_string() {
            let name = BranchName::new("develop").unwrap();
            assert_eq!(serde_json::to_string(&name).unwrap(), "\"develop\"");
            assert!(serde_json::from_str::<BranchName>("\"a..b\"").is_err());
        }
    }

    mod commit_id {
        use super::*;

        #[test]
        fn accepts_free_form_labels() {
            assert!(CommitId::new("abc").is_ok());
            assert!(CommitId::new("release 1.0").is_ok());
            assert!(CommitId::new("3-deadbee").is_ok());
        }

        #[test]
        fn rejects_empty_and_padded() {
            assert!(CommitId::new("").is_err());
            assert!(CommitId::new(" x").is_err());
            assert!(CommitId::new("x\n").is_err());
        }

        #[test]
        fn orders_lexically() {
            let a = CommitId::new("a").unwrap();
            let b = CommitId::new("b").unwrap();
            assert!(a < b);
        }
    }

    #[test]
    fn commit_kind_serde_names() {
        assert_eq!(
            serde_json::to_string(&CommitKind::CherryPick).unwrap(),
            "\"CHERRY_PICK\""
        );
        let kind: CommitKind = serde_json::from_str("\"HIGHLIGHT\"").unwrap();
        assert_eq!(kind, CommitKind::Highlight);
        assert!(CommitKind::Merge.is_structural());
        assert!(!CommitKind::Reverse.is_structural());
    }

    #[test]
    fn orientation_parses_case_insensitively() {
        assert_eq!("lr".parse::<Orientation>(), Ok(Orientation::LR));
        assert_eq!("BT".parse::<Orientation>(), Ok(Orientation::BT));
        assert!("RL".parse::<Orientation>().is_err());
        assert!(Orientation::TB.is_vertical());
        assert!(!Orientation::LR.is_vertical());
    }
}
