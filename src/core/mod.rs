//! core
//!
//! Core domain types, the graph store, and its operations.
//!
//! # Modules
//!
//! - [`types`] - Strong types: BranchName, CommitId, CommitKind, Orientation
//! - [`model`] - Commit and branch records
//! - [`store`] - The GraphStore aggregate and its operations
//! - [`errors`] - Validation errors raised by operations
//! - [`graph`] - Parent/child adjacency and ancestry queries
//! - [`verify`] - Fast verification of store invariants
//! - [`ops`] - Serializable operation scripts
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - One store per diagram, passed explicitly; no global state
//! - All verification is deterministic

pub mod config;
pub mod errors;
pub mod graph;
pub mod model;
pub mod ops;
pub mod store;
pub mod types;
pub mod verify;
