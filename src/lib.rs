//! gitgraph - commit-graph state model and diagram layout
//!
//! gitgraph models a synthetic Git-style history (branches, commits, merges,
//! cherry-picks) and computes the geometry needed to draw it: branch lanes,
//! commit coordinates and routed connector paths in left-to-right,
//! top-to-bottom or bottom-to-top orientation.
//!
//! # Architecture
//!
//! Data flows one way:
//!
//! - [`core`] - Domain types, the [`GraphStore`](core::store::GraphStore)
//!   aggregate and its validated operations, verification, configuration
//! - [`layout`] - Pure functions from a store snapshot to a geometry bundle
//! - [`cli`] - Command-line front end (scripts in, JSON geometry out)
//! - [`ui`] - Output and logging setup for the binary
//!
//! # Correctness Invariants
//!
//! 1. Operations either fully succeed or leave the store unchanged
//! 2. Parents always exist before their children
//! 3. Layout never mutates the store and is deterministic
//! 4. A snapshot that fails verification is never laid out

pub mod cli;
pub mod core;
pub mod layout;
pub mod ui;
