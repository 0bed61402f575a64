//! ui
//!
//! User-facing output for the binary.
//!
//! # Modules
//!
//! - [`output`] - Output formatting and display
//! - [`logging`] - Tracing subscriber setup
//!
//! # Design
//!
//! All terminal output goes through this module so that `--quiet` and
//! `--debug` are honored consistently.

pub mod logging;
pub mod output;
