//! linkdeps - link a package into its dependents
//!
//! This library provides the pieces of the `linkdeps` CLI:
//! - Strict package.json decoding and dependency matching
//! - A lazy, node_modules-aware walk over a package tree
//! - Link target resolution (local directory or global package)
//! - Orchestration of `<pm> link` commands for every dependent

pub mod cli;
pub mod error;
pub mod link;
pub mod manifest;
pub mod orchestrator;
pub mod progress;
pub mod target;
pub mod walker;
