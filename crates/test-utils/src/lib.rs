//! Shared test utilities for the volume-pipeline workspace.
//!
//! This crate provides common testing infrastructure:
//! - Canonical mesh fixtures (triangles, quads, degenerate topology)
//! - Synthetic NRRD container builders
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod fixtures;
pub mod generators;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;
