//! depscope - module dependency graph builder
//!
//! This crate scans a source tree in one language (Python, JavaScript,
//! TypeScript or Go), extracts each file's imports, resolves them to other
//! files in the tree and reports the resulting dependency graph, including
//! circular dependencies and highly coupled modules.

pub mod analysis;
pub mod export;
pub mod graph;
