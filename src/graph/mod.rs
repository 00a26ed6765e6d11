//! Graph module for module dependency modeling.
//!
//! This module provides the [`DependencyGraph`] struct for building and
//! analyzing import relationships between scanned modules, the
//! [`ModuleIndex`] used to resolve imports, and cycle detection.
//!
//! # Example
//!
//! ```rust
//! use depscope::analysis::{Language, Module};
//! use depscope::graph::{CycleStrategy, DependencyGraph};
//!
//! let modules = vec![
//!     Module::new("a.py").with_imports(["b"]),
//!     Module::new("b.py").with_imports(["a", "os"]),
//! ];
//! let graph = DependencyGraph::from_modules(&modules, Language::Python);
//!
//! assert_eq!(graph.node_count(), 2);
//! assert_eq!(graph.edge_count(), 2);
//! assert_eq!(graph.detect_cycles(CycleStrategy::Traversal).len(), 1);
//! ```

mod cycles;
mod dependency_graph;
mod index;
mod resolve;

pub use cycles::{Cycle, CycleStrategy};
pub use dependency_graph::{DependencyGraph, ModuleNode};
pub use index::ModuleIndex;
pub use resolve::resolve_import;
