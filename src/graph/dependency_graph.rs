//! Module dependency graph implementation using petgraph.
//!
//! Provides a directed graph of source modules where an edge `a -> b` means
//! module `a` imports module `b`. Nodes keep their scan order and outgoing
//! edges keep their insertion order, so every traversal is deterministic.

use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::analysis::{Language, Module};

use super::cycles::{self, Cycle, CycleStrategy};
use super::index::ModuleIndex;
use super::resolve::resolve_import;

/// Represents a node in the dependency graph.
///
/// Each node is one scanned module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleNode {
    /// Relative module path (the graph key)
    pub path: String,
    /// File stem used in reports
    pub name: String,
}

impl ModuleNode {
    /// Creates a new module node.
    ///
    /// # Example
    ///
    /// ```rust
    /// use depscope::graph::ModuleNode;
    ///
    /// let node = ModuleNode::new("pkg/a.py", "a");
    /// assert_eq!(node.path, "pkg/a.py");
    /// ```
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }
}

/// A directed graph representing module imports.
///
/// The graph uses petgraph's `DiGraph` internally. Edges point from the
/// importing module to the imported one, are deduplicated, and may form
/// self-loops. Only scanned modules are ever nodes: imports that do not
/// resolve to one are dropped before reaching the graph.
///
/// # Example
///
/// ```rust
/// use depscope::graph::DependencyGraph;
///
/// let mut graph = DependencyGraph::new();
///
/// graph.add_module("a.py", "a");
/// graph.add_module("b.py", "b");
///
/// assert!(graph.add_edge("a.py", "b.py"));
/// assert!(!graph.add_edge("a.py", "b.py")); // already present
/// assert!(!graph.add_edge("a.py", "os.py")); // not a scanned module
///
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edge_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    /// The underlying directed graph
    graph: DiGraph<ModuleNode, ()>,
    /// Maps module paths to their node indices for O(1) lookup
    node_indices: HashMap<String, NodeIndex>,
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl DependencyGraph {
    /// Creates a new empty dependency graph.
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_indices: HashMap::new(),
        }
    }

    /// Creates a new graph with pre-allocated capacity.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            graph: DiGraph::with_capacity(nodes, edges),
            node_indices: HashMap::with_capacity(nodes),
        }
    }

    /// Builds the graph for a scanned module set.
    ///
    /// Every module becomes a node in slice order. Each raw import is then
    /// resolved against a [`ModuleIndex`] built over the same slice; resolved
    /// imports become edges, everything else is dropped as external.
    ///
    /// # Example
    ///
    /// ```rust
    /// use depscope::analysis::{Language, Module};
    /// use depscope::graph::DependencyGraph;
    ///
    /// let modules = vec![
    ///     Module::new("x.py").with_imports(["y", "os"]),
    ///     Module::new("y.py"),
    /// ];
    /// let graph = DependencyGraph::from_modules(&modules, Language::Python);
    ///
    /// assert_eq!(graph.edge_count(), 1);
    /// assert_eq!(graph.in_degree("y.py"), 1);
    /// assert!(!graph.contains("os"));
    /// ```
    pub fn from_modules(modules: &[Module], language: Language) -> Self {
        let index = ModuleIndex::new(modules);
        let edge_hint: usize = modules.iter().map(|m| m.imports.len()).sum();
        let mut graph = Self::with_capacity(modules.len(), edge_hint);

        for module in modules {
            graph.add_module(&module.path, &module.name);
        }

        for module in modules {
            for import in &module.imports {
                match resolve_import(import, &module.path, language, &index) {
                    Some(target) => {
                        graph.add_edge(&module.path, target);
                    }
                    None => debug!(from = %module.path, import = %import, "unresolved import"),
                }
            }
        }

        graph
    }

    /// Adds a module node.
    ///
    /// If a module with the same path already exists, returns its existing
    /// node index without modification.
    pub fn add_module(&mut self, path: &str, name: &str) -> NodeIndex {
        if let Some(&idx) = self.node_indices.get(path) {
            return idx;
        }

        let idx = self.graph.add_node(ModuleNode::new(path, name));
        self.node_indices.insert(path.to_string(), idx);
        idx
    }

    /// Adds an edge from `from` (the importer) to `to` (the imported module).
    ///
    /// # Returns
    ///
    /// `true` if the edge was added, `false` if either node doesn't exist or
    /// the edge is already present.
    pub fn add_edge(&mut self, from: &str, to: &str) -> bool {
        let (Some(&from_idx), Some(&to_idx)) =
            (self.node_indices.get(from), self.node_indices.get(to))
        else {
            return false;
        };

        if self.graph.contains_edge(from_idx, to_idx) {
            return false;
        }

        self.graph.add_edge(from_idx, to_idx, ());
        true
    }

    /// Gets a module node by path.
    pub fn get_node(&self, path: &str) -> Option<&ModuleNode> {
        self.node_indices
            .get(path)
            .and_then(|&idx| self.graph.node_weight(idx))
    }

    /// Modules imported by `path`, in the order the edges were added.
    pub fn get_dependencies(&self, path: &str) -> Vec<&ModuleNode> {
        let Some(&idx) = self.node_indices.get(path) else {
            return Vec::new();
        };

        self.successors(idx)
            .into_iter()
            .filter_map(|target| self.graph.node_weight(target))
            .collect()
    }

    /// Modules that import `path`.
    pub fn get_dependents(&self, path: &str) -> Vec<&ModuleNode> {
        let Some(&idx) = self.node_indices.get(path) else {
            return Vec::new();
        };

        let mut edges: Vec<_> = self.graph.edges_directed(idx, Direction::Incoming).collect();
        edges.sort_by_key(|edge| edge.id());
        edges
            .into_iter()
            .filter_map(|edge| self.graph.node_weight(edge.source()))
            .collect()
    }

    /// Number of distinct modules importing `path`.
    pub fn in_degree(&self, path: &str) -> usize {
        self.degree(path, Direction::Incoming)
    }

    /// Number of distinct modules `path` imports.
    pub fn out_degree(&self, path: &str) -> usize {
        self.degree(path, Direction::Outgoing)
    }

    fn degree(&self, path: &str, direction: Direction) -> usize {
        self.node_indices
            .get(path)
            .map_or(0, |&idx| self.graph.edges_directed(idx, direction).count())
    }

    /// All nodes in insertion (scan) order.
    pub fn get_all_nodes(&self) -> Vec<&ModuleNode> {
        self.graph.node_weights().collect()
    }

    /// All edges as `(from, to)` path pairs, grouped by source node in scan
    /// order and by insertion order within a source.
    pub fn edges(&self) -> Vec<(&str, &str)> {
        self.graph
            .node_indices()
            .flat_map(|source| {
                self.successors(source)
                    .into_iter()
                    .map(move |target| (source, target))
            })
            .map(|(source, target)| {
                (
                    self.graph[source].path.as_str(),
                    self.graph[target].path.as_str(),
                )
            })
            .collect()
    }

    /// Outgoing neighbours of `idx` in edge insertion order.
    ///
    /// petgraph hands out outgoing edges newest first; sorting by edge index
    /// restores the order they were added in.
    pub(crate) fn successors(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut edges: Vec<(EdgeIndex, NodeIndex)> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|edge| (edge.id(), edge.target()))
            .collect();
        edges.sort_by_key(|&(id, _)| id);
        edges.into_iter().map(|(_, target)| target).collect()
    }

    pub(crate) fn inner(&self) -> &DiGraph<ModuleNode, ()> {
        &self.graph
    }

    /// Checks if the graph contains cycles.
    ///
    /// # Example
    ///
    /// ```rust
    /// use depscope::graph::DependencyGraph;
    ///
    /// let mut graph = DependencyGraph::new();
    /// graph.add_module("a.py", "a");
    /// graph.add_module("b.py", "b");
    /// graph.add_edge("a.py", "b.py");
    /// graph.add_edge("b.py", "a.py"); // Creates a cycle
    ///
    /// assert!(graph.has_cycles());
    /// ```
    pub fn has_cycles(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }

    /// Detects cycles with the chosen strategy.
    ///
    /// See [`CycleStrategy`] for what each strategy does and does not report.
    ///
    /// # Example
    ///
    /// ```rust
    /// use depscope::graph::{CycleStrategy, DependencyGraph};
    ///
    /// let mut graph = DependencyGraph::new();
    /// for name in ["a", "b", "c"] {
    ///     graph.add_module(&format!("{name}.py"), name);
    /// }
    /// graph.add_edge("a.py", "b.py");
    /// graph.add_edge("b.py", "c.py");
    /// graph.add_edge("c.py", "a.py");
    ///
    /// let cycles = graph.detect_cycles(CycleStrategy::Traversal);
    /// assert_eq!(cycles.len(), 1);
    /// assert_eq!(cycles[0].nodes, vec!["a.py", "b.py", "c.py", "a.py"]);
    /// ```
    pub fn detect_cycles(&self, strategy: CycleStrategy) -> Vec<Cycle> {
        match strategy {
            CycleStrategy::Traversal => cycles::traversal_cycles(self),
            CycleStrategy::Components => cycles::component_cycles(self),
        }
    }

    /// Returns the set of module paths that are part of any strongly
    /// connected cycle, regardless of what the traversal reports.
    pub fn get_nodes_in_cycles(&self) -> HashSet<String> {
        cycles::component_cycles(self)
            .into_iter()
            .flat_map(|cycle| cycle.nodes)
            .collect()
    }

    /// Returns the number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Checks if the graph is empty.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Checks if a module exists in the graph.
    pub fn contains(&self, path: &str) -> bool {
        self.node_indices.contains_key(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_of(paths: &[&str], edges: &[(&str, &str)]) -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        for path in paths {
            graph.add_module(path, crate::analysis::stem_of(path));
        }
        for (from, to) in edges {
            graph.add_edge(from, to);
        }
        graph
    }

    #[test]
    fn test_create_empty_graph() {
        let graph = DependencyGraph::new();
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.is_empty());
        assert!(graph.edges().is_empty());
    }

    #[test]
    fn test_add_module_is_idempotent() {
        let mut graph = DependencyGraph::new();
        let idx = graph.add_module("a.py", "a");
        let idx2 = graph.add_module("a.py", "a");
        assert_eq!(idx, idx2);
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.get_node("a.py").unwrap().name, "a");
        assert!(graph.get_node("b.py").is_none());
    }

    #[test]
    fn test_add_edge_dedup_and_missing_nodes() {
        let mut graph = graph_of(&["a.py", "b.py"], &[]);
        assert!(graph.add_edge("a.py", "b.py"));
        assert!(!graph.add_edge("a.py", "b.py"));
        assert!(!graph.add_edge("a.py", "missing.py"));
        assert!(!graph.add_edge("missing.py", "a.py"));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_self_loop_allowed() {
        let mut graph = graph_of(&["a.py"], &[]);
        assert!(graph.add_edge("a.py", "a.py"));
        assert!(graph.has_cycles());
    }

    #[test]
    fn test_dependencies_keep_insertion_order() {
        let graph = graph_of(
            &["main.py", "z.py", "a.py", "m.py"],
            &[("main.py", "z.py"), ("main.py", "a.py"), ("main.py", "m.py")],
        );
        let names: Vec<_> = graph
            .get_dependencies("main.py")
            .iter()
            .map(|n| n.name.as_str())
            .collect();
        assert_eq!(names, vec!["z", "a", "m"]);
        assert!(graph.get_dependencies("nonexistent").is_empty());
    }

    #[test]
    fn test_get_dependents_and_degrees() {
        let graph = graph_of(&["x.py", "y.py"], &[("x.py", "y.py")]);

        assert_eq!(graph.in_degree("y.py"), 1);
        assert_eq!(graph.in_degree("x.py"), 0);
        assert_eq!(graph.out_degree("x.py"), 1);
        assert_eq!(graph.out_degree("y.py"), 0);
        assert_eq!(graph.in_degree("nope.py"), 0);

        let dependents = graph.get_dependents("y.py");
        assert_eq!(dependents.len(), 1);
        assert_eq!(dependents[0].path, "x.py");
    }

    #[test]
    fn test_edges_listing_order() {
        let graph = graph_of(
            &["a.py", "b.py", "c.py"],
            &[("b.py", "c.py"), ("a.py", "c.py"), ("a.py", "b.py")],
        );
        assert_eq!(
            graph.edges(),
            vec![("a.py", "c.py"), ("a.py", "b.py"), ("b.py", "c.py")]
        );
    }

    #[test]
    fn test_has_cycles_no_cycle() {
        let graph = graph_of(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);
        assert!(!graph.has_cycles());
    }

    #[test]
    fn test_from_modules_three_cycle() {
        let modules = vec![
            Module::new("a.py").with_imports(["b"]),
            Module::new("b.py").with_imports(["c"]),
            Module::new("c.py").with_imports(["a"]),
        ];
        let graph = DependencyGraph::from_modules(&modules, Language::Python);

        assert_eq!(graph.edge_count(), 3);
        let cycles = graph.detect_cycles(CycleStrategy::Traversal);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].nodes, vec!["a.py", "b.py", "c.py", "a.py"]);
    }

    #[test]
    fn test_from_modules_drops_external_imports() {
        let modules = vec![
            Module::new("app.py").with_imports(["os", "sys", "json", "util"]),
            Module::new("util.py").with_imports(["re"]),
        ];
        let graph = DependencyGraph::from_modules(&modules, Language::Python);

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edges(), vec![("app.py", "util.py")]);
        assert!(!graph.contains("os"));
    }

    #[test]
    fn test_from_modules_relative_python_import() {
        let modules = vec![
            Module::new("pkg/a.py").with_imports([".b"]),
            Module::new("pkg/b.py"),
        ];
        let graph = DependencyGraph::from_modules(&modules, Language::Python);
        assert_eq!(graph.edges(), vec![("pkg/a.py", "pkg/b.py")]);
    }

    #[test]
    fn test_from_modules_dedups_repeated_imports() {
        let modules = vec![
            Module::new("src/a.ts").with_imports(["./b", "./b.ts", "./b"]),
            Module::new("src/b.ts"),
        ];
        let graph = DependencyGraph::from_modules(&modules, Language::TypeScript);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_get_nodes_in_cycles() {
        let graph = graph_of(
            &["a", "b", "c", "d"],
            &[("a", "b"), ("b", "c"), ("c", "a"), ("a", "d")],
        );
        let cycle_nodes = graph.get_nodes_in_cycles();
        assert!(cycle_nodes.contains("a"));
        assert!(cycle_nodes.contains("b"));
        assert!(cycle_nodes.contains("c"));
        assert!(!cycle_nodes.contains("d"));
        assert_eq!(cycle_nodes.len(), 3);
    }
}
