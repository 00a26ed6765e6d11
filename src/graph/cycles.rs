//! Circular dependency detection.
//!
//! Two strategies are available. [`CycleStrategy::Traversal`] is a single
//! depth-first pass that reports the cycles it happens to close; it is cheap
//! and its output follows scan order, but it is incomplete.
//! [`CycleStrategy::Components`] finds every strongly connected component
//! with Tarjan's algorithm and reports one cycle per component.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::str::FromStr;

use petgraph::algo::tarjan_scc;
use petgraph::graph::NodeIndex;

use crate::analysis::stem_of;

use super::dependency_graph::DependencyGraph;

/// How cycles are searched for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CycleStrategy {
    /// Depth-first search from every module in scan order with a global
    /// visited set. Each module's imports are expanded once per run, so a
    /// cycle only reachable through an already finished module is missed,
    /// and the same cycle may be reported more than once from different
    /// starting points.
    #[default]
    Traversal,
    /// One cycle per strongly connected component (and per self-loop).
    Components,
}

impl FromStr for CycleStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "traversal" | "dfs" => Ok(CycleStrategy::Traversal),
            "components" | "scc" => Ok(CycleStrategy::Components),
            _ => Err(format!(
                "Unknown cycle strategy: '{}'. Valid strategies: traversal, components",
                s
            )),
        }
    }
}

impl fmt::Display for CycleStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleStrategy::Traversal => write!(f, "traversal"),
            CycleStrategy::Components => write!(f, "components"),
        }
    }
}

/// A detected circular dependency.
///
/// `nodes` is a closed walk of module paths: the first path is repeated as
/// the last one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle {
    pub nodes: Vec<String>,
}

impl Cycle {
    /// Module paths in the cycle without the closing repeat.
    pub fn members(&self) -> &[String] {
        match self.nodes.split_last() {
            Some((_, rest)) if !rest.is_empty() => rest,
            _ => &self.nodes,
        }
    }

    /// Returns the number of distinct modules in the cycle.
    pub fn len(&self) -> usize {
        self.members().len()
    }

    /// Returns true if the cycle is empty (should not happen in practice).
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Full paths joined with arrows, e.g. `pkg/a.py → pkg/b.py → pkg/a.py`.
    pub fn cycle_path(&self) -> String {
        self.nodes.join(" → ")
    }

    /// Module stems joined with arrows, e.g. `a → b → a`.
    pub fn stem_chain(&self) -> String {
        self.nodes
            .iter()
            .map(|p| stem_of(p))
            .collect::<Vec<_>>()
            .join(" → ")
    }
}

struct Frame {
    node: NodeIndex,
    successors: Vec<NodeIndex>,
    next: usize,
}

/// Path-tracking DFS over every module in scan order.
///
/// Reaching a module that is already on the current path closes a cycle:
/// the path from that module's position to the end, plus the module again.
/// The walk does not continue through it. Iterative so deep import chains
/// cannot overflow the stack.
pub(crate) fn traversal_cycles(graph: &DependencyGraph) -> Vec<Cycle> {
    let inner = graph.inner();
    let mut cycles = Vec::new();
    let mut visited: HashSet<NodeIndex> = HashSet::with_capacity(inner.node_count());
    let mut path: Vec<NodeIndex> = Vec::new();
    let mut on_path: HashSet<NodeIndex> = HashSet::new();
    let mut stack: Vec<Frame> = Vec::new();

    for root in inner.node_indices() {
        if visited.contains(&root) {
            continue;
        }

        visited.insert(root);
        path.push(root);
        on_path.insert(root);
        stack.push(Frame {
            node: root,
            successors: graph.successors(root),
            next: 0,
        });

        while let Some(frame) = stack.last_mut() {
            if frame.next < frame.successors.len() {
                let next = frame.successors[frame.next];
                frame.next += 1;

                if on_path.contains(&next) {
                    if let Some(start) = path.iter().position(|&n| n == next) {
                        let mut nodes: Vec<String> = path[start..]
                            .iter()
                            .map(|&n| inner[n].path.clone())
                            .collect();
                        nodes.push(inner[next].path.clone());
                        cycles.push(Cycle { nodes });
                    }
                } else if visited.insert(next) {
                    path.push(next);
                    on_path.insert(next);
                    stack.push(Frame {
                        node: next,
                        successors: graph.successors(next),
                        next: 0,
                    });
                }
            } else {
                let done = frame.node;
                stack.pop();
                path.pop();
                on_path.remove(&done);
            }
        }
    }

    cycles
}

/// One cycle per strongly connected component, ordered by the component's
/// first module in scan order.
///
/// The reported walk starts at that first module and follows the shortest
/// route back to it inside the component.
pub(crate) fn component_cycles(graph: &DependencyGraph) -> Vec<Cycle> {
    let inner = graph.inner();
    let mut components: Vec<Vec<NodeIndex>> = tarjan_scc(inner)
        .into_iter()
        .filter(|scc| scc.len() > 1 || inner.contains_edge(scc[0], scc[0]))
        .collect();
    for scc in &mut components {
        scc.sort();
    }
    components.sort_by_key(|scc| scc[0]);

    components
        .into_iter()
        .filter_map(|scc| {
            let members: HashSet<NodeIndex> = scc.iter().copied().collect();
            let walk = shortest_cycle_through(graph, scc[0], &members)?;
            Some(Cycle {
                nodes: walk.into_iter().map(|n| inner[n].path.clone()).collect(),
            })
        })
        .collect()
}

/// Breadth-first search from `start` back to itself within `members`.
fn shortest_cycle_through(
    graph: &DependencyGraph,
    start: NodeIndex,
    members: &HashSet<NodeIndex>,
) -> Option<Vec<NodeIndex>> {
    let mut parent: HashMap<NodeIndex, NodeIndex> = HashMap::new();
    let mut queue = VecDeque::from([start]);

    while let Some(node) = queue.pop_front() {
        for next in graph.successors(node) {
            if next == start {
                let mut chain = Vec::new();
                let mut cur = node;
                while cur != start {
                    chain.push(cur);
                    cur = *parent.get(&cur)?;
                }
                chain.reverse();

                let mut walk = Vec::with_capacity(chain.len() + 2);
                walk.push(start);
                walk.extend(chain);
                walk.push(start);
                return Some(walk);
            }
            if members.contains(&next) && !parent.contains_key(&next) {
                parent.insert(next, node);
                queue.push_back(next);
            }
        }
    }

    None
}
