//! Dependency graph for tasks
//!
//! Builds an index-addressed graph over task ids (petgraph arena) and
//! answers two questions about it: which tasks are flagged as part of a
//! circular dependency, and how many tasks each task blocks.
//!
//! Edges point from a task to each of its dependencies. Dependencies that
//! name no known task become leaf nodes.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::{HashMap, HashSet};

use super::id::TaskId;
use super::task::{TaskLookup, TaskRecord};

/// A dependency graph for one analysis run
#[derive(Debug, Default)]
pub struct DependencyGraph {
    /// Edge weight is the dependency's position in the task's list
    graph: DiGraph<TaskId, usize>,

    /// Map from TaskId to node index
    node_map: HashMap<TaskId, NodeIndex>,

    /// Nodes backed by a task record, in order of first appearance
    roots: Vec<NodeIndex>,
}

impl DependencyGraph {
    /// Builds the graph from normalized records
    ///
    /// When several records share an id, the edges of the last one are used.
    pub fn from_records(records: &[TaskRecord], lookup: &TaskLookup) -> Self {
        let mut graph = Self::default();

        // First pass: add all task nodes
        for id in lookup.ids() {
            let idx = graph.add_node(id.clone());
            graph.roots.push(idx);
        }

        // Second pass: add edges from the winning record of each id
        for id in lookup.ids() {
            let Some(record) = lookup.get(id).map(|i| &records[i]) else {
                continue;
            };
            let from = graph.node_map[id];
            for (position, dep_id) in record.dependencies.iter().enumerate() {
                let to = graph.add_node(dep_id.clone());
                graph.graph.add_edge(from, to, position);
            }
        }

        graph
    }

    fn add_node(&mut self, id: TaskId) -> NodeIndex {
        if let Some(idx) = self.node_map.get(&id) {
            return *idx;
        }
        let idx = self.graph.add_node(id.clone());
        self.node_map.insert(id, idx);
        idx
    }

    /// Direct dependencies of a node, in the order the task lists them
    fn ordered_dependencies(&self, node: NodeIndex) -> Vec<NodeIndex> {
        let mut edges: Vec<_> = self
            .graph
            .edges(node)
            .map(|edge| (*edge.weight(), edge.target()))
            .collect();
        edges.sort_unstable_by_key(|(position, _)| *position);
        edges.into_iter().map(|(_, target)| target).collect()
    }

    /// Returns the ids flagged as being in a circular dependency
    ///
    /// Depth-first search from every task in order of first appearance, with
    /// `visited` and `on_stack` shared across all searches. When a back edge
    /// is found, every task on the active search path is flagged, and the
    /// search ends without taking those tasks off the stack. Later searches
    /// that reach one of them therefore see a back edge too, so any task that
    /// depends on a flagged task (directly or through unflagged tasks it
    /// explores first) is flagged as well.
    pub fn cyclic_ids(&self) -> HashSet<TaskId> {
        let n = self.graph.node_count();
        let mut visited = vec![false; n];
        let mut on_stack = vec![false; n];
        let mut cyclic = vec![false; n];

        for &root in &self.roots {
            if visited[root.index()] {
                continue;
            }

            visited[root.index()] = true;
            on_stack[root.index()] = true;
            let mut path: Vec<(NodeIndex, Vec<NodeIndex>, usize)> =
                vec![(root, self.ordered_dependencies(root), 0)];

            while let Some((node, deps, cursor)) = path.last_mut() {
                let Some(&dep) = deps.get(*cursor) else {
                    on_stack[node.index()] = false;
                    path.pop();
                    continue;
                };
                *cursor += 1;

                if !visited[dep.index()] {
                    visited[dep.index()] = true;
                    on_stack[dep.index()] = true;
                    let dep_deps = self.ordered_dependencies(dep);
                    path.push((dep, dep_deps, 0));
                } else if on_stack[dep.index()] {
                    // The whole active path is flagged and stays on the stack
                    for (ancestor, _, _) in path.drain(..) {
                        cyclic[ancestor.index()] = true;
                    }
                }
            }
        }

        self.graph
            .node_indices()
            .filter(|idx| cyclic[idx.index()])
            .filter_map(|idx| self.graph.node_weight(idx).cloned())
            .collect()
    }

    /// Number of task nodes
    pub fn task_count(&self) -> usize {
        self.roots.len()
    }

    /// Number of dependency edges
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

/// Downstream impact: how many records list each id as a dependency
#[derive(Debug, Default)]
pub struct ImpactIndex {
    blocked_by: HashMap<TaskId, usize>,
}

/// Points awarded per blocked task
pub const IMPACT_PER_DEPENDENT: i64 = 10;

impl ImpactIndex {
    /// Counts dependents over every record in the input, duplicates included
    pub fn build(records: &[TaskRecord]) -> Self {
        let mut blocked_by: HashMap<TaskId, usize> = HashMap::new();
        for record in records {
            let unique: HashSet<&TaskId> = record.dependencies.iter().collect();
            for dep_id in unique {
                *blocked_by.entry(dep_id.clone()).or_default() += 1;
            }
        }
        Self { blocked_by }
    }

    /// Number of records that depend on `id`
    pub fn dependents(&self, id: &TaskId) -> usize {
        self.blocked_by.get(id).copied().unwrap_or(0)
    }

    /// Impact score: dependents scaled by [`IMPACT_PER_DEPENDENT`]
    pub fn score(&self, id: &TaskId) -> i64 {
        self.dependents(id) as i64 * IMPACT_PER_DEPENDENT
    }
}
