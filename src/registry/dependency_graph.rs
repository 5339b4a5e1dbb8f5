//! Per-namespace dependency graph.
//!
//! Nodes are bundle names within one namespace; an edge `a -> b` means `a`
//! depends on `b`, so `b` is emitted first. The graph is rebuilt from the
//! registry's accumulated state on every render and never mutated in place.

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::core::{BundleRef, BundlejamError, Result};

/// DFS states for cycle detection; unvisited nodes have no entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    /// Node is on the current DFS path.
    Gray,
    /// Node and everything reachable from it has been visited.
    Black,
}

/// Dependency graph of the bundles resolved in one namespace.
pub struct DependencyGraph {
    namespace: String,
    graph: DiGraph<String, ()>,
    node_map: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    /// Create an empty graph for `namespace`.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            graph: DiGraph::new(),
            node_map: HashMap::new(),
        }
    }

    /// Build the graph from a namespace's resolved-bundle table.
    ///
    /// Every key becomes a node. Edges are read from each key's dependency
    /// set; refs to other namespaces are skipped since only same-namespace
    /// edges constrain the emission order.
    pub fn from_assets(
        namespace: &str,
        assets: &BTreeMap<String, BTreeSet<BundleRef>>,
    ) -> Self {
        let mut graph = Self::new(namespace);
        for bundle in assets.keys() {
            graph.add_bundle(bundle);
        }
        for (bundle, deps) in assets {
            for dep in deps.iter().filter(|dep| dep.is_in(namespace)) {
                graph.add_dependency(bundle, &dep.name);
            }
        }
        tracing::debug!(
            "Built dependency graph for namespace '{}': {} bundles, {} edges",
            namespace,
            graph.node_count(),
            graph.edge_count()
        );
        graph
    }

    fn ensure_node(&mut self, bundle: &str) -> NodeIndex {
        if let Some(&index) = self.node_map.get(bundle) {
            index
        } else {
            let index = self.graph.add_node(bundle.to_string());
            self.node_map.insert(bundle.to_string(), index);
            index
        }
    }

    /// Add a bundle with no edges (no-op if present).
    pub fn add_bundle(&mut self, bundle: &str) {
        self.ensure_node(bundle);
    }

    /// Record that `from` depends on `to`, so `to` is emitted before `from`.
    pub fn add_dependency(&mut self, from: &str, to: &str) {
        let from_idx = self.ensure_node(from);
        let to_idx = self.ensure_node(to);

        if !self.graph.contains_edge(from_idx, to_idx) {
            self.graph.add_edge(from_idx, to_idx, ());
        }
    }

    /// Detect cycles using DFS with colors.
    ///
    /// The error lists the bundles along the cycle with the first one
    /// repeated at the end.
    pub fn detect_cycles(&self) -> Result<()> {
        match self.find_cycle(self.graph.node_indices()) {
            Some(cycle) => Err(self.cycle_error(cycle)),
            None => Ok(()),
        }
    }

    fn cycle_error(&self, cycle: Vec<String>) -> BundlejamError {
        BundlejamError::CircularDependency {
            namespace: self.namespace.clone(),
            cycle,
        }
    }

    /// Iterative DFS from each root in turn; the stack holds each node on
    /// the current path with its sorted dependencies and the next one to try.
    fn find_cycle(&self, roots: impl IntoIterator<Item = NodeIndex>) -> Option<Vec<String>> {
        let mut colors: HashMap<NodeIndex, Color> = HashMap::new();

        for root in roots {
            if colors.contains_key(&root) {
                continue;
            }
            colors.insert(root, Color::Gray);
            let mut stack = vec![(root, self.sorted_neighbors(root, Direction::Outgoing), 0)];

            while let Some((node, neighbors, next)) = stack.last_mut() {
                let Some(&neighbor) = neighbors.get(*next) else {
                    colors.insert(*node, Color::Black);
                    stack.pop();
                    continue;
                };
                *next += 1;

                match colors.get(&neighbor) {
                    Some(Color::Gray) => {
                        let start =
                            stack.iter().position(|(n, _, _)| *n == neighbor).unwrap_or(0);
                        let mut cycle: Vec<String> =
                            stack[start..].iter().map(|(n, _, _)| self.graph[*n].clone()).collect();
                        cycle.push(self.graph[neighbor].clone());
                        return Some(cycle);
                    }
                    Some(Color::Black) => {}
                    None => {
                        colors.insert(neighbor, Color::Gray);
                        stack.push((neighbor, self.sorted_neighbors(neighbor, Direction::Outgoing), 0));
                    }
                }
            }
        }

        None
    }

    /// Emission order: every bundle after all bundles it depends on.
    ///
    /// Uses Kahn's algorithm with a name-ordered ready set, so bundles with
    /// no ordering constraint between them come out alphabetically and the
    /// same graph always yields the same order. Bundles left over when the
    /// ready set runs dry sit on or behind a cycle, which is then traced
    /// from them for the error.
    pub fn topological_order(&self) -> Result<Vec<String>> {
        // Remaining unemitted dependencies per bundle
        let mut pending: HashMap<NodeIndex, usize> = self
            .graph
            .node_indices()
            .map(|node| (node, self.graph.neighbors_directed(node, Direction::Outgoing).count()))
            .collect();

        let mut ready: BTreeSet<(&str, NodeIndex)> = pending
            .iter()
            .filter(|(_, count)| **count == 0)
            .map(|(node, _)| (self.graph[*node].as_str(), *node))
            .collect();

        let mut order = Vec::with_capacity(self.graph.node_count());
        while let Some(next) = ready.pop_first() {
            let (name, node) = next;
            order.push(name.to_string());

            for dependent in self.graph.neighbors_directed(node, Direction::Incoming) {
                if let Some(count) = pending.get_mut(&dependent) {
                    *count -= 1;
                    if *count == 0 {
                        ready.insert((self.graph[dependent].as_str(), dependent));
                    }
                }
            }
        }

        if order.len() != self.graph.node_count() {
            let leftover = self.graph.node_indices().filter(|node| pending[node] > 0);
            let cycle = self.find_cycle(leftover).unwrap_or_default();
            return Err(self.cycle_error(cycle));
        }

        Ok(order)
    }

    fn sorted_neighbors(&self, node: NodeIndex, direction: Direction) -> Vec<NodeIndex> {
        let mut neighbors: Vec<NodeIndex> =
            self.graph.neighbors_directed(node, direction).collect();
        neighbors.sort_by(|a, b| self.graph[*a].cmp(&self.graph[*b]));
        neighbors
    }

    /// Namespace this graph was built for.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Whether the graph has no bundles.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Number of bundles.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of dependency edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}
