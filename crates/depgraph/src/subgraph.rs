//! Subgraph extraction and reachability.
//!
//! A subgraph rooted at a node holds every node reachable from it by
//! following outgoing edges, plus those edges, with attributes and
//! priorities copied. Walks keep a visited set so cycles terminate.

use crate::graph::Graph;
use crate::node::NodeStore;
use std::collections::BTreeSet;
use tracing::trace;

/// Copies the part of `from` reachable from `start` into `into`.
///
/// Each node is walked at most once; an edge into an already walked node
/// is still recorded. Every walked id is added to `visited`.
fn walk_down(from: &NodeStore, into: &mut NodeStore, start: &str, visited: &mut BTreeSet<String>) {
    if !from.has_node(start) {
        return;
    }

    into.copy_node_from(from, start);
    visited.insert(start.to_string());

    let mut stack = vec![start.to_string()];
    while let Some(current) = stack.pop() {
        let Some(node) = from.nodes.get(&current) else {
            continue;
        };
        for target in &node.targets {
            let discovered = !into.has_node(target);
            if discovered {
                into.copy_node_from(from, target);
            }
            if into.add_edge(&current, target) {
                into.copy_edge_from(from, &current, target);
            }
            if discovered {
                visited.insert(target.clone());
                stack.push(target.clone());
            }
        }
    }
}

impl Graph {
    /// Returns the subgraph reachable from `start`, named after it.
    ///
    /// The result is empty if `start` is not in the graph.
    pub fn subgraph(&self, start: &str) -> Graph {
        let store = self.store.read();
        let mut sub = NodeStore::default();
        let mut visited = BTreeSet::new();
        walk_down(&store, &mut sub, start, &mut visited);

        trace!(start, nodes = sub.nodes.len(), "extracted subgraph");
        Graph::from_store(start, sub)
    }

    /// Splits the graph into one subgraph per node without incoming
    /// edges, followed by one per node left over from those walks (which
    /// covers cycles that no root reaches).
    ///
    /// Subgraphs can overlap when roots share dependencies.
    pub fn subgraphs(&self) -> Vec<Graph> {
        let store = self.store.read();
        let mut visited = BTreeSet::new();
        let mut result = Vec::new();

        for (id, node) in &store.nodes {
            if !node.sources.is_empty() {
                continue;
            }
            let mut sub = NodeStore::default();
            walk_down(&store, &mut sub, id, &mut visited);
            result.push(Graph::from_store(id.as_str(), sub));
        }

        for id in store.nodes.keys() {
            if visited.contains(id) {
                continue;
            }
            let mut sub = NodeStore::default();
            walk_down(&store, &mut sub, id, &mut visited);
            result.push(Graph::from_store(id.as_str(), sub));
        }

        result
    }

    /// Returns how many nodes `subgraph(start)` would hold, without
    /// building it.
    pub fn subgraph_node_count(&self, start: &str) -> usize {
        self.store.read().reachable_from(start).len()
    }

    /// Returns whether `subgraph(start)` would contain `id`, without
    /// building it.
    pub fn subgraph_has_node(&self, start: &str, id: &str) -> bool {
        self.store.read().reachable_from(start).contains(id)
    }

    /// Reports whether `target` can be reached from `source`.
    ///
    /// A node always reaches itself. Not cached; each call walks the
    /// reachable set again.
    pub fn is_reachable(&self, source: &str, target: &str) -> bool {
        let store = self.store.read();
        if !store.has_node(source) || !store.has_node(target) {
            return false;
        }
        store.reachable_from(source).contains(target)
    }
}
