//! Cycle reporting.
//!
//! `topological_sort` only says whether a cycle exists. When a caller
//! needs to tell the user which nodes are involved, the strongly
//! connected components are computed with petgraph.

use crate::graph::Graph;
use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;

impl Graph {
    /// Returns every group of nodes that lie on a common cycle.
    ///
    /// Each group is sorted, and the groups are sorted by their first id.
    /// A node with an edge to itself forms a group of one.
    pub fn cycles(&self) -> Vec<Vec<String>> {
        let store = self.store.read();

        let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();
        for (id, node) in &store.nodes {
            graph.add_node(id.as_str());
            for target in &node.targets {
                graph.add_edge(id.as_str(), target.as_str(), ());
            }
        }

        let mut cycles: Vec<Vec<String>> = tarjan_scc(&graph)
            .into_iter()
            .filter(|component| {
                component.len() > 1
                    || component
                        .first()
                        .map(|id| graph.contains_edge(*id, *id))
                        .unwrap_or(false)
            })
            .map(|component| {
                let mut ids: Vec<String> = component.into_iter().map(str::to_string).collect();
                ids.sort();
                ids
            })
            .collect();
        cycles.sort();
        cycles
    }
}
