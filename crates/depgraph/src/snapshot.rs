//! Serializable copy of a graph.
//!
//! A `GraphSnapshot` is a plain data view of a graph: nodes with their
//! priority and attributes, and edges in per-source insertion order. It is
//! what callers hand to serde when they want to save or ship a graph.

use crate::attributes::Attributes;
use crate::graph::Graph;
use crate::node::NodeStore;
use serde::{Deserialize, Serialize};

/// A node in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotNode {
    pub id: String,

    #[serde(default)]
    pub priority: i64,

    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
}

/// An edge in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEdge {
    pub source: String,
    pub target: String,

    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
}

/// A whole graph as plain data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub name: String,

    #[serde(default)]
    pub nodes: Vec<SnapshotNode>,

    #[serde(default)]
    pub edges: Vec<SnapshotEdge>,
}

impl Graph {
    /// Captures the current state of the graph.
    pub fn snapshot(&self) -> GraphSnapshot {
        let store = self.store.read();

        let nodes = store
            .nodes
            .iter()
            .map(|(id, node)| SnapshotNode {
                id: id.clone(),
                priority: node.priority,
                attributes: node.attributes.clone(),
            })
            .collect();

        let edges = store
            .nodes
            .iter()
            .flat_map(|(id, node)| {
                node.targets.iter().map(move |target| SnapshotEdge {
                    source: id.clone(),
                    target: target.clone(),
                    attributes: node
                        .edge_attributes
                        .get(target)
                        .cloned()
                        .unwrap_or_default(),
                })
            })
            .collect();

        GraphSnapshot {
            name: self.name().to_string(),
            nodes,
            edges,
        }
    }

    /// Rebuilds a graph from a snapshot.
    ///
    /// Edge endpoints missing from `nodes` are created, as with
    /// [`Graph::add_edge`]. Repeated edges keep the last attributes.
    pub fn from_snapshot(snapshot: &GraphSnapshot) -> Graph {
        let mut store = NodeStore::default();

        for node in &snapshot.nodes {
            store.add_node(&node.id);
            if let Ok(stored) = store.node_mut(&node.id) {
                stored.priority = node.priority;
                stored.attributes = node.attributes.clone();
            }
        }
        for edge in &snapshot.edges {
            store.add_edge(&edge.source, &edge.target);
            store.set_edge_attributes(&edge.source, &edge.target, edge.attributes.clone());
        }

        Graph::from_store(snapshot.name.as_str(), store)
    }
}
