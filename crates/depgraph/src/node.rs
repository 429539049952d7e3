//! Node storage.
//!
//! Nodes live in a single map keyed by id and refer to each other only by
//! id. `NodeStore` holds the unlocked primitives; `Graph` wraps it in a
//! lock and exposes the public API.

use crate::attributes::{self, Attributes};
use crate::error::{GraphError, Result};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// A single node and its outgoing edges.
#[derive(Debug, Clone, Default)]
pub(crate) struct Node {
    /// Tie-break key for sorting; lower sorts first.
    pub(crate) priority: i64,

    /// Ids of nodes with an edge pointing at this one.
    pub(crate) sources: BTreeSet<String>,

    /// Ids of nodes this one points to, in insertion order.
    pub(crate) targets: Vec<String>,

    /// Per-edge attributes keyed by target id. Presence of a key is what
    /// makes the edge exist.
    pub(crate) edge_attributes: HashMap<String, Attributes>,

    pub(crate) attributes: Attributes,
}

impl Node {
    pub(crate) fn has_target(&self, target: &str) -> bool {
        self.edge_attributes.contains_key(target)
    }
}

/// All nodes of a graph, keyed by id.
#[derive(Debug, Clone, Default)]
pub(crate) struct NodeStore {
    pub(crate) nodes: BTreeMap<String, Node>,
}

impl NodeStore {
    pub(crate) fn has_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub(crate) fn has_edge(&self, source: &str, target: &str) -> bool {
        self.nodes
            .get(source)
            .map(|node| node.has_target(target))
            .unwrap_or(false)
    }

    pub(crate) fn node(&self, id: &str) -> Result<&Node> {
        self.nodes
            .get(id)
            .ok_or_else(|| GraphError::NodeNotFound(id.to_string()))
    }

    pub(crate) fn node_mut(&mut self, id: &str) -> Result<&mut Node> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| GraphError::NodeNotFound(id.to_string()))
    }

    /// Creates the node if absent. Returns false if it already existed.
    pub(crate) fn add_node(&mut self, id: &str) -> bool {
        if self.has_node(id) {
            return false;
        }
        self.nodes.insert(id.to_string(), Node::default());
        true
    }

    /// Records `source -> target`, creating either endpoint if needed.
    /// Returns false if the edge already existed.
    pub(crate) fn add_edge(&mut self, source: &str, target: &str) -> bool {
        self.add_node(source);
        self.add_node(target);

        match self.nodes.get_mut(source) {
            Some(node) if !node.has_target(target) => {
                node.targets.push(target.to_string());
                node.edge_attributes
                    .insert(target.to_string(), Attributes::new());
            }
            _ => return false,
        }
        if let Some(node) = self.nodes.get_mut(target) {
            node.sources.insert(source.to_string());
        }
        true
    }

    /// Removes `source -> target` if present.
    pub(crate) fn delete_edge(&mut self, source: &str, target: &str) {
        if let Some(node) = self.nodes.get_mut(source) {
            node.targets.retain(|t| t != target);
            node.edge_attributes.remove(target);
        }
        if let Some(node) = self.nodes.get_mut(target) {
            node.sources.remove(source);
        }
    }

    /// Removes a node and every edge touching it.
    pub(crate) fn delete_node(&mut self, id: &str) -> bool {
        let Some(node) = self.nodes.remove(id) else {
            return false;
        };

        for target in &node.targets {
            if let Some(child) = self.nodes.get_mut(target) {
                child.sources.remove(id);
            }
        }
        for source in &node.sources {
            if let Some(parent) = self.nodes.get_mut(source) {
                parent.targets.retain(|t| t != id);
                parent.edge_attributes.remove(id);
            }
        }
        true
    }

    pub(crate) fn edge_attributes(&self, source: &str, target: &str) -> Result<&Attributes> {
        self.node(source)?;
        self.node(target)?;
        self.nodes[source]
            .edge_attributes
            .get(target)
            .ok_or_else(|| GraphError::EdgeNotFound {
                from: source.to_string(),
                to: target.to_string(),
            })
    }

    pub(crate) fn edge_attributes_mut(
        &mut self,
        source: &str,
        target: &str,
    ) -> Option<&mut Attributes> {
        self.nodes.get_mut(source)?.edge_attributes.get_mut(target)
    }

    /// Replaces the attributes of an existing edge.
    pub(crate) fn set_edge_attributes(
        &mut self,
        source: &str,
        target: &str,
        attributes: Attributes,
    ) -> bool {
        match self.edge_attributes_mut(source, target) {
            Some(existing) => {
                *existing = attributes;
                true
            }
            None => false,
        }
    }

    /// Sets one attribute on an existing edge; no-op if the edge is absent.
    pub(crate) fn set_edge_property(&mut self, source: &str, target: &str, key: &str, value: String) {
        if let Some(existing) = self.edge_attributes_mut(source, target) {
            existing.insert(key.to_string(), value);
        }
    }

    pub(crate) fn set_edge_color(&mut self, source: &str, target: &str, color: &str) {
        self.set_edge_property(source, target, attributes::COLOR, attributes::quoted(color));
    }

    pub(crate) fn targets(&self, id: &str) -> Result<Vec<String>> {
        Ok(self.node(id)?.targets.clone())
    }

    pub(crate) fn sources(&self, id: &str) -> Result<Vec<String>> {
        Ok(self.node(id)?.sources.iter().cloned().collect())
    }

    pub(crate) fn priority(&self, id: &str) -> i64 {
        self.nodes.get(id).map(|node| node.priority).unwrap_or(0)
    }

    /// Copies a node's attributes and priority from another store,
    /// creating the node here if needed.
    pub(crate) fn copy_node_from(&mut self, other: &NodeStore, id: &str) {
        self.add_node(id);
        if let (Some(from), Some(to)) = (other.nodes.get(id), self.nodes.get_mut(id)) {
            to.attributes = from.attributes.clone();
            to.priority = from.priority;
        }
    }

    /// Copies an edge and its attributes from another store.
    pub(crate) fn copy_edge_from(&mut self, other: &NodeStore, source: &str, target: &str) {
        self.add_edge(source, target);
        if let Ok(from) = other.edge_attributes(source, target) {
            self.set_edge_attributes(source, target, from.clone());
        }
    }

    /// Ids reachable from `start` by following outgoing edges, `start`
    /// included. Empty if `start` is absent.
    pub(crate) fn reachable_from(&self, start: &str) -> BTreeSet<String> {
        let mut visited = BTreeSet::new();
        if !self.has_node(start) {
            return visited;
        }

        let mut stack = vec![start.to_string()];
        visited.insert(start.to_string());
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get(&current) {
                for target in &node.targets {
                    if visited.insert(target.clone()) {
                        stack.push(target.clone());
                    }
                }
            }
        }
        visited
    }
}
