//! Core graph data structure.
//!
//! `Graph` owns every node, keyed by string id, behind a single
//! read/write lock. All methods take `&self` so one graph can be shared
//! between threads; each call holds the lock for its whole duration and
//! never calls back into caller code while holding it.

use crate::attributes::{self, Attributes};
use crate::error::{GraphError, Result};
use crate::node::NodeStore;
use parking_lot::RwLock;

/// A mutable directed graph with attributes on nodes and edges.
///
/// Nodes are identified by opaque strings. Edges are created on demand
/// and remember their insertion order per source, which drives the
/// deterministic output of [`Graph::topological_sort`].
#[derive(Debug)]
pub struct Graph {
    /// Diagnostic label.
    name: String,

    pub(crate) store: RwLock<NodeStore>,
}

impl Clone for Graph {
    fn clone(&self) -> Self {
        Self::from_store(self.name.clone(), self.store.read().clone())
    }
}

impl Graph {
    /// Creates a new empty graph.
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_store(name, NodeStore::default())
    }

    pub(crate) fn from_store(name: impl Into<String>, store: NodeStore) -> Self {
        Self {
            name: name.into(),
            store: RwLock::new(store),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.store.read().nodes.len()
    }

    /// Returns the number of edges.
    pub fn edge_count(&self) -> usize {
        self.store
            .read()
            .nodes
            .values()
            .map(|node| node.targets.len())
            .sum()
    }

    /// Returns a copy of every node id.
    pub fn nodes(&self) -> Vec<String> {
        self.store.read().nodes.keys().cloned().collect()
    }

    /// Iterates over every `(source, target)` pair.
    ///
    /// The pairs are collected up front, so the iterator does not hold
    /// the lock and later mutation does not affect it.
    pub fn edges(&self) -> impl Iterator<Item = (String, String)> {
        let store = self.store.read();
        let pairs: Vec<(String, String)> = store
            .nodes
            .iter()
            .flat_map(|(id, node)| {
                node.targets
                    .iter()
                    .map(move |target| (id.clone(), target.clone()))
            })
            .collect();
        pairs.into_iter()
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.store.read().has_node(id)
    }

    pub fn has_edge(&self, source: &str, target: &str) -> bool {
        self.store.read().has_edge(source, target)
    }

    /// Adds a node. Returns false if it was already present.
    pub fn add_node(&self, id: &str) -> bool {
        self.store.write().add_node(id)
    }

    /// Removes a node and all edges into or out of it.
    ///
    /// Returns false if the node did not exist.
    pub fn delete_node(&self, id: &str) -> bool {
        self.store.write().delete_node(id)
    }

    /// Adds `source -> target`, creating missing endpoints.
    ///
    /// Returns false if the edge already existed.
    pub fn add_edge(&self, source: &str, target: &str) -> bool {
        self.store.write().add_edge(source, target)
    }

    /// Adds `source -> target` only if both endpoints already exist.
    pub fn add_edge_to_existing_nodes(&self, source: &str, target: &str) -> Result<bool> {
        let mut store = self.store.write();
        store.node(source)?;
        store.node(target)?;
        Ok(store.add_edge(source, target))
    }

    /// Removes a single edge. Errors if either endpoint is missing.
    pub fn delete_edge(&self, source: &str, target: &str) -> Result<()> {
        let mut store = self.store.write();
        store.node(source)?;
        store.node(target)?;
        store.delete_edge(source, target);
        Ok(())
    }

    /// Replaces a node's attributes, creating the node if needed.
    pub fn set_node_attributes(&self, id: &str, attributes: Attributes) {
        let mut store = self.store.write();
        store.add_node(id);
        if let Ok(node) = store.node_mut(id) {
            node.attributes = attributes;
        }
    }

    /// Returns a copy of a node's attributes.
    pub fn node_attributes(&self, id: &str) -> Result<Attributes> {
        Ok(self.store.read().node(id)?.attributes.clone())
    }

    /// Sets a single node attribute, creating the node if needed.
    pub fn set_node_property(&self, id: &str, key: &str, value: &str) {
        let mut store = self.store.write();
        store.add_node(id);
        if let Ok(node) = store.node_mut(id) {
            node.attributes.insert(key.to_string(), value.to_string());
        }
    }

    /// Marks a node as filled with `color`.
    pub fn set_node_background_color(&self, id: &str, color: &str) {
        let mut store = self.store.write();
        store.add_node(id);
        if let Ok(node) = store.node_mut(id) {
            node.attributes
                .insert(attributes::FILL_COLOR.to_string(), color.to_string());
            node.attributes
                .insert(attributes::STYLE.to_string(), "filled".to_string());
        }
    }

    pub fn node_priority(&self, id: &str) -> Result<i64> {
        Ok(self.store.read().node(id)?.priority)
    }

    pub fn set_node_priority(&self, id: &str, priority: i64) -> Result<()> {
        self.store.write().node_mut(id)?.priority = priority;
        Ok(())
    }

    /// Returns a copy of an edge's attributes.
    ///
    /// Errors if the edge does not exist, even when both nodes do.
    pub fn edge_attributes(&self, source: &str, target: &str) -> Result<Attributes> {
        self.store
            .read()
            .edge_attributes(source, target)
            .map(Clone::clone)
    }

    /// Replaces an edge's attributes. Returns false if the edge is absent.
    pub fn set_edge_attributes(&self, source: &str, target: &str, attributes: Attributes) -> bool {
        self.store
            .write()
            .set_edge_attributes(source, target, attributes)
    }

    /// Sets a single edge attribute; ignored if the edge is absent.
    pub fn set_edge_property(&self, source: &str, target: &str, key: &str, value: &str) {
        self.store
            .write()
            .set_edge_property(source, target, key, value.to_string());
    }

    /// Sets the edge color, stored quoted.
    pub fn set_edge_color(&self, source: &str, target: &str, color: &str) {
        self.store.write().set_edge_color(source, target, color);
    }

    pub fn set_edge_weight(&self, source: &str, target: &str, weight: i64) {
        self.set_edge_property(source, target, attributes::WEIGHT, &weight.to_string());
    }

    pub fn set_edge_constraint(&self, source: &str, target: &str, constraint: bool) {
        let value = if constraint { "true" } else { "false" };
        self.set_edge_property(
            source,
            target,
            attributes::CONSTRAINT,
            &attributes::quoted(value),
        );
    }

    /// Gets the ids of nodes with an edge into `id`.
    pub fn sources(&self, id: &str) -> Result<Vec<String>> {
        self.store.read().sources(id)
    }

    /// Gets the ids `id` points to, in the order the edges were added.
    pub fn targets(&self, id: &str) -> Result<Vec<String>> {
        self.store.read().targets(id)
    }

    /// Copies every node of `other`, and every edge between them, into
    /// this graph along with attributes and priorities.
    ///
    /// Existing nodes and edges are kept; shared ones take `other`'s
    /// attributes.
    pub fn merge(&self, other: &Graph) {
        let incoming = other.store.read().clone();
        let mut store = self.store.write();

        for (id, node) in &incoming.nodes {
            store.copy_node_from(&incoming, id);
            for target in &node.targets {
                store.copy_node_from(&incoming, target);
                store.copy_edge_from(&incoming, id, target);
            }
        }
    }

    /// Reports whether `id` exists, for callers that want an error.
    pub fn require_node(&self, id: &str) -> Result<()> {
        if self.has_node(id) {
            Ok(())
        } else {
            Err(GraphError::NodeNotFound(id.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_node_is_idempotent() {
        let graph = Graph::new("test");
        assert!(graph.add_node("x"));
        assert!(!graph.add_node("x"));
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_add_edge_is_idempotent() {
        let graph = Graph::new("test");
        assert!(graph.add_edge("a", "b"));
        assert!(!graph.add_edge("a", "b"));

        assert!(graph.has_edge("a", "b"));
        assert!(!graph.has_edge("b", "a"));
        assert_eq!(graph.targets("a").unwrap(), vec!["b"]);
        assert_eq!(graph.sources("b").unwrap(), vec!["a"]);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_add_new_edge_after_edge_removed() {
        let graph = Graph::new("test");
        graph.add_edge("3", "10");

        assert!(graph.add_edge("8", "9"));
        graph.set_edge_color("8", "9", "red");
        assert!(!graph.add_edge("8", "9"));

        graph.delete_edge("8", "9").unwrap();
        assert!(!graph.has_edge("8", "9"));

        assert!(graph.add_edge("8", "9"));
        assert!(graph.edge_attributes("8", "9").unwrap().is_empty());
    }

    #[test]
    fn test_add_edge_to_existing_nodes() {
        let graph = Graph::new("test");
        graph.add_node("a");

        assert_eq!(
            graph.add_edge_to_existing_nodes("a", "b"),
            Err(GraphError::NodeNotFound("b".to_string()))
        );
        assert!(!graph.has_node("b"));

        assert_eq!(
            graph.add_edge_to_existing_nodes("c", "a"),
            Err(GraphError::NodeNotFound("c".to_string()))
        );
        assert!(!graph.has_node("c"));
        assert_eq!(graph.node_count(), 1);

        graph.add_node("b");
        assert_eq!(graph.add_edge_to_existing_nodes("a", "b"), Ok(true));
        assert_eq!(graph.add_edge_to_existing_nodes("a", "b"), Ok(false));
    }

    #[test]
    fn test_delete_node_removes_both_directions() {
        let graph = Graph::new("test");
        graph.add_edge("a", "x");
        graph.add_edge("x", "b");
        graph.add_edge("c", "x");

        assert!(graph.delete_node("x"));
        assert!(!graph.delete_node("x"));
        assert!(!graph.has_node("x"));

        for id in graph.nodes() {
            assert!(!graph.targets(&id).unwrap().contains(&"x".to_string()));
            assert!(!graph.sources(&id).unwrap().contains(&"x".to_string()));
        }
    }

    #[test]
    fn test_neighbours_of_missing_node() {
        let graph = Graph::new("test");
        graph.add_edge("a", "b");

        assert_eq!(
            graph.sources("ghost"),
            Err(GraphError::NodeNotFound("ghost".to_string()))
        );
        assert_eq!(
            graph.targets("ghost"),
            Err(GraphError::NodeNotFound("ghost".to_string()))
        );
        assert!(!graph.has_node("ghost"));
    }

    #[test]
    fn test_clone_is_independent() {
        let graph = Graph::new("test");
        graph.add_edge("a", "b");
        graph.set_edge_color("a", "b", "blue");
        graph.set_node_priority("a", 3).unwrap();

        let copy = graph.clone();
        copy.add_edge("b", "c");
        copy.set_edge_color("a", "b", "red");
        copy.set_node_priority("a", -1).unwrap();
        copy.delete_node("b");

        assert_eq!(copy.name(), "test");
        assert!(graph.has_edge("a", "b"));
        assert!(!graph.has_node("c"));
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.node_priority("a"), Ok(3));
        assert_eq!(graph.edge_attributes("a", "b").unwrap()["color"], "\"blue\"");
    }

    #[test]
    fn test_delete_edge_missing_node() {
        let graph = Graph::new("test");
        graph.add_node("a");
        assert!(graph.delete_edge("a", "nope").is_err());
        assert!(graph.delete_edge("a", "a").is_ok());
    }

    #[test]
    fn test_edge_attributes_round_trip() {
        let graph = Graph::new("test");
        graph.add_edge("a", "b");

        let mut attrs = Attributes::new();
        attrs.insert("kind".to_string(), "shared".to_string());
        attrs.insert("color".to_string(), "\"orange\"".to_string());
        assert!(graph.set_edge_attributes("a", "b", attrs.clone()));
        assert_eq!(graph.edge_attributes("a", "b").unwrap(), attrs);

        assert!(!graph.set_edge_attributes("b", "a", attrs));
    }

    #[test]
    fn test_edge_attributes_missing_edge() {
        let graph = Graph::new("test");
        graph.add_node("a");
        graph.add_node("b");

        assert_eq!(
            graph.edge_attributes("a", "b"),
            Err(GraphError::EdgeNotFound {
                from: "a".to_string(),
                to: "b".to_string()
            })
        );
        assert_eq!(
            graph.edge_attributes("a", "c"),
            Err(GraphError::NodeNotFound("c".to_string()))
        );
    }

    #[test]
    fn test_returned_attributes_are_copies() {
        let graph = Graph::new("test");
        graph.add_edge("a", "b");
        graph.set_edge_color("a", "b", "red");

        let mut attrs = graph.edge_attributes("a", "b").unwrap();
        attrs.insert("color".to_string(), "\"green\"".to_string());

        assert_eq!(graph.edge_attributes("a", "b").unwrap()["color"], "\"red\"");
    }

    #[test]
    fn test_well_known_edge_properties() {
        let graph = Graph::new("test");
        graph.add_edge("a", "b");
        graph.set_edge_color("a", "b", "blue");
        graph.set_edge_weight("a", "b", 3);
        graph.set_edge_constraint("a", "b", false);

        let attrs = graph.edge_attributes("a", "b").unwrap();
        assert_eq!(attrs["color"], "\"blue\"");
        assert_eq!(attrs["weight"], "3");
        assert_eq!(attrs["constraint"], "\"false\"");

        // No edge, nothing happens.
        graph.set_edge_color("b", "a", "blue");
        assert!(!graph.has_edge("b", "a"));
    }

    #[test]
    fn test_node_attributes() {
        let graph = Graph::new("test");
        graph.set_node_background_color("lib", "green");
        graph.set_node_property("lib", "shape", "doublecircle");

        let attrs = graph.node_attributes("lib").unwrap();
        assert_eq!(attrs["fillcolor"], "green");
        assert_eq!(attrs["style"], "filled");
        assert_eq!(attrs["shape"], "doublecircle");
        assert!(graph.node_attributes("other").is_err());
    }

    #[test]
    fn test_node_priority() {
        let graph = Graph::new("test");
        assert!(graph.set_node_priority("a", 5).is_err());
        assert!(graph.node_priority("a").is_err());

        graph.add_node("a");
        assert_eq!(graph.node_priority("a"), Ok(0));
        graph.set_node_priority("a", -7).unwrap();
        assert_eq!(graph.node_priority("a"), Ok(-7));
    }

    #[test]
    fn test_nodes_returns_copy() {
        let graph = Graph::new("test");
        graph.add_edge("a", "b");

        let mut nodes = graph.nodes();
        nodes.clear();
        let mut targets = graph.targets("a").unwrap();
        targets.push("zzz".to_string());

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.targets("a").unwrap(), vec!["b"]);
    }

    #[test]
    fn test_targets_keep_insertion_order() {
        let graph = Graph::new("test");
        for child in ["z", "b", "m", "a"] {
            graph.add_edge("top", child);
        }
        graph.add_edge("top", "b");
        assert_eq!(graph.targets("top").unwrap(), vec!["z", "b", "m", "a"]);
    }

    #[test]
    fn test_merge_copies_structure_and_attributes() {
        let first = Graph::new("first");
        first.add_edge("a", "b");

        let second = Graph::new("second");
        second.add_edge("b", "c");
        second.set_edge_color("b", "c", "blue");
        second.set_node_property("c", "shape", "box");
        second.add_node("d");
        second.set_node_priority("d", 4).unwrap();

        first.merge(&second);

        assert!(first.has_edge("a", "b"));
        assert!(first.has_edge("b", "c"));
        assert_eq!(first.edge_attributes("b", "c").unwrap()["color"], "\"blue\"");
        assert_eq!(first.node_attributes("c").unwrap()["shape"], "box");
        assert_eq!(first.node_priority("d"), Ok(4));

        // The copies are independent.
        second.set_edge_color("b", "c", "red");
        assert_eq!(first.edge_attributes("b", "c").unwrap()["color"], "\"blue\"");
    }

    #[test]
    fn test_merge_with_itself() {
        let graph = Graph::new("test");
        graph.add_edge("a", "b");
        graph.merge(&graph);
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_edges_iterator() {
        let graph = Graph::new("test");
        graph.add_edge("a", "b");
        graph.add_edge("a", "c");
        graph.add_edge("b", "c");

        let edges: Vec<_> = graph.edges().collect();
        assert_eq!(edges.len(), 3);
        assert!(edges.contains(&("a".to_string(), "c".to_string())));

        // Restartable by calling again.
        assert_eq!(graph.edges().count(), 3);
    }

    #[test]
    fn test_shared_between_threads() {
        use std::sync::Arc;

        let graph = Arc::new(Graph::new("test"));
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let graph = Arc::clone(&graph);
                std::thread::spawn(move || {
                    for j in 0..50 {
                        graph.add_edge(&format!("m{}", i), &format!("dep{}", j));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(graph.node_count(), 54);
        assert_eq!(graph.edge_count(), 200);
    }
}
