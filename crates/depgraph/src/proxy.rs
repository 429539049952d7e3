//! Proxy elision.
//!
//! Some nodes and edges only exist to group other dependencies: aliases,
//! file groups, default-property carriers. Before the graph is used to
//! pick a link order or list a module's effective dependencies, these
//! pass-through parts are removed while their neighbors are wired
//! directly to each other, keeping the attributes (most importantly the
//! color) of the edges further down the chain.

use crate::attributes;
use crate::graph::Graph;
use crate::node::NodeStore;
use tracing::{debug, trace};

impl NodeStore {
    /// Removes `source -> proxy` and gives `source` a copy of every edge
    /// leaving `proxy`. Caller checks that the edge exists.
    fn delete_proxy_edge_set_color(&mut self, source: &str, proxy: &str, color: &str) {
        let targets = self.targets(proxy).unwrap_or_default();
        for target in &targets {
            self.add_edge(source, target);
            let copied = self
                .edge_attributes(proxy, target)
                .map(Clone::clone)
                .unwrap_or_default();
            self.set_edge_attributes(source, target, copied);
            if !color.is_empty() {
                self.set_edge_color(source, target, color);
            }
        }
        self.delete_edge(source, proxy);
        trace!(source, proxy, rewired = targets.len(), "elided proxy edge");
    }
}

impl Graph {
    /// Removes a node while connecting each of its sources to each of its
    /// targets.
    ///
    /// `A -> B -> C` with `B` removed becomes `A -> C`, carrying the
    /// attributes of `B -> C`.
    pub fn delete_proxy_node(&self, id: &str) {
        let mut store = self.store.write();
        let (Ok(sources), Ok(targets)) = (store.sources(id), store.targets(id)) else {
            return;
        };

        for source in &sources {
            for target in &targets {
                store.add_edge(source, target);
                let copied = store
                    .edge_attributes(id, target)
                    .map(Clone::clone)
                    .unwrap_or_default();
                store.set_edge_attributes(source, target, copied);
            }
        }
        store.delete_node(id);

        debug!(
            node = id,
            sources = sources.len(),
            targets = targets.len(),
            "elided proxy node"
        );
    }

    /// Removes only the edge `source -> proxy`, replicating the outgoing
    /// edges of `proxy` onto `source`. `proxy` and its other incoming
    /// edges are left alone.
    pub fn delete_proxy_edge(&self, source: &str, proxy: &str) {
        self.delete_proxy_edge_set_color(source, proxy, "");
    }

    /// Like [`Graph::delete_proxy_edge`], additionally recoloring every
    /// replicated edge when `color` is not empty.
    pub fn delete_proxy_edge_set_color(&self, source: &str, proxy: &str, color: &str) {
        let mut store = self.store.write();
        if !store.has_edge(source, proxy) {
            return;
        }
        store.delete_proxy_edge_set_color(source, proxy, color);
    }

    /// Elides every edge colored `color` until none remain.
    ///
    /// Eliding one edge can copy another edge of the same color onto its
    /// source, so the scan repeats until a full pass removes nothing.
    /// `color` is given unquoted.
    pub fn delete_proxy_edges(&self, color: &str) {
        let wanted = attributes::quoted(color);
        let mut store = self.store.write();

        let mut passes = 0;
        let mut total = 0;
        loop {
            let mut removed = 0;
            let ids: Vec<String> = store.nodes.keys().cloned().collect();
            for id in &ids {
                let targets = store.targets(id).unwrap_or_default();
                for target in &targets {
                    let matches = store
                        .edge_attributes(id, target)
                        .map(|attrs| attrs.get(attributes::COLOR) == Some(&wanted))
                        .unwrap_or(false);
                    if matches {
                        store.delete_proxy_edge_set_color(id, target, "");
                        removed += 1;
                    }
                }
            }
            passes += 1;
            total += removed;
            if removed == 0 {
                break;
            }
        }

        debug!(color, passes, removed = total, "elided proxy edges");
    }

    /// Deletes every node reachable from `root`, keeping `root` itself.
    pub fn cut_subgraph(&self, root: &str) {
        let mut store = self.store.write();
        let mut reachable = store.reachable_from(root);
        reachable.remove(root);

        for id in &reachable {
            store.delete_node(id);
        }
        debug!(root, removed = reachable.len(), "cut subgraph");
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::Graph;

    #[test]
    fn test_proxy_node_passes_connections() {
        let graph = Graph::new("test");
        graph.add_edge("A", "B");
        graph.add_edge("B", "C");
        graph.set_edge_color("B", "C", "blue");

        graph.delete_proxy_node("B");

        assert!(!graph.has_node("B"));
        assert!(graph.has_edge("A", "C"));
        assert_eq!(
            graph.edge_attributes("A", "C").unwrap()["color"],
            "\"blue\""
        );
    }

    #[test]
    fn test_proxy_node_bipartite() {
        let graph = Graph::new("test");
        graph.add_edge("A", "B");
        graph.add_edge("X", "B");
        graph.add_edge("B", "C");
        graph.add_edge("B", "D");
        graph.add_edge("B", "E");
        graph.set_edge_color("B", "C", "blue");

        graph.delete_proxy_node("B");

        assert!(!graph.has_node("B"));
        for source in ["A", "X"] {
            for target in ["C", "D", "E"] {
                assert!(graph.has_edge(source, target), "{} -> {}", source, target);
            }
            assert_eq!(
                graph.edge_attributes(source, "C").unwrap()["color"],
                "\"blue\""
            );
        }
    }

    #[test]
    fn test_proxy_node_missing_is_noop() {
        let graph = Graph::new("test");
        graph.add_edge("A", "B");
        graph.delete_proxy_node("nope");
        assert_eq!(graph.node_count(), 2);
        assert!(graph.has_edge("A", "B"));
    }

    #[test]
    fn test_proxy_edge_passes_connections() {
        let graph = Graph::new("test");
        graph.add_edge("A", "B");
        graph.add_edge("X", "B");
        graph.add_edge("B", "C");
        graph.add_edge("B", "D");
        graph.add_edge("B", "E");
        graph.set_edge_color("B", "C", "blue");

        graph.delete_proxy_edge("X", "B");

        assert!(graph.has_node("B"));
        assert!(!graph.has_edge("X", "B"));
        assert!(graph.has_edge("A", "B"));
        for target in ["C", "D", "E"] {
            assert!(graph.has_edge("X", target));
            assert!(!graph.has_edge("A", target));
        }
        assert_eq!(
            graph.edge_attributes("X", "C").unwrap()["color"],
            "\"blue\""
        );
    }

    #[test]
    fn test_proxy_edge_not_connected() {
        let graph = Graph::new("test");
        graph.add_edge("A", "B");
        graph.add_edge("B", "C");
        graph.add_edge("C", "X");
        graph.add_edge("B", "D");
        graph.add_edge("B", "E");

        graph.delete_proxy_edge("A", "C");

        assert!(!graph.has_edge("A", "X"));
        assert!(graph.has_edge("A", "B"));
        assert!(graph.has_edge("C", "X"));
    }

    #[test]
    fn test_proxy_edge_set_color() {
        let graph = Graph::new("test");
        graph.add_edge("A", "B");
        graph.add_edge("B", "C");
        graph.add_edge("B", "D");
        graph.set_edge_color("B", "C", "blue");
        graph.set_edge_weight("B", "C", 2);

        graph.delete_proxy_edge_set_color("A", "B", "red");

        let attrs = graph.edge_attributes("A", "C").unwrap();
        assert_eq!(attrs["color"], "\"red\"");
        assert_eq!(attrs["weight"], "2");
        assert_eq!(graph.edge_attributes("A", "D").unwrap()["color"], "\"red\"");

        // The originals keep their color.
        assert_eq!(graph.edge_attributes("B", "C").unwrap()["color"], "\"blue\"");
    }

    #[test]
    fn test_proxy_edges_by_color() {
        let graph = Graph::new("test");
        graph.add_edge("top", "a");
        graph.add_edge("top", "b");
        graph.add_edge("a", "a0");
        graph.add_edge("b", "b0");
        graph.set_edge_color("top", "a", "red");
        graph.set_edge_color("top", "b", "green");

        graph.delete_proxy_edges("red");

        assert!(!graph.has_edge("top", "a"));
        assert!(graph.has_edge("top", "a0"));
        assert!(graph.has_edge("top", "b"));
        assert!(!graph.has_edge("top", "b0"));
    }

    #[test]
    fn test_proxy_edges_chain_reaches_fixed_point() {
        // top -red-> a -red-> b -red-> c -> leaf
        let graph = Graph::new("test");
        graph.add_edge("top", "a");
        graph.add_edge("a", "b");
        graph.add_edge("b", "c");
        graph.add_edge("c", "leaf");
        graph.set_edge_color("top", "a", "red");
        graph.set_edge_color("a", "b", "red");
        graph.set_edge_color("b", "c", "red");

        graph.delete_proxy_edges("red");

        assert!(graph.has_edge("top", "leaf"));
        for (source, target) in graph.edges() {
            let attrs = graph.edge_attributes(&source, &target).unwrap();
            assert_ne!(attrs.get("color").map(String::as_str), Some("\"red\""));
        }
    }

    #[test]
    fn test_proxy_edges_terminates_on_colored_cycle() {
        let graph = Graph::new("test");
        graph.add_edge("a", "b");
        graph.add_edge("b", "a");
        graph.set_edge_color("a", "b", "red");
        graph.set_edge_color("b", "a", "red");

        graph.delete_proxy_edges("red");

        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_cut_subgraph() {
        let graph = Graph::new("test");
        graph.add_edge("root", "a");
        graph.add_edge("a", "b");
        graph.add_edge("b", "a");
        graph.add_edge("other", "b");

        graph.cut_subgraph("root");

        assert!(graph.has_node("root"));
        assert!(graph.has_node("other"));
        assert!(!graph.has_node("a"));
        assert!(!graph.has_node("b"));
        assert!(graph.targets("root").unwrap().is_empty());
        assert!(graph.targets("other").unwrap().is_empty());
    }

    #[test]
    fn test_cut_subgraph_keeps_root_on_cycle() {
        let graph = Graph::new("test");
        graph.add_edge("root", "a");
        graph.add_edge("a", "root");

        graph.cut_subgraph("root");

        assert!(graph.has_node("root"));
        assert!(!graph.has_node("a"));
    }
}
