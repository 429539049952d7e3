//! Depgraph - attributed dependency graph engine
//!
//! This crate holds the graph used to order build steps. Nodes and edges
//! are opaque string ids with free-form string attributes; the engine
//! knows nothing about libraries or toolchains.
//!
//! # Architecture
//!
//! A `Graph` owns all nodes in one map keyed by id, behind a single
//! read/write lock. Nodes refer to each other only by id. On top of
//! plain storage it provides:
//! - Proxy elision (collapse organizational nodes and edges)
//! - Subgraph extraction and reachability
//! - Topological sorting with priority tie-breaks and cycle reporting
//! - Graphviz rendering via `Display`
//!
//! # Example
//!
//! ```
//! use depgraph::Graph;
//!
//! let graph = Graph::new("All");
//! graph.add_edge("app", "libfoo");
//! graph.add_edge("libfoo", "libbar");
//! graph.set_edge_color("app", "libfoo", "red");
//!
//! // Look through the grouping edge.
//! graph.delete_proxy_edges("red");
//! assert!(graph.has_edge("app", "libbar"));
//!
//! let sorted = graph.topological_sort();
//! assert!(sorted.is_dag);
//! ```

pub mod attributes;
mod cycles;
mod error;
mod graph;
mod node;
mod proxy;
mod render;
mod snapshot;
mod subgraph;
mod topo;

pub use attributes::Attributes;
pub use error::{GraphError, Result};
pub use graph::Graph;
pub use snapshot::{GraphSnapshot, SnapshotEdge, SnapshotNode};
pub use topo::TopologicalOrder;
