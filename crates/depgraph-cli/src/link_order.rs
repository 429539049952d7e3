//! Static library link order.
//!
//! Works out the order in which a module's static libraries, direct and
//! inherited, are passed to the linker. Libraries that depend on each
//! other are kept close together, frequently used libraries go near their
//! users and expensive ones (that pull in many others) go towards the end.

use crate::manifest::WHOLE_STATIC_COLOR;
use depgraph::{Graph, GraphError};
use thiserror::Error;
use tracing::debug;

/// Temporary edges that pin the declared order of sibling libraries.
const ORDER_COLOR: &str = "pink";

/// Weight of a library's user count against its cost.
const IMPORTANCE_SCALE: i64 = 10;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LinkOrderError {
    #[error("'{0}' is not a module in the dependency graph")]
    UnknownModule(String),

    #[error(
        "dependency cycle detected while ordering '{module}', involving modules: {}",
        .involved.join(", ")
    )]
    Cycle {
        module: String,
        involved: Vec<String>,
    },

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Resolves the link order of every static library `module` needs,
/// excluding `module` itself.
///
/// `graph` holds the whole static dependency graph (see
/// `Manifest::dependency_graph`); `static_libs` are the module's direct
/// static libraries in declaration order. Temporary ordering edges are
/// removed from `graph` before returning.
pub fn resolve(
    graph: &Graph,
    module: &str,
    static_libs: &[String],
) -> Result<Vec<String>, LinkOrderError> {
    if !graph.has_node(module) {
        return Err(LinkOrderError::UnknownModule(module.to_string()));
    }

    // Keep the declared order where the graph does not already decide it.
    let mut temporary = Vec::new();
    for (i, previous) in static_libs.iter().enumerate() {
        for lib in &static_libs[i + 1..] {
            if !graph.is_reachable(lib, previous) && graph.add_edge(previous, lib) {
                graph.set_edge_color(previous, lib, ORDER_COLOR);
                temporary.push((previous.as_str(), lib.as_str()));
            }
        }
    }

    let sub = graph.subgraph(module);

    for (previous, lib) in temporary {
        graph.delete_edge(previous, lib)?;
    }

    // Priority is 'scale * importance - cost': the number of users
    // against the number of libraries pulled in.
    for id in sub.nodes() {
        let cost = sub.subgraph_node_count(&id) as i64;
        let users = sub.sources(&id)?.len() as i64;
        sub.set_node_priority(&id, IMPORTANCE_SCALE * users - cost)?;
    }
    // The module itself must be visited first.
    sub.set_node_priority(module, i64::MIN)?;

    // Whole-archive edges were needed for the priorities; drop them now.
    sub.delete_proxy_edges(WHOLE_STATIC_COLOR);

    let reduced = sub.subgraph(module);
    let sorted = reduced.topological_sort();
    if !sorted.is_dag {
        let involved = reduced.cycles().into_iter().flatten().collect();
        return Err(LinkOrderError::Cycle {
            module: module.to_string(),
            involved,
        });
    }

    let libs: Vec<String> = sorted.order.into_iter().filter(|id| id != module).collect();
    debug!(module, libs = libs.len(), "resolved link order");
    Ok(libs)
}
