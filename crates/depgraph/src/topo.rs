//! Topological sort with priority tie-breaks.
//!
//! Depth-first search over white/gray/black marks. Nodes are emitted in
//! reverse finishing order, so every node precedes the nodes it points
//! to. Two refinements make the order stable for build output:
//!
//! - roots are tried in ascending priority order;
//! - children are visited in reverse insertion order, stably sorted by
//!   priority. Reversing the finishing order undoes the first reversal,
//!   so siblings of equal priority come out in the order their edges
//!   were added.

use crate::graph::Graph;
use crate::node::NodeStore;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Result of [`Graph::topological_sort`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologicalOrder {
    /// Node ids, each before the nodes it points to.
    pub order: Vec<String>,

    /// False if a cycle was found. The order is then only advisory for
    /// the nodes on the cycle.
    pub is_dag: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    White,
    Gray,
    Black,
}

struct Frame {
    id: String,
    children: Vec<String>,
    next: usize,
}

/// Sorts ids by ascending priority, keeping the given order among equals.
fn by_priority(store: &NodeStore, mut ids: Vec<String>) -> Vec<String> {
    ids.sort_by_key(|id| store.priority(id));
    ids
}

fn children(store: &NodeStore, id: &str) -> Vec<String> {
    let mut targets = store.targets(id).unwrap_or_default();
    targets.reverse();
    by_priority(store, targets)
}

/// Visits everything reachable from `root` that is still white, pushing
/// nodes onto `finished` as they turn black.
fn visit(
    store: &NodeStore,
    root: &str,
    marks: &mut HashMap<String, Mark>,
    finished: &mut Vec<String>,
    is_dag: &mut bool,
) {
    marks.insert(root.to_string(), Mark::Gray);
    let mut stack = vec![Frame {
        id: root.to_string(),
        children: children(store, root),
        next: 0,
    }];

    while let Some(frame) = stack.last_mut() {
        if let Some(child) = frame.children.get(frame.next).cloned() {
            frame.next += 1;
            match marks.get(&child).copied().unwrap_or(Mark::White) {
                Mark::Gray => {
                    debug!(from = frame.id.as_str(), to = child.as_str(), "cycle detected");
                    *is_dag = false;
                }
                Mark::Black => {}
                Mark::White => {
                    marks.insert(child.clone(), Mark::Gray);
                    let grandchildren = children(store, &child);
                    stack.push(Frame {
                        id: child,
                        children: grandchildren,
                        next: 0,
                    });
                }
            }
        } else if let Some(done) = stack.pop() {
            marks.insert(done.id.clone(), Mark::Black);
            finished.push(done.id);
        }
    }
}

impl Graph {
    /// Orders the nodes so that every edge points forward.
    ///
    /// Lower priorities are discovered first and therefore tend to sort
    /// earlier; children of one node keep the order their edges were
    /// added in. A cycle does not stop the sort: the result is still
    /// complete but `is_dag` is false.
    pub fn topological_sort(&self) -> TopologicalOrder {
        let store = self.store.read();
        let ids: Vec<String> = store.nodes.keys().cloned().collect();

        let mut marks: HashMap<String, Mark> = ids
            .iter()
            .map(|id| (id.clone(), Mark::White))
            .collect();
        let mut finished = Vec::with_capacity(ids.len());
        let mut is_dag = true;

        for id in by_priority(&store, ids) {
            if marks.get(&id) == Some(&Mark::White) {
                visit(&store, &id, &mut marks, &mut finished, &mut is_dag);
            }
        }

        finished.reverse();
        TopologicalOrder {
            order: finished,
            is_dag,
        }
    }
}
