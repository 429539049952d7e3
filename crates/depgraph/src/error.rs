//! Error types for graph lookups.

use thiserror::Error;

/// Errors returned when an operation names a node or edge the graph
/// does not hold.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("{0} does not exist in the graph")]
    NodeNotFound(String),

    #[error("{from} -> {to} does not exist in the graph")]
    EdgeNotFound { from: String, to: String },
}

pub type Result<T> = std::result::Result<T, GraphError>;
