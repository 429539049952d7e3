//! Attribute maps attached to nodes and edges.
//!
//! Attributes are free-form string pairs. A handful of keys have meaning
//! to the rendering layer (and to proxy-edge elision, which selects edges
//! by color); their values are stored in the exact form they will be
//! rendered in, so colors are kept quoted.

use std::collections::BTreeMap;

/// String-keyed attributes of a node or an edge.
///
/// Ordered by key, so rendering is stable across runs.
pub type Attributes = BTreeMap<String, String>;

/// Edge color, also the selector for batch proxy-edge elision.
pub const COLOR: &str = "color";

/// Edge line weight.
pub const WEIGHT: &str = "weight";

/// Whether the edge participates in rank assignment when rendered.
pub const CONSTRAINT: &str = "constraint";

/// Node fill color.
pub const FILL_COLOR: &str = "fillcolor";

/// Node and edge drawing style.
pub const STYLE: &str = "style";

/// Node outline shape.
pub const SHAPE: &str = "shape";

/// Wraps a value in double quotes, the stored form of colors and
/// boolean edge properties.
pub fn quoted(value: &str) -> String {
    format!("\"{}\"", value)
}
