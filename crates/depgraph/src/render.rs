//! Graphviz rendering.
//!
//! The output can be written to a `.dot` file and opened in any Graphviz
//! viewer. It is not meant to be parsed back.

use crate::attributes::Attributes;
use crate::graph::Graph;
use std::fmt;

fn write_attributes(f: &mut fmt::Formatter<'_>, attributes: &Attributes) -> fmt::Result {
    write!(f, "[")?;
    for (key, value) in attributes {
        write!(f, "{}={},", key, value)?;
    }
    write!(f, "];")
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let store = self.store.read();

        writeln!(f, "digraph {{")?;
        writeln!(f, "ranksep=2;")?;
        for (id, node) in &store.nodes {
            write!(f, "\t\"{}\" ", id)?;
            write_attributes(f, &node.attributes)?;
            writeln!(f)?;

            for target in &node.targets {
                write!(f, "\t\"{}\" -> \"{}\" ", id, target)?;
                if let Some(attributes) = node.edge_attributes.get(target) {
                    write_attributes(f, attributes)?;
                }
                writeln!(f)?;
            }
        }
        writeln!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::Graph;

    #[test]
    fn test_render_graphviz() {
        let graph = Graph::new("test");
        graph.add_edge("app", "lib");
        graph.set_edge_color("app", "lib", "orange");
        graph.set_edge_property("app", "lib", "style", "dashed");
        graph.set_node_background_color("lib", "green");

        let expected = "digraph {\n\
                        ranksep=2;\n\
                        \t\"app\" [];\n\
                        \t\"app\" -> \"lib\" [color=\"orange\",style=dashed,];\n\
                        \t\"lib\" [fillcolor=green,style=filled,];\n\
                        }\n";
        assert_eq!(graph.to_string(), expected);
    }

    #[test]
    fn test_render_empty_graph() {
        assert_eq!(Graph::new("empty").to_string(), "digraph {\nranksep=2;\n}\n");
    }
}
