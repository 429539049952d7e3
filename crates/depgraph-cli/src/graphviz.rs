//! Graphviz view of the module graph.
//!
//! Builds a colored graph of every module and its library relationships,
//! then narrows it down to the part the user asked about: who uses a set
//! of modules, and what another set depends on.

use crate::manifest::{Manifest, Module, ModuleKind};
use depgraph::attributes::{SHAPE, STYLE};
use depgraph::Graph;
use std::collections::BTreeSet;
use tracing::debug;

/// What to show in the rendered graph.
#[derive(Debug, Clone)]
pub struct GraphvizOptions {
    /// Show every module that (transitively) uses these.
    pub who_uses: Vec<String>,
    /// Show everything these (transitively) depend on.
    pub dependencies: Vec<String>,
    /// Drawn with a double outline.
    pub mark: Vec<String>,
    pub show_defaults: bool,
    pub show_binaries: bool,
    pub show_whole_static: bool,
    pub show_static_libs: bool,
    pub show_shared_libs: bool,
}

impl Default for GraphvizOptions {
    fn default() -> Self {
        Self {
            who_uses: Vec::new(),
            dependencies: Vec::new(),
            mark: Vec::new(),
            show_defaults: true,
            show_binaries: true,
            show_whole_static: true,
            show_static_libs: true,
            show_shared_libs: true,
        }
    }
}

impl GraphvizOptions {
    /// Fills in the selections left empty: with neither `who_uses` nor
    /// `dependencies` both default to `name`, and `mark` defaults to
    /// their union.
    pub fn resolved(mut self, name: &str) -> Self {
        if self.who_uses.is_empty() && self.dependencies.is_empty() {
            self.who_uses = vec![name.to_string()];
            self.dependencies = vec![name.to_string()];
        }
        if self.mark.is_empty() {
            self.mark = self
                .who_uses
                .iter()
                .chain(&self.dependencies)
                .cloned()
                .collect();
        }
        self
    }

    fn shows(&self, kind: ModuleKind) -> bool {
        match kind {
            ModuleKind::StaticLibrary => self.show_static_libs,
            ModuleKind::SharedLibrary => self.show_shared_libs,
            ModuleKind::Binary => self.show_binaries,
            ModuleKind::Defaults => self.show_defaults,
            ModuleKind::Other => true,
        }
    }
}

fn fill_color(kind: ModuleKind) -> Option<&'static str> {
    match kind {
        ModuleKind::StaticLibrary => Some("green"),
        ModuleKind::SharedLibrary => Some("orange"),
        ModuleKind::Binary => Some("gray"),
        ModuleKind::Defaults => Some("yellow"),
        ModuleKind::Other => None,
    }
}

fn add_colored(graph: &Graph, from: &str, libs: &[String], color: &str, dashed: bool) {
    for lib in libs {
        graph.add_edge(from, lib);
        graph.set_edge_color(from, lib, color);
        if dashed {
            graph.set_edge_property(from, lib, STYLE, "dashed");
        }
    }
}

fn add_module(graph: &Graph, module: &Module, options: &GraphvizOptions) {
    if !module.enabled || !options.shows(module.kind) {
        return;
    }
    let name = module.name.as_str();

    match fill_color(module.kind) {
        Some(color) => graph.set_node_background_color(name, color),
        None => {
            graph.add_node(name);
        }
    }
    if options.mark.iter().any(|m| m == name) {
        graph.set_node_property(name, SHAPE, "doublecircle");
    }

    if options.show_shared_libs {
        add_colored(graph, name, &module.shared_libs, "orange", false);
        add_colored(graph, name, &module.export_shared_libs, "orange", true);
    }
    if options.show_static_libs {
        add_colored(graph, name, &module.static_libs, "green", false);
        add_colored(graph, name, &module.export_static_libs, "green", true);
    }

    add_colored(graph, name, &module.whole_static_libs, "red", false);

    if module.kind == ModuleKind::Defaults && options.show_defaults {
        add_colored(graph, name, &module.defaults, "yellow", false);
    }
}

/// Builds the colored graph of every module in the manifest.
///
/// Hidden whole-archive edges are elided dependencies first, so a chain
/// of them collapses onto the module at its top.
pub fn module_graph(manifest: &Manifest, options: &GraphvizOptions) -> Graph {
    let graph = Graph::new(manifest.name.as_str());
    for module in &manifest.modules {
        add_module(&graph, module, options);
    }

    if !options.show_whole_static {
        for id in graph.topological_sort().order.iter().rev() {
            let Some(module) = manifest.module(id) else {
                continue;
            };
            for lib in &module.whole_static_libs {
                graph.delete_proxy_edge(id, lib);
            }
        }
    }
    graph
}

/// Narrows `graph` to the selection in `options`, which must already be
/// resolved.
pub fn select(graph: &Graph, options: &GraphvizOptions) -> Graph {
    let output = Graph::new(graph.name());

    for sub in graph.subgraphs() {
        if options.who_uses.iter().any(|id| sub.has_node(id)) {
            output.merge(&sub);
        }
    }
    for id in &options.dependencies {
        output.merge(&graph.subgraph(id));
    }

    let dependencies: BTreeSet<&String> = options.dependencies.iter().collect();
    for id in &options.who_uses {
        if !dependencies.contains(id) {
            output.cut_subgraph(id);
        }
    }

    debug!(
        nodes = output.node_count(),
        edges = output.edge_count(),
        "selected graph view"
    );
    output
}
