//! CLI command implementations.

use crate::graphviz::{self, GraphvizOptions};
use crate::link_order;
use crate::manifest::Manifest;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Print the build order of every module.
pub fn sort(manifest_path: &Path) -> Result<()> {
    let manifest = Manifest::load(manifest_path)?;
    let graph = manifest.dependency_graph()?;

    // Edges point from users to dependencies; build the far end first.
    let sorted = graph.topological_sort();
    if !sorted.is_dag {
        warn!("dependency graph is not acyclic, order is advisory");
        for cycle in graph.cycles() {
            println!("{} {}", "cycle:".red().bold(), cycle_members(&cycle));
        }
    }

    for (position, id) in sorted.order.iter().rev().enumerate() {
        println!("{:>4} {}", position + 1, id.cyan());
    }
    Ok(())
}

/// Modules on a shared cycle; a set, not a path.
fn cycle_members(cycle: &[String]) -> String {
    cycle.join(", ")
}

/// Print the static link order of one module.
pub fn order(manifest_path: &Path, module: &str) -> Result<()> {
    let manifest = Manifest::load(manifest_path)?;
    let graph = manifest.dependency_graph()?;

    let static_libs = manifest
        .module(module)
        .map(|m| m.static_libs.clone())
        .unwrap_or_default();
    let libs = link_order::resolve(&graph, module, &static_libs)?;

    if libs.is_empty() {
        println!("{} links no static libraries", module.cyan());
        return Ok(());
    }
    println!("Link order for {}:\n", module.cyan());
    for lib in libs {
        println!("  {}", lib);
    }
    Ok(())
}

/// Report whether one module depends on another.
pub fn reach(manifest_path: &Path, from: &str, to: &str) -> Result<()> {
    let manifest = Manifest::load(manifest_path)?;
    let graph = manifest.dependency_graph()?;
    graph.require_node(from)?;
    graph.require_node(to)?;

    if graph.is_reachable(from, to) {
        println!("{} {} depends on {}", "✓".green(), from.cyan(), to.cyan());
    } else {
        println!("{} {} does not depend on {}", "✗".red(), from.cyan(), to.cyan());
    }
    Ok(())
}

/// Render the Graphviz view and write it to a file.
pub fn graph(manifest_path: &Path, options: GraphvizOptions, output: Option<&Path>) -> Result<()> {
    let manifest = Manifest::load(manifest_path)?;
    let options = options.resolved(&manifest.name);

    let full = graphviz::module_graph(&manifest, &options);
    let view = graphviz::select(&full, &options);

    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(format!("{}.graph", view.name())));
    fs::write(&path, view.to_string())?;

    info!(nodes = view.node_count(), "wrote graph");
    println!("{} Wrote {}", "✓".green(), path.display());
    Ok(())
}

/// Export the dependency graph as JSON.
pub fn export(manifest_path: &Path, output: Option<&Path>) -> Result<()> {
    let manifest = Manifest::load(manifest_path)?;
    let graph = manifest.dependency_graph()?;
    let json = serde_json::to_string_pretty(&graph.snapshot())?;

    match output {
        Some(path) => {
            fs::write(path, json)?;
            println!("{} Exported to {}", "✓".green(), path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}
