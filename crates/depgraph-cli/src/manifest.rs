//! Module manifest: the build description the CLI feeds into the graph.

use depgraph::Graph;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("failed to read manifest: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid manifest: {0}")]
    Json(#[from] serde_json::Error),

    #[error("'{module}' depends on '{lib}', but '{lib}' is either not defined or disabled")]
    UndefinedDependency { module: String, lib: String },
}

/// What a module builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKind {
    StaticLibrary,
    SharedLibrary,
    Binary,
    /// Carries shared properties for other modules; never built.
    Defaults,
    #[default]
    Other,
}

fn enabled_by_default() -> bool {
    true
}

/// One module of the build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub name: String,

    #[serde(default)]
    pub kind: ModuleKind,

    #[serde(default = "enabled_by_default")]
    pub enabled: bool,

    #[serde(default)]
    pub static_libs: Vec<String>,

    #[serde(default)]
    pub whole_static_libs: Vec<String>,

    #[serde(default)]
    pub shared_libs: Vec<String>,

    #[serde(default)]
    pub export_static_libs: Vec<String>,

    #[serde(default)]
    pub export_shared_libs: Vec<String>,

    /// Defaults modules this module inherits properties from.
    #[serde(default)]
    pub defaults: Vec<String>,
}

fn default_name() -> String {
    "All".to_string()
}

/// The full set of modules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default)]
    pub modules: Vec<Module>,
}

/// Static library edges.
pub const STATIC_COLOR: &str = "blue";

/// Whole-archive edges; elided before sorting.
pub const WHOLE_STATIC_COLOR: &str = "red";

impl Manifest {
    /// Reads a manifest from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let text = fs::read_to_string(path)?;
        let manifest: Manifest = serde_json::from_str(&text)?;
        debug!(
            path = %path.display(),
            modules = manifest.modules.len(),
            "loaded manifest"
        );
        Ok(manifest)
    }

    pub fn module(&self, name: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.name == name)
    }

    /// Enabled modules that get built.
    pub fn buildable(&self) -> impl Iterator<Item = &Module> {
        self.modules
            .iter()
            .filter(|m| m.enabled && m.kind != ModuleKind::Defaults)
    }

    /// Builds the static dependency graph: one node per buildable module,
    /// static library edges colored blue and whole-archive edges red.
    ///
    /// A dependency on a module that is missing or disabled is an error.
    pub fn dependency_graph(&self) -> Result<Graph, ManifestError> {
        let graph = Graph::new(self.name.as_str());
        for module in self.buildable() {
            graph.add_node(&module.name);
        }

        for module in self.buildable() {
            let edges = module
                .static_libs
                .iter()
                .map(|lib| (lib, STATIC_COLOR))
                .chain(
                    module
                        .whole_static_libs
                        .iter()
                        .map(|lib| (lib, WHOLE_STATIC_COLOR)),
                );
            for (lib, color) in edges {
                match graph.add_edge_to_existing_nodes(&module.name, lib) {
                    Ok(_) => graph.set_edge_color(&module.name, lib, color),
                    Err(_) => {
                        return Err(ManifestError::UndefinedDependency {
                            module: module.name.clone(),
                            lib: lib.clone(),
                        });
                    }
                }
            }
        }

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "built dependency graph"
        );
        Ok(graph)
    }
}

#[cfg(test)]
impl Manifest {
    pub fn new(name: impl Into<String>, modules: Vec<Module>) -> Self {
        Self {
            name: name.into(),
            modules,
        }
    }
}

#[cfg(test)]
impl Module {
    pub fn new(name: impl Into<String>, kind: ModuleKind) -> Self {
        Self {
            name: name.into(),
            kind,
            enabled: true,
            static_libs: Vec::new(),
            whole_static_libs: Vec::new(),
            shared_libs: Vec::new(),
            export_static_libs: Vec::new(),
            export_shared_libs: Vec::new(),
            defaults: Vec::new(),
        }
    }

    pub fn with_static_libs(mut self, libs: &[&str]) -> Self {
        self.static_libs = libs.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_whole_static_libs(mut self, libs: &[&str]) -> Self {
        self.whole_static_libs = libs.iter().map(|s| s.to_string()).collect();
        self
    }
}
