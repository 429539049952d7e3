//! Depgraph CLI - inspect the dependency graph of a module manifest
//!
//! Loads a JSON module manifest, builds the dependency graph and answers
//! questions about it: build order, static link order, reachability,
//! and Graphviz views for diagnostics.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod graphviz;
mod link_order;
mod manifest;

use graphviz::GraphvizOptions;

#[derive(Parser)]
#[command(name = "depgraph")]
#[command(author = "Depgraph Contributors")]
#[command(version)]
#[command(about = "Dependency graph tooling for module manifests", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the build order of every module
    Sort {
        /// Module manifest (JSON)
        manifest: PathBuf,
    },

    /// Print the static library link order of a module
    Order {
        /// Module manifest (JSON)
        manifest: PathBuf,

        /// Module to resolve
        module: String,
    },

    /// Check whether one module depends on another
    Reach {
        /// Module manifest (JSON)
        manifest: PathBuf,

        /// Depending module
        from: String,

        /// Dependency
        to: String,
    },

    /// Write a Graphviz view of the module graph
    Graph {
        /// Module manifest (JSON)
        manifest: PathBuf,

        /// Output file (defaults to <name>.graph)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Show every module that uses these (comma separated)
        #[arg(long, value_delimiter = ',')]
        who_uses: Vec<String>,

        /// Show what these depend on (comma separated)
        #[arg(long, value_delimiter = ',')]
        dependencies: Vec<String>,

        /// Highlight these modules (comma separated)
        #[arg(long, value_delimiter = ',')]
        mark: Vec<String>,

        /// Hide defaults modules
        #[arg(long)]
        hide_defaults: bool,

        /// Hide binaries
        #[arg(long)]
        hide_binaries: bool,

        /// Look through whole-archive dependencies instead of drawing them
        #[arg(long)]
        hide_whole_static: bool,

        /// Hide static libraries
        #[arg(long)]
        hide_static_libs: bool,

        /// Hide shared libraries
        #[arg(long)]
        hide_shared_libs: bool,
    },

    /// Export the dependency graph as JSON
    Export {
        /// Module manifest (JSON)
        manifest: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let result = match cli.command {
        Commands::Sort { manifest } => commands::sort(&manifest),
        Commands::Order { manifest, module } => commands::order(&manifest, &module),
        Commands::Reach { manifest, from, to } => commands::reach(&manifest, &from, &to),
        Commands::Graph {
            manifest,
            output,
            who_uses,
            dependencies,
            mark,
            hide_defaults,
            hide_binaries,
            hide_whole_static,
            hide_static_libs,
            hide_shared_libs,
        } => {
            let options = GraphvizOptions {
                who_uses,
                dependencies,
                mark,
                show_defaults: !hide_defaults,
                show_binaries: !hide_binaries,
                show_whole_static: !hide_whole_static,
                show_static_libs: !hide_static_libs,
                show_shared_libs: !hide_shared_libs,
            };
            commands::graph(&manifest, options, output.as_deref())
        }
        Commands::Export { manifest, output } => commands::export(&manifest, output.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
