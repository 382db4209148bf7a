// SPDX-License-Identifier: MIT OR Apache-2.0
//! Headless auto-arrange tool.
//!
//! Reads a RON graph file, runs the layout engine over it and prints the
//! final node positions as JSON. With `--steps-out` the run is recorded
//! and the step list dumped for offline inspection.

use clap::Parser;
use shadegraph_layout::{AutoLayoutEngine, LayoutConfig, LayoutHost};
use shadegraph_model::Graph;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Arrange a ShadeGraph document from the command line
#[derive(Parser)]
#[command(name = "arrange", version, about = "Auto-arrange a ShadeGraph RON file")]
struct Args {
    /// Graph file (RON)
    input: PathBuf,

    /// Record layout steps and write them as JSON to this path
    #[arg(long)]
    steps_out: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Enable debug-level layout diagnostics
    #[arg(long)]
    debug: bool,
}

#[derive(Debug, thiserror::Error)]
enum ArrangeError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse graph: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Host with no UI; render and camera calls are no-ops
struct HeadlessHost;

impl LayoutHost for HeadlessHost {
    fn request_render(&mut self) {}

    fn center_view(&mut self) {}

    fn push_history(&mut self, description: &str) {
        tracing::info!("history checkpoint: {description}");
    }
}

fn main() {
    let args = Args::parse();

    let default_filter = if args.debug {
        "shadegraph_layout=debug"
    } else {
        "shadegraph_layout=info"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(&args) {
        tracing::error!("arrange failed: {e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), ArrangeError> {
    let text = std::fs::read_to_string(&args.input).map_err(|source| ArrangeError::Read {
        path: args.input.clone(),
        source,
    })?;
    let mut graph: Graph = ron::from_str(&text)?;
    tracing::info!(
        nodes = graph.node_count(),
        wires = graph.wire_count(),
        "loaded graph '{}'",
        graph.name
    );

    let engine = AutoLayoutEngine::new(LayoutConfig::default());
    let mut host = HeadlessHost;

    if let Some(steps_path) = &args.steps_out {
        match engine.auto_arrange_stepped(&mut graph, &[], &mut host) {
            Some(session) => {
                let json = session.export_json(args.pretty)?;
                std::fs::write(steps_path, json).map_err(|source| ArrangeError::Write {
                    path: steps_path.clone(),
                    source,
                })?;
                tracing::info!(steps = session.step_count(), "wrote step dump");
            }
            None => tracing::warn!("nothing to arrange, no steps recorded"),
        }
    } else {
        engine.auto_arrange(&mut graph, &[], &mut host);
    }

    let positions: indexmap::IndexMap<String, [f32; 2]> = graph
        .nodes()
        .map(|n| (n.id.0.to_string(), n.position))
        .collect();
    let output = if args.pretty {
        serde_json::to_string_pretty(&positions)?
    } else {
        serde_json::to_string(&positions)?
    };
    println!("{output}");
    Ok(())
}
