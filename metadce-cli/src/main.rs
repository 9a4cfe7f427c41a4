//! metadce CLI - dead code elimination across a module and its host environment.
//!
//! Reads a module manifest plus a reachability graph describing the world the
//! module lives in, removes exports and imports nothing reachable needs, and
//! reports the external entities the host can drop too.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};

use metadce_core::{
    format_plain, generate_dot, graph_to_visualizer_json, init_structured_logging, load_config,
    load_config_file, print_json, print_plain, read_graph_file, report_to_json, MetaDce,
    MetaDceConfig, ModuleManifest, WriteOptions,
};

const ABOUT: &str = "Performs dead code elimination on a larger space that the module is just a \
part of. For example, if you have JS and wasm that are connected, this can DCE the combined graph, \
and so eliminate module exports which regular optimizations cannot.";

const LONG_ABOUT: &str = "Performs dead code elimination on a larger space that the module is just a \
part of. For example, if you have JS and wasm that are connected, this can DCE the combined graph, \
and so eliminate module exports which regular optimizations cannot.

The graph file is a JSON array of nodes:

  [
    { \"name\": \"entity1\", \"reaches\": [\"entity2\", \"entity3\"], \"root\": true },
    { \"name\": \"entity2\", \"reaches\": [\"entity1\", \"entity4\"] },
    { \"name\": \"entity3\", \"reaches\": [\"entity1\"], \"export\": \"export1\" },
    { \"name\": \"entity4\", \"import\": [\"module\", \"import1\"] }
  ]

Each entity has a name and an optional list of the other entities it reaches. It can also be \
marked as a root, an export (with the export string), or an import (with the module and base \
strings). DCE then computes what is reachable from the roots.";

#[derive(Parser, Debug)]
#[command(author, version, about = ABOUT, long_about = LONG_ABOUT)]
pub struct Cli {
    /// Module manifest to optimize
    #[arg(value_name = "INFILE")]
    infile: PathBuf,

    /// Filename of the graph description file
    #[arg(short = 'f', long)]
    graph_file: Option<PathBuf>,

    /// Output file for the pruned module (not written if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit text instead of compact output for the module
    #[arg(short = 'S', long)]
    emit_text: bool,

    /// Keep the debug names table in the output module
    #[arg(short = 'g', long)]
    debuginfo: bool,

    /// Output the report in JSON format
    #[arg(long)]
    json: bool,

    /// Write the report to a file instead of stdout
    #[arg(long, value_name = "FILE")]
    report_file: Option<PathBuf>,

    /// Write a Graphviz DOT rendering of the combined graph
    #[arg(long, value_name = "FILE")]
    dot: Option<PathBuf>,

    /// Write the graph as visualizer JSON (numeric node ids, edges, stats)
    #[arg(long, value_name = "FILE")]
    graph_json: Option<PathBuf>,

    /// Config file (defaults to metadce.toml next to the graph file)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Reject repeated node names instead of keeping the last one
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    strict_duplicates: Option<bool>,

    /// Additional root node names
    #[arg(long = "root", value_name = "NAME")]
    roots: Vec<String>,

    /// Compute the report without removing anything from the module
    #[arg(long)]
    dry_run: bool,

    /// Verbose pipeline logging
    #[arg(short, long)]
    debug: bool,
}

/// Resolve the config for this run: explicit path, or the file next to the graph.
fn resolve_config(cli: &Cli, graph_file: &Path) -> Result<MetaDceConfig> {
    if let Some(path) = &cli.config {
        return load_config_file(path);
    }
    let dir = graph_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    Ok(load_config(dir)?.unwrap_or_default())
}

/// Build the pipeline from flags, with config values filling the gaps.
fn configure(cli: &Cli, config: &MetaDceConfig) -> MetaDce {
    let strict = cli
        .strict_duplicates
        .or(config.strict_duplicates)
        .unwrap_or(false);
    let roots = config
        .roots
        .iter()
        .flatten()
        .chain(cli.roots.iter())
        .cloned();

    MetaDce::new()
        .strict_duplicates(strict)
        .extra_roots(roots)
        .dry_run(cli.dry_run)
}

fn wants_json(cli: &Cli, config: &MetaDceConfig) -> bool {
    cli.json || config.wants_json()
}

fn run(cli: &Cli) -> Result<()> {
    let Some(graph_file) = cli.graph_file.as_deref() else {
        bail!("no graph file provided.");
    };

    let config = resolve_config(cli, graph_file)?;

    tracing::debug!(path = %cli.infile.display(), "reading module");
    let mut module = ModuleManifest::load(&cli.infile)
        .with_context(|| format!("error in parsing module input {}", cli.infile.display()))?;

    let graph = read_graph_file(graph_file)
        .with_context(|| format!("failed to load graph file {}", graph_file.display()))?;

    let outcome = configure(cli, &config).run(&graph.records, &mut module)?;

    let json = wants_json(cli, &config);
    match &cli.report_file {
        Some(path) => {
            let body = if json {
                serde_json::to_string_pretty(&report_to_json(&outcome.report, Some(&graph.sha256)))?
            } else {
                format_plain(&outcome.report)
            };
            fs::write(path, body)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
        }
        None if json => print_json(&outcome.report, Some(&graph.sha256)),
        None => print_plain(&outcome.report),
    }

    if let Some(path) = &cli.dot {
        fs::write(path, generate_dot(&outcome.store, &outcome.reachability))
            .with_context(|| format!("failed to write DOT to {}", path.display()))?;
    }

    if let Some(path) = &cli.graph_json {
        let doc = graph_to_visualizer_json(&outcome.store, &outcome.reachability);
        fs::write(path, serde_json::to_string_pretty(&doc)?)
            .with_context(|| format!("failed to write graph JSON to {}", path.display()))?;
    }

    if let Some(path) = &cli.output {
        tracing::debug!(path = %path.display(), "writing module");
        module.write(
            path,
            WriteOptions {
                emit_text: cli.emit_text,
                debug_info: cli.debuginfo,
            },
        )?;
    }

    Ok(())
}

fn main() {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("[PANIC] metadce internal error: {}", info);
    }));

    let cli = Cli::parse();
    init_structured_logging(if cli.debug { "debug" } else { "warn" });

    if let Err(e) = run(&cli) {
        eprintln!("Fatal: {:#}", e);
        std::process::exit(1);
    }
}
