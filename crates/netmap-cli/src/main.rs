//! Netmap CLI
//!
//! Renders a network described in plain sentences:
//!
//! ```text
//! netmap -i office.net -o office.svg --legend
//! ```
//!
//! The output file's extension picks the format: `.dot`/`.gv` write DOT
//! source, `.json` writes the render model, anything else is handed to
//! Graphviz (`neato -T<ext>` by default).

use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use netmap_dsl::LegendPrefix;
use netmap_graph::{ConvertOptions, NetworkGraph};
use tracing_subscriber::EnvFilter;

mod output;
mod viz;

use output::{write_output, OutputFormat};
use viz::{build_render_graph, RenderOptions};

#[derive(Debug, Parser)]
#[command(name = "netmap")]
#[command(author, version, about = "Render a network tree.")]
struct Cli {
    /// The input file to parse.
    #[arg(short = 'i', long = "input-file")]
    input_file: PathBuf,

    /// The output file to render (extension selects the format).
    #[arg(short = 'o', long = "output-file")]
    output_file: PathBuf,

    /// Add the legend to the output.
    #[arg(short = 'l', long, overrides_with = "no_legend")]
    legend: bool,

    /// Leave the legend out (default). `-nl` is accepted too.
    #[arg(long = "no-legend", overrides_with = "legend")]
    no_legend: bool,

    /// Output format, overriding the output file's extension.
    #[arg(short = 'f', long)]
    format: Option<String>,

    /// Graphviz layout engine.
    #[arg(long, default_value = "neato")]
    engine: String,

    /// Graphviz edge routing (`ortho`, `spline`, `polyline`, ...).
    #[arg(long, default_value = "ortho")]
    splines: String,

    /// Allow nodes to overlap.
    #[arg(long)]
    overlap: bool,

    /// Log debug details to stderr.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn convert_options(&self) -> ConvertOptions {
        ConvertOptions {
            legend: self.legend.then(LegendPrefix::random),
        }
    }

    fn render_options(&self) -> RenderOptions {
        RenderOptions {
            engine: self.engine.clone(),
            splines: self.splines.clone(),
            overlap: self.overlap,
        }
    }
}

/// Map the legacy single-dash `-nl` spelling onto `--no-legend`.
fn normalize_args(args: impl IntoIterator<Item = OsString>) -> Vec<OsString> {
    args.into_iter()
        .map(|arg| {
            if arg == "-nl" {
                OsString::from("--no-legend")
            } else {
                arg
            }
        })
        .collect()
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("NETMAP_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let format = OutputFormat::resolve(cli.format.as_deref(), &cli.output_file)?;
    let text = fs::read_to_string(&cli.input_file)
        .with_context(|| format!("failed to read `{}`", cli.input_file.display()))?;

    let graph = NetworkGraph::from_document(&text, &cli.convert_options());
    let render = build_render_graph(&graph);
    write_output(&render, &cli.render_options(), &format, &cli.output_file)?;

    eprintln!(
        "{} {} (nodes={} edges={} skipped_lines={})",
        "wrote".green().bold(),
        cli.output_file.display().to_string().bold(),
        render.nodes.len(),
        render.edges.len(),
        graph.skipped.len()
    );
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse_from(normalize_args(std::env::args_os()));
    init_logging(cli.verbose);
    run(&cli)
}
