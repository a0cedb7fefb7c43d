//! CLI for the restoration simulator's benchmark plots.
//!
//! `dmsplot plot` turns a benchmark results file into a comparative bar
//! chart (SVG) or a text table; `dmsplot summarize` prints the spread of
//! the optimal value and state count over a batch of Monte Carlo runs.

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod config;
pub mod plot;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use dms_benchmarks::{io, normalize, summary, Naming};
use plot::{PlotKind, Rendered};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Settings;

/// Restoration benchmark plotting CLI.
#[derive(Parser, Debug)]
#[command(name = "dmsplot")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to `dmsplot.toml` if present).
    #[arg(long, global = true, env = "DMSPLOT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Plot a benchmark results file.
    ///
    /// Charts are written as `<stem>.<kind>.svg` next to the input, or into
    /// the output directory. The `table` kind prints to standard output.
    Plot(PlotArgs),

    /// Summarize the optimal value and state count over Monte Carlo runs.
    Summarize {
        /// Results files, one per run.
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Print the summary as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Arguments of `dmsplot plot`.
#[derive(Args, Debug, Clone)]
pub struct PlotArgs {
    /// Benchmark results file (JSON array).
    pub file: PathBuf,

    /// Plot kind, or any prefix of one (e.g. `mem`, `state-t`).
    #[arg(short, long, default_value = "time")]
    pub kind: String,

    /// Row naming: `default` uses entry names, `opt` decodes optimizations.
    #[arg(short, long)]
    pub naming: Option<Naming>,

    /// Number of buses in the simulated network.
    #[arg(long)]
    pub bus_count: Option<usize>,

    /// Directory to write charts to.
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
}

/// What `dmsplot plot` produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlotOutcome {
    /// A chart was written to this path.
    Chart(PathBuf),
    /// A table was printed.
    Table,
    /// The kind selector matched nothing; nothing was produced.
    UnknownKind,
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Run `dmsplot plot` with command-line flags layered over `settings`.
///
/// Table text goes to `out`.
pub fn plot(args: &PlotArgs, settings: &Settings, out: &mut impl Write) -> Result<PlotOutcome> {
    let Some(kind) = PlotKind::from_prefix(&args.kind) else {
        eprintln!(
            "{} unrecognized plot kind `{}` (expected one of: {})",
            "warning:".yellow().bold(),
            args.kind,
            PlotKind::names()
        );
        warn!(selector = %args.kind, "Unrecognized plot kind, nothing to do");
        return Ok(PlotOutcome::UnknownKind);
    };

    let naming = args.naming.unwrap_or(settings.naming);
    if let Some(bus_count) = args.bus_count.or(settings.bus_count) {
        debug!(bus_count, "Bus count given");
    }

    let document = io::read_results_json(&args.file)?;
    let records = normalize::normalize_all(&document, naming)
        .with_context(|| format!("Failed to normalize {}", args.file.display()))?;
    info!(records = records.len(), %kind, %naming, "Loaded benchmark results");

    match plot::render_kind(&records, kind)? {
        Rendered::Table(text) => {
            out.write_all(text.as_bytes())?;
            Ok(PlotOutcome::Table)
        }
        Rendered::Chart(layout) => {
            let dir = args.output_dir.as_ref().or(settings.output_dir.as_ref());
            if let Some(dir) = dir {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create {}", dir.display()))?;
            }
            let path = io::output_path(&args.file, kind.name(), dir.map(PathBuf::as_path));
            dms_chart::draw_svg(&layout, &path, &settings.render_options())?;
            Ok(PlotOutcome::Chart(path))
        }
    }
}

/// Run `dmsplot summarize` over `files`.
pub fn summarize(files: &[PathBuf]) -> Result<Option<summary::RunSummary>> {
    let documents = files
        .iter()
        .map(io::read_results_json)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(summary::summarize_runs(&documents))
}

/// Run the CLI with the process arguments.
///
/// # Returns
///
/// Returns `Ok(())` on success, or an error if the command fails.
pub fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref()).context("Failed to load configuration")?;
    init_tracing(&settings.log_level);

    match cli.command {
        Commands::Plot(args) => {
            let stdout = std::io::stdout();
            if let PlotOutcome::Chart(path) = plot(&args, &settings, &mut stdout.lock())? {
                println!("{} {}", "Generated:".green().bold(), path.display());
            }
            Ok(())
        }
        Commands::Summarize { files, json } => {
            match summarize(&files)? {
                Some(summary) if json => println!("{}", serde_json::to_string_pretty(&summary)?),
                Some(summary) => println!("{summary}"),
                None => eprintln!("{} no usable runs", "warning:".yellow().bold()),
            }
            Ok(())
        }
    }
}
