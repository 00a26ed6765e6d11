use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use depscope::analysis::{scan, Language, ScanOptions};
use depscope::export::{export_to_string, ExportData, ExportFormat};
use depscope::graph::{CycleStrategy, DependencyGraph};

#[derive(Parser)]
#[command(name = "depscope")]
#[command(version)]
#[command(about = "Module dependency graph builder with circular dependency detection", long_about = None)]
struct Cli {
    /// Source directory to scan
    #[arg(short, long)]
    path: PathBuf,

    /// Language of the source files (python, typescript, javascript, go)
    #[arg(short, long)]
    lang: Language,

    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Report format (markdown, json)
    #[arg(short, long, default_value = "markdown")]
    format: ExportFormat,

    /// Cycle detection strategy (traversal, components)
    #[arg(long, default_value = "traversal")]
    cycles: CycleStrategy,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let options = ScanOptions::new(&cli.path, cli.lang);
    let modules = scan(&options)
        .with_context(|| format!("failed to scan {}", cli.path.display()))?;

    let graph = DependencyGraph::from_modules(&modules, cli.lang);
    let cycles = graph.detect_cycles(cli.cycles);
    tracing::info!(
        modules = graph.node_count(),
        dependencies = graph.edge_count(),
        cycles = cycles.len(),
        "dependency graph built"
    );

    let data = ExportData::new(
        cli.path.display().to_string(),
        cli.lang,
        &modules,
        &graph,
        cli.cycles,
        cycles,
    );
    let report = export_to_string(cli.format, &data).context("failed to render report")?;

    match &cli.output {
        Some(path) => {
            fs::write(path, &report)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            tracing::info!(path = %path.display(), "report written");
        }
        None => print!("{report}"),
    }

    Ok(())
}
