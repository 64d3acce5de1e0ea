//! Portero: command-line companion for the Ingreso test harness
//!
//! ## Usage
//!
//! ```bash
//! portero dirs                          # Provision ./reports layout
//! portero dirs --root /tmp/run          # Provision elsewhere
//! portero report --input run.json       # Summarize a saved run
//! portero report --input run.json --html reports/test-report.html
//! ```

mod error;
mod output;

use clap::{Args, Parser, Subcommand};
use error::{CliError, CliResult};
use ingreso::{ArtifactStore, Reporter};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "portero", version, about = "Artifact bootstrap and run reports for Ingreso")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Provision the artifact directory layout (idempotent)
    Dirs(DirsArgs),
    /// Summarize a saved run, optionally rendering the HTML report
    Report(ReportArgs),
}

#[derive(Debug, Args)]
struct DirsArgs {
    /// Root directory the layout is created under
    #[arg(long, default_value = ".")]
    root: PathBuf,
}

#[derive(Debug, Args)]
struct ReportArgs {
    /// Saved run file (JSON, written by the reporter)
    #[arg(long)]
    input: PathBuf,
    /// Render the HTML report to this path as well
    #[arg(long)]
    html: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Dirs(args) => run_dirs(&args),
        Commands::Report(args) => run_report(&args),
    }
}

fn run_dirs(args: &DirsArgs) -> CliResult<()> {
    let store = ArtifactStore::new(&args.root);
    for dir in [
        store.root().join(ingreso::artifacts::REPORTS_DIR),
        store.root().join(ingreso::artifacts::SCREENSHOTS_DIR),
    ] {
        let created = !dir.is_dir();
        ArtifactStore::ensure_dir(&dir)?;
        output::print_provisioned(&dir, created);
    }
    Ok(())
}

fn run_report(args: &ReportArgs) -> CliResult<()> {
    if !args.input.is_file() {
        return Err(CliError::invalid_argument(format!(
            "run file not found: {}",
            args.input.display()
        )));
    }
    let reporter = Reporter::load_json(&args.input)
        .map_err(|e| CliError::report(format!("{}: {e}", args.input.display())))?;
    output::print_run(&reporter);

    if let Some(html_path) = &args.html {
        if let Some(parent) = html_path.parent() {
            if !parent.as_os_str().is_empty() {
                ArtifactStore::ensure_dir(parent)?;
            }
        }
        reporter.generate_html(html_path)?;
        tracing::info!(path = %html_path.display(), "HTML report written");
        println!("HTML report: {}", html_path.display());
    }
    Ok(())
}
