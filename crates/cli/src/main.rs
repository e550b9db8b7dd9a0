//! nbsmoke - Notebook smoke-test runner CLI
//! Composition root: wires the HTTP fetcher and nbconvert executor
//! into the sequential runner.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tabled::{Table, Tabled};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use nbsmoke_core::application::constants::DEFAULT_CELL_TIMEOUT_SECS;
use nbsmoke_core::application::SmokeRunner;
use nbsmoke_core::domain::{builtin_suites, NotebookRef, OutcomeKind, RunReport, Suite};
use nbsmoke_core::port::time_provider::SystemTimeProvider;
use nbsmoke_infra_http::HttpFetcher;
use nbsmoke_infra_system::NbconvertExecutor;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "nbsmoke")]
#[command(about = "Smoke-test remotely hosted Jupyter notebooks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch, execute and clean up the selected notebooks
    Run {
        /// Builtin suite name (repeatable; default: all builtin suites)
        #[arg(short, long)]
        suite: Vec<String>,

        /// Extra notebook URL to run as an ad-hoc suite (repeatable)
        #[arg(short, long)]
        notebook: Vec<String>,

        /// Directory the notebooks are fetched into
        #[arg(long, env = "NBSMOKE_WORKDIR", default_value = ".")]
        workdir: String,

        /// Per-cell execution timeout passed to nbconvert, in seconds
        #[arg(long, default_value_t = DEFAULT_CELL_TIMEOUT_SECS)]
        cell_timeout: u64,

        /// Report format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// List the builtin suites and their notebooks
    List,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Tabled)]
struct OutcomeRow {
    suite: String,
    notebook: String,
    status: String,
    duration_ms: i64,
    detail: String,
}

fn init_logging() {
    let log_format = std::env::var("NBSMOKE_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .expect("Failed to create env filter");

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }
}

fn select_suites(names: &[String], notebook_urls: &[String]) -> nbsmoke_core::Result<Vec<Suite>> {
    let mut suites = Vec::new();

    for name in names {
        suites.push(Suite::builtin(name)?);
    }

    if !notebook_urls.is_empty() {
        let refs = notebook_urls
            .iter()
            .map(|url| NotebookRef::from_url(url.clone()))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        suites.push(Suite::new("ad-hoc", refs));
    }

    if suites.is_empty() {
        suites = builtin_suites();
    }

    Ok(suites)
}

fn status_cell(outcome: &OutcomeKind) -> String {
    match outcome {
        OutcomeKind::Passed => "PASS".green().bold().to_string(),
        OutcomeKind::DownloadFailed => "DOWNLOAD FAILED".red().bold().to_string(),
        OutcomeKind::ExecutionFailed {
            exit_code: Some(code),
        } => format!("FAIL (exit {code})").red().bold().to_string(),
        OutcomeKind::ExecutionFailed { exit_code: None } => "FAIL".red().bold().to_string(),
        OutcomeKind::TimedOut { limit_secs } => {
            format!("TIMEOUT ({limit_secs}s)").red().bold().to_string()
        }
    }
}

fn print_table(report: &RunReport) {
    let rows: Vec<OutcomeRow> = report
        .suites
        .iter()
        .flat_map(|suite| {
            suite.outcomes.iter().map(|o| OutcomeRow {
                suite: suite.suite.clone(),
                notebook: o.notebook.clone(),
                status: status_cell(&o.outcome),
                duration_ms: o.duration_ms,
                detail: o.detail.clone().unwrap_or_default(),
            })
        })
        .collect();

    println!("{}", Table::new(rows));
}

async fn run(
    suite_names: Vec<String>,
    notebook_urls: Vec<String>,
    workdir: String,
    cell_timeout: u64,
    format: OutputFormat,
) -> Result<RunReport> {
    let suites = select_suites(&suite_names, &notebook_urls).context("Invalid suite selection")?;

    let workdir = PathBuf::from(shellexpand::tilde(&workdir).into_owned());
    std::fs::metadata(&workdir)
        .with_context(|| format!("Working directory not accessible: {}", workdir.display()))?;

    let time_provider = Arc::new(SystemTimeProvider);
    let fetcher = Arc::new(HttpFetcher::new());
    let executor = Arc::new(
        NbconvertExecutor::new(time_provider.clone()).with_cell_timeout(cell_timeout),
    );

    let runner = SmokeRunner::new(fetcher, executor, time_provider, workdir);
    let report = runner.run(&suites).await;

    match format {
        OutputFormat::Table => {
            print_table(&report);
            println!();
            if report.passed() {
                println!(
                    "{}",
                    format!("✓ {} notebook(s) passed", report.total_notebooks())
                        .green()
                        .bold()
                );
            } else {
                println!(
                    "{}",
                    format!(
                        "✗ {} of {} notebook(s) failed",
                        report.failed_notebooks(),
                        report.total_notebooks()
                    )
                    .red()
                    .bold()
                );
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(report)
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            suite,
            notebook,
            workdir,
            cell_timeout,
            format,
        } => {
            info!("nbsmoke v{} starting", VERSION);
            let report = run(suite, notebook, workdir, cell_timeout, format).await?;
            if !report.passed() {
                std::process::exit(1);
            }
        }

        Commands::List => {
            for suite in builtin_suites() {
                println!("{}", suite.name.cyan().bold());
                for nb in &suite.notebooks {
                    println!("  {} ({})", nb.filename(), nb.url());
                }
            }
        }
    }

    Ok(())
}
