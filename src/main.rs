mod error;
mod executor;
mod model;
mod report;
mod resolver;

use anyhow::{bail, Context, Result};
use clap::Parser;
use executor::ToolMode;
use model::BOOTSTRAP_STAGE_ID;
use report::{run_step, ConsoleReporter, StatusReporter};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Validate a FAST stage directory and recover missing interface files from
/// the bootstrap stage.
#[derive(Parser, Debug)]
#[command(name = "fast-install", version, about)]
struct Cli {
    /// Stage directory to validate
    #[arg(default_value = ".")]
    stage_dir: PathBuf,

    /// Treat external tool failures as fatal instead of falling back
    #[arg(long)]
    strict: bool,
}

fn main() -> ExitCode {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "fast_install=warn".into());
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\nAn error has occurred.");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    if !cli.stage_dir.is_dir() {
        bail!("'{}' is not a directory.", cli.stage_dir.display());
    }
    let stage_dir = cli
        .stage_dir
        .canonicalize()
        .with_context(|| format!("Cannot resolve '{}'.", cli.stage_dir.display()))?;

    let reporter = ConsoleReporter::default();

    let config = run_step(&reporter, "reading YAML configuration", || {
        model::load_stage_config(&stage_dir)
    })?;

    let interface_files = run_step(&reporter, "checking FAST interface files", || {
        Ok(resolver::check_interface_files(
            &config.id,
            &config.requires,
            &stage_dir,
        ))
    })?;

    if !interface_files.all_present() && !config.is_bootstrap() {
        reporter.info(&format!(
            "missing: {}",
            interface_files.missing().join(", ")
        ));
        match resolver::resolve_sibling(&stage_dir, BOOTSTRAP_STAGE_ID) {
            Some(bootstrap_dir) => {
                reporter.info(&format!(
                    "found bootstrap stage at '{}'",
                    bootstrap_dir.display()
                ));
                let mode = if cli.strict {
                    ToolMode::Strict
                } else {
                    ToolMode::Tolerant
                };
                let outputs = run_step(&reporter, "fetching bootstrap stage outputs", || {
                    executor::stage_outputs(&bootstrap_dir, mode)
                })?;
                match outputs {
                    // TODO(reconciliation): materialize the missing interface
                    // files from these outputs, or prompt for a GCS bucket in
                    // single-stage setups.
                    Some(outputs) => reporter.info(&format!(
                        "bootstrap stage exposes {} outputs",
                        outputs.as_object().map_or(0, |o| o.len())
                    )),
                    None => reporter.info("bootstrap outputs unavailable, skipping recovery"),
                }
            }
            None => reporter.info("bootstrap stage not found, skipping recovery"),
        }
    }

    println!("\n{config:?}");
    println!("{:?}", interface_files.files);
    Ok(())
}
