use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use refmine_config::{LoggingConfig, RefmineConfig};
use refmine_detect::{detect_many, DetectOptions, DiffError};
use refmine_syntax::{DiffDocument, ExternalError, TreeDiff};
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(
    name = "refmine",
    version,
    about = "Classify renames and type changes in Java AST edit scripts"
)]
struct Cli {
    /// Config file (defaults to REFMINE_CONFIG_PATH, then refmine.toml in the
    /// current directory)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Detect refactorings in one or more diff documents
    Detect(DetectArgs),
    /// Print the effective configuration as TOML
    Config,
}

#[derive(Args)]
struct DetectArgs {
    /// Diff documents (JSON) produced from GumTree output
    #[arg(required = true, value_name = "DOC")]
    docs: Vec<PathBuf>,

    /// Emit the records as a JSON array
    #[arg(long)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();
    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            2
        }
    };

    std::process::exit(exit_code);
}

fn run(cli: Cli) -> Result<i32> {
    let config = load_config(cli.config)?;
    init_logging(&config.logging);

    match cli.command {
        Command::Detect(args) => detect(&config, &args),
        Command::Config => {
            print!("{}", config.to_toml()?);
            Ok(0)
        }
    }
}

fn load_config(explicit: Option<PathBuf>) -> Result<RefmineConfig> {
    if let Some(path) = explicit {
        return RefmineConfig::load_from_path(&path)
            .with_context(|| format!("loading config {}", path.display()));
    }

    let cwd = std::env::current_dir().context("reading the current directory")?;
    let (config, _) = refmine_config::load_for_dir(&cwd)
        .with_context(|| format!("loading config for {}", cwd.display()))?;
    Ok(config)
}

fn init_logging(logging: &LoggingConfig) {
    let filter = logging.env_filter();
    let layer: Box<dyn tracing_subscriber::Layer<_> + Send + Sync> = if logging.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .boxed()
    };

    // A subscriber may already be installed when embedded; keep it.
    let _ = tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .try_init();
}

fn detect(config: &RefmineConfig, args: &DetectArgs) -> Result<i32> {
    let mut diffs = Vec::with_capacity(args.docs.len());
    let mut unreadable = Vec::new();
    for path in &args.docs {
        match load_document(path) {
            Ok(diff) => diffs.push(diff),
            Err(err) => {
                let path = path.display().to_string();
                let message = format!("{err:#}");
                tracing::debug!(%path, error = %message, "skipping diff document");
                unreadable.push(DiffError::External {
                    path,
                    source: ExternalError::new(message),
                });
            }
        }
    }

    let options = DetectOptions {
        renames: config.detect.renames,
        type_changes: config.detect.type_changes,
        threads: config.detect.threads,
    };
    let mut report = detect_many(&diffs, &options);
    unreadable.append(&mut report.failures);
    report.failures = unreadable;
    tracing::info!(
        documents = args.docs.len(),
        refactorings = report.refactorings.len(),
        failures = report.failures.len(),
        "detection finished"
    );

    if args.json {
        let out = serde_json::to_string_pretty(&report.refactorings.into_vec())?;
        println!("{out}");
    } else {
        for description in report.refactorings.descriptions() {
            println!("{description}");
        }
    }

    for failure in &report.failures {
        eprintln!("{failure}");
    }
    Ok(if report.failures.is_empty() { 0 } else { 1 })
}

fn load_document(path: &Path) -> Result<(String, TreeDiff)> {
    let text = std::fs::read_to_string(path).context("reading diff document")?;
    let document = DiffDocument::from_json(&text)?;
    Ok(document.into_tree_diff()?)
}
