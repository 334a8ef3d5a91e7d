#![forbid(unsafe_code)]

mod commands;

use std::path::PathBuf;
use std::process::ExitCode as ProcessExitCode;

use clap::{ArgAction, Parser, Subcommand};
use nbs_core::{ExitCode, ENV_NBS_LOG_LEVEL};
use tracing_subscriber::EnvFilter;

use crate::commands::{CliError, QueryArgs};

#[derive(Parser)]
#[command(name = "nbs")]
#[command(about = "Nature-based solutions catalog CLI")]
struct Cli {
    /// Catalog database (`sqlite:path`, a bare path, or `:memory:`).
    /// Falls back to NBS_DATABASE_URL, then the data directory.
    #[arg(long, global = true)]
    db: Option<String>,
    /// Print failures as machine-readable JSON on stderr.
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database file and schema if missing.
    InitDb,
    /// Insert the canonical adaptation targets (idempotent).
    SeedTargets,
    /// Create solutions from a JSON fixture; existing names are skipped.
    Import { path: PathBuf },
    /// List solutions matching an optional region and target thresholds.
    Query {
        /// `west,south,east,north` in degrees.
        #[arg(long)]
        bbox: Option<String>,
        /// GeoJSON polygon text, or `@file` to read it from disk.
        #[arg(long)]
        geojson: Option<String>,
        /// `Name:min` threshold; repeat for more clauses.
        #[arg(long = "target")]
        targets: Vec<String>,
        /// Override the region area bound in square metres.
        #[arg(long)]
        max_area: Option<f64>,
    },
    /// Fetch one solution by id or by exact name.
    Get {
        id: Option<String>,
        #[arg(long, conflicts_with = "id")]
        name: Option<String>,
    },
    /// List the adaptation target vocabulary.
    Targets,
    /// Print or write the OpenAPI document.
    Openapi {
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

/// `-v` wins; without it `NBS_LOG_LEVEL` may raise the quiet default.
fn log_directive(verbose: u8, env_level: Option<String>) -> String {
    match verbose {
        0 => env_level
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "error".to_string()),
        1 => "info".to_string(),
        _ => "debug".to_string(),
    }
}

fn init_logging(verbose: u8) {
    let directive = log_directive(verbose, std::env::var(ENV_NBS_LOG_LEVEL).ok());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("error"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> ProcessExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let machine_json = cli.json;
    match run(cli) {
        Ok(()) => ProcessExitCode::from(ExitCode::Success as u8),
        Err(err) => {
            if machine_json {
                match err.error.to_json() {
                    Ok(text) => eprintln!("{text}"),
                    Err(_) => eprintln!("{}", err.error),
                }
            } else {
                eprintln!("error: {}", err.error);
            }
            ProcessExitCode::from(err.exit as u8)
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let db = commands::resolve_database_url(cli.db);
    let output = match cli.command {
        Commands::InitDb => commands::init_db(&db)?,
        Commands::SeedTargets => commands::seed_targets(&db)?,
        Commands::Import { path } => commands::import(&db, &path)?,
        Commands::Query {
            bbox,
            geojson,
            targets,
            max_area,
        } => commands::query(
            &db,
            QueryArgs {
                bbox,
                geojson,
                targets,
                max_area,
            },
        )?,
        Commands::Get { id, name } => commands::get(&db, id, name)?,
        Commands::Targets => commands::targets(&db)?,
        Commands::Openapi { out } => commands::openapi(out)?,
    };
    if let Some(value) = output {
        let text = serde_json::to_string_pretty(&value)
            .map_err(|e| CliError::internal(format!("encode output: {e}")))?;
        println!("{text}");
    }
    Ok(())
}
