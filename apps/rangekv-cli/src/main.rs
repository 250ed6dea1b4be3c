//! # rangekv CLI
//!
//! A thin binary wrapping `builder`/`reader` with argument parsing, TOML
//! configuration, and structured logging. Not part of the core format —
//! every decision here is about ergonomics, not the on-disk contract.

mod cli;
mod config;
mod error;

use std::path::Path;

use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use builder::Builder;
use cli::{Cli, Commands};
use config::CliConfig;
use error::CliError;
use io::{DiskSink, DiskSource};
use reader::{LookupResult, Reader};

fn main() {
    let cli = Cli::parse();

    let config = match &cli.command {
        Commands::Build { config: Some(path), .. } => CliConfig::load_from_file(path),
        _ => Ok(CliConfig::default()),
    };

    let config = match config {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };

    let logging_dir = config
        .logging
        .dir
        .clone()
        .unwrap_or_else(|| Path::new("logs").to_path_buf());
    let _logging_guard = init_logging(&logging_dir);

    let result = match cli.command {
        Commands::Build { input, output, .. } => run_build(&input, &output, &config),
        Commands::Get { file, key } => run_get(&file, &key),
    };

    if let Err(e) = result {
        tracing::error!("{e}");
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn run_build(input: &Path, output: &Path, config: &CliConfig) -> Result<(), CliError> {
    tracing::info!(?input, ?output, "starting build");

    let text = std::fs::read_to_string(input)?;
    let pairs: Vec<(Vec<u8>, Vec<u8>)> = text
        .lines()
        .filter(|line| !line.is_empty())
        .map(|line| match line.split_once('\t') {
            Some((key, value)) => (key.as_bytes().to_vec(), value.as_bytes().to_vec()),
            None => (line.as_bytes().to_vec(), Vec::new()),
        })
        .collect();

    let count = pairs.len();
    let builder = Builder::new(config.to_build_configuration());
    let mut sink = DiskSink::create(output)?;
    builder.build(pairs, &mut sink)?;

    tracing::info!(entries = count, "build complete");
    println!("built {output:?} from {count} entries");
    Ok(())
}

fn run_get(file: &Path, key: &str) -> Result<(), CliError> {
    let source = DiskSource::open(file)?;
    let reader = Reader::new(source);

    match reader.lookup(key.as_bytes())? {
        LookupResult::Found(value) => {
            println!("{}", String::from_utf8_lossy(&value));
        }
        LookupResult::NotFound => {
            println!("(not found)");
        }
    }
    Ok(())
}

/// Sets up console + daily-rolling JSON file logging, honoring `RUST_LOG`.
fn init_logging(log_dir: &Path) -> Option<WorkerGuard> {
    if std::fs::create_dir_all(log_dir).is_err() {
        eprintln!("warning: could not create log directory {log_dir:?}, file logging disabled");
        return None;
    }

    let file_appender = tracing_appender::rolling::daily(log_dir, "rangekv.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .compact();

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .json()
        .with_current_span(true)
        .with_span_list(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Some(guard)
}
