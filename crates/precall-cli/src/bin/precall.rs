//! precall command line
//!
//! Expands compile-time `precall` invocations in JavaScript/TypeScript
//! sources.
//!
//! ```bash
//! # Expand a file to stdout
//! precall src/index.js
//!
//! # Expand several files into a directory, with extra keywords
//! precall src/*.js --out-dir build --value precall --value gen
//!
//! # Read stdin, treating it as TypeScript
//! cat index.ts | precall --stdin-filename index.ts
//! ```

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use precall_cli::{
    diagnostics::{render_cli_error, setup_error_reporting},
    expand::{expand_command, ExpandArgs},
    CliError, Result,
};
use precall_core::PrecallOptions;
use tracing::{error, info};

#[derive(Parser)]
#[command(
    name = "precall",
    version = env!("CARGO_PKG_VERSION"),
    about = "Expand compile-time precall invocations into literals"
)]
struct Cli {
    #[command(flatten)]
    expand: ExpandArgs,

    /// Enable verbose logging (use multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    quiet: bool,

    /// Set log level (overrides --verbose/--quiet)
    #[arg(long, value_enum)]
    log: Option<LogLevel>,

    /// Set log output format
    #[arg(long, value_enum, default_value = "pretty")]
    log_format: LogFormat,

    /// Configuration file path (defaults to ./precall.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Working directory
    #[arg(short = 'C', long)]
    directory: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

fn main() {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    if let Err(e) = run(cli) {
        if verbose > 0 {
            error!(?e, "detailed error context");
        }
        render_cli_error(e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    setup_error_reporting()?;
    setup_logging(cli.verbose, cli.quiet, cli.log, cli.log_format)?;

    if let Some(dir) = &cli.directory {
        std::env::set_current_dir(dir).map_err(CliError::Io)?;
    }

    let options = PrecallOptions::load(cli.config.as_deref())?;
    let written = expand_command(cli.expand, &options)?;
    if cli.verbose > 0 {
        info!(written, "expansion completed");
    }
    Ok(())
}

fn setup_logging(
    verbose: u8,
    quiet: bool,
    log_level: Option<LogLevel>,
    log_format: LogFormat,
) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if let Some(level) = log_level {
        EnvFilter::new(match level {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        })
    } else if quiet {
        EnvFilter::new("error")
    } else {
        // stdout may carry the expanded source, so logs stay quiet by default
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let formatter = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .with_level(true);

    match log_format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(formatter)
                .with(filter)
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(formatter.json())
                .with(filter)
                .init();
        }
    }

    Ok(())
}
