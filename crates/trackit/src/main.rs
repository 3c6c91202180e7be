//! Trackit - tracking payload assembly and dispatch
//!
//! # Usage
//!
//! ```bash
//! # Run the two-service demo (default)
//! trackit
//! trackit demo --count 10 --complete
//!
//! # Print the attribute catalogue
//! trackit schema
//! ```

mod demo;
mod schema;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use trackit_config::{Config, LogFormat, LogLevel};

/// Trackit - tracking payload assembly and dispatch
#[derive(Parser, Debug)]
#[command(name = "trackit")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (defaults apply when it does not exist)
    #[arg(short, long, default_value = "configs/trackit.toml", global = true)]
    config: PathBuf,

    /// Log level, overrides the config file (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    log_level: Option<LogLevel>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the two-service demo through one tracking context
    Demo(demo::DemoArgs),

    /// Print every attribute path and its required children
    Schema,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_file_or_default(&cli.config)?;

    match cli.command {
        Some(Command::Schema) => {
            schema::print();
            Ok(())
        }
        Some(Command::Demo(args)) => {
            init_logging(&config, cli.log_level)?;
            demo::run(&config, args).await
        }
        // No subcommand = run the demo once
        None => {
            init_logging(&config, cli.log_level)?;
            demo::run(&config, demo::DemoArgs::default()).await
        }
    }
}

/// Initialize the tracing subscriber for logging
///
/// Level resolution: CLI flag > config file.
fn init_logging(config: &Config, cli_level: Option<LogLevel>) -> Result<()> {
    let filter = EnvFilter::try_new(config.log.directive(cli_level))
        .map_err(|e| anyhow::anyhow!("invalid log filter: {}", e))?;

    let registry = tracing_subscriber::registry().with(filter);
    match config.log.format {
        LogFormat::Console => registry
            .with(fmt::layer().with_target(true).with_thread_ids(false))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_target(true))
            .init(),
    }

    Ok(())
}
