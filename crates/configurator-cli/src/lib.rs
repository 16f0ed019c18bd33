//! Configurator CLI - load a configurator, apply selections, print the result
//!
//! ```text
//! configurator show --snapshot desk.json --select color=blue --select material=titanium
//! configurator fetch --public-id desk --select color=blue --quote
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

/// Command implementations.
pub mod commands;
/// Text and JSON rendering of a session.
pub mod summary;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use configurator_core::AppConfig;
use std::path::PathBuf;
use tracing::info;

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "configurator")]
#[command(about = "Explore product configurators: select options, check conflicts, price and quote")]
#[command(version)]
pub struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load a configurator snapshot from a JSON or TOML file
    Show {
        /// Snapshot file
        #[arg(long)]
        snapshot: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Fetch a configurator from the API
    Fetch {
        /// Public identifier of the configurator
        #[arg(long)]
        public_id: String,
        /// Override the API base URL
        #[arg(long)]
        api_url: Option<String>,
        #[command(flatten)]
        output: OutputArgs,
    },
}

/// Selection and output flags shared by all commands.
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Select an option, as CATEGORY=OPTION (or CATEGORY= to deselect); applied in order
    #[arg(long = "select", value_name = "CATEGORY=OPTION")]
    pub selections: Vec<String>,

    /// Print the quote snapshot instead of the summary
    #[arg(long)]
    pub quote: bool,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Initialize tracing subscriber for logging
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,configurator=info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<AppConfig> {
    AppConfig::load_with_env(path.map(PathBuf::as_path)).context("loading config")
}

/// Parse arguments and run the selected command.
pub async fn run() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    info!("Starting configurator v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(cli.config.as_ref())?;
    let output = match cli.command {
        Command::Show { snapshot, output } => {
            commands::show(&config, &snapshot, &output).await?
        }
        Command::Fetch {
            public_id,
            api_url,
            output,
        } => commands::fetch(&config, &public_id, api_url, &output).await?,
    };

    println!("{output}");
    Ok(())
}
