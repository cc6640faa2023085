//! codesync CLI - Live code embedding for documentation sites

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use codesync::config::StrategyKind;
use codesync::interface::Context;

#[derive(Parser)]
#[command(name = "codesync")]
#[command(author, version, about = "Live code embedding for documentation sites", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Working directory
    #[arg(short = 'C', long, global = true)]
    directory: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Propagation strategies to try, in order (overrides config file)
    #[arg(short, long = "strategy", global = true, value_enum)]
    strategies: Vec<StrategyKind>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Watch the code library and refresh embedding pages on change
    Watch {
        /// Quiet period in milliseconds (overrides config file)
        #[arg(short, long)]
        debounce: Option<u64>,
    },

    /// List the documentation pages embedding a source file
    Refs {
        /// Source file in the code library
        #[arg(value_name = "SOURCE")]
        source: PathBuf,

        /// Print JSON
        #[arg(long)]
        json: bool,
    },

    /// Propagate a change of a source file once
    Touch {
        /// Changed source file in the code library
        #[arg(value_name = "SOURCE")]
        source: PathBuf,

        /// Print the propagation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render a documentation page with its embeds resolved
    Render {
        /// Documentation page
        #[arg(value_name = "DOC")]
        document: PathBuf,

        /// Emit raw HTML markup instead of markdown blocks
        #[arg(long)]
        markup: bool,
    },

    /// Print the effective configuration
    Config,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // Determine working directory
    let base_dir = cli
        .directory
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    // Read configuration from file or use defaults
    let read = match cli.config {
        Some(ref path) => codesync::config::read_config_file(path),
        None => codesync::config::read_config(&base_dir),
    };
    let mut config = match read {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Using default configuration: {}", e);
            codesync::Config::default()
        }
    };

    // Command line overrides
    if !cli.strategies.is_empty() {
        config.propagation.strategies = cli.strategies;
    }
    if let Commands::Watch {
        debounce: Some(ms), ..
    } = cli.command
    {
        config.watch.debounce_ms = ms;
    }

    let ctx = Arc::new(Context::new(config, base_dir));

    // Execute command
    let result = match cli.command {
        Commands::Watch { .. } => commands::watch(ctx),

        Commands::Refs { source, json } => {
            let options = commands::RefsOptions { source, json };
            commands::refs(&ctx, options)
        }

        Commands::Touch { source, json } => {
            let options = commands::TouchOptions { source, json };
            commands::touch(ctx, options).map(|_| ())
        }

        Commands::Render { document, markup } => {
            let options = commands::RenderOptions { document, markup };
            commands::render(&ctx, options)
        }

        Commands::Config => commands::config(&ctx),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
