//! genui CLI: the main entry point.
//!
//! Commands:
//! - `onboard`: Write a default config file
//! - `doctor`: Check config and API key
//! - `validate`: Validate a surface document offline
//! - `ask`: Turn a natural-language query into a surface
//! - `act`: Submit an action from a rendered surface
//! - `tools`: List the tools actions can route to

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "genui",
    about = "genui — validated generative UI driven by a tool-calling agent",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Onboard,

    /// Diagnose configuration and credentials
    Doctor,

    /// Validate a surface document and print its canonical form
    Validate {
        /// Path to the JSON document
        file: PathBuf,

        /// Override the nesting depth bound
        #[arg(long)]
        max_depth: Option<usize>,
    },

    /// Ask the agent for a surface
    Ask {
        /// The natural-language query
        #[arg(short, long)]
        message: String,

        /// Prior agent context (JSON file)
        #[arg(short, long)]
        context: Option<PathBuf>,
    },

    /// Submit an action with form data
    Act {
        /// The action identifier (tool name)
        action_id: String,

        /// Form data as a JSON object
        #[arg(short, long, default_value = "{}")]
        data: String,

        /// Prior agent context (JSON file)
        #[arg(short, long)]
        context: Option<PathBuf>,
    },

    /// List the registered tools
    Tools,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    match cli.log_format {
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init(),
    }

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Doctor => commands::doctor::run().await?,
        Commands::Validate { file, max_depth } => commands::validate::run(file, max_depth).await?,
        Commands::Ask { message, context } => commands::ask::run(message, context).await?,
        Commands::Act {
            action_id,
            data,
            context,
        } => commands::act::run(action_id, data, context).await?,
        Commands::Tools => commands::tools::run().await?,
    }

    Ok(())
}
