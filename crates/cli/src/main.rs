//! ragent CLI: the main entry point.
//!
//! Commands:
//! - `chat`: Interactive question loop (default)
//! - `ask`: Answer a single question and exit
//! - `tools`: List the tools the agent can call
//! - `config`: Show, locate, validate or initialize configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "ragent",
    about = "ragent: a retrieval-augmented ReAct agent",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to a config file (defaults to ~/.ragent/config.toml)
    #[arg(short, long, global = true, env = "RAGENT_CONFIG")]
    config: Option<PathBuf>,

    /// Skip loading documents; every question runs without local context
    #[arg(long, global = true)]
    no_docs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask questions interactively until `quit` or `exit`
    Chat,

    /// Answer a single question
    Ask {
        /// The question to answer
        question: String,

        /// Override the iteration budget for this question
        #[arg(short, long)]
        max_iterations: Option<u32>,

        /// Print the full run (steps, context, answer) as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the available tools
    Tools,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print the config file path
    Path,
    /// Load and validate the configuration
    Validate,
    /// Write a default config file if none exists
    Init,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Keep the terminal quiet unless asked; RUST_LOG still wins.
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref();
    let no_docs = cli.no_docs;
    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => commands::chat::run(config_path, no_docs).await?,
        Commands::Ask {
            question,
            max_iterations,
            json,
        } => commands::ask::run(config_path, no_docs, &question, max_iterations, json).await?,
        Commands::Tools => commands::tools::run(),
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config_cmd::show(config_path)?,
            ConfigAction::Path => commands::config_cmd::path(config_path),
            ConfigAction::Validate => commands::config_cmd::validate(config_path)?,
            ConfigAction::Init => commands::config_cmd::init(config_path)?,
        },
    }

    Ok(())
}
