//! Contextor CLI, the main entry point.
//!
//! Commands:
//! - `assemble`: Build the augmented prompt for a query
//! - `classify`: Show which context sources a query needs
//! - `chunk`: Preview how the chat corpus is segmented
//! - `rebuild-index`: Re-embed the chat corpus
//! - `status`: Show configuration and index state

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use contextor_chunker::ChunkStrategy;

mod commands;

#[derive(Parser)]
#[command(
    name = "contextor",
    about = "Contextor: augment LLM prompts with chat history and web context",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to ~/.contextor/config.toml)
    #[arg(short, long, global = true, env = "CONTEXTOR_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the augmented prompt for a query
    Assemble {
        query: String,

        /// Token budget for retrieved context
        #[arg(long)]
        max_tokens: Option<usize>,

        /// Minimum cosine similarity for chat history snippets
        #[arg(long, allow_hyphen_values = true)]
        min_similarity: Option<f32>,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show which context sources a query needs
    Classify { query: String },

    /// Preview how the chat corpus is segmented
    Chunk {
        /// Segmentation strategy (defaults to the configured one)
        #[arg(short, long)]
        strategy: Option<ChunkStrategy>,

        /// Maximum number of chunks to print
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },

    /// Re-embed the chat corpus and replace the history index
    RebuildIndex,

    /// Show configuration and index state
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Assemble {
            query,
            max_tokens,
            min_similarity,
            json,
        } => commands::assemble::run(&config, &query, max_tokens, min_similarity, json).await?,
        Commands::Classify { query } => commands::classify::run(&config, &query).await?,
        Commands::Chunk { strategy, limit } => commands::chunk::run(&config, strategy, limit).await?,
        Commands::RebuildIndex => commands::index::rebuild(&config).await?,
        Commands::Status => commands::status::run(&config).await?,
    }

    Ok(())
}
