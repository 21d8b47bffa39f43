//! CLI application for regex-driven annotation extraction.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, extract, live, typedef};

/// Annotation extraction - turn free-form text into structured records
#[derive(Parser)]
#[command(name = "annot")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract annotations from a single text file
    Extract(extract::ExtractArgs),

    /// Extract annotations from multiple text files
    Batch(batch::BatchArgs),

    /// Edit patterns interactively with live re-extraction
    Live(live::LiveArgs),

    /// Create and check annotation type definitions
    Typedef(typedef::TypedefArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    // Execute command
    match cli.command {
        Commands::Extract(args) => extract::run(args, cli.config.as_deref()).await,
        Commands::Batch(args) => batch::run(args, cli.config.as_deref()).await,
        Commands::Live(args) => live::run(args, cli.config.as_deref()).await,
        Commands::Typedef(args) => typedef::run(args).await,
    }
}
