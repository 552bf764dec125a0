use clap::{Parser, Subcommand};
use std::path::PathBuf;

use gigsync::commands::{
    ConfigCommand, ContentCommand, ExportCommand, ImportCommand, PullCommand, ResetCommand,
    TokenCommand,
};
use gigsync::{Config, ContentStore, SyncEngine};

#[derive(Parser)]
#[command(name = "gigsync")]
#[command(version)]
#[command(about = "Content sync for the LIVEGIGS events site", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show or save individual content documents
    Content(ContentCommand),

    /// Pull all content from the public mirror
    Pull(PullCommand),

    /// Export every document to a bundle file
    Export(ExportCommand),

    /// Apply a content bundle
    Import(ImportCommand),

    /// Restore every document to its default
    Reset(ResetCommand),

    /// Manage the remote repository access token
    Token(TokenCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gigsync=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config)?;

    match cli.command {
        Some(Commands::Content(cmd)) => {
            let mut engine = SyncEngine::from_config(&config);
            cmd.run(&mut engine).await?;
        }
        Some(Commands::Pull(cmd)) => {
            let mut engine = SyncEngine::from_config(&config);
            cmd.run(&mut engine).await?;
        }
        Some(Commands::Export(cmd)) => {
            let engine = SyncEngine::from_config(&config);
            cmd.run(&engine)?;
        }
        Some(Commands::Import(cmd)) => {
            let mut engine = SyncEngine::from_config(&config);
            cmd.run(&mut engine).await?;
        }
        Some(Commands::Reset(cmd)) => {
            let mut engine = SyncEngine::from_config(&config);
            cmd.run(&mut engine).await?;
        }
        Some(Commands::Token(cmd)) => {
            let store = ContentStore::new(config.data_dir.value.clone());
            cmd.run(&store)?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(&config)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}
