//! Parley CLI binary entry point.

use clap::Parser;
use parley::cli::commands;
use parley::cli::{Cli, Commands};
use parley::config::ChatConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ChatConfig::from_env();

    let result = match cli.command {
        Commands::Chat(args) => commands::handle_chat(config, args).await,
        Commands::Memory(args) => commands::handle_memory(&config, args.command),
        Commands::Keywords(args) => commands::handle_keywords(&config, args.command),
        Commands::Profile(args) => commands::handle_profile(&config, args.command),
        Commands::Key(args) => commands::handle_key(&config, args.command),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
