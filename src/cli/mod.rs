//! CLI entry point for Parley.

pub mod commands;

use clap::{Args, Parser, Subcommand};

/// Parley conversational assistant
#[derive(Parser, Debug)]
#[command(name = "parley", version, about = "Parley: chat with memory and search augmentation")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Chat with the current profile (one-shot, or a REPL on stdin)
    Chat(ChatArgs),
    /// Inspect or clear agent memory
    Memory(MemoryArgs),
    /// Inspect the search trigger keywords
    Keywords(KeywordsArgs),
    /// Show or edit the current profile
    Profile(ProfileArgs),
    /// Manage stored API keys
    Key(KeyArgs),
}

/// Arguments for the `chat` subcommand.
#[derive(Parser, Debug)]
pub struct ChatArgs {
    /// Override the profile's provider for this session
    #[arg(short, long)]
    pub provider: Option<String>,

    /// Override the profile's model for this session
    #[arg(short, long)]
    pub model: Option<String>,

    /// Override the profile's system prompt for this session
    #[arg(short, long)]
    pub system: Option<String>,

    /// Enable memory for this session
    #[arg(long)]
    pub memory: bool,

    /// Enable web search augmentation for this session
    #[arg(long)]
    pub search: bool,

    /// User prompt (positional); omit to read prompts from stdin
    pub prompt: Option<String>,
}

#[derive(Parser, Debug)]
pub struct MemoryArgs {
    #[command(subcommand)]
    pub command: MemoryCommands,
}

#[derive(Subcommand, Debug)]
pub enum MemoryCommands {
    /// Print the current profile's memory lines
    Show,
    /// Delete the current profile's memory
    Clear,
    /// List every agent with stored memory
    List,
}

#[derive(Parser, Debug)]
pub struct KeywordsArgs {
    #[command(subcommand)]
    pub command: KeywordsCommands,
}

#[derive(Subcommand, Debug)]
pub enum KeywordsCommands {
    /// Print the active keyword list
    List,
    /// Check whether a message would trigger search
    Test(TestArgs),
}

#[derive(Parser, Debug)]
pub struct TestArgs {
    pub text: String,
}

#[derive(Parser, Debug)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub command: ProfileCommands,
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// Print the current profile
    Show,
    /// Update fields of the current profile
    Set(ProfileSetArgs),
}

#[derive(Args, Debug, Default)]
pub struct ProfileSetArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub provider: Option<String>,
    #[arg(long)]
    pub model: Option<String>,
    #[arg(long)]
    pub system: Option<String>,
    #[arg(long)]
    pub memory: Option<bool>,
    #[arg(long)]
    pub search: Option<bool>,
}

#[derive(Parser, Debug)]
pub struct KeyArgs {
    #[command(subcommand)]
    pub command: KeyCommands,
}

#[derive(Subcommand, Debug)]
pub enum KeyCommands {
    /// Store an API key for a provider
    Set(KeySetArgs),
    /// Remove a stored API key
    Remove(KeyProviderArgs),
    /// Show which providers have a key
    Status,
}

#[derive(Parser, Debug)]
pub struct KeySetArgs {
    /// Provider identifier (openai, openrouter)
    pub provider: String,
    pub key: String,
}

#[derive(Parser, Debug)]
pub struct KeyProviderArgs {
    pub provider: String,
}
