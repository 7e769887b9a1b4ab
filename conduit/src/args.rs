use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Conduit provider adapter CLI
#[derive(Debug, Parser)]
#[command(name = "conduit", about = "Run prompts, embeddings and model listings against configured LLM vendors")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "conduit.toml", env = "CONDUIT_CONFIG")]
    pub config: PathBuf,

    /// Configured provider to use; defaults to the first one in the file
    #[arg(short, long, env = "CONDUIT_PROVIDER")]
    pub provider: Option<String>,

    /// Log filter directive used when the config file sets none
    #[arg(long, default_value = "warn", env = "RUST_LOG")]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Send a prompt and print the reply
    Prompt(PromptArgs),
    /// Embed one or more inputs and print vector sizes
    Embed(EmbedArgs),
    /// List the chat models the provider serves
    Models,
}

#[derive(Debug, clap::Args)]
pub struct PromptArgs {
    /// Vendor model id
    #[arg(short, long)]
    pub model: String,

    /// System instruction
    #[arg(short, long, default_value = "")]
    pub system: String,

    /// Print the reply as it streams in
    #[arg(long)]
    pub stream: bool,

    /// Ask for a JSON object reply
    #[arg(long)]
    pub json: bool,

    /// Image URL or data URI to attach; may be repeated
    #[arg(long = "image")]
    pub images: Vec<String>,

    /// Prompt text
    pub prompt: String,
}

#[derive(Debug, clap::Args)]
pub struct EmbedArgs {
    /// Embedding model id
    #[arg(short, long)]
    pub model: String,

    /// Texts to embed
    #[arg(required = true)]
    pub inputs: Vec<String>,
}
