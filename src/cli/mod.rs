//! CLI module for Lectern.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Lectern - Retrieval-Augmented Professor Search
///
/// A chat service that finds professors by embedding your question, pulling
/// the closest records from a vector index, and streaming an AI answer.
#[derive(Parser, Debug)]
#[command(name = "lectern")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize Lectern and verify configuration
    Init,

    /// Check API keys and configuration
    Doctor,

    /// Start the retrieval relay server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Start an interactive chat session against a running relay
    Chat {
        /// Relay chat endpoint URL
        #[arg(short, long)]
        url: Option<String>,
    },

    /// Query the vector index directly and print the raw matches
    Search {
        /// Search query
        query: String,

        /// Maximum number of matches
        #[arg(short, long, default_value = "3")]
        limit: usize,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "chat.model")
        key: String,
        /// Configuration value
        value: String,
    },

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}
