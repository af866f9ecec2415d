//! Pre-flight checks before operations that need external services.
//!
//! Validates that required credentials and configuration are available
//! before starting operations that would otherwise fail midway.

use crate::config::{IndexProvider, Settings};
use crate::error::{LecternError, Result};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Serving the relay requires provider keys and an index.
    Serve,
    /// Searching the index requires provider keys and an index.
    Search,
    /// Chatting only talks to the relay.
    Chat,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Serve | Operation::Search => {
            check_env_key("OPENAI_API_KEY")?;
            if settings.index.provider == IndexProvider::Pinecone {
                check_env_key("PINECONE_API_KEY")?;
                check_index_host(settings)?;
            }
        }
        Operation::Chat => {
            // No external requirements; the relay holds the credentials.
        }
    }
    Ok(())
}

/// Check that an API key environment variable is set and non-empty.
fn check_env_key(name: &str) -> Result<()> {
    match std::env::var(name) {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(LecternError::Config(format!(
            "{} is empty. Set it with: export {}='...'",
            name, name
        ))),
        Err(_) => Err(LecternError::Config(format!(
            "{} not set. Set it with: export {}='...'",
            name, name
        ))),
    }
}

/// Check that the index host is configured for the pinecone provider.
fn check_index_host(settings: &Settings) -> Result<()> {
    if settings.index.host.is_empty() {
        Err(LecternError::Config(
            "Index host is not configured. Set index.host in the config file.".to_string(),
        ))
    } else {
        Ok(())
    }
}
