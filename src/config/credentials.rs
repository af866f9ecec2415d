//! Provider credentials, read once at process start.

use crate::error::{LecternError, Result};

/// API credentials for the external providers.
///
/// Read from the environment a single time at startup and injected into the
/// provider clients, so no code path performs a hidden environment lookup at
/// call time.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Key for the embedding and completion provider.
    pub openai_api_key: String,
    /// Key for the vector index provider. Not required when the in-memory
    /// index is configured.
    pub pinecone_api_key: Option<String>,
}

impl Credentials {
    /// Read credentials from `OPENAI_API_KEY` and `PINECONE_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let openai_api_key = match std::env::var("OPENAI_API_KEY") {
            Ok(key) if !key.is_empty() => key,
            _ => {
                return Err(LecternError::Config(
                    "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'"
                        .to_string(),
                ))
            }
        };

        let pinecone_api_key = std::env::var("PINECONE_API_KEY")
            .ok()
            .filter(|key| !key.is_empty());

        Ok(Self {
            openai_api_key,
            pinecone_api_key,
        })
    }

    /// Get the Pinecone key, or a configuration error if it is missing.
    pub fn pinecone_key(&self) -> Result<&str> {
        self.pinecone_api_key.as_deref().ok_or_else(|| {
            LecternError::Config(
                "PINECONE_API_KEY not set. Set it with: export PINECONE_API_KEY='...'".to_string(),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pinecone_key_missing() {
        let credentials = Credentials {
            openai_api_key: "sk-test".to_string(),
            pinecone_api_key: None,
        };
        assert!(credentials.pinecone_key().is_err());
    }

    #[test]
    fn test_pinecone_key_present() {
        let credentials = Credentials {
            openai_api_key: "sk-test".to_string(),
            pinecone_api_key: Some("pc-test".to_string()),
        };
        assert_eq!(credentials.pinecone_key().unwrap(), "pc-test");
    }
}
