//! Configuration module for Lectern.
//!
//! Handles loading and managing application settings and provider credentials.

mod credentials;
mod settings;

pub use credentials::Credentials;
pub use settings::{
    ChatSettings, EmbeddingSettings, GeneralSettings, IndexProvider, IndexSettings,
    ServerSettings, Settings,
};
