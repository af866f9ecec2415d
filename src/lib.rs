//! Lectern - Retrieval-Augmented Professor Search
//!
//! A chat service that helps students find professors: a relay endpoint
//! embeds the newest user message, retrieves the closest professor records
//! from a vector index, splices them into the prompt, and streams an
//! AI-generated answer back to a terminal chat client.
//!
//! # Overview
//!
//! Lectern consists of two halves:
//! - A stateless HTTP relay (`lectern serve`) that accepts a conversation
//!   and streams the assistant reply as raw bytes.
//! - A terminal chat client (`lectern chat`) that keeps the conversation in
//!   memory and renders the streamed reply incrementally.
//!
//! The vector index is populated externally; Lectern only queries it.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration and credential management
//! - `message` - Wire message types
//! - `embedding` - Embedding generation
//! - `index` - Vector index abstraction (Pinecone, in-memory)
//! - `completion` - Streaming chat completion abstraction
//! - `relay` - Prompt assembly and the relay pipeline
//! - `server` - HTTP surface for the relay
//! - `client` - Conversation state and the streaming chat client
//!
//! # Example
//!
//! ```rust,no_run
//! use lectern::config::{Credentials, Settings};
//! use lectern::message::Message;
//! use lectern::relay::RelayEngine;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let credentials = Credentials::from_env()?;
//!     let engine = RelayEngine::new(&settings, &credentials)?;
//!
//!     let conversation = vec![Message::user("Find me a calculus professor")];
//!     let _stream = engine.respond(&conversation).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod client;
pub mod completion;
pub mod config;
pub mod embedding;
pub mod error;
pub mod index;
pub mod message;
pub mod openai;
pub mod relay;
pub mod server;

pub use error::{LecternError, Result};
