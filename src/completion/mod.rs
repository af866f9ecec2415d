//! Streaming chat completion abstraction.

mod openai;

pub use openai::OpenAIChatModel;

use crate::error::Result;
use crate::message::Message;
use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

/// An asynchronous sequence of incremental completion text fragments.
pub type TokenStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Trait for streaming chat completion providers.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Request a streaming completion for a message list.
    ///
    /// Fragments are yielded in generation order. An `Err` item means the
    /// provider failed after streaming began.
    async fn stream_chat(&self, messages: &[Message]) -> Result<TokenStream>;
}
