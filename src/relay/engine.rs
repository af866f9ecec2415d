//! Relay engine: the embed, retrieve, augment, stream pipeline.

use super::prompt;
use crate::completion::{ChatModel, OpenAIChatModel, TokenStream};
use crate::config::{Credentials, IndexProvider, Settings};
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::{LecternError, Result};
use crate::index::{MemoryIndex, PineconeIndex, VectorIndex};
use crate::message::Message;
use futures::StreamExt;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Coordinates one relay request from conversation to token stream.
///
/// Holds no per-request state; every call to [`RelayEngine::respond`] is
/// independent, so concurrent requests need no coordination.
pub struct RelayEngine {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    model: Arc<dyn ChatModel>,
    top_k: usize,
}

impl RelayEngine {
    /// Create an engine from settings, building the configured providers.
    pub fn new(settings: &Settings, credentials: &Credentials) -> Result<Self> {
        let embedder = Arc::new(OpenAIEmbedder::with_config(
            credentials,
            &settings.embedding.model,
            settings.embedding.dimensions as usize,
        ));

        let index: Arc<dyn VectorIndex> = match settings.index.provider {
            IndexProvider::Pinecone => Arc::new(PineconeIndex::new(
                credentials,
                &settings.index.host,
                &settings.index.namespace,
            )?),
            IndexProvider::Memory => Arc::new(MemoryIndex::new()),
        };

        let model = Arc::new(OpenAIChatModel::new(
            credentials,
            &settings.chat.model,
            settings.chat.temperature,
        ));

        Ok(Self {
            embedder,
            index,
            model,
            top_k: settings.index.top_k,
        })
    }

    /// Create an engine with custom components.
    pub fn with_components(
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
        model: Arc<dyn ChatModel>,
        top_k: usize,
    ) -> Self {
        Self {
            embedder,
            index,
            model,
            top_k,
        }
    }

    /// Get a reference to the embedder.
    pub fn embedder(&self) -> Arc<dyn Embedder> {
        self.embedder.clone()
    }

    /// Get a reference to the vector index.
    pub fn index(&self) -> Arc<dyn VectorIndex> {
        self.index.clone()
    }

    /// Run the full pipeline and return the completion token stream.
    ///
    /// The conversation is validated before any external call is made; the
    /// embed, query, and completion calls then run strictly in sequence.
    /// Fragments with empty text are dropped from the returned stream.
    #[instrument(skip(self, conversation), fields(messages = conversation.len()))]
    pub async fn respond(&self, conversation: &[Message]) -> Result<TokenStream> {
        let (last, prior) = conversation.split_last().ok_or_else(|| {
            LecternError::InvalidInput(
                "Conversation must contain at least one message".to_string(),
            )
        })?;

        if last.content.trim().is_empty() {
            return Err(LecternError::InvalidInput(
                "Last message has no content to search".to_string(),
            ));
        }

        let embedding = self.embedder.embed(&last.content).await?;
        debug!("Embedded query ({} dimensions)", embedding.len());

        let matches = self.index.query(&embedding, self.top_k).await?;
        info!("Retrieved {} matches", matches.len());

        let outbound = prompt::augment(prior, last, &matches);
        let tokens = self.model.stream_chat(&outbound).await?;

        let tokens = tokens.filter(|fragment| {
            futures::future::ready(match fragment {
                Ok(text) => !text.is_empty(),
                Err(_) => true,
            })
        });

        Ok(Box::pin(tokens))
    }
}
