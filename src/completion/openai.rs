//! OpenAI streaming chat completion implementation.

use super::{ChatModel, TokenStream};
use crate::config::Credentials;
use crate::error::{LecternError, Result};
use crate::message::{Message, Role};
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use futures::StreamExt;
use tracing::instrument;

/// OpenAI-based streaming chat model.
pub struct OpenAIChatModel {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    temperature: f32,
}

impl OpenAIChatModel {
    /// Create a new chat model client.
    pub fn new(credentials: &Credentials, model: &str, temperature: f32) -> Self {
        Self {
            client: create_client(&credentials.openai_api_key),
            model: model.to_string(),
            temperature,
        }
    }
}

/// Convert a wire message into the request type for its role.
fn to_request_message(message: &Message) -> Result<ChatCompletionRequestMessage> {
    let request_message = match message.role {
        Role::System => ChatCompletionRequestSystemMessageArgs::default()
            .content(message.content.clone())
            .build()
            .map_err(|e| LecternError::Completion(e.to_string()))?
            .into(),
        Role::User => ChatCompletionRequestUserMessageArgs::default()
            .content(message.content.clone())
            .build()
            .map_err(|e| LecternError::Completion(e.to_string()))?
            .into(),
        Role::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
            .content(message.content.clone())
            .build()
            .map_err(|e| LecternError::Completion(e.to_string()))?
            .into(),
    };
    Ok(request_message)
}

#[async_trait]
impl ChatModel for OpenAIChatModel {
    #[instrument(skip(self, messages), fields(count = messages.len()))]
    async fn stream_chat(&self, messages: &[Message]) -> Result<TokenStream> {
        let request_messages: Vec<ChatCompletionRequestMessage> = messages
            .iter()
            .map(to_request_message)
            .collect::<Result<_>>()?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(request_messages)
            .temperature(self.temperature)
            .stream(true)
            .build()
            .map_err(|e| LecternError::Completion(e.to_string()))?;

        let stream = self
            .client
            .chat()
            .create_stream(request)
            .await
            .map_err(|e| LecternError::OpenAI(format!("Chat API error: {}", e)))?;

        // Each chunk carries at most one delta; absent content maps to an
        // empty fragment, which the relay drops.
        let tokens = stream.map(|item| match item {
            Ok(response) => Ok(response
                .choices
                .first()
                .and_then(|choice| choice.delta.content.clone())
                .unwrap_or_default()),
            Err(e) => Err(LecternError::OpenAI(format!("Stream error: {}", e))),
        });

        Ok(Box::pin(tokens))
    }
}
