//! Chat client for the relay.
//!
//! Keeps the ordered conversation in memory, posts the full history on each
//! user turn, and folds the streamed reply back into the conversation one
//! chunk at a time. Conversation state lives only for the process lifetime.

mod format;

pub use format::Formatter;

use crate::error::Result;
use crate::message::Message;
use futures::StreamExt;
use tracing::debug;

/// Fixed greeting that opens every conversation.
pub const GREETING: &str = "Hi! I'm the RMP support assistant. How can I help you today?";

/// Fixed user-visible message appended when a send fails.
pub const ERROR_MESSAGE: &str = "Sorry, there was an error processing your request.";

/// Ordered, in-memory conversation state.
#[derive(Debug)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// Start a conversation with the assistant greeting.
    pub fn new() -> Self {
        Self {
            messages: vec![Message::assistant(GREETING)],
        }
    }

    /// All messages in chronological order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The most recent message, if any.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    fn replace_last_content(&mut self, content: &str) {
        if let Some(last) = self.messages.last_mut() {
            last.content = content.to_string();
        }
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

/// HTTP client that drives a conversation against the relay.
pub struct ChatClient {
    http: reqwest::Client,
    endpoint: String,
    formatter: Formatter,
}

impl ChatClient {
    /// Create a client for the relay chat endpoint.
    pub fn new(endpoint: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
            formatter: Formatter::new(),
        }
    }

    /// Send one user turn and stream the assistant reply into `conversation`.
    ///
    /// Blank input is a silent no-op. Otherwise the user message and an
    /// empty assistant placeholder are appended before the network call; the
    /// posted history excludes the placeholder. Each received chunk is
    /// decoded, appended to the accumulator, and the placeholder content is
    /// replaced wholesale with the reformatted accumulator; `on_update` runs
    /// after every replacement with the new content.
    ///
    /// On any network or stream failure a fixed error message is appended as
    /// a new assistant turn and the partial placeholder is left as-is. The
    /// call returns once the stream has ended either way, so sends on one
    /// conversation are naturally serialized.
    pub async fn send_message(
        &self,
        conversation: &mut Conversation,
        input: &str,
        mut on_update: impl FnMut(&str),
    ) {
        if input.trim().is_empty() {
            return;
        }

        conversation.push(Message::user(input));
        let outbound = conversation.messages().to_vec();
        conversation.push(Message::assistant(""));

        if let Err(e) = self
            .stream_reply(&outbound, conversation, &mut on_update)
            .await
        {
            debug!("Send failed: {}", e);
            conversation.push(Message::assistant(ERROR_MESSAGE));
            on_update(ERROR_MESSAGE);
        }
    }

    async fn stream_reply(
        &self,
        outbound: &[Message],
        conversation: &mut Conversation,
        on_update: &mut impl FnMut(&str),
    ) -> Result<()> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(outbound)
            .send()
            .await?
            .error_for_status()?;

        let mut stream = response.bytes_stream();
        let mut accumulated = String::new();

        while let Some(chunk) = stream.next().await {
            let bytes = chunk?;
            accumulated.push_str(&String::from_utf8_lossy(&bytes));

            let formatted = self.formatter.format_content(&accumulated);
            conversation.replace_last_content(&formatted);
            on_update(&formatted);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Role;

    // Nothing listens on this port; reaching it is already a test failure.
    const DEAD_ENDPOINT: &str = "http://127.0.0.1:9/api/chat";

    #[test]
    fn test_conversation_starts_with_greeting() {
        let conversation = Conversation::new();
        assert_eq!(conversation.messages().len(), 1);
        assert_eq!(conversation.last().unwrap().role, Role::Assistant);
        assert_eq!(conversation.last().unwrap().content, GREETING);
    }

    #[tokio::test]
    async fn test_blank_input_is_a_no_op() {
        let client = ChatClient::new(DEAD_ENDPOINT);
        let mut conversation = Conversation::new();
        let mut updates = 0;

        client
            .send_message(&mut conversation, "   \t ", |_| updates += 1)
            .await;

        assert_eq!(conversation.messages().len(), 1);
        assert_eq!(updates, 0);
    }

    #[tokio::test]
    async fn test_network_failure_appends_error_message() {
        let client = ChatClient::new(DEAD_ENDPOINT);
        let mut conversation = Conversation::new();

        client
            .send_message(&mut conversation, "Find me a calculus professor", |_| {})
            .await;

        let messages = conversation.messages();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[1], Message::user("Find me a calculus professor"));
        // The placeholder is left as-is, the error appended after it.
        assert_eq!(messages[2], Message::assistant(""));
        assert_eq!(messages[3], Message::assistant(ERROR_MESSAGE));
    }
}
