//! End-to-end tests for the relay over HTTP.
//!
//! Binds the relay to an ephemeral port with scripted providers and drives
//! it with real HTTP requests, including the full chat-client round trip.

use async_trait::async_trait;
use lectern::client::{ChatClient, Conversation, ERROR_MESSAGE, GREETING};
use lectern::completion::{ChatModel, TokenStream};
use lectern::embedding::Embedder;
use lectern::error::{LecternError, Result};
use lectern::index::{IndexedRecord, MemoryIndex, ProfessorMetadata};
use lectern::message::{Message, Role};
use lectern::relay::RelayEngine;
use lectern::server::{self, AppState};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

/// Embedder returning a fixed vector.
struct FixedEmbedder(Vec<f32>);

#[async_trait]
impl Embedder for FixedEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Ok(self.0.clone())
    }

    fn dimensions(&self) -> usize {
        self.0.len()
    }
}

/// Embedder that always fails, for pre-stream error paths.
struct FailingEmbedder;

#[async_trait]
impl Embedder for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(LecternError::OpenAI("embedding service down".to_string()))
    }

    fn dimensions(&self) -> usize {
        0
    }
}

/// Chat model replaying scripted fragments and recording its input.
struct ScriptedModel {
    fragments: Vec<std::result::Result<String, String>>,
    received: Mutex<Option<Vec<Message>>>,
}

impl ScriptedModel {
    fn new(fragments: &[&str]) -> Self {
        Self {
            fragments: fragments.iter().map(|f| Ok(f.to_string())).collect(),
            received: Mutex::new(None),
        }
    }

    fn failing_after(fragments: &[&str]) -> Self {
        let mut scripted: Vec<std::result::Result<String, String>> =
            fragments.iter().map(|f| Ok(f.to_string())).collect();
        scripted.push(Err("provider dropped the stream".to_string()));
        Self {
            fragments: scripted,
            received: Mutex::new(None),
        }
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn stream_chat(&self, messages: &[Message]) -> Result<TokenStream> {
        *self.received.lock().unwrap() = Some(messages.to_vec());
        let fragments: Vec<Result<String>> = self
            .fragments
            .iter()
            .map(|fragment| match fragment {
                Ok(text) => Ok(text.clone()),
                Err(e) => Err(LecternError::OpenAI(e.clone())),
            })
            .collect();
        Ok(Box::pin(futures::stream::iter(fragments)))
    }
}

fn seeded_index() -> Arc<MemoryIndex> {
    let index = MemoryIndex::new();
    index.upsert(IndexedRecord {
        id: "Dr. Euler".to_string(),
        embedding: vec![1.0, 0.0],
        metadata: ProfessorMetadata {
            subject: "Calculus".to_string(),
            stars: 4.8,
        },
    });
    index.upsert(IndexedRecord {
        id: "Dr. Noether".to_string(),
        embedding: vec![0.9, 0.1],
        metadata: ProfessorMetadata {
            subject: "Algebra".to_string(),
            stars: 4.6,
        },
    });
    Arc::new(index)
}

/// Start a relay with the given providers and return its address.
async fn spawn_relay(embedder: Arc<dyn Embedder>, model: Arc<dyn ChatModel>) -> SocketAddr {
    let engine = RelayEngine::with_components(embedder, seeded_index(), model, 3);
    let state = Arc::new(AppState { engine });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        server::run(listener, state).await.unwrap();
    });
    addr
}

#[tokio::test]
async fn test_streamed_reply_preserves_fragment_order() {
    let model = Arc::new(ScriptedModel::new(&["1. **Dr Euler**", " teaches", " calculus"]));
    let addr = spawn_relay(Arc::new(FixedEmbedder(vec![1.0, 0.0])), model).await;

    let response = reqwest::Client::new()
        .post(format!("http://{}/api/chat", addr))
        .json(&vec![Message::user("Find me a calculus professor")])
        .send()
        .await
        .unwrap();

    assert!(response.status().is_success());
    assert_eq!(
        response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .unwrap(),
        "application/octet-stream"
    );

    let body = response.text().await.unwrap();
    assert_eq!(body, "1. **Dr Euler** teaches calculus");
}

#[tokio::test]
async fn test_model_receives_augmented_history() {
    let model = Arc::new(ScriptedModel::new(&["ok"]));
    let addr = spawn_relay(Arc::new(FixedEmbedder(vec![1.0, 0.0])), model.clone()).await;

    let conversation = vec![
        Message::assistant("Hi!"),
        Message::user("Find me a calculus professor"),
    ];
    reqwest::Client::new()
        .post(format!("http://{}/api/chat", addr))
        .json(&conversation)
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    let received = model.received.lock().unwrap().clone().unwrap();
    assert_eq!(received.len(), 3);
    assert_eq!(received[0].role, Role::System);
    assert_eq!(received[1], conversation[0]);
    let augmented = &received[2].content;
    assert!(augmented.starts_with("Find me a calculus professor"));
    assert!(augmented.contains("Returned results from vector db"));
    assert!(augmented.contains("Dr. Euler"));
}

#[tokio::test]
async fn test_empty_conversation_is_a_bad_request() {
    let model = Arc::new(ScriptedModel::new(&["unused"]));
    let addr = spawn_relay(Arc::new(FixedEmbedder(vec![1.0, 0.0])), model).await;

    let response = reqwest::Client::new()
        .post(format!("http://{}/api/chat", addr))
        .json(&Vec::<Message>::new())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("at least one message"));
}

#[tokio::test]
async fn test_pre_stream_failure_is_a_bad_gateway() {
    let model = Arc::new(ScriptedModel::new(&["unused"]));
    let addr = spawn_relay(Arc::new(FailingEmbedder), model).await;

    let response = reqwest::Client::new()
        .post(format!("http://{}/api/chat", addr))
        .json(&vec![Message::user("hello")])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::BAD_GATEWAY);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("embedding service down"));
}

#[tokio::test]
async fn test_chat_client_round_trip() {
    let model = Arc::new(ScriptedModel::new(&[
        "1. **Professor Euler**",
        "\n- **Strengths:** clear lectures",
    ]));
    let addr = spawn_relay(Arc::new(FixedEmbedder(vec![1.0, 0.0])), model.clone()).await;

    let client = ChatClient::new(&format!("http://{}/api/chat", addr));
    let mut conversation = Conversation::new();
    let mut updates = 0;

    client
        .send_message(&mut conversation, "Find me a calculus professor", |_| {
            updates += 1
        })
        .await;

    // The posted history is greeting + user turn, placeholder excluded.
    let received = model.received.lock().unwrap().clone().unwrap();
    assert_eq!(received.len(), 3);
    assert_eq!(received[1], Message::assistant(GREETING));

    let messages = conversation.messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1], Message::user("Find me a calculus professor"));
    assert_eq!(messages[2].role, Role::Assistant);
    assert!(!messages[2].content.is_empty());
    // Formatting stripped the bold markers.
    assert!(messages[2].content.contains("1. **Professor Euler**"));
    assert!(messages[2].content.contains("\u{2022} Strengths: clear lectures"));
    assert!(updates >= 1);
}

#[tokio::test]
async fn test_chat_client_shows_error_message_on_provider_failure() {
    let model = Arc::new(ScriptedModel::new(&["unused"]));
    let addr = spawn_relay(Arc::new(FailingEmbedder), model).await;

    let client = ChatClient::new(&format!("http://{}/api/chat", addr));
    let mut conversation = Conversation::new();

    client
        .send_message(&mut conversation, "Find me a calculus professor", |_| {})
        .await;

    let messages = conversation.messages();
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[2], Message::assistant(""));
    assert_eq!(messages[3], Message::assistant(ERROR_MESSAGE));
}

#[tokio::test]
async fn test_chat_client_keeps_partial_reply_on_mid_stream_failure() {
    let model = Arc::new(ScriptedModel::failing_after(&["partial answer"]));
    let addr = spawn_relay(Arc::new(FixedEmbedder(vec![1.0, 0.0])), model).await;

    let client = ChatClient::new(&format!("http://{}/api/chat", addr));
    let mut conversation = Conversation::new();

    client
        .send_message(&mut conversation, "Find me a calculus professor", |_| {})
        .await;

    let messages = conversation.messages();
    assert_eq!(messages.len(), 4);
    // Whatever streamed before the failure stays in the placeholder; the
    // error turn is appended after it, not in its place.
    assert_eq!(messages[2].role, Role::Assistant);
    assert_ne!(messages[2].content, ERROR_MESSAGE);
    assert_eq!(messages[3], Message::assistant(ERROR_MESSAGE));
}

#[tokio::test]
async fn test_mid_stream_failure_terminates_the_stream() {
    let model = Arc::new(ScriptedModel::failing_after(&["partial answer"]));
    let addr = spawn_relay(Arc::new(FixedEmbedder(vec![1.0, 0.0])), model).await;

    let response = reqwest::Client::new()
        .post(format!("http://{}/api/chat", addr))
        .json(&vec![Message::user("hello")])
        .send()
        .await
        .unwrap();

    // Headers are already out; the failure surfaces while reading the body.
    assert!(response.status().is_success());
    assert!(response.text().await.is_err());
}

#[tokio::test]
async fn test_health_endpoint() {
    let model = Arc::new(ScriptedModel::new(&["unused"]));
    let addr = spawn_relay(Arc::new(FixedEmbedder(vec![1.0, 0.0])), model).await;

    let response = reqwest::get(format!("http://{}/health", addr)).await.unwrap();
    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}
