//! Pinecone-backed vector index client.

use super::{MatchRecord, VectorIndex};
use crate::config::Credentials;
use crate::error::{LecternError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Client for a hosted Pinecone index.
pub struct PineconeIndex {
    http: reqwest::Client,
    host: String,
    namespace: String,
    api_key: String,
}

impl PineconeIndex {
    /// Create a client for the index at `host`, scoped to `namespace`.
    pub fn new(credentials: &Credentials, host: &str, namespace: &str) -> Result<Self> {
        if host.is_empty() {
            return Err(LecternError::Config(
                "Index host is not configured. Set index.host in the config file.".to_string(),
            ));
        }

        let api_key = credentials.pinecone_key()?.to_string();

        Ok(Self {
            http: reqwest::Client::new(),
            host: host.trim_end_matches('/').to_string(),
            namespace: namespace.to_string(),
            api_key,
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    top_k: usize,
    vector: &'a [f32],
    include_metadata: bool,
    namespace: &'a str,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<MatchRecord>,
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    #[instrument(skip(self, vector))]
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<MatchRecord>> {
        let url = format!("{}/query", self.host);
        let request = QueryRequest {
            top_k,
            vector,
            include_metadata: true,
            namespace: &self.namespace,
        };

        let response = self
            .http
            .post(&url)
            .header("Api-Key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LecternError::VectorIndex(format!(
                "Query failed with status {}: {}",
                status, body
            )));
        }

        let parsed: QueryResponse = response.json().await?;
        debug!("Index returned {} matches", parsed.matches.len());
        Ok(parsed.matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_request_wire_casing() {
        let vector = vec![0.1f32, 0.2];
        let request = QueryRequest {
            top_k: 3,
            vector: &vector,
            include_metadata: true,
            namespace: "ns1",
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["topK"], 3);
        assert_eq!(json["includeMetadata"], true);
        assert_eq!(json["namespace"], "ns1");
    }

    #[test]
    fn test_query_response_parsing() {
        let parsed: QueryResponse = serde_json::from_str(
            r#"{
                "matches": [
                    {"id": "a", "score": 0.9, "metadata": {"subject": "Calculus", "stars": 4.0}},
                    {"id": "b", "score": 0.8, "metadata": {"subject": "Physics", "stars": 3.5}}
                ],
                "namespace": "ns1"
            }"#,
        )
        .unwrap();

        assert_eq!(parsed.matches.len(), 2);
        assert_eq!(parsed.matches[0].id, "a");
    }

    #[test]
    fn test_missing_host_rejected() {
        let credentials = Credentials {
            openai_api_key: "sk-test".to_string(),
            pinecone_api_key: Some("pc-test".to_string()),
        };
        assert!(PineconeIndex::new(&credentials, "", "ns1").is_err());
    }
}
