//! In-memory vector index implementation.
//!
//! Useful for testing and local development without a hosted index.

use super::{cosine_similarity, MatchRecord, ProfessorMetadata, VectorIndex};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// A professor record held by the in-memory index.
#[derive(Debug, Clone)]
pub struct IndexedRecord {
    /// Professor identifier.
    pub id: String,
    /// Embedding vector.
    pub embedding: Vec<f32>,
    /// Record metadata.
    pub metadata: ProfessorMetadata,
}

/// In-memory vector index.
pub struct MemoryIndex {
    records: RwLock<HashMap<String, IndexedRecord>>,
}

impl MemoryIndex {
    /// Create a new empty in-memory index.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Insert or replace a record by its identifier.
    pub fn upsert(&self, record: IndexedRecord) {
        let mut records = self.records.write().unwrap();
        records.insert(record.id.clone(), record);
    }

    /// Get the number of records in the index.
    pub fn record_count(&self) -> usize {
        self.records.read().unwrap().len()
    }
}

impl Default for MemoryIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorIndex for MemoryIndex {
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<MatchRecord>> {
        let records = self.records.read().unwrap();

        let mut matches: Vec<MatchRecord> = records
            .values()
            .map(|record| MatchRecord {
                id: record.id.clone(),
                score: cosine_similarity(vector, &record.embedding),
                metadata: record.metadata.clone(),
            })
            .collect();

        matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        matches.truncate(top_k);

        Ok(matches)
    }
}
