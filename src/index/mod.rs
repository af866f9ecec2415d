//! Vector index abstraction for Lectern.
//!
//! Provides a trait-based interface over the vector store holding the
//! professor records. The index is populated externally; Lectern only
//! queries it for nearest neighbors.

mod memory;
mod pinecone;

pub use memory::{IndexedRecord, MemoryIndex};
pub use pinecone::PineconeIndex;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Metadata attached to a professor record in the index.
///
/// The index may carry additional fields; only the ones the relay renders
/// are modeled, and missing fields fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfessorMetadata {
    pub subject: String,
    pub stars: f64,
}

/// One match returned by a nearest-neighbor query.
///
/// Matches arrive ranked by descending similarity score; that ranking is the
/// external service's and is never reordered here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Professor identifier.
    pub id: String,
    /// Similarity score (higher is better).
    pub score: f32,
    #[serde(default)]
    pub metadata: ProfessorMetadata,
}

/// Trait for vector index implementations.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Query the `top_k` nearest neighbors to a vector, with metadata.
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<MatchRecord>>;
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
