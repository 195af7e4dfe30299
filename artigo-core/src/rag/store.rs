//! Vector store abstraction.

use super::types::{ChunkRecord, ScoredChunk};
use anyhow::Result;
use async_trait::async_trait;

/// Unified interface for vector database operations.
///
/// The pipeline assumes a single named collection with full-rebuild
/// semantics: ingestion calls [`reset`](VectorStore::reset) once and then
/// only appends. Serving and ingestion are not expected to run against the
/// same collection concurrently.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Drops and recreates the collection, discarding all stored chunks.
    async fn reset(&self) -> Result<()>;

    /// Adds chunk records to the collection.
    async fn add(&self, chunks: Vec<ChunkRecord>) -> Result<()>;

    /// Returns the `top_k` most similar chunks, ordered by descending
    /// similarity score in `[0, 1]`.
    async fn search(&self, query_embedding: &[f32], top_k: usize) -> Result<Vec<ScoredChunk>>;

    /// Exact-id lookup. Returns `None` when the id is absent.
    async fn get(&self, id: &str) -> Result<Option<ChunkRecord>>;

    /// Total number of chunks in the collection.
    async fn count(&self) -> Result<usize>;
}
