//! Qdrant vector database storage implementation.

use super::store::VectorStore;
use super::types::{ChunkRecord, ScoredChunk};
use crate::category::Area;
use crate::config::StorageConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use qdrant_client::{
    qdrant::{
        vectors_config::Config, Condition, CreateCollectionBuilder, Distance, Filter, PointStruct,
        ScrollPointsBuilder, SearchPointsBuilder, UpsertPointsBuilder, VectorParamsBuilder,
        VectorsConfig,
    },
    Qdrant,
};
use serde_json::json;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::Arc;

/// Qdrant-backed chunk store.
///
/// Chunk ids are strings; qdrant point ids are derived by hashing them, and
/// the original id is kept in the payload for exact lookup. Cosine distance
/// is configured on the collection, so reported scores are similarities
/// already; they are clamped into `[0, 1]` to honor the search contract.
#[derive(Clone)]
pub struct QdrantStore {
    client: Arc<Qdrant>,
    collection_name: String,
    vector_size: u64,
}

impl QdrantStore {
    /// Connects to the qdrant server. Does not create the collection; an
    /// ingestion run does that through [`VectorStore::reset`].
    pub fn connect(storage: &StorageConfig, vector_size: u64) -> Result<Self> {
        let client = Qdrant::from_url(&storage.url)
            .build()
            .context("Failed to connect to qdrant server")?;

        Ok(Self {
            client: Arc::new(client),
            collection_name: storage.collection_name.clone(),
            vector_size,
        })
    }

    async fn create_collection(&self) -> Result<()> {
        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection_name).vectors_config(
                    VectorsConfig {
                        config: Some(Config::Params(
                            VectorParamsBuilder::new(self.vector_size, Distance::Cosine).build(),
                        )),
                    },
                ),
            )
            .await
            .context("Failed to create collection")?;
        Ok(())
    }

    fn record_from_payload(
        payload: &HashMap<String, qdrant_client::qdrant::Value>,
    ) -> Result<ChunkRecord> {
        let get_str = |key: &str| -> Result<String> {
            payload
                .get(key)
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
                .with_context(|| format!("payload missing field '{key}'"))
        };

        let id = get_str("id")?;
        let text = get_str("content")?;
        let source = get_str("source")?;
        let area = Area::from_str(&get_str("area")?)?;
        let chunk_index = payload
            .get("chunk_index")
            .and_then(|v| v.as_integer())
            .context("payload missing field 'chunk_index'")? as usize;

        Ok(ChunkRecord {
            id,
            text,
            source,
            area,
            chunk_index,
            embedding: vec![],
        })
    }
}

#[async_trait]
impl VectorStore for QdrantStore {
    async fn reset(&self) -> Result<()> {
        let exists = self
            .client
            .collection_exists(&self.collection_name)
            .await
            .context("Failed to check collection")?;

        if exists {
            self.client
                .delete_collection(&self.collection_name)
                .await
                .context("Failed to delete collection")?;
        }

        self.create_collection().await
    }

    async fn add(&self, chunks: Vec<ChunkRecord>) -> Result<()> {
        if chunks.is_empty() {
            return Ok(());
        }

        let points: Vec<PointStruct> = chunks
            .into_iter()
            .map(|chunk| {
                let mut hasher = DefaultHasher::new();
                chunk.id.hash(&mut hasher);
                let numeric_id = hasher.finish();

                let payload: HashMap<String, serde_json::Value> = [
                    ("id".to_string(), json!(chunk.id)),
                    ("content".to_string(), json!(chunk.text)),
                    ("source".to_string(), json!(chunk.source)),
                    ("area".to_string(), json!(chunk.area.as_str())),
                    ("chunk_index".to_string(), json!(chunk.chunk_index)),
                ]
                .into_iter()
                .collect();

                PointStruct::new(numeric_id, chunk.embedding, payload)
            })
            .collect();

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection_name, points))
            .await
            .context("Failed to upsert points")?;

        Ok(())
    }

    async fn search(&self, query_embedding: &[f32], top_k: usize) -> Result<Vec<ScoredChunk>> {
        let search_result = self
            .client
            .search_points(
                SearchPointsBuilder::new(
                    &self.collection_name,
                    query_embedding.to_vec(),
                    top_k as u64,
                )
                .with_payload(true),
            )
            .await
            .context("Failed to search points")?;

        let mut results = Vec::with_capacity(search_result.result.len());
        for point in search_result.result {
            let record = Self::record_from_payload(&point.payload)?;
            results.push(ScoredChunk {
                record,
                score: point.score.clamp(0.0, 1.0),
            });
        }

        Ok(results)
    }

    async fn get(&self, id: &str) -> Result<Option<ChunkRecord>> {
        let scroll_result = self
            .client
            .scroll(
                ScrollPointsBuilder::new(&self.collection_name)
                    .filter(Filter::must([Condition::matches("id", id.to_string())]))
                    .limit(1)
                    .with_payload(true),
            )
            .await
            .context("Failed to scroll points")?;

        match scroll_result.result.first() {
            Some(point) => Ok(Some(Self::record_from_payload(&point.payload)?)),
            None => Ok(None),
        }
    }

    async fn count(&self) -> Result<usize> {
        let info = self
            .client
            .collection_info(&self.collection_name)
            .await
            .context("Failed to get collection info")?;

        Ok(info
            .result
            .map(|r| r.points_count.unwrap_or(0) as usize)
            .unwrap_or(0))
    }
}
