//! Test doubles shared by the integration tests.

// Each test binary uses a different subset of the helpers.
#![allow(dead_code)]

use artigo_core::provider::{ChatRequest, Message, Provider, ProviderError};
use artigo_core::rag::{ChunkRecord, ScoredChunk, VectorStore};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Fixed similarity score the memory store reports for every hit.
pub const FAKE_SCORE: f32 = 0.8765;

/// A provider that embeds deterministically and answers chats with a
/// canned message. No network involved.
pub struct FakeProvider {
    pub chat_reply: String,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self {
            chat_reply: "ok".to_string(),
        }
    }
}

#[async_trait]
impl Provider for FakeProvider {
    async fn chat(&self, _request: ChatRequest) -> Result<Message, ProviderError> {
        Ok(Message::assistant(self.chat_reply.clone()))
    }

    async fn embed(&self, text: &str, _model: &str) -> Result<Vec<f32>, ProviderError> {
        // Deterministic and length-sensitive, so distinct texts get
        // distinct vectors.
        let sum: u32 = text.bytes().map(u32::from).sum();
        Ok(vec![
            text.len() as f32,
            sum as f32,
            (sum % 97) as f32,
            1.0,
        ])
    }
}

/// An in-memory vector store. Search ignores the query vector and returns
/// stored chunks in insertion order with a fixed score.
#[derive(Default)]
pub struct MemoryStore {
    chunks: Mutex<Vec<ChunkRecord>>,
    was_reset: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn was_reset(&self) -> bool {
        self.was_reset.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VectorStore for MemoryStore {
    async fn reset(&self) -> anyhow::Result<()> {
        self.chunks.lock().unwrap().clear();
        self.was_reset.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn add(&self, mut chunks: Vec<ChunkRecord>) -> anyhow::Result<()> {
        self.chunks.lock().unwrap().append(&mut chunks);
        Ok(())
    }

    async fn search(&self, _query: &[f32], top_k: usize) -> anyhow::Result<Vec<ScoredChunk>> {
        Ok(self
            .chunks
            .lock()
            .unwrap()
            .iter()
            .take(top_k)
            .map(|record| ScoredChunk {
                record: record.clone(),
                score: FAKE_SCORE,
            })
            .collect())
    }

    async fn get(&self, id: &str) -> anyhow::Result<Option<ChunkRecord>> {
        Ok(self
            .chunks
            .lock()
            .unwrap()
            .iter()
            .find(|record| record.id == id)
            .cloned())
    }

    async fn count(&self) -> anyhow::Result<usize> {
        Ok(self.chunks.lock().unwrap().len())
    }
}
