//! Embedding generation using LLM providers.

use crate::provider::{Provider, ProviderError};
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during embedding generation.
#[derive(Debug, Error)]
pub enum EmbedderError {
    /// The provider API returned an error.
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

pub type Result<T> = std::result::Result<T, EmbedderError>;

/// Generates vector embeddings through the configured provider model.
///
/// Ingestion and query embeddings must come from the same model; the
/// embedder is cloned into both sides to enforce that.
#[derive(Clone)]
pub struct Embedder {
    provider: Arc<dyn Provider>,
    model: String,
}

impl Embedder {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// Generates a vector embedding for the given text.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.provider
            .embed(text, &self.model)
            .await
            .map_err(EmbedderError::Provider)
    }
}
