//! Retrieval plumbing: embeddings, vector storage and corpus ingestion.
//!
//! The offline half of the system. [`Ingestor`] walks the PDF corpus,
//! cleans and chunks each document, embeds the chunks through the
//! configured provider model and writes them to a [`VectorStore`]. The
//! online half (the retrieval service in [`crate::server`]) reads from the
//! same store.

mod embedder;
mod ingest;
mod qdrant_store;
mod store;
mod types;

pub use embedder::{Embedder, EmbedderError};
pub use ingest::{IngestError, IngestReport, Ingestor};
pub use qdrant_store::QdrantStore;
pub use store::VectorStore;
pub use types::{ChunkRecord, ScoredChunk};
