//! Integration tests for the indexing path, using a fake provider and an
//! in-memory store so no Ollama or qdrant instance is needed.

mod common;

use artigo_core::category::Area;
use artigo_core::rag::{Embedder, IngestError, Ingestor, VectorStore};
use common::{FakeProvider, MemoryStore};
use std::sync::Arc;

fn ingestor(store: Arc<MemoryStore>) -> Ingestor {
    let embedder = Embedder::new(Arc::new(FakeProvider::new()), "nomic-embed-text");
    Ingestor::new(embedder, store, 1000, 200)
}

#[tokio::test]
async fn test_index_document_produces_tagged_chunks() {
    let store = Arc::new(MemoryStore::new());
    let ingestor = ingestor(store.clone());

    let written = ingestor
        .index_document(
            Area::Medicina,
            "x.pdf",
            "Estudo sobre triagem de sepse em unidades de terapia intensiva.",
        )
        .await
        .unwrap();

    assert_eq!(written, 1);
    let record = store.get("x.pdf_chunk_0").await.unwrap().unwrap();
    assert_eq!(record.area, Area::Medicina);
    assert_eq!(record.source, "x.pdf");
    assert_eq!(record.chunk_index, 0);
    assert!(!record.embedding.is_empty());
}

#[tokio::test]
async fn test_index_document_splits_long_text() {
    let store = Arc::new(MemoryStore::new());
    let ingestor = ingestor(store.clone());

    let long_text = "Parágrafo sobre química orgânica. ".repeat(200);
    let written = ingestor
        .index_document(Area::Quimica, "organica.pdf", &long_text)
        .await
        .unwrap();

    assert!(written > 1);
    assert_eq!(store.count().await.unwrap(), written);
    assert!(store
        .get("organica.pdf_chunk_1")
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_index_document_empty_text_writes_nothing() {
    let store = Arc::new(MemoryStore::new());
    let ingestor = ingestor(store.clone());

    let written = ingestor
        .index_document(Area::Computacao, "vazio.pdf", "   \n  ")
        .await
        .unwrap();

    assert_eq!(written, 0);
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_rebuild_rejects_unknown_category_before_reset() {
    let store = Arc::new(MemoryStore::new());
    let ingestor = ingestor(store.clone());

    let root = tempfile::tempdir().unwrap();
    std::fs::create_dir(root.path().join("Astrologia")).unwrap();

    let err = ingestor.rebuild(root.path()).await.unwrap_err();
    assert!(matches!(err, IngestError::Category(_)));
    // The existing collection must survive a bad category name.
    assert!(!store.was_reset());
}

#[tokio::test]
async fn test_rebuild_skips_unreadable_pdfs() {
    let store = Arc::new(MemoryStore::new());
    let ingestor = ingestor(store.clone());

    let root = tempfile::tempdir().unwrap();
    let med = root.path().join("Medicina");
    std::fs::create_dir(&med).unwrap();
    // Not a real PDF; extraction fails and the file is skipped.
    std::fs::write(med.join("corrompido.pdf"), b"nao e um pdf").unwrap();

    let report = ingestor.rebuild(root.path()).await.unwrap();
    assert_eq!(report.files_indexed, 0);
    assert_eq!(report.files_skipped, 1);
    assert_eq!(report.chunks_written, 0);
    assert!(store.was_reset());
}

#[tokio::test]
async fn test_rebuild_missing_data_dir() {
    let store = Arc::new(MemoryStore::new());
    let ingestor = ingestor(store);

    let err = ingestor
        .rebuild(std::path::Path::new("/nonexistent/artigo-data"))
        .await
        .unwrap_err();
    assert!(matches!(err, IngestError::MissingDataDir(_)));
}
