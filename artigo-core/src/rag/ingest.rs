//! Corpus ingestion: builds the vector collection from a directory of PDFs.
//!
//! Each immediate subdirectory of the data root names the category of every
//! PDF beneath it, validated against [`Area`]. A rebuild drops the whole
//! collection first; there is no incremental update.

use super::embedder::{Embedder, EmbedderError};
use super::store::VectorStore;
use super::types::ChunkRecord;
use crate::category::{Area, AreaParseError};
use crate::input::pdf;
use crate::text;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("data directory not found: {0}")]
    MissingDataDir(PathBuf),

    #[error(transparent)]
    Category(#[from] AreaParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Embedder error: {0}")]
    Embedder(#[from] EmbedderError),

    #[error("Store error: {0}")]
    Store(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, IngestError>;

/// Outcome of a full rebuild.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub files_indexed: usize,
    pub files_skipped: usize,
    pub chunks_written: usize,
}

/// Builds the vector index from a PDF corpus.
pub struct Ingestor {
    embedder: Embedder,
    store: Arc<dyn VectorStore>,
    chunk_size: usize,
    chunk_overlap: usize,
}

impl Ingestor {
    pub fn new(
        embedder: Embedder,
        store: Arc<dyn VectorStore>,
        chunk_size: usize,
        chunk_overlap: usize,
    ) -> Self {
        Self {
            embedder,
            store,
            chunk_size,
            chunk_overlap,
        }
    }

    /// Drops and recreates the collection, then indexes every PDF found
    /// under `data_dir`. Unreadable PDFs are skipped with a warning; an
    /// unknown category directory aborts the run before anything is
    /// dropped.
    pub async fn rebuild(&self, data_dir: &Path) -> Result<IngestReport> {
        if !data_dir.is_dir() {
            return Err(IngestError::MissingDataDir(data_dir.to_path_buf()));
        }

        // Validate every category before touching the collection, so a typo
        // in a directory name cannot destroy an existing index.
        let documents = collect_documents(data_dir)?;
        info!(count = documents.len(), "found PDF files to index");

        self.store.reset().await?;

        let mut report = IngestReport::default();
        for (area, path) in documents {
            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            let extract_path = path.clone();
            let extracted =
                tokio::task::spawn_blocking(move || pdf::extract_pdf_file(&extract_path))
                    .await
                    .map_err(|e| IngestError::Store(anyhow::anyhow!(e)))?;

            let raw_text = match extracted {
                Ok(text) => text,
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "skipping unreadable PDF");
                    report.files_skipped += 1;
                    continue;
                }
            };

            let written = self.index_document(area, &filename, &raw_text).await?;
            if written == 0 {
                warn!(file = %path.display(), "no chunks produced, skipping");
                report.files_skipped += 1;
                continue;
            }

            info!(file = %filename, area = %area, chunks = written, "indexed");
            report.files_indexed += 1;
            report.chunks_written += written;
        }

        info!(
            files = report.files_indexed,
            skipped = report.files_skipped,
            chunks = report.chunks_written,
            "ingestion finished"
        );
        Ok(report)
    }

    /// Cleans, chunks, embeds and stores one document's text. Returns the
    /// number of chunks written.
    pub async fn index_document(
        &self,
        area: Area,
        filename: &str,
        raw_text: &str,
    ) -> Result<usize> {
        let cleaned = text::clean_text(raw_text);
        let chunks = text::chunk_text(&cleaned, self.chunk_size, self.chunk_overlap);
        if chunks.is_empty() {
            return Ok(0);
        }

        let mut records = Vec::with_capacity(chunks.len());
        for (i, chunk) in chunks.into_iter().enumerate() {
            let embedding = self.embedder.embed(&chunk).await?;
            records.push(ChunkRecord::new(filename, area, i, chunk, embedding));
        }

        let written = records.len();
        self.store.add(records).await?;
        Ok(written)
    }
}

/// Collects `(area, path)` pairs for every PDF under the data root.
///
/// Loose files directly under the root have no category and are ignored.
fn collect_documents(data_dir: &Path) -> Result<Vec<(Area, PathBuf)>> {
    let mut documents = Vec::new();

    for entry in std::fs::read_dir(data_dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_dir() {
            debug!(file = %path.display(), "ignoring file outside category directories");
            continue;
        }

        let dir_name = entry.file_name().to_string_lossy().into_owned();
        let area = Area::from_dir_name(&dir_name)?;
        collect_pdfs(&path, area, &mut documents)?;
    }

    Ok(documents)
}

fn collect_pdfs(dir: &Path, area: Area, out: &mut Vec<(Area, PathBuf)>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            collect_pdfs(&path, area, out)?;
        } else if path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
        {
            out.push((area, path));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_documents_tags_by_subdirectory() {
        let root = tempfile::tempdir().unwrap();
        let med = root.path().join("Medicina");
        std::fs::create_dir(&med).unwrap();
        std::fs::write(med.join("x.pdf"), b"dummy").unwrap();
        std::fs::write(med.join("notas.txt"), b"ignorado").unwrap();

        let docs = collect_documents(root.path()).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].0, Area::Medicina);
        assert!(docs[0].1.ends_with("x.pdf"));
    }

    #[test]
    fn test_collect_documents_recurses_into_nested_dirs() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("Quimica").join("2024");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("artigo.pdf"), b"dummy").unwrap();

        let docs = collect_documents(root.path()).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].0, Area::Quimica);
    }

    #[test]
    fn test_collect_documents_rejects_unknown_category() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join("Astrologia")).unwrap();

        let err = collect_documents(root.path()).unwrap_err();
        assert!(matches!(err, IngestError::Category(_)));
    }

    #[test]
    fn test_collect_documents_ignores_loose_root_files() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join("solto.pdf"), b"dummy").unwrap();

        let docs = collect_documents(root.path()).unwrap();
        assert!(docs.is_empty());
    }
}
