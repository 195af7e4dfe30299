use crate::category::Area;

/// A chunk of a source article stored in the vector database.
///
/// Identity is `"<source>_chunk_<chunk_index>"`; records are immutable once
/// written and only disappear on a full collection rebuild.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkRecord {
    pub id: String,
    pub text: String,
    /// Original PDF file name (no directory components).
    pub source: String,
    pub area: Area,
    pub chunk_index: usize,
    pub embedding: Vec<f32>,
}

impl ChunkRecord {
    pub fn new(
        source: impl Into<String>,
        area: Area,
        chunk_index: usize,
        text: impl Into<String>,
        embedding: Vec<f32>,
    ) -> Self {
        let source = source.into();
        Self {
            id: format!("{source}_chunk_{chunk_index}"),
            text: text.into(),
            source,
            area,
            chunk_index,
            embedding,
        }
    }
}

/// A chunk returned from similarity search with its score.
///
/// `score` is a similarity in `[0, 1]`: backends that report a distance
/// convert it as `1 - distance`, backends that report cosine similarity
/// clamp it into range. The embedding is not carried back.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub record: ChunkRecord,
    pub score: f32,
}
