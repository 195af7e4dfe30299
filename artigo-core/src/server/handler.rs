//! Tool logic for the retrieval service.
//!
//! Every failure is rendered as an inline `"Error: …"` string returned as
//! normal tool output; the boundary never raises toward the calling agent.

use crate::mcp::types::{ToolCallResult, ToolDescriptor};
use crate::rag::{Embedder, VectorStore};
use crate::text;
use serde_json::{json, Value};
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::{info, warn};

/// Maximum snippet length in a search result, in characters.
const SNIPPET_CHARS: usize = 300;

pub const SEARCH_TOOL: &str = "search_articles";
pub const CONTENT_TOOL: &str = "get_article_content";

/// Handles the two retrieval operations over the vector store.
pub struct RetrievalHandler {
    store: Arc<dyn VectorStore>,
    embedder: Embedder,
    top_k: usize,
}

impl RetrievalHandler {
    pub fn new(store: Arc<dyn VectorStore>, embedder: Embedder, top_k: usize) -> Self {
        Self {
            store,
            embedder,
            top_k,
        }
    }

    /// The tools this service advertises on `tools/list`.
    pub fn tools(&self) -> Vec<ToolDescriptor> {
        vec![
            ToolDescriptor {
                name: SEARCH_TOOL.to_string(),
                description: "Search for articles by similarity. Returns metadata and snippets."
                    .to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "query": {"type": "string", "description": "Search phrase"}
                    },
                    "required": ["query"]
                }),
            },
            ToolDescriptor {
                name: CONTENT_TOOL.to_string(),
                description: "Get full chunk content by ID. Returns a JSON string.".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "id": {"type": "string", "description": "Chunk ID (e.g. 'doc.pdf_chunk_1')"}
                    },
                    "required": ["id"]
                }),
            },
        ]
    }

    /// Dispatches a `tools/call` by name, validating arguments.
    pub async fn call(&self, name: &str, arguments: &Value) -> ToolCallResult {
        let text = match name {
            SEARCH_TOOL => match required_string(arguments, "query") {
                Ok(query) => self.search_articles(&query).await,
                Err(message) => message,
            },
            CONTENT_TOOL => match required_string(arguments, "id") {
                Ok(id) => self.get_article_content(&id).await,
                Err(message) => message,
            },
            other => format!("Error: Tool {other} not found."),
        };
        ToolCallResult::text(text)
    }

    /// Similarity search rendered as a fixed-width text report.
    pub async fn search_articles(&self, query: &str) -> String {
        info!(query, "search_articles");

        let embedding = match self.embedder.embed(query).await {
            Ok(embedding) => embedding,
            Err(e) => {
                warn!(error = %e, "query embedding failed");
                return format!("Error: {e}");
            }
        };

        let hits = match self.store.search(&embedding, self.top_k).await {
            Ok(hits) => hits,
            Err(e) => {
                warn!(error = %e, "vector search failed");
                return format!("Error: {e}");
            }
        };

        if hits.is_empty() {
            return "No results found.".to_string();
        }

        let mut report = format!("=== SEARCH RESULTS FOR: '{query}' ===\n");
        for (i, hit) in hits.iter().enumerate() {
            let snippet = text::clean_snippet(&hit.record.text);
            let snippet = text::truncate_chars(&snippet, SNIPPET_CHARS);
            let _ = write!(
                report,
                "\n--- RESULT {} ---\n\
                 ID: {}\n\
                 Area: {}\n\
                 Source: {}\n\
                 Score: {:.4}\n\
                 Snippet: {}...\n",
                i + 1,
                hit.record.id,
                hit.record.area,
                hit.record.source,
                hit.score,
                snippet,
            );
        }
        report
    }

    /// Exact-id lookup rendered as a JSON string.
    pub async fn get_article_content(&self, id: &str) -> String {
        info!(id, "get_article_content");

        let record = match self.store.get(id).await {
            Ok(Some(record)) => record,
            Ok(None) => return "Error: ID not found.".to_string(),
            Err(e) => {
                warn!(error = %e, "chunk lookup failed");
                return format!("Error: {e}");
            }
        };

        let payload = json!({
            "id": record.id,
            "title": record.source,
            "area": record.area,
            "content": text::clean_snippet(&record.text),
        });

        // A Value built from strings always serializes.
        serde_json::to_string(&payload).unwrap_or_else(|e| format!("Error: {e}"))
    }
}

fn required_string(arguments: &Value, field: &str) -> Result<String, String> {
    if arguments.is_null() {
        return Err("Error: No arguments provided.".to_string());
    }
    arguments
        .get(field)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| format!("Error: missing required argument '{field}'."))
}
