//! Integration tests for the retrieval service handler: result formatting,
//! sentinel strings and argument validation.

mod common;

use artigo_core::category::Area;
use artigo_core::rag::{ChunkRecord, Embedder, VectorStore};
use artigo_core::server::RetrievalHandler;
use common::{FakeProvider, MemoryStore};
use serde_json::{json, Value};
use std::sync::Arc;

fn handler(store: Arc<MemoryStore>) -> RetrievalHandler {
    let embedder = Embedder::new(Arc::new(FakeProvider::new()), "nomic-embed-text");
    RetrievalHandler::new(store, embedder, 5)
}

async fn seeded_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    store
        .add(vec![
            ChunkRecord::new(
                "sepse.pdf",
                Area::Medicina,
                0,
                "Detecção precoce de sepse usando sinais vitais contínuos.",
                vec![1.0, 0.0],
            ),
            ChunkRecord::new(
                "grafos.pdf",
                Area::Computacao,
                2,
                "Algoritmos de particionamento de grafos em larga escala.",
                vec![0.0, 1.0],
            ),
        ])
        .await
        .unwrap();
    store
}

#[tokio::test]
async fn test_search_report_format() {
    let handler = handler(seeded_store().await);

    let report = handler.search_articles("sepse").await;

    assert!(report.starts_with("=== SEARCH RESULTS FOR: 'sepse' ===\n"));
    assert!(report.contains("--- RESULT 1 ---"));
    assert!(report.contains("--- RESULT 2 ---"));
    assert!(report.contains("ID: sepse.pdf_chunk_0"));
    assert!(report.contains("Area: Medicina"));
    assert!(report.contains("Source: sepse.pdf"));
    assert!(report.contains(&format!("Score: {:.4}", common::FAKE_SCORE)));
    assert!(report.contains("Snippet: Detecção precoce de sepse"));
}

#[tokio::test]
async fn test_search_snippet_is_truncated() {
    let store = Arc::new(MemoryStore::new());
    let long_text = "palavra ".repeat(100);
    store
        .add(vec![ChunkRecord::new(
            "longo.pdf",
            Area::Quimica,
            0,
            long_text,
            vec![1.0],
        )])
        .await
        .unwrap();
    let handler = handler(store);

    let report = handler.search_articles("qualquer").await;

    let snippet_line = report
        .lines()
        .find(|line| line.starts_with("Snippet: "))
        .unwrap();
    // "Snippet: " + at most 300 chars + "..."
    let body = snippet_line
        .strip_prefix("Snippet: ")
        .unwrap()
        .strip_suffix("...")
        .unwrap();
    assert!(body.chars().count() <= 300);
}

#[tokio::test]
async fn test_search_empty_index() {
    let handler = handler(Arc::new(MemoryStore::new()));
    assert_eq!(handler.search_articles("qualquer").await, "No results found.");
}

#[tokio::test]
async fn test_get_content_known_id() {
    let handler = handler(seeded_store().await);

    let payload = handler.get_article_content("grafos.pdf_chunk_2").await;
    let value: Value = serde_json::from_str(&payload).unwrap();

    assert_eq!(value["id"], "grafos.pdf_chunk_2");
    assert_eq!(value["title"], "grafos.pdf");
    assert_eq!(value["area"], "Computacao");
    assert!(value["content"]
        .as_str()
        .unwrap()
        .contains("particionamento de grafos"));
}

#[tokio::test]
async fn test_get_content_unknown_id() {
    let handler = handler(seeded_store().await);
    assert_eq!(
        handler.get_article_content("inexistente_chunk_9").await,
        "Error: ID not found."
    );
}

#[tokio::test]
async fn test_call_dispatches_by_tool_name() {
    let handler = handler(seeded_store().await);

    let result = handler
        .call("search_articles", &json!({"query": "sepse"}))
        .await;
    assert!(!result.is_error);
    assert!(result.content[0].text.contains("SEARCH RESULTS"));

    let result = handler
        .call("get_article_content", &json!({"id": "sepse.pdf_chunk_0"}))
        .await;
    assert!(result.content[0].text.contains("sepse.pdf"));
}

#[tokio::test]
async fn test_call_rejects_missing_arguments() {
    let handler = handler(seeded_store().await);

    let result = handler.call("search_articles", &Value::Null).await;
    assert_eq!(result.content[0].text, "Error: No arguments provided.");

    let result = handler.call("search_articles", &json!({"q": "typo"})).await;
    assert!(result.content[0].text.starts_with("Error: missing required"));

    let result = handler.call("unknown_tool", &json!({})).await;
    assert_eq!(result.content[0].text, "Error: Tool unknown_tool not found.");
}

#[tokio::test]
async fn test_tools_list() {
    let handler = handler(Arc::new(MemoryStore::new()));
    let tools = handler.tools();
    let names: Vec<_> = tools.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["search_articles", "get_article_content"]);
    assert_eq!(tools[0].input_schema["required"][0], "query");
}
