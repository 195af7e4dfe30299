//! Two-role analysis pipeline.
//!
//! Strictly sequential: a classifier grounds the article in the index
//! through retrieval tools, then an extractor turns the article plus the
//! classifier's findings into one structured record. One retrieval
//! connection serves the whole run.

pub mod prompts;

use crate::category::Area;
use crate::config::Config;
use crate::extract::{self, Repair};
use crate::input::{self, InputError};
use crate::mcp::RetrievalClient;
use crate::provider::{ChatRequest, Message, Provider, ProviderError, Tool};
use crate::server::handler::{CONTENT_TOOL, SEARCH_TOOL};
use crate::text;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that can occur during a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error("model call failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("retrieval service failed: {0}")]
    Retrieval(#[from] anyhow::Error),

    #[error("model output contained no parsable JSON object")]
    NoJson { raw: String },

    #[error("model output did not match the record shape: {0}")]
    Record(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

/// The structured result of analyzing one article.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalRecord {
    pub area: Area,
    pub extraction: ExtractionFields,
    pub review_markdown: String,
}

/// Technical extraction, kept in the input's own language.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionFields {
    pub problem: String,
    #[serde(default)]
    pub steps: Vec<String>,
    pub conclusion: String,
}

/// A finished run: the record plus how much repair the raw model output
/// needed to parse.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub record: FinalRecord,
    pub repair: Option<Repair>,
}

pub struct Pipeline {
    provider: Arc<dyn Provider>,
    config: Config,
}

impl Pipeline {
    pub fn new(provider: Arc<dyn Provider>, config: Config) -> Self {
        Self { provider, config }
    }

    /// Runs the full pipeline on one source (URL, file path or raw text).
    pub async fn run(&self, source: &str) -> Result<RunOutcome> {
        let article = input::process_input(source).await?;
        info!(chars = article.chars().count(), "input normalized");

        let language = whatlang::detect(&article).map(|i| i.lang().eng_name());
        if let Some(language) = language {
            info!(language, "input language detected");
        }

        let mut client = RetrievalClient::connect(&self.config.server).await?;
        let result = self.run_roles(&mut client, &article, language).await;
        client.disconnect().await;
        result
    }

    async fn run_roles(
        &self,
        client: &mut RetrievalClient,
        article: &str,
        language: Option<&'static str>,
    ) -> Result<RunOutcome> {
        let findings = self.classify(client, article).await?;
        info!(findings = %findings, "classifier finished");

        let raw = self.extract(article, &findings, language).await?;

        let extraction = extract::extract_json(&raw).ok_or(PipelineError::NoJson { raw })?;
        if let Some(repair) = extraction.repair {
            warn!(?repair, "model output needed repair to parse");
        }

        let record: FinalRecord = serde_json::from_value(extraction.value)?;
        Ok(RunOutcome {
            record,
            repair: extraction.repair,
        })
    }

    /// Classifier role: bounded tool-call loop against the retrieval
    /// service. Returns the classifier's final answer text.
    async fn classify(&self, client: &mut RetrievalClient, article: &str) -> Result<String> {
        let budget = self.config.pipeline.classifier_input_budget;
        let summary = text::truncate_chars(article, budget);

        let mut messages = vec![
            Message::system(prompts::classifier_system()),
            Message::user(prompts::classifier_task(&summary)),
        ];

        let mut tool_calls_used = 0usize;

        for iteration in 0..self.config.pipeline.max_iterations {
            let request = ChatRequest::new(&self.config.llm.model, messages.clone())
                .with_temperature(self.config.llm.temperature)
                .with_tools(retrieval_tools());

            let reply = self.provider.chat(request).await?;
            let tool_calls = reply.tool_calls.clone().unwrap_or_default();

            if tool_calls.is_empty() {
                return Ok(reply.content);
            }
            if tool_calls_used >= self.config.pipeline.max_tool_calls {
                warn!(iteration, "tool call budget exhausted, taking answer as-is");
                return Ok(reply.content);
            }

            messages.push(reply.clone());
            for call in tool_calls {
                tool_calls_used += 1;
                let argument = extract::clean_input_for_tool(&call.function.arguments);
                info!(tool = %call.function.name, %argument, "classifier tool call");

                let output = match call.function.name.as_str() {
                    SEARCH_TOOL => client.search_articles(&argument).await?,
                    CONTENT_TOOL => client.get_article_content(&argument).await?,
                    other => format!("Error: Tool {other} not found."),
                };
                messages.push(Message::tool(output));
            }
        }

        // Out of iterations with tool calls still pending: ask once more,
        // without tools, for a final answer.
        messages.push(Message::user(
            "Stop calling tools. Answer now with the Area Name and the \
             Reference ID used as proof.",
        ));
        let request = ChatRequest::new(&self.config.llm.model, messages)
            .with_temperature(self.config.llm.temperature);
        Ok(self.provider.chat(request).await?.content)
    }

    /// Extractor role: a single chat, no tools.
    async fn extract(
        &self,
        article: &str,
        findings: &str,
        language: Option<&str>,
    ) -> Result<String> {
        let budget = self.config.pipeline.extractor_input_budget;
        let body = text::truncate_chars(article, budget);

        let request = ChatRequest::new(
            &self.config.llm.model,
            vec![
                Message::system(prompts::extractor_system()),
                Message::user(prompts::extractor_task(&body, findings, language)),
            ],
        )
        .with_temperature(self.config.llm.temperature);

        Ok(self.provider.chat(request).await?.content)
    }
}

/// The retrieval tools as the chat API sees them.
fn retrieval_tools() -> Vec<Tool> {
    vec![
        Tool::function(
            SEARCH_TOOL,
            "Search the reference article index by similarity.",
            json!({
                "type": "object",
                "properties": {
                    "query": {"type": "string", "description": "Search phrase"}
                },
                "required": ["query"]
            }),
        ),
        Tool::function(
            CONTENT_TOOL,
            "Get full chunk content by ID.",
            json!({
                "type": "object",
                "properties": {
                    "id": {"type": "string", "description": "Chunk ID (e.g. 'doc.pdf_chunk_1')"}
                },
                "required": ["id"]
            }),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_final_record_parses_model_shape() {
        let value = json!({
            "area": "Medicina",
            "extraction": {
                "problem": "Early sepsis detection is slow.",
                "steps": ["Collect vitals", "Train a classifier"],
                "conclusion": "The model flags sepsis earlier."
            },
            "review_markdown": "## Resenha Crítica\n\n**Aspectos Positivos:** ..."
        });
        let record: FinalRecord = serde_json::from_value(value).unwrap();
        assert_eq!(record.area, Area::Medicina);
        assert_eq!(record.extraction.steps.len(), 2);
    }

    #[test]
    fn test_final_record_steps_default_to_empty() {
        let value = json!({
            "area": "Quimica",
            "extraction": {
                "problem": "p",
                "conclusion": "c"
            },
            "review_markdown": "r"
        });
        let record: FinalRecord = serde_json::from_value(value).unwrap();
        assert!(record.extraction.steps.is_empty());
    }

    #[test]
    fn test_invalid_area_is_rejected() {
        let value = json!({
            "area": "Fisica",
            "extraction": {"problem": "p", "conclusion": "c"},
            "review_markdown": "r"
        });
        assert!(serde_json::from_value::<FinalRecord>(value).is_err());
    }

    #[test]
    fn test_retrieval_tools_expose_both_operations() {
        let tools = retrieval_tools();
        let names: Vec<_> = tools.iter().map(|t| t.function.name.as_str()).collect();
        assert_eq!(names, vec![SEARCH_TOOL, CONTENT_TOOL]);
    }
}
