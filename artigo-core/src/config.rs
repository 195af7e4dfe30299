use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Configuration for the whole pipeline: LLM, embeddings, vector storage,
/// ingestion and agent behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Configuration for the chat model driving both agent roles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub model: String,
    pub base_url: String,
    pub temperature: f64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "llama3.1:8b".to_string(),
            base_url: "http://localhost:11434".to_string(),
            temperature: 0.2,
        }
    }
}

/// Configuration for the embedding model used at ingestion and query time.
///
/// Both sides must use the same model; a collection embedded with one model
/// cannot be searched with vectors from another.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    pub model: String,
    /// Dimension of the vectors produced by `model`.
    pub dimension: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "nomic-embed-text".to_string(),
            dimension: 768,
        }
    }
}

/// Vector database connection and collection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Qdrant gRPC endpoint.
    pub url: String,
    pub collection_name: String,
    /// Number of results returned by similarity searches.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_top_k() -> usize {
    5
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:6334".to_string(),
            collection_name: "scientific_articles".to_string(),
            top_k: default_top_k(),
        }
    }
}

/// Settings for corpus ingestion.
///
/// Subdirectories of `data_dir` name the category of every PDF beneath them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    pub data_dir: String,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data/pdfs".to_string(),
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

/// Bounds on the agent pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Maximum reasoning iterations per role before the loop is cut.
    pub max_iterations: usize,
    /// Maximum retrieval tool calls across a role's iterations.
    pub max_tool_calls: usize,
    /// Characters of input text shown to the classifier.
    pub classifier_input_budget: usize,
    /// Characters of input text shown to the extractor.
    pub extractor_input_budget: usize,
    pub output_dir: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_iterations: 4,
            max_tool_calls: 5,
            classifier_input_budget: 800,
            extractor_input_budget: 25_000,
            output_dir: "./out".to_string(),
        }
    }
}

/// How the pipeline launches the retrieval service process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            command: "artigo".to_string(),
            args: vec!["serve".to_string()],
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            embedding: EmbeddingConfig::default(),
            storage: StorageConfig::default(),
            ingest: IngestConfig::default(),
            pipeline: PipelineConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from `artigo.yaml` if it exists, otherwise use defaults.
    pub fn load_or_default() -> Self {
        Self::load("artigo.yaml").unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_defaults() {
        let config = StorageConfig::default();
        assert_eq!(config.collection_name, "scientific_articles");
        assert_eq!(config.top_k, 5);
    }

    #[test]
    fn test_ingest_defaults() {
        let config = IngestConfig::default();
        assert_eq!(config.data_dir, "./data/pdfs");
        assert_eq!(config.chunk_size, 1000);
        assert_eq!(config.chunk_overlap, 200);
    }

    #[test]
    fn test_pipeline_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.max_tool_calls, 5);
        assert_eq!(config.extractor_input_budget, 25_000);
    }

    #[test]
    fn test_partial_yaml_falls_back_to_defaults() {
        let yaml = "llm:\n  model: qwen2.5:7b\n  base_url: http://localhost:11434\n  temperature: 0.1\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.llm.model, "qwen2.5:7b");
        assert_eq!(config.storage.collection_name, "scientific_articles");
        assert_eq!(config.embedding.model, "nomic-embed-text");
    }
}
