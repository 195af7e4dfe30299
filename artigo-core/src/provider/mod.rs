//! LLM provider abstraction layer.
//!
//! A common interface for chat completions (with tool calling) and
//! embeddings. The only shipped backend talks to a local Ollama server.

mod ollama;
mod types;

pub use ollama::OllamaProvider;
pub use types::{
    ChatRequest, EmbedRequest, EmbedResponse, Message, Provider, ProviderError, Result, Tool,
    ToolCall, ToolCallFunction, ToolFunction,
};
