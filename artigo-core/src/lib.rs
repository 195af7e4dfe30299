//! Core library for artigo: classify and review scientific articles
//! against a local reference index.
//!
//! The flow is input normalization ([`input`]), a qdrant-backed article
//! index ([`rag`]), a retrieval service spoken to over stdio JSON-RPC
//! ([`server`], [`mcp`]), and a two-role LLM pipeline ([`pipeline`]) whose
//! output is recovered by [`extract`].

pub mod category;
pub mod config;
pub mod extract;
pub mod input;
pub mod mcp;
pub mod pipeline;
pub mod provider;
pub mod rag;
pub mod server;
pub mod text;

pub use category::Area;
pub use config::Config;
pub use pipeline::{FinalRecord, Pipeline, RunOutcome};
