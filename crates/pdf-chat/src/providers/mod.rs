//! Provider abstractions for embeddings and answer generation
//!
//! The server talks to these traits only. `GeminiClient` implements both;
//! tests plug in deterministic stand-ins.

pub mod embedding;
pub mod gemini;
pub mod llm;

pub use embedding::EmbeddingProvider;
pub use gemini::GeminiClient;
pub use llm::LlmProvider;

#[cfg(test)]
pub(crate) mod mock;
