//! Embedding provider trait for generating text embeddings

use async_trait::async_trait;

use crate::error::Result;

/// Trait for generating text embeddings
///
/// Documents and queries are embedded separately because retrieval models
/// encode them with different task hints.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed chunks that will be stored in the index
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Embed a question for nearest-neighbour lookup
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>>;

    /// Model identifier recorded in the index
    fn model(&self) -> &str;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
