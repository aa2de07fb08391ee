//! LLM provider trait for generating answers

use async_trait::async_trait;

use crate::error::Result;

/// Trait for prompt completion
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Complete a fully rendered prompt
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}
