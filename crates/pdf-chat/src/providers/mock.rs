//! Deterministic providers for unit tests

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{Error, Result};

use super::{EmbeddingProvider, LlmProvider};

/// Letter-frequency embedding: texts sharing words land close together
pub fn letter_embedding(text: &str) -> Vec<f32> {
    let mut v = vec![0.0f32; 26];
    for ch in text.chars().filter(char::is_ascii_alphabetic) {
        v[(ch.to_ascii_lowercase() as u8 - b'a') as usize] += 1.0;
    }
    v
}

#[derive(Default)]
pub struct MockEmbedder {
    pub fail: bool,
}

#[async_trait]
impl EmbeddingProvider for MockEmbedder {
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if self.fail {
            return Err(Error::embedding("mock embedder offline"));
        }
        Ok(texts.iter().map(|t| letter_embedding(t)).collect())
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        if self.fail {
            return Err(Error::embedding("mock embedder offline"));
        }
        Ok(letter_embedding(text))
    }

    fn model(&self) -> &str {
        "mock-embedding"
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Records prompts and replies with a fixed answer
#[derive(Default)]
pub struct MockLlm {
    pub prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl LlmProvider for MockLlm {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().push(prompt.to_string());
        Ok("mock answer".to_string())
    }

    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-llm"
    }
}
