//! Retrieval-augmented question answering over the persisted index

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::Result;
use crate::providers::{EmbeddingProvider, LlmProvider};
use crate::retrieval::{IndexLock, VectorIndex};

use super::prompt::PromptBuilder;

/// Model reply to one question
#[derive(Debug, Clone)]
pub struct Answer {
    pub text: String,
    /// Chunks stuffed into the prompt
    pub chunks_retrieved: usize,
}

/// Load index → embed question → retrieve → prompt → generate
pub struct QaChain {
    embedder: Arc<dyn EmbeddingProvider>,
    llm: Arc<dyn LlmProvider>,
    index_path: PathBuf,
    top_k: usize,
    index_lock: IndexLock,
}

impl QaChain {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmProvider>,
        index_path: impl Into<PathBuf>,
        top_k: usize,
    ) -> Self {
        Self {
            embedder,
            llm,
            index_path: index_path.into(),
            top_k,
            index_lock: IndexLock::default(),
        }
    }

    /// Share the index lock with the pipeline writing the index
    pub fn with_index_lock(mut self, index_lock: IndexLock) -> Self {
        self.index_lock = index_lock;
        self
    }

    /// Answer a question from the current index
    ///
    /// The index is read from disk on every call, so a processing run that
    /// finished in between is always picked up.
    pub async fn answer(&self, question: &str) -> Result<Answer> {
        let path = self.index_path.clone();
        let index = {
            let _read = self.index_lock.read().await;
            tokio::task::spawn_blocking(move || VectorIndex::load(&path)).await??
        };

        if index.model != self.embedder.model() {
            tracing::warn!(
                "Index was built with '{}' but queries use '{}'",
                index.model,
                self.embedder.model()
            );
        }

        let query = self.embedder.embed_query(question).await?;
        let chunks = index.search(&query, self.top_k)?;
        tracing::debug!("Retrieved {} chunks for question", chunks.len());

        let context = PromptBuilder::build_context(&chunks);
        let prompt = PromptBuilder::build_prompt(question, &context);

        let text = self.llm.generate(&prompt).await?;

        Ok(Answer {
            text,
            chunks_retrieved: chunks.len(),
        })
    }
}
