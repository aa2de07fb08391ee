//! Application state for the chat server

use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::ChatConfig;
use crate::error::Result;
use crate::generation::QaChain;
use crate::ingestion::IngestPipeline;
use crate::providers::{EmbeddingProvider, GeminiClient, LlmProvider};
use crate::retrieval::IndexLock;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: ChatConfig,
    /// Embedding provider
    embedding_provider: Arc<dyn EmbeddingProvider>,
    /// LLM provider
    llm_provider: Arc<dyn LlmProvider>,
    /// Extract → split → embed → persist
    pipeline: IngestPipeline,
    /// Held for the whole of a processing run
    process_lock: Mutex<()>,
    /// Shared by the pipeline (save) and question chains (load)
    index_lock: IndexLock,
    /// Ready state
    ready: RwLock<bool>,
}

impl AppState {
    /// Create state backed by the Gemini API
    pub fn new(config: ChatConfig) -> Result<Self> {
        let gemini = Arc::new(GeminiClient::new(&config.gemini)?);
        tracing::info!(
            "Gemini client initialized (embedding: {}, generation: {})",
            config.gemini.embed_model,
            config.gemini.generate_model
        );

        let has_api_key = gemini.has_api_key();
        let embedder: Arc<dyn EmbeddingProvider> = gemini.clone();
        let llm: Arc<dyn LlmProvider> = gemini;
        let state = Self::with_providers(config, embedder, llm)?;

        // Every Gemini call would fail without a key
        state.set_ready(has_api_key);
        Ok(state)
    }

    /// Create state with explicit providers
    pub fn with_providers(
        config: ChatConfig,
        embedding_provider: Arc<dyn EmbeddingProvider>,
        llm_provider: Arc<dyn LlmProvider>,
    ) -> Result<Self> {
        let index_lock = IndexLock::default();
        let pipeline = IngestPipeline::new(&config.chunking)?.with_index_lock(index_lock.clone());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                embedding_provider,
                llm_provider,
                pipeline,
                process_lock: Mutex::new(()),
                index_lock,
                ready: RwLock::new(true),
            }),
        })
    }

    /// Get configuration
    pub fn config(&self) -> &ChatConfig {
        &self.inner.config
    }

    /// Get embedding provider
    pub fn embedding_provider(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.inner.embedding_provider
    }

    /// Get LLM provider
    pub fn llm_provider(&self) -> &Arc<dyn LlmProvider> {
        &self.inner.llm_provider
    }

    /// Get ingest pipeline
    pub fn pipeline(&self) -> &IngestPipeline {
        &self.inner.pipeline
    }

    /// Lock serialising processing runs within this process
    pub fn process_lock(&self) -> &Mutex<()> {
        &self.inner.process_lock
    }

    /// Question-answering chain over the configured index
    pub fn qa_chain(&self) -> QaChain {
        QaChain::new(
            Arc::clone(&self.inner.embedding_provider),
            Arc::clone(&self.inner.llm_provider),
            self.inner.config.index.path.clone(),
            self.inner.config.retrieval.top_k,
        )
        .with_index_lock(self.inner.index_lock.clone())
    }

    /// Whether the server can serve processing and questions
    pub fn is_ready(&self) -> bool {
        *self.inner.ready.read()
    }

    /// Set ready state
    fn set_ready(&self, ready: bool) {
        *self.inner.ready.write() = ready;
    }
}
