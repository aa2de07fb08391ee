//! Ingest pipeline: extract → split → embed → persist

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{ChunkingConfig, DistanceMetric};
use crate::error::{Error, Result};
use crate::providers::EmbeddingProvider;
use crate::retrieval::{IndexLock, VectorIndex};
use crate::types::{DocumentSummary, UploadedPdf};

use super::chunker::RecursiveCharacterSplitter;
use super::parser::PdfTextExtractor;

/// Outcome of one processing run
#[derive(Debug, Clone)]
pub struct ProcessSummary {
    /// Processed files, in upload order
    pub files: Vec<DocumentSummary>,
    /// Characters of text extracted across all files
    pub total_characters: usize,
    /// Chunks embedded and written to the index
    pub chunks_created: usize,
    /// Where the index was written
    pub index_path: PathBuf,
}

/// Turns uploaded PDFs into a persisted vector index
pub struct IngestPipeline {
    splitter: RecursiveCharacterSplitter,
    index_lock: IndexLock,
}

impl IngestPipeline {
    /// Create a pipeline with the given chunking parameters
    pub fn new(config: &ChunkingConfig) -> Result<Self> {
        Ok(Self {
            splitter: RecursiveCharacterSplitter::from_config(config)?,
            index_lock: IndexLock::default(),
        })
    }

    /// Share the index lock with readers of the same index directory
    pub fn with_index_lock(mut self, index_lock: IndexLock) -> Self {
        self.index_lock = index_lock;
        self
    }

    /// Process uploads and replace the index at `index_path`
    pub async fn process(
        &self,
        pdfs: Vec<UploadedPdf>,
        embedder: Arc<dyn EmbeddingProvider>,
        index_path: &Path,
        metric: DistanceMetric,
    ) -> Result<ProcessSummary> {
        if pdfs.is_empty() {
            return Err(Error::NoDocuments);
        }

        tracing::info!("Processing {} PDF(s)", pdfs.len());

        let (text, parsed) =
            tokio::task::spawn_blocking(move || PdfTextExtractor::extract_all(&pdfs)).await??;

        if text.trim().is_empty() {
            return Err(Error::EmptyText);
        }

        let files: Vec<DocumentSummary> = parsed.iter().map(|p| p.summary()).collect();
        let total_characters = text.chars().count();

        let chunks = self.splitter.split_text(&text);
        tracing::info!(
            "Split {} characters into {} chunks (size {}, overlap {})",
            total_characters,
            chunks.len(),
            self.splitter.chunk_size(),
            self.splitter.chunk_overlap()
        );

        let embeddings = embedder.embed_documents(&chunks).await?;
        tracing::info!(
            "Embedded {} chunks with {} ({})",
            embeddings.len(),
            embedder.name(),
            embedder.model()
        );

        let index = VectorIndex::from_embeddings(chunks, embeddings, embedder.model(), metric)?;
        let chunks_created = index.len();

        let dir = index_path.to_path_buf();
        {
            let _write = self.index_lock.write().await;
            tokio::task::spawn_blocking(move || index.save(&dir)).await??;
        }

        Ok(ProcessSummary {
            files,
            total_characters,
            chunks_created,
            index_path: index_path.to_path_buf(),
        })
    }
}
