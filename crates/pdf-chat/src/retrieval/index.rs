//! Flat vector index persisted as JSON
//!
//! Every chunk is compared against the query (exhaustive search), which is
//! what a flat FAISS index does and is plenty for a handful of PDFs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::DistanceMetric;
use crate::error::{Error, Result};

/// File name of the serialized index inside the index directory
pub const INDEX_FILE: &str = "index.json";

/// Guards the index directory: writers hold it across a save, readers
/// across a load, so a reader never lands between the two renames.
pub type IndexLock = Arc<RwLock<()>>;

/// One embedded chunk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    pub id: Uuid,
    pub content: String,
    pub embedding: Vec<f32>,
}

/// A retrieved chunk with its score
///
/// For [`DistanceMetric::L2`] the score is the squared distance (lower is
/// closer); for [`DistanceMetric::Cosine`] it is the similarity (higher is
/// closer).
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    pub id: Uuid,
    pub content: String,
    pub score: f32,
}

/// In-memory vector index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorIndex {
    /// Embedding model that produced the vectors
    pub model: String,
    dimensions: usize,
    metric: DistanceMetric,
    pub created_at: DateTime<Utc>,
    entries: Vec<IndexEntry>,
}

impl VectorIndex {
    /// Pair chunks with their embeddings
    pub fn from_embeddings(
        chunks: Vec<String>,
        embeddings: Vec<Vec<f32>>,
        model: impl Into<String>,
        metric: DistanceMetric,
    ) -> Result<Self> {
        if chunks.len() != embeddings.len() {
            return Err(Error::vector_index(format!(
                "{} chunks but {} embeddings",
                chunks.len(),
                embeddings.len()
            )));
        }

        let dimensions = embeddings.first().map(Vec::len).unwrap_or(0);
        if let Some(bad) = embeddings.iter().position(|e| e.len() != dimensions || e.is_empty()) {
            return Err(Error::vector_index(format!(
                "Embedding {} has {} dimensions, expected {}",
                bad,
                embeddings[bad].len(),
                dimensions
            )));
        }

        let entries = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(content, embedding)| IndexEntry {
                id: Uuid::new_v4(),
                content,
                embedding,
            })
            .collect();

        Ok(Self {
            model: model.into(),
            dimensions,
            metric,
            created_at: Utc::now(),
            entries,
        })
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Embedding dimensions (0 for an empty index)
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Persist to `dir`, replacing whatever was there
    pub fn save(&self, dir: &Path) -> Result<()> {
        let tmp_dir = sibling_temp_dir(dir, "tmp");
        fs::create_dir_all(&tmp_dir)?;

        let written = serde_json::to_vec(self)
            .map_err(Error::from)
            .and_then(|json| fs::write(tmp_dir.join(INDEX_FILE), json).map_err(Error::from));
        if let Err(e) = written {
            let _ = fs::remove_dir_all(&tmp_dir);
            return Err(e);
        }

        // Move the old index aside so it can be restored if the swap fails
        let backup = if dir.exists() {
            let backup = sibling_temp_dir(dir, "old");
            if let Err(e) = fs::rename(dir, &backup) {
                let _ = fs::remove_dir_all(&tmp_dir);
                return Err(e.into());
            }
            Some(backup)
        } else {
            None
        };

        if let Err(e) = fs::rename(&tmp_dir, dir) {
            if let Some(backup) = &backup {
                if let Err(restore) = fs::rename(backup, dir) {
                    tracing::error!(
                        "Failed to restore previous index from {}: {}",
                        backup.display(),
                        restore
                    );
                }
            }
            let _ = fs::remove_dir_all(&tmp_dir);
            return Err(e.into());
        }

        if let Some(backup) = backup {
            if let Err(e) = fs::remove_dir_all(&backup) {
                tracing::warn!("Failed to remove old index {}: {}", backup.display(), e);
            }
        }

        tracing::info!(
            "Saved vector index with {} entries to {}",
            self.entries.len(),
            dir.display()
        );
        Ok(())
    }

    /// Load the index persisted in `dir`
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(INDEX_FILE);
        if !path.is_file() {
            return Err(Error::IndexNotFound(dir.to_path_buf()));
        }

        let raw = fs::read(&path)?;
        let index: Self = serde_json::from_slice(&raw).map_err(|e| {
            Error::vector_index(format!("Corrupt index at {}: {}", path.display(), e))
        })?;

        if index.entries.iter().any(|e| e.embedding.len() != index.dimensions) {
            return Err(Error::vector_index(format!(
                "Corrupt index at {}: inconsistent dimensions",
                path.display()
            )));
        }

        tracing::debug!("Loaded vector index with {} entries", index.entries.len());
        Ok(index)
    }

    /// Return the `k` entries closest to `query`, best first
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredChunk>> {
        if self.entries.is_empty() || k == 0 {
            return Ok(Vec::new());
        }
        if query.len() != self.dimensions {
            return Err(Error::vector_index(format!(
                "Query has {} dimensions, index has {}",
                query.len(),
                self.dimensions
            )));
        }

        let mut scored: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let score = match self.metric {
                    DistanceMetric::L2 => squared_l2(query, &entry.embedding),
                    DistanceMetric::Cosine => cosine_similarity(query, &entry.embedding),
                };
                (i, score)
            })
            .collect();

        // Stable sort keeps insertion order on ties
        let metric = self.metric;
        scored.sort_by(|a, b| {
            let ord = a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal);
            match metric {
                DistanceMetric::L2 => ord,
                DistanceMetric::Cosine => ord.reverse(),
            }
        });

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(i, score)| {
                let entry = &self.entries[i];
                ScoredChunk {
                    id: entry.id,
                    content: entry.content.clone(),
                    score,
                }
            })
            .collect())
    }
}

fn sibling_temp_dir(dir: &Path, tag: &str) -> PathBuf {
    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "index".to_string());
    dir.with_file_name(format!(".{}.{}-{}", name, tag, Uuid::new_v4()))
}

/// Squared Euclidean distance
pub fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Cosine similarity; 0.0 when either vector is all zeros
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample(metric: DistanceMetric) -> VectorIndex {
        VectorIndex::from_embeddings(
            vec!["north".into(), "east".into(), "south".into()],
            vec![vec![0.0, 1.0], vec![1.0, 0.0], vec![0.0, -1.0]],
            "models/test",
            metric,
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_mismatched_input() {
        let err = VectorIndex::from_embeddings(
            vec!["a".into(), "b".into()],
            vec![vec![1.0]],
            "m",
            DistanceMetric::L2,
        )
        .unwrap_err();
        assert!(matches!(err, Error::VectorIndex(_)));

        let err = VectorIndex::from_embeddings(
            vec!["a".into(), "b".into()],
            vec![vec![1.0, 0.0], vec![1.0]],
            "m",
            DistanceMetric::L2,
        )
        .unwrap_err();
        assert!(matches!(err, Error::VectorIndex(_)));
    }

    #[test]
    fn test_l2_search_orders_nearest_first() {
        let index = sample(DistanceMetric::L2);
        let results = index.search(&[0.1, 0.9], 2).unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].content, "north");
        assert_eq!(results[1].content, "east");
        assert!(results[0].score < results[1].score);
    }

    #[test]
    fn test_cosine_search_orders_most_similar_first() {
        let index = sample(DistanceMetric::Cosine);
        let results = index.search(&[0.0, -5.0], 3).unwrap();

        assert_eq!(results[0].content, "south");
        assert!((results[0].score - 1.0).abs() < 1e-6);
        assert_eq!(results[2].content, "north");
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let index = VectorIndex::from_embeddings(
            vec!["first".into(), "second".into()],
            vec![vec![1.0, 0.0], vec![1.0, 0.0]],
            "m",
            DistanceMetric::L2,
        )
        .unwrap();
        let results = index.search(&[1.0, 0.0], 2).unwrap();
        assert_eq!(results[0].content, "first");
        assert_eq!(results[1].content, "second");
    }

    #[test]
    fn test_k_larger_than_index() {
        let index = sample(DistanceMetric::L2);
        assert_eq!(index.search(&[1.0, 1.0], 10).unwrap().len(), 3);
        assert!(index.search(&[1.0, 1.0], 0).unwrap().is_empty());
    }

    #[test]
    fn test_query_dimension_mismatch() {
        let index = sample(DistanceMetric::L2);
        assert!(matches!(index.search(&[1.0], 1), Err(Error::VectorIndex(_))));
    }

    #[test]
    fn test_save_and_load() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("faiss_index");

        let index = sample(DistanceMetric::Cosine);
        index.save(&dir).unwrap();
        assert!(dir.join(INDEX_FILE).is_file());

        let loaded = VectorIndex::load(&dir).unwrap();
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded.dimensions(), 2);
        assert_eq!(loaded.metric(), DistanceMetric::Cosine);
        assert_eq!(loaded.model, "models/test");
        assert_eq!(loaded.entries()[0].id, index.entries()[0].id);
    }

    #[test]
    fn test_save_replaces_previous_index() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("faiss_index");

        sample(DistanceMetric::L2).save(&dir).unwrap();
        fs::write(dir.join("stale.bin"), b"old").unwrap();

        let replacement = VectorIndex::from_embeddings(
            vec!["only".into()],
            vec![vec![0.5, 0.5, 0.5]],
            "m",
            DistanceMetric::L2,
        )
        .unwrap();
        replacement.save(&dir).unwrap();

        let loaded = VectorIndex::load(&dir).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.dimensions(), 3);
        assert!(!dir.join("stale.bin").exists());

        // No temp directories left behind
        let leftovers: Vec<_> = fs::read_dir(tmp.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[test]
    fn test_load_missing_index() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("nowhere");
        assert!(matches!(VectorIndex::load(&dir), Err(Error::IndexNotFound(p)) if p == dir));
    }

    #[test]
    fn test_load_corrupt_index() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(INDEX_FILE), b"{not json").unwrap();
        assert!(matches!(VectorIndex::load(tmp.path()), Err(Error::VectorIndex(_))));
    }

    #[test]
    fn test_similarity_helpers() {
        assert_eq!(squared_l2(&[1.0, 2.0], &[4.0, 6.0]), 25.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert!((cosine_similarity(&[1.0, 1.0], &[2.0, 2.0]) - 1.0).abs() < 1e-6);
    }
}
