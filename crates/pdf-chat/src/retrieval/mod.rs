//! Vector index and nearest-neighbour retrieval

pub mod index;

pub use index::{IndexEntry, IndexLock, ScoredChunk, VectorIndex};
