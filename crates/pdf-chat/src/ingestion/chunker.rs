//! Recursive character text splitting with overlap
//!
//! Text is cut on the coarsest separator that occurs in it (paragraphs,
//! then lines, then words, then single characters). Pieces that fit are
//! merged greedily into chunks of at most `chunk_size` characters; pieces
//! that don't fit are split again with the next separator. When a chunk is
//! emitted, its trailing pieces (up to `chunk_overlap` characters) are
//! carried over as the start of the next one.

use std::collections::VecDeque;

use crate::config::ChunkingConfig;
use crate::error::{Error, Result};

/// Default separators, coarsest first
pub const DEFAULT_SEPARATORS: &[&str] = &["\n\n", "\n", " ", ""];

/// Character-window splitter
#[derive(Debug, Clone)]
pub struct RecursiveCharacterSplitter {
    /// Maximum chunk size in characters
    chunk_size: usize,
    /// Overlap carried into the next chunk, in characters
    chunk_overlap: usize,
    /// Separators, coarsest first
    separators: Vec<String>,
}

impl RecursiveCharacterSplitter {
    /// Create a splitter with the default separators
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::Config("chunk_size must be greater than 0".to_string()));
        }
        if chunk_overlap > chunk_size {
            return Err(Error::Config(format!(
                "chunk_overlap ({}) is larger than chunk_size ({})",
                chunk_overlap, chunk_size
            )));
        }

        Ok(Self {
            chunk_size,
            chunk_overlap,
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
        })
    }

    /// Create from chunking configuration
    pub fn from_config(config: &ChunkingConfig) -> Result<Self> {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    /// Replace the separator list
    pub fn with_separators<I, S>(mut self, separators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.separators = separators.into_iter().map(Into::into).collect();
        self
    }

    /// Maximum chunk size in characters
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Overlap in characters
    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Split text into ordered, overlapping chunks
    pub fn split_text(&self, text: &str) -> Vec<String> {
        let separators: Vec<&str> = self.separators.iter().map(String::as_str).collect();
        self.split_recursive(text, &separators)
    }

    fn split_recursive(&self, text: &str, separators: &[&str]) -> Vec<String> {
        let mut chunks = Vec::new();

        // First separator present in the text; the empty separator always matches
        let mut separator = separators.last().copied().unwrap_or("");
        let mut finer: &[&str] = &[];
        for (i, sep) in separators.iter().enumerate() {
            if sep.is_empty() {
                separator = sep;
                break;
            }
            if text.contains(sep) {
                separator = sep;
                finer = &separators[i + 1..];
                break;
            }
        }

        let mut fitting: Vec<&str> = Vec::new();
        for piece in split_keeping_separator(text, separator) {
            if char_len(piece) < self.chunk_size {
                fitting.push(piece);
                continue;
            }

            if !fitting.is_empty() {
                chunks.extend(self.merge_splits(&fitting));
                fitting.clear();
            }

            if finer.is_empty() {
                let trimmed = piece.trim();
                if !trimmed.is_empty() {
                    chunks.push(trimmed.to_string());
                }
            } else {
                chunks.extend(self.split_recursive(piece, finer));
            }
        }

        if !fitting.is_empty() {
            chunks.extend(self.merge_splits(&fitting));
        }

        chunks
    }

    /// Greedily merge small pieces into chunks, carrying the overlap forward
    fn merge_splits(&self, splits: &[&str]) -> Vec<String> {
        let mut docs = Vec::new();
        let mut current: VecDeque<(&str, usize)> = VecDeque::new();
        let mut total = 0usize;

        for &split in splits {
            let len = char_len(split);

            if total + len > self.chunk_size && !current.is_empty() {
                if total > self.chunk_size {
                    tracing::warn!(
                        "Created a chunk of size {}, which is longer than the specified {}",
                        total,
                        self.chunk_size
                    );
                }

                if let Some(doc) = join_pieces(&current) {
                    docs.push(doc);
                }

                // Keep at most `chunk_overlap` characters, and make room for the next piece
                while total > self.chunk_overlap || (total + len > self.chunk_size && total > 0) {
                    match current.pop_front() {
                        Some((_, dropped)) => total -= dropped,
                        None => break,
                    }
                }
            }

            current.push_back((split, len));
            total += len;
        }

        if let Some(doc) = join_pieces(&current) {
            docs.push(doc);
        }

        docs
    }
}

/// Length in Unicode scalar values
fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Concatenate pieces and trim; `None` when only whitespace remains
fn join_pieces(pieces: &VecDeque<(&str, usize)>) -> Option<String> {
    let joined: String = pieces.iter().map(|(piece, _)| *piece).collect();
    let trimmed = joined.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Split on `separator`, attaching each separator to the start of the piece
/// that follows it. An empty separator yields single characters. Empty
/// pieces are dropped.
fn split_keeping_separator<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    if separator.is_empty() {
        return text
            .char_indices()
            .map(|(i, ch)| &text[i..i + ch.len_utf8()])
            .collect();
    }

    let mut pieces = Vec::new();
    let mut start = 0;
    for (idx, _) in text.match_indices(separator) {
        if idx > start {
            pieces.push(&text[start..idx]);
        }
        start = idx;
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Longest prefix of `next` (at most `max` chars) that is also a suffix of `prev`
    fn shared_overlap(prev: &str, next: &str, max: usize) -> usize {
        let next_chars: Vec<char> = next.chars().collect();
        (1..=max.min(next_chars.len()))
            .rev()
            .find(|&k| {
                let prefix: String = next_chars[..k].iter().collect();
                prev.ends_with(&prefix)
            })
            .unwrap_or(0)
    }

    #[test]
    fn test_rejects_bad_parameters() {
        assert!(RecursiveCharacterSplitter::new(0, 0).is_err());
        assert!(RecursiveCharacterSplitter::new(10, 11).is_err());
        assert!(RecursiveCharacterSplitter::new(10, 10).is_ok());
    }

    #[test]
    fn test_empty_and_whitespace_text() {
        let splitter = RecursiveCharacterSplitter::new(100, 10).unwrap();
        assert!(splitter.split_text("").is_empty());
        assert!(splitter.split_text(" \n\n \n ").is_empty());
    }

    #[test]
    fn test_short_text_is_single_chunk() {
        let splitter = RecursiveCharacterSplitter::new(100, 10).unwrap();
        let chunks = splitter.split_text("  A short document.\n\nWith two paragraphs.  ");
        assert_eq!(chunks, vec!["A short document.\n\nWith two paragraphs."]);
    }

    #[test]
    fn test_character_windows_overlap_exactly() {
        let splitter = RecursiveCharacterSplitter::new(10, 3).unwrap();
        let chunks = splitter.split_text("abcdefghijklmnopqrstuvwxy");

        assert_eq!(chunks, vec!["abcdefghij", "hijklmnopq", "opqrstuvwx", "vwxy"]);
        for pair in chunks.windows(2) {
            let tail: String = pair[0].chars().rev().take(3).collect::<Vec<_>>().into_iter().rev().collect();
            assert!(pair[1].starts_with(&tail));
        }
    }

    #[test]
    fn test_paragraph_chunks_respect_size_and_overlap() {
        let paragraphs: Vec<String> = (0..20)
            .map(|i| format!("Paragraph {:02} talks about topic {:02}.", i, i))
            .collect();
        let text = paragraphs.join("\n\n");

        let splitter = RecursiveCharacterSplitter::new(120, 50).unwrap();
        let chunks = splitter.split_text(&text);

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 120, "chunk too long: {}", chunk.len());
        }
        for pair in chunks.windows(2) {
            assert!(shared_overlap(&pair[0], &pair[1], 50) > 0);
        }

        // Order is preserved: first and last paragraphs land in first and last chunks
        assert!(chunks.first().unwrap().starts_with("Paragraph 00"));
        assert!(chunks.last().unwrap().ends_with("topic 19."));
    }

    #[test]
    fn test_long_paragraph_falls_back_to_words() {
        let text = vec!["word"; 200].join(" ");
        let splitter = RecursiveCharacterSplitter::new(50, 10).unwrap();
        let chunks = splitter.split_text(&text);

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 50);
            assert!(chunk.split(' ').all(|w| w == "word"));
        }
    }

    #[test]
    fn test_lengths_are_counted_in_characters() {
        let text = "é".repeat(25);
        let splitter = RecursiveCharacterSplitter::new(10, 3).unwrap();
        let chunks = splitter.split_text(&text);

        assert_eq!(chunks.len(), 4);
        assert!(chunks[..3].iter().all(|c| c.chars().count() == 10));
    }

    #[test]
    fn test_default_configuration_matches_chunking_defaults() {
        let splitter = RecursiveCharacterSplitter::from_config(&ChunkingConfig::default()).unwrap();
        assert_eq!(splitter.chunk_size(), 10_000);
        assert_eq!(splitter.chunk_overlap(), 1_000);

        let text = "lorem ipsum dolor sit amet ".repeat(1_000);
        let chunks = splitter.split_text(&text);
        assert!(chunks.len() >= 3);
        assert!(chunks.iter().all(|c| c.chars().count() <= 10_000));
    }

    #[test]
    fn test_split_keeping_separator() {
        assert_eq!(
            split_keeping_separator("a\n\nb\n\nc", "\n\n"),
            vec!["a", "\n\nb", "\n\nc"]
        );
        assert_eq!(split_keeping_separator("\n\nlead", "\n\n"), vec!["\n\nlead"]);
        assert_eq!(split_keeping_separator("héllo", ""), vec!["h", "é", "l", "l", "o"]);
    }

    #[test]
    fn test_custom_separators() {
        let splitter = RecursiveCharacterSplitter::new(12, 0)
            .unwrap()
            .with_separators(["|", ""]);
        let chunks = splitter.split_text("one|two|three|four");
        assert_eq!(chunks, vec!["one|two", "|three|four"]);
    }
}
