//! Uploaded document types

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// A PDF received from the upload form
///
/// Owned by the request that carried it; nothing here outlives a
/// processing run except the chunks written to the index.
#[derive(Debug, Clone)]
pub struct UploadedPdf {
    /// Original filename as sent by the browser
    pub filename: String,
    /// Raw file bytes
    pub data: Bytes,
}

impl UploadedPdf {
    /// Create a new upload
    pub fn new(filename: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            data: data.into(),
        }
    }

    /// Whether the filename carries a `.pdf` extension
    pub fn has_pdf_extension(&self) -> bool {
        has_pdf_extension(&self.filename)
    }

    /// File size in bytes
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Check a filename for a `.pdf` extension (case-insensitive)
pub fn has_pdf_extension(filename: &str) -> bool {
    std::path::Path::new(filename)
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Summary of one processed PDF
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentSummary {
    /// Filename
    pub filename: String,
    /// Number of pages found; 0 when the page count is unknown
    pub total_pages: u32,
    /// Characters of text extracted
    pub characters: usize,
    /// File size in bytes
    pub file_size: u64,
    /// SHA-256 of the raw upload, hex encoded
    pub sha256: String,
}
