//! PDF text extraction

use sha2::{Digest, Sha256};

use crate::error::{Error, Result};
use crate::types::{DocumentSummary, UploadedPdf};

/// Glyphs that PDF fonts commonly emit in place of plain ASCII
const GLYPH_REPLACEMENTS: &[(char, &str)] = &[
    ('\u{00A0}', " "),   // Non-breaking space
    ('\u{2002}', " "),   // En space
    ('\u{2003}', " "),   // Em space
    ('\u{2009}', " "),   // Thin space
    ('\u{2010}', "-"),   // Hyphen
    ('\u{2011}', "-"),   // Non-breaking hyphen
    ('\u{FB00}', "ff"),
    ('\u{FB01}', "fi"),
    ('\u{FB02}', "fl"),
    ('\u{FB03}', "ffi"),
    ('\u{FB04}', "ffl"),
];

/// Normalize extracted PDF text: drop NULs and flatten ligature/space glyphs
pub fn cleanup_pdf_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch == '\0' {
            continue;
        }
        match GLYPH_REPLACEMENTS.iter().find(|(glyph, _)| *glyph == ch) {
            Some((_, replacement)) => out.push_str(replacement),
            None => out.push(ch),
        }
    }
    out
}

/// Page count reported when only the whole-document fallback could read a file
pub const UNKNOWN_PAGE_COUNT: u32 = 0;

/// Text extracted from one PDF
#[derive(Debug, Clone)]
pub struct ParsedPdf {
    /// Original filename
    pub filename: String,
    /// Number of pages in the document, or [`UNKNOWN_PAGE_COUNT`]
    pub total_pages: u32,
    /// Concatenated page text
    pub content: String,
    /// SHA-256 of the raw bytes
    pub content_hash: String,
    /// Raw file size
    pub file_size: u64,
}

impl ParsedPdf {
    /// Summary for API responses
    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary {
            filename: self.filename.clone(),
            total_pages: self.total_pages,
            characters: self.content.chars().count(),
            file_size: self.file_size,
            sha256: self.content_hash.clone(),
        }
    }
}

/// PDF text extractor
///
/// Pages are read one at a time with lopdf. A page that fails to decode
/// contributes nothing; only a document that cannot be opened at all is an
/// error, after a whole-document attempt with pdf-extract.
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    /// Extract the text of every page of one upload, in page order
    pub fn extract(pdf: &UploadedPdf) -> Result<ParsedPdf> {
        let (content, total_pages) = match lopdf::Document::load_mem(&pdf.data) {
            Ok(doc) => Self::extract_pages(&pdf.filename, &doc),
            Err(e) => {
                tracing::warn!(
                    "lopdf could not open '{}': {}, trying pdf-extract",
                    pdf.filename,
                    e
                );
                Self::extract_whole_document(pdf).map_err(|e2| {
                    Error::file_parse(
                        &pdf.filename,
                        format!("Failed to load PDF: {} / {}", e, e2),
                    )
                })?
            }
        };

        Ok(ParsedPdf {
            filename: pdf.filename.clone(),
            total_pages,
            content: cleanup_pdf_text(&content),
            content_hash: hash_bytes(&pdf.data),
            file_size: pdf.size(),
        })
    }

    /// Extract every upload and concatenate their text in upload order
    pub fn extract_all(pdfs: &[UploadedPdf]) -> Result<(String, Vec<ParsedPdf>)> {
        let mut text = String::new();
        let mut parsed = Vec::with_capacity(pdfs.len());

        for pdf in pdfs {
            let doc = Self::extract(pdf)?;
            tracing::info!(
                "Extracted {} pages ({} bytes of text) from {}",
                doc.total_pages,
                doc.content.len(),
                doc.filename
            );
            text.push_str(&doc.content);
            parsed.push(doc);
        }

        Ok((text, parsed))
    }

    /// Whole-document extraction; page boundaries are not reported
    fn extract_whole_document(
        pdf: &UploadedPdf,
    ) -> std::result::Result<(String, u32), pdf_extract::OutputError> {
        let text = pdf_extract::extract_text_from_mem(&pdf.data)?;
        Ok((text, UNKNOWN_PAGE_COUNT))
    }

    fn extract_pages(filename: &str, doc: &lopdf::Document) -> (String, u32) {
        let pages = doc.get_pages();
        let mut text = String::new();

        for page_num in pages.keys() {
            match doc.extract_text(&[*page_num]) {
                Ok(page_text) => text.push_str(&page_text),
                Err(e) => {
                    tracing::debug!("No text from page {} of {}: {}", page_num, filename, e);
                }
            }
        }

        (text, pages.len() as u32)
    }
}

/// Hex-encoded SHA-256
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
