//! PDF ingestion: text extraction, chunking and index building

mod chunker;
mod parser;
mod processor;

#[cfg(test)]
pub(crate) mod test_pdf;

pub use chunker::{RecursiveCharacterSplitter, DEFAULT_SEPARATORS};
pub use parser::{cleanup_pdf_text, hash_bytes, ParsedPdf, PdfTextExtractor};
pub use processor::{IngestPipeline, ProcessSummary};
