//! Response types for the HTTP API

use serde::{Deserialize, Serialize};

use super::document::DocumentSummary;

/// Shown after a successful processing run
pub const PROCESS_COMPLETE_MESSAGE: &str = "Processing complete!";
/// Follow-up hint shown after a successful processing run
pub const PROCESS_NEXT_STEP_HINT: &str =
    "Now you can ask questions about the uploaded PDF(s) in the main chat area.";

/// Response from `POST /api/process`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessResponse {
    /// Whether the index was rebuilt
    pub success: bool,
    /// Status line for the UI
    pub message: String,
    /// Follow-up hint for the UI
    pub hint: String,
    /// Processed documents, in upload order
    pub documents: Vec<DocumentSummary>,
    /// Total characters extracted across all documents
    pub total_characters: usize,
    /// Chunks written to the index
    pub chunks_created: usize,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

/// Response from `POST /api/ask`
///
/// Exactly one of `answer` and `error` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    /// Model reply
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    /// User-facing error message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Number of chunks stuffed into the prompt
    pub chunks_retrieved: usize,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

impl AskResponse {
    /// Successful answer
    pub fn answered(answer: String, chunks_retrieved: usize, processing_time_ms: u64) -> Self {
        Self {
            answer: Some(answer),
            error: None,
            chunks_retrieved,
            processing_time_ms,
        }
    }

    /// Failed answer, with the raw cause folded into the generic message
    pub fn failed(cause: &impl std::fmt::Display, processing_time_ms: u64) -> Self {
        Self {
            answer: None,
            error: Some(question_error_message(cause)),
            chunks_retrieved: 0,
            processing_time_ms,
        }
    }
}

/// The single user-facing message for any failure while answering
pub fn question_error_message(cause: &impl std::fmt::Display) -> String {
    format!(
        "Error processing question: {}. Make sure a PDF has been processed and a vector store created.",
        cause
    )
}
