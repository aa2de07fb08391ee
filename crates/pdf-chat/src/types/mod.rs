//! Core types for pdf-chat

pub mod document;
pub mod query;
pub mod response;

pub use document::{DocumentSummary, UploadedPdf};
pub use query::AskRequest;
pub use response::{AskResponse, ProcessResponse};
