//! pdf-chat: upload PDFs, index their text and ask questions about them
//!
//! Text is extracted page by page, split into overlapping character
//! windows, embedded with Gemini and stored in a local flat vector index.
//! Questions are answered by stuffing the nearest chunks into a fixed
//! prompt for the Gemini generation model.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod types;

pub use config::ChatConfig;
pub use error::{Error, Result};
pub use server::{state::AppState, ChatServer};
pub use types::{AskRequest, AskResponse, ProcessResponse, UploadedPdf};
