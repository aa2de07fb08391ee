//! API routes for the chat server

pub mod ask;
pub mod process;
pub mod ui;

use axum::{
    extract::{DefaultBodyLimit, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // Processing - with larger body limit for file uploads
        .route(
            "/process",
            post(process::process_pdfs).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route("/ask", post(ask::ask_question))
        .route("/info", get(info))
}

/// API info endpoint
async fn info(State(state): State<AppState>) -> Json<Value> {
    let config = state.config();
    Json(json!({
        "name": "pdf-chat",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Chat with PDF documents using Gemini",
        "endpoints": {
            "GET /": "Web UI",
            "POST /api/process": "Upload PDFs (multipart) and rebuild the vector index",
            "POST /api/ask": "Ask a question about the processed PDFs",
            "GET /health": "Liveness check",
            "GET /ready": "Readiness check"
        },
        "models": {
            "embedding": state.embedding_provider().model(),
            "generation": state.llm_provider().model()
        },
        "chunking": {
            "chunk_size": config.chunking.chunk_size,
            "chunk_overlap": config.chunking.chunk_overlap
        },
        "retrieval": {
            "top_k": config.retrieval.top_k,
            "metric": config.index.metric
        }
    }))
}
