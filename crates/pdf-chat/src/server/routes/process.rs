//! PDF processing endpoint

use axum::{
    extract::{Multipart, State},
    Json,
};
use std::time::Instant;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{
    response::{PROCESS_COMPLETE_MESSAGE, PROCESS_NEXT_STEP_HINT},
    ProcessResponse, UploadedPdf,
};

/// POST /api/process - Upload PDFs and rebuild the vector index
pub async fn process_pdfs(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ProcessResponse>> {
    let start = Instant::now();
    let mut pdfs = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        Error::InvalidRequest(format!("Failed to read multipart field: {}", e))
    })? {
        // Only file parts count as uploads
        let Some(filename) = field.file_name().map(|s| s.to_string()) else {
            continue;
        };

        let data = field.bytes().await.map_err(|e| {
            Error::InvalidRequest(format!("Failed to read file '{}': {}", filename, e))
        })?;

        // An empty file input still submits one nameless, empty part
        if filename.is_empty() && data.is_empty() {
            continue;
        }

        let pdf = UploadedPdf::new(filename, data);
        if !pdf.has_pdf_extension() {
            return Err(Error::UnsupportedFileType(pdf.filename));
        }

        tracing::info!("Received file: {} ({} bytes)", pdf.filename, pdf.size());
        pdfs.push(pdf);
    }

    if pdfs.is_empty() {
        return Err(Error::NoDocuments);
    }

    let _guard = state.process_lock().lock().await;

    let config = state.config();
    let summary = state
        .pipeline()
        .process(
            pdfs,
            state.embedding_provider().clone(),
            &config.index.path,
            config.index.metric,
        )
        .await?;

    let processing_time_ms = start.elapsed().as_millis() as u64;
    tracing::info!(
        "Indexed {} file(s) into {} chunks at {} in {}ms",
        summary.files.len(),
        summary.chunks_created,
        summary.index_path.display(),
        processing_time_ms
    );

    Ok(Json(ProcessResponse {
        success: true,
        message: PROCESS_COMPLETE_MESSAGE.to_string(),
        hint: PROCESS_NEXT_STEP_HINT.to_string(),
        documents: summary.files,
        total_characters: summary.total_characters,
        chunks_created: summary.chunks_created,
        processing_time_ms,
    }))
}
