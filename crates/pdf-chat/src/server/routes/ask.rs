//! Question endpoint

use axum::{extract::State, Json};
use std::time::Instant;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{AskRequest, AskResponse};

/// POST /api/ask - Answer a question from the processed PDFs
///
/// Any failure while answering is reported in the body of a 200 response,
/// so the UI can show it next to the question.
pub async fn ask_question(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>> {
    let start = Instant::now();

    let question = request
        .normalized()
        .ok_or_else(|| Error::InvalidRequest("Question must not be empty".to_string()))?;

    tracing::info!("Question: {}", question);

    let response = match state.qa_chain().answer(question).await {
        Ok(answer) => AskResponse::answered(
            answer.text,
            answer.chunks_retrieved,
            start.elapsed().as_millis() as u64,
        ),
        Err(e) => {
            tracing::warn!("Failed to answer question: {}", e);
            AskResponse::failed(&e, start.elapsed().as_millis() as u64)
        }
    };

    Ok(Json(response))
}
