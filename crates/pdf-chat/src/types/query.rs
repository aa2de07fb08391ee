//! Question request types

use serde::{Deserialize, Serialize};

/// Question submitted from the chat input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    /// The question to answer
    pub question: String,
}

impl AskRequest {
    /// Trimmed question, or `None` when there is nothing to ask
    pub fn normalized(&self) -> Option<&str> {
        let q = self.question.trim();
        (!q.is_empty()).then_some(q)
    }
}
