//! Prompt construction for question answering

use crate::retrieval::ScoredChunk;

/// Reply the model is told to give when the context lacks the answer
pub const FALLBACK_ANSWER: &str = "Answer is not available in the context.";

/// Question-answering template; `{context}` and `{question}` are filled in
pub const PROMPT_TEMPLATE: &str = "\
Answer the question as detailed as possible from the provided context.
If the answer is not in the context, just say \"Answer is not available in the context.\"
Do not make up any answer.

Context:
{context}

Question:
{question}

Answer:
";

/// Prompt builder for retrieved chunks
pub struct PromptBuilder;

impl PromptBuilder {
    /// Stuff retrieved chunks into one context block, separated by blank lines
    pub fn build_context(chunks: &[ScoredChunk]) -> String {
        chunks
            .iter()
            .map(|c| c.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Fill the template
    pub fn build_prompt(question: &str, context: &str) -> String {
        // Single pass so braces inside the context are left alone
        let (head, rest) = PROMPT_TEMPLATE
            .split_once("{context}")
            .unwrap_or((PROMPT_TEMPLATE, ""));
        format!("{}{}{}", head, context, rest.replacen("{question}", question, 1))
    }
}
