//! Answer generation: prompt template and question-answering chain

pub mod chain;
pub mod prompt;

pub use chain::{Answer, QaChain};
pub use prompt::{PromptBuilder, FALLBACK_ANSWER, PROMPT_TEMPLATE};
