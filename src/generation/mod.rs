//! Completion collaborator interface.

pub mod gemini;

use async_trait::async_trait;

use crate::types::QaError;

pub use gemini::GeminiCompletion;

/// A retrieved snippet presented to the model as grounding material for one
/// question.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContextDocument {
    pub text: String,
}

impl ContextDocument {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Opaque completion service: one answer per question given its context.
///
/// The answer-style instruction the service operates under is a
/// configuration constant (see [`crate::config::ANSWER_STYLE_INSTRUCTION`]);
/// the core consumes it, it does not define the model's behavior.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn generate(
        &self,
        question: &str,
        context: &[ContextDocument],
    ) -> Result<String, QaError>;
}
