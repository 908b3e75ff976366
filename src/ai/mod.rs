//! Chat completion and translation against OpenAI-compatible APIs.

mod client;
mod prompt;
mod sse_parser;

use async_trait::async_trait;

use crate::error::AiError;
use crate::model::{ChatMessage, Scenario};

pub use client::{OpenAiClient, TextStream};
pub use prompt::{build_persona_prompt, build_translation_prompt};

/// The two AI operations a conversation turn needs.
#[async_trait]
pub trait AiBackend: Send + Sync {
    /// Translates `text` into the language named `target_language`.
    async fn translate_text(&self, text: &str, target_language: &str) -> Result<String, AiError>;

    /// Produces the persona's next reply given the conversation so far.
    async fn generate_chat_completion(
        &self,
        history: &[ChatMessage],
        scenario: &Scenario,
        target_language: &str,
    ) -> Result<String, AiError>;
}
