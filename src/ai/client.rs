use async_trait::async_trait;
use futures_util::{Stream, StreamExt};
use reqwest::Client;
use serde::Serialize;
use std::borrow::Cow;
use std::pin::Pin;

use super::AiBackend;
use super::prompt::{build_persona_prompt, build_translation_prompt};
use super::sse_parser::sse_to_text_stream;
use crate::error::AiError;
use crate::model::{ChatMessage, Scenario, Sender, TRANSLATION_PLACEHOLDER};

pub type TextStream = Pin<Box<dyn Stream<Item = Result<String, AiError>> + Send>>;

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: Cow<'a, str>,
}

/// Client for an OpenAI-compatible `/v1/chat/completions` endpoint.
pub struct OpenAiClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl OpenAiClient {
    /// Creates a client for one endpoint and model.
    ///
    /// # Arguments
    ///
    /// * `endpoint` - Base URL; `/v1/chat/completions` is appended
    /// * `model` - Model name sent with every request
    /// * `api_key` - Sent as a bearer token when present
    pub fn new(endpoint: String, model: String, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            model,
            api_key,
        }
    }

    /// Starts a streaming completion.
    ///
    /// # Returns
    ///
    /// The reply as a stream of text chunks, or an error when the endpoint
    /// cannot be reached or answers with a non-2xx status.
    async fn stream_completion(&self, messages: Vec<Message<'_>>) -> Result<TextStream, AiError> {
        let url = format!(
            "{}/v1/chat/completions",
            self.endpoint.trim_end_matches('/')
        );

        let chat_request = ChatCompletionRequest {
            model: &self.model,
            messages,
            stream: true,
        };

        let mut http_request = self.client.post(&url).json(&chat_request);

        if let Some(api_key) = &self.api_key {
            http_request = http_request.bearer_auth(api_key);
        }

        tracing::debug!(%url, model = %self.model, "requesting chat completion");

        let response = http_request
            .send()
            .await
            .map_err(|source| AiError::Connect {
                url: url.clone(),
                source,
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::HttpStatus { status, body });
        }

        Ok(Box::pin(sse_to_text_stream(response.bytes_stream())))
    }

    /// Collects a streamed completion into one trimmed reply.
    async fn complete(&self, messages: Vec<Message<'_>>) -> Result<String, AiError> {
        let mut stream = self.stream_completion(messages).await?;
        let mut full_response = String::new();

        while let Some(chunk) = stream.next().await {
            full_response.push_str(&chunk?);
        }

        let trimmed = full_response.trim();
        if trimmed.is_empty() {
            return Err(AiError::EmptyResponse);
        }
        Ok(trimmed.to_string())
    }
}

#[async_trait]
impl AiBackend for OpenAiClient {
    async fn translate_text(&self, text: &str, target_language: &str) -> Result<String, AiError> {
        let messages = vec![
            Message {
                role: "system",
                content: Cow::Owned(build_translation_prompt(target_language)),
            },
            Message {
                role: "user",
                content: Cow::Borrowed(text),
            },
        ];
        self.complete(messages).await
    }

    async fn generate_chat_completion(
        &self,
        history: &[ChatMessage],
        scenario: &Scenario,
        target_language: &str,
    ) -> Result<String, AiError> {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(Message {
            role: "system",
            content: Cow::Owned(build_persona_prompt(scenario, target_language)),
        });
        messages.extend(history_messages(history));
        self.complete(messages).await
    }
}

/// Maps chat history to completion messages in the target language.
///
/// User messages still waiting for a translation (left behind by a failed
/// turn) are skipped.
fn history_messages(history: &[ChatMessage]) -> impl Iterator<Item = Message<'_>> {
    history
        .iter()
        .filter(|m| m.target_text() != TRANSLATION_PLACEHOLDER)
        .map(|m| Message {
            role: match m.sender {
                Sender::User => "user",
                Sender::Assistant => "assistant",
            },
            content: Cow::Borrowed(m.target_text()),
        })
}
