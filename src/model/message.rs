use serde::{Deserialize, Serialize};

/// Placeholder shown until a user message has been translated.
pub const TRANSLATION_PLACEHOLDER: &str = "Translating...";

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

/// Both renditions of a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageContent {
    pub original: String,
    pub translated: String,
}

/// One message of a roleplay conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub content: MessageContent,
    pub sender: Sender,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub is_edited: bool,
}

impl ChatMessage {
    pub fn new(sender: Sender, original: String, translated: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            content: MessageContent {
                original,
                translated,
            },
            sender,
            timestamp: now_millis(),
            is_edited: false,
        }
    }

    /// A user message whose translation has not arrived yet.
    pub fn pending_user(original: String) -> Self {
        Self::new(Sender::User, original, TRANSLATION_PLACEHOLDER.to_string())
    }

    /// Returns a copy with the translated text filled in. Identity and
    /// timestamp are kept.
    #[must_use]
    pub fn with_translation(&self, translated: String) -> Self {
        Self {
            content: MessageContent {
                original: self.content.original.clone(),
                translated,
            },
            ..self.clone()
        }
    }

    /// The text written in the language being learned.
    ///
    /// User messages are typed in the source language and translated into
    /// the target; assistant replies are produced in the target language.
    pub fn target_text(&self) -> &str {
        match self.sender {
            Sender::User => &self.content.translated,
            Sender::Assistant => &self.content.original,
        }
    }
}

pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
