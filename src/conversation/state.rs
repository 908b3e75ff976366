use crate::model::ChatMessage;

/// Messages on screen for the current chat plus the in-flight flag.
#[derive(Debug, Clone, Default)]
pub struct ChatState {
    pub messages: Vec<ChatMessage>,
    pub is_loading: bool,
}

/// A change to [`ChatState`], reported to whoever renders the chat.
#[derive(Debug, Clone, Copy)]
pub enum ChatEvent<'a> {
    MessageAdded(&'a ChatMessage),
    MessageUpdated(&'a ChatMessage),
}

impl ChatState {
    pub const fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            is_loading: false,
        }
    }

    pub fn add_message(&mut self, message: ChatMessage) -> &ChatMessage {
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    /// Replaces the message with the same id in place. Returns `None` if no
    /// message has that id.
    pub fn update_message(&mut self, id: &str, message: ChatMessage) -> Option<&ChatMessage> {
        let slot = self.messages.iter_mut().find(|m| m.id == id)?;
        *slot = message;
        Some(slot)
    }
}
