use thiserror::Error;

use super::state::{ChatEvent, ChatState};
use crate::ai::AiBackend;
use crate::error::{AiError, StoreError};
use crate::model::{ChatMessage, Language, Scenario, Sender, Session};
use crate::store::SessionStore;

/// Alert shown to the user when any step of a turn fails.
pub const SEND_FAILED_ALERT: &str = "Failed to send message. Please try again.";

/// What a turn needs to know about the chat it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct TurnContext<'a> {
    pub scenario: Option<&'a Scenario>,
    /// The language being practiced.
    pub session_language: Option<&'a Language>,
    /// The language assistant replies are translated back into.
    pub native_language: &'a Language,
    /// Set once the chat has ended.
    pub disabled: bool,
}

/// Why a turn returned without doing anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    EmptyInput,
    Busy,
    NoScenario,
    NoLanguage,
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    Skipped(SkipReason),
    Completed {
        user: ChatMessage,
        assistant: ChatMessage,
    },
}

#[derive(Debug, Error)]
pub enum TurnError {
    #[error("translation failed: {0}")]
    Translate(#[source] AiError),
    #[error("reply generation failed: {0}")]
    Reply(#[source] AiError),
    #[error("failed to save session: {0}")]
    Store(#[from] StoreError),
}

impl TurnError {
    /// The message shown to the user. Details only go to the log.
    pub const fn alert(&self) -> &'static str {
        SEND_FAILED_ALERT
    }
}

/// Runs one conversation turn: translate the user's text, get the persona's
/// reply, translate the reply back, then persist the session.
pub struct TurnPipeline<'a, A: ?Sized, S: ?Sized> {
    ai: &'a A,
    store: &'a S,
}

impl<'a, A, S> TurnPipeline<'a, A, S>
where
    A: AiBackend + ?Sized,
    S: SessionStore + ?Sized,
{
    pub const fn new(ai: &'a A, store: &'a S) -> Self {
        Self { ai, store }
    }

    /// Sends `input` as the user's next message.
    ///
    /// Returns `Skipped` without any remote call when the input is blank, a
    /// turn is already in flight, or the chat has no scenario, no language or
    /// has ended. On failure the echoed user message stays in `state`; nothing
    /// is rolled back or retried.
    pub async fn send(
        &self,
        input: &str,
        state: &mut ChatState,
        current_session: &mut Option<Session>,
        ctx: TurnContext<'_>,
        on_event: &mut (dyn FnMut(ChatEvent<'_>) + Send),
    ) -> Result<TurnOutcome, TurnError> {
        let text = input.trim();
        let skip = if text.is_empty() {
            Some(SkipReason::EmptyInput)
        } else if state.is_loading {
            Some(SkipReason::Busy)
        } else if ctx.disabled {
            Some(SkipReason::Disabled)
        } else {
            None
        };
        if let Some(reason) = skip {
            return Ok(TurnOutcome::Skipped(reason));
        }
        let Some(scenario) = ctx.scenario else {
            return Ok(TurnOutcome::Skipped(SkipReason::NoScenario));
        };
        let Some(language) = ctx.session_language else {
            return Ok(TurnOutcome::Skipped(SkipReason::NoLanguage));
        };

        state.is_loading = true;
        let result = self
            .run(
                text,
                state,
                current_session,
                scenario,
                language,
                ctx.native_language,
                on_event,
            )
            .await;
        state.is_loading = false;

        if let Err(e) = &result {
            tracing::error!(error = %e, "message error");
        }
        result
    }

    #[allow(clippy::too_many_arguments)]
    async fn run(
        &self,
        text: &str,
        state: &mut ChatState,
        current_session: &mut Option<Session>,
        scenario: &Scenario,
        language: &Language,
        native_language: &Language,
        on_event: &mut (dyn FnMut(ChatEvent<'_>) + Send),
    ) -> Result<TurnOutcome, TurnError> {
        let history_before = state.messages.clone();

        let user_message = ChatMessage::pending_user(text.to_string());
        on_event(ChatEvent::MessageAdded(
            state.add_message(user_message.clone()),
        ));

        let translated = self
            .ai
            .translate_text(text, &language.name)
            .await
            .map_err(TurnError::Translate)?;

        let user_message = user_message.with_translation(translated);
        if let Some(updated) = state.update_message(&user_message.id, user_message.clone()) {
            on_event(ChatEvent::MessageUpdated(updated));
        }

        let mut history = history_before;
        history.push(user_message.clone());

        let reply = self
            .ai
            .generate_chat_completion(&history, scenario, &language.name)
            .await
            .map_err(TurnError::Reply)?;

        let reply_translated = self
            .ai
            .translate_text(&reply, &native_language.name)
            .await
            .map_err(TurnError::Translate)?;

        let assistant = ChatMessage::new(Sender::Assistant, reply, reply_translated);
        on_event(ChatEvent::MessageAdded(state.add_message(assistant.clone())));

        if let Some(session) = current_session.as_mut() {
            history.push(assistant.clone());
            let mut updated = session.clone();
            updated.replace_messages(history);
            self.store.save_session(&updated)?;
            *session = updated;
        }

        tracing::info!(scenario = %scenario.id, language = %language.code, "turn completed");

        Ok(TurnOutcome::Completed {
            user: user_message,
            assistant,
        })
    }
}
