use anyhow::Result;
use inquire::Text;
use inquire::ui::{Attributes, Color, RenderConfig, StyleSheet, Styled};

use super::command::{Input, SlashCommand, SlashCommandCompleter, parse_input};
use super::ui;
use crate::ai::AiBackend;
use crate::backend::SessionTable;
use crate::conversation::{ChatEvent, ChatState, SkipReason, TurnContext, TurnOutcome, TurnPipeline};
use crate::model::{Language, Scenario, Sender, Session, SessionStatus};
use crate::store::{LocalStore, SessionStore};
use crate::sync::SyncService;
use crate::ui::{Spinner, Style, print_error};

/// Owner id of sessions started while signed out.
pub const LOCAL_USER_ID: &str = "local";

/// Everything a chat needs once configuration is resolved.
pub struct ChatSetup {
    pub scenario: Scenario,
    pub source_language: Language,
    pub target_language: Language,
    pub session: Session,
    pub resumed: bool,
}

/// An interactive roleplay chat.
///
/// Owns the chat state; each line the user types runs one turn through
/// [`TurnPipeline`]. `/save` and `/end` push the session to the remote table
/// when one is available.
pub struct ChatSession {
    scenario: Scenario,
    source_language: Language,
    target_language: Language,
    state: ChatState,
    current: Option<Session>,
    resumed: bool,
    ended: bool,
    ai: Box<dyn AiBackend>,
    store: LocalStore,
    remote: Option<Box<dyn SessionTable>>,
}

impl ChatSession {
    pub fn new(
        setup: ChatSetup,
        ai: Box<dyn AiBackend>,
        store: LocalStore,
        remote: Option<Box<dyn SessionTable>>,
    ) -> Self {
        Self {
            state: ChatState::new(setup.session.messages.clone()),
            scenario: setup.scenario,
            source_language: setup.source_language,
            target_language: setup.target_language,
            current: Some(setup.session),
            resumed: setup.resumed,
            ended: false,
            ai,
            store,
            remote,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        ui::print_header(&self.scenario, &self.source_language, &self.target_language);
        if let Some(session) = self.current.as_ref().filter(|_| self.resumed) {
            ui::print_resumed(session);
            ui::print_history(&self.state.messages, &self.scenario.persona.name);
        }

        let prompt_style = Styled::new("❯")
            .with_fg(Color::LightBlue)
            .with_attr(Attributes::BOLD);
        let mut render_config = RenderConfig::default()
            .with_prompt_prefix(prompt_style)
            .with_answered_prompt_prefix(prompt_style);

        // Non-highlighted suggestions: gray
        render_config.option = StyleSheet::new().with_fg(Color::Grey);
        // Highlighted suggestion: purple
        render_config.selected_option = Some(StyleSheet::new().with_fg(Color::DarkMagenta));

        let help = format!(
            "Write in {} or {}, /help for commands, Ctrl+C to quit",
            self.source_language.name, self.target_language.name
        );

        while !self.ended {
            let input = Text::new("")
                .with_render_config(render_config)
                .with_autocomplete(SlashCommandCompleter)
                .with_help_message(&help)
                .prompt();

            match input {
                Ok(line) => match parse_input(&line) {
                    Input::Empty => {}
                    Input::Command(cmd) => {
                        if !self.handle_command(cmd).await {
                            break;
                        }
                    }
                    Input::Text(text) => self.send(&text).await,
                },
                Err(
                    inquire::InquireError::OperationCanceled
                    | inquire::InquireError::OperationInterrupted,
                ) => {
                    println!(); // Clear line before goodbye message
                    break;
                }
                Err(e) => return Err(e.into()),
            }
        }

        ui::print_goodbye(self.current.as_ref().filter(|_| !self.ended));
        Ok(())
    }

    async fn handle_command(&mut self, cmd: SlashCommand) -> bool {
        match cmd {
            SlashCommand::Help => ui::print_help(),
            SlashCommand::History => {
                ui::print_history(&self.state.messages, &self.scenario.persona.name);
            }
            SlashCommand::Save => self.finish(SessionStatus::Saved).await,
            SlashCommand::End => {
                self.finish(SessionStatus::Completed).await;
                self.ended = true;
                return false;
            }
            SlashCommand::Quit => return false,
            SlashCommand::Unknown(cmd) => {
                print_error(&format!("Unknown command: /{cmd}"));
                println!();
            }
        }
        true
    }

    async fn send(&mut self, text: &str) {
        let spinner = Spinner::new("Translating...");
        let persona = self.scenario.persona.name.clone();

        let pipeline = TurnPipeline::new(self.ai.as_ref(), &self.store);
        let ctx = TurnContext {
            scenario: Some(&self.scenario),
            session_language: Some(&self.target_language),
            native_language: &self.source_language,
            disabled: self.ended,
        };

        let result = pipeline
            .send(
                text,
                &mut self.state,
                &mut self.current,
                ctx,
                &mut |event| match event {
                    // The placeholder echo is not printed; the user just typed it
                    ChatEvent::MessageAdded(message) if message.sender == Sender::User => {}
                    ChatEvent::MessageAdded(message) | ChatEvent::MessageUpdated(message) => {
                        spinner.suspend(|| ui::print_message(message, &persona));
                        if message.sender == Sender::User {
                            spinner.set_message(&format!("{persona} is typing..."));
                        }
                    }
                },
            )
            .await;
        spinner.stop();

        match result {
            Ok(TurnOutcome::Completed { .. }) => {}
            Ok(TurnOutcome::Skipped(SkipReason::Disabled)) => {
                println!("{}", Style::warning("This session has ended."));
            }
            Ok(TurnOutcome::Skipped(reason)) => tracing::debug!(?reason, "turn skipped"),
            Err(e) => {
                print_error(e.alert());
                println!();
            }
        }
    }

    /// Marks the session, keeps it locally, and syncs it when possible.
    async fn finish(&mut self, status: SessionStatus) {
        let Some(session) = self.current.as_mut() else {
            return;
        };
        session.set_status(status);
        if let Err(e) = self.store.save_session(session) {
            tracing::error!(error = %e, "failed to save session locally");
            print_error("Could not save the session on this device.");
            return;
        }

        let Some(table) = self.remote.as_deref() else {
            println!(
                "{} {}",
                Style::success(format!("✓ Session {status}")),
                Style::hint("(on this device only; run 'chatabubble login' to sync)")
            );
            println!();
            return;
        };

        let spinner = Spinner::new("Syncing...");
        let outcome = SyncService::new(table).sync_chat_session(session).await;
        spinner.stop();

        if !outcome.success {
            print_error(&format!(
                "Sync failed. The session is kept on this device; retry with 'chatabubble sessions sync {}'.",
                session.id
            ));
            println!();
            return;
        }

        println!("{}", Style::success(format!("✓ Session {status} and synced")));
        println!();

        if outcome.should_delete_local {
            let id = session.id.clone();
            match self.store.delete_session(&id) {
                Ok(_) => self.current = None,
                Err(e) => tracing::warn!(session = %id, error = %e, "could not remove synced session"),
            }
        }
    }
}
