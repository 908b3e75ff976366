//! Interactive roleplay chat.
//!
//! Provides a REPL-style interface with slash commands for saving and ending
//! the session.

/// Slash command parsing and autocomplete.
pub mod command;
mod session;
mod ui;

pub use session::{ChatSession, ChatSetup, LOCAL_USER_ID};
