//! # chatabubble - Roleplay Language Practice
//!
//! `chatabubble` lets a learner practice a target language by chatting with
//! an AI persona inside a scenario (ordering at a café, checking into a
//! hotel, a job interview). Every message is shown in both languages, and
//! finished sessions sync to a Supabase-compatible backend.
//!
//! ## Features
//!
//! - **Conversation turns**: translate, reply in character, translate back
//! - **Scenarios**: built-in presets plus custom ones from the config file
//! - **Session sync**: saved and completed sessions are pushed to the server
//! - **Accounts**: sign in, sign out, and password reset via emailed link
//!
//! ## Quick Start
//!
//! ```bash
//! # Practice Spanish at the café
//! chatabubble chat --to es --scenario cafe
//!
//! # Sign in so /save and /end sync the session
//! chatabubble login --email learner@example.com
//!
//! # List saved sessions on the server
//! chatabubble sessions remote
//! ```
//!
//! ## Configuration
//!
//! Settings are stored in `~/.config/chatabubble/config.toml`:
//!
//! ```toml
//! [chatabubble]
//! to = "es"
//! scenario = "cafe"
//!
//! [ai]
//! model = "gpt-4o"
//! api_key_env = "OPENAI_API_KEY"
//!
//! [supabase]
//! url = "https://<project>.supabase.co"
//! anon_key_env = "SUPABASE_ANON_KEY"
//! ```

/// Sign in, sign out and the password reset flow.
pub mod account;

/// Chat completion and translation clients for OpenAI-compatible APIs.
pub mod ai;

/// Supabase-compatible auth and `chat_sessions` table clients.
pub mod backend;

/// Preset and custom roleplay scenarios.
pub mod catalog;

/// Interactive chat mode.
pub mod chat;

/// Command-line interface definitions and handlers.
pub mod cli;

/// Configuration file management.
pub mod config;

/// The conversation turn pipeline.
pub mod conversation;

/// Error types at the library seams.
pub mod error;

/// Languages, messages, scenarios and sessions.
pub mod model;

/// XDG-style path utilities for configuration and data.
pub mod paths;

/// Local `SQLite` store for sessions and settings.
pub mod store;

/// Session sync with the remote table.
pub mod sync;

/// Terminal UI components (spinner, colors).
pub mod ui;
