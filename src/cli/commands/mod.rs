//! Subcommand implementations.

/// Sign in, sign out and password reset handlers.
pub mod account;

/// Chat mode command handler.
pub mod chat;

/// Local and remote session management handlers.
pub mod sessions;

mod remote;
