//! Command-line interface definitions and handlers.

/// CLI argument parsing with clap.
pub mod args;

/// Subcommand implementations.
pub mod commands;

pub use args::{Args, Command, SessionsCommand};

use crate::account::AccountError;
use crate::catalog::ScenarioError;
use crate::error::{AiError, BackendError, FlowError, StoreError};

/// Maps an error to a process exit code.
pub fn exit_code_for(err: &anyhow::Error) -> exitcode::ExitCode {
    for cause in err.chain() {
        if cause.is::<BackendError>() || cause.is::<AiError>() {
            return exitcode::UNAVAILABLE;
        }
        if cause.is::<StoreError>() || cause.is::<std::io::Error>() {
            return exitcode::IOERR;
        }
        if cause.is::<FlowError>() {
            return exitcode::NOPERM;
        }
        if cause.is::<ScenarioError>() {
            return exitcode::USAGE;
        }
        if let Some(account) = cause.downcast_ref::<AccountError>() {
            return match account {
                AccountError::Store(_) => exitcode::IOERR,
                _ => exitcode::UNAVAILABLE,
            };
        }
    }
    exitcode::CONFIG
}
