use clap::{Parser, Subcommand};

use crate::sync::DEFAULT_CLEANUP_DAYS;

#[derive(Parser, Debug)]
#[command(name = "chatabubble")]
#[command(about = "Practice a language by roleplaying with an AI persona")]
#[command(version)]
pub struct Args {
    /// Show debug logs on stderr (RUST_LOG overrides)
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start or resume a roleplay chat
    Chat {
        /// Language to practice (e.g., es, fr, ja)
        #[arg(short = 't', long = "to")]
        to: Option<String>,

        /// Language you write in and read translations in
        #[arg(short = 's', long)]
        source: Option<String>,

        /// Scenario id (see `chatabubble scenarios`)
        #[arg(short = 'c', long)]
        scenario: Option<String>,

        /// API endpoint URL
        #[arg(short = 'e', long)]
        endpoint: Option<String>,

        /// Model name
        #[arg(short = 'm', long)]
        model: Option<String>,

        /// Resume a session kept on this device
        #[arg(long, value_name = "ID")]
        session: Option<String>,
    },
    /// List supported language codes
    Languages,
    /// List roleplay scenarios
    Scenarios,
    /// Manage chat sessions
    Sessions {
        #[command(subcommand)]
        command: SessionsCommand,
    },
    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: Option<String>,
    },
    /// Sign out and forget the stored sign-in
    Logout,
    /// Email a password reset link
    ForgotPassword {
        #[arg(long)]
        email: Option<String>,

        /// Where the reset link should lead
        #[arg(long, value_name = "URL")]
        redirect_to: Option<String>,
    },
    /// Set a new password using the link from the reset email
    ResetPassword {
        /// The full reset link, or just its parameters
        link: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum SessionsCommand {
    /// List sessions kept on this device
    List,
    /// List saved and completed sessions of the signed-in user
    Remote,
    /// Push a saved or completed local session to the server
    Sync {
        id: String,
    },
    /// Delete completed remote sessions older than the given age
    Cleanup {
        /// Age in days
        #[arg(long, default_value_t = DEFAULT_CLEANUP_DAYS)]
        days: u32,
    },
    /// Delete a session from this device
    Delete {
        id: String,
    },
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_cleanup_defaults_to_thirty_days() {
        let args = Args::parse_from(["chatabubble", "sessions", "cleanup"]);
        match args.command {
            Command::Sessions {
                command: SessionsCommand::Cleanup { days },
            } => assert_eq!(days, 30),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_verbose_is_global() {
        let args = Args::parse_from(["chatabubble", "languages", "--verbose"]);
        assert!(args.verbose);
    }
}
