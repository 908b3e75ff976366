use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use chatabubble::catalog::print_scenarios;
use chatabubble::cli::commands::account::{self, ForgotPasswordOptions};
use chatabubble::cli::commands::{chat, sessions};
use chatabubble::cli::{Args, Command, SessionsCommand, exit_code_for};
use chatabubble::config::ConfigManager;
use chatabubble::model::{print_languages, resolve_language};
use chatabubble::ui::print_error;

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(args).await {
        print_error(&format!("{e:#}"));
        std::process::exit(exit_code_for(&e));
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "chatabubble=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(args: Args) -> Result<()> {
    match args.command {
        Command::Languages => {
            let config = ConfigManager::new()?.load_or_default();
            print_languages(&config.custom_languages());
        }
        Command::Scenarios => {
            let config = ConfigManager::new()?.load_or_default();
            print_scenarios(&config.scenarios);
        }
        Command::Chat {
            to,
            source,
            scenario,
            endpoint,
            model,
            session,
        } => {
            if let Some(ref lang) = to {
                let config = ConfigManager::new()?.load_or_default();
                resolve_language(lang, &config.custom_languages())?;
            }

            let options = chat::ChatOptions {
                to,
                source,
                scenario,
                endpoint,
                model,
                session,
            };
            chat::run_chat(options).await?;
        }
        Command::Sessions { command } => match command {
            SessionsCommand::List => sessions::list_local()?,
            SessionsCommand::Remote => sessions::list_remote().await?,
            SessionsCommand::Sync { id } => sessions::sync(&id).await?,
            SessionsCommand::Cleanup { days } => sessions::cleanup(days).await?,
            SessionsCommand::Delete { id } => sessions::delete(&id)?,
        },
        Command::Login { email } => account::login(email).await?,
        Command::Logout => account::logout().await?,
        Command::ForgotPassword { email, redirect_to } => {
            account::forgot_password(ForgotPasswordOptions {
                email,
                redirect_to,
                reset_error: None,
            })
            .await?;
        }
        Command::ResetPassword { link } => account::reset_password(&link).await?,
    }

    Ok(())
}
