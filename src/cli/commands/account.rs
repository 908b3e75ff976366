use anyhow::{Result, bail};
use inquire::{Password, PasswordDisplayMode, Text};

use super::remote;
use crate::account::{
    self, PasswordResetError, RESET_SUCCESS_MESSAGE, ResetLinkParams, validate_reset_link,
};
use crate::backend::AuthBackend;
use crate::config::ConfigManager;
use crate::error::FlowError;
use crate::store::LocalStore;
use crate::ui::{Spinner, Style, answer_or_cancel, print_error};

pub async fn login(email: Option<String>) -> Result<()> {
    let config_file = ConfigManager::new()?.load_or_default();
    let client = remote::connect(&config_file)?;
    let store = LocalStore::new()?;

    let Some(email) = email_or_prompt(email)? else {
        return Ok(());
    };
    let Some(password) = answer_or_cancel(
        Password::new("Password:")
            .with_display_mode(PasswordDisplayMode::Masked)
            .without_confirmation()
            .prompt(),
    )?
    else {
        return Ok(());
    };

    let spinner = Spinner::new("Signing in...");
    let result = account::login(&client.auth(), &store, &email, &password).await;
    spinner.stop();
    result?;

    println!("{} Signed in as {}", Style::success("✓"), Style::value(&email));
    Ok(())
}

pub async fn logout() -> Result<()> {
    let config_file = ConfigManager::new()?.load_or_default();
    let client = remote::connect(&config_file)?;
    let store = LocalStore::new()?;

    if account::restore_session(&client, &store)?.is_none() {
        println!("Not signed in.");
        return Ok(());
    }

    account::logout(&client.auth(), &store).await?;
    println!("{}", Style::success("✓ Signed out"));
    Ok(())
}

pub struct ForgotPasswordOptions {
    pub email: Option<String>,
    pub redirect_to: Option<String>,
    /// Why a previous reset attempt failed, shown before asking again.
    pub reset_error: Option<FlowError>,
}

pub async fn forgot_password(options: ForgotPasswordOptions) -> Result<()> {
    if let Some(error) = &options.reset_error {
        print_error(&error.message);
        println!("{}", Style::hint("Request a new reset link below."));
        println!();
    }

    let config_file = ConfigManager::new()?.load_or_default();
    let client = remote::connect(&config_file)?;

    let Some(email) = email_or_prompt(options.email)? else {
        return Ok(());
    };

    let spinner = Spinner::new("Sending reset link...");
    let result = client
        .auth()
        .reset_password_for_email(&email, options.redirect_to.as_deref())
        .await;
    spinner.stop();
    result?;

    println!(
        "{} Check {} for a password reset link",
        Style::success("✓"),
        Style::value(&email)
    );
    Ok(())
}

/// Validates the reset link, then asks for the new password. A bad link
/// hands its error to the forgot-password flow.
pub async fn reset_password(link: &str) -> Result<()> {
    let config_file = ConfigManager::new()?.load_or_default();
    let client = remote::connect(&config_file)?;
    let store = LocalStore::new()?;
    account::restore_session(&client, &store)?;
    let auth = client.auth();

    let params = ResetLinkParams::parse(link);
    let spinner = Spinner::new("Checking reset link...");
    let validation = validate_reset_link(&auth, &params).await;
    spinner.stop();

    if let Err(error) = validation {
        return forgot_password(ForgotPasswordOptions {
            email: None,
            redirect_to: None,
            reset_error: Some(error),
        })
        .await;
    }

    loop {
        let Some(password) = answer_or_cancel(
            Password::new("New password:")
                .with_display_mode(PasswordDisplayMode::Masked)
                .without_confirmation()
                .prompt(),
        )?
        else {
            return Ok(());
        };
        let Some(confirm) = answer_or_cancel(
            Password::new("Confirm password:")
                .with_display_mode(PasswordDisplayMode::Masked)
                .without_confirmation()
                .prompt(),
        )?
        else {
            return Ok(());
        };

        let spinner = Spinner::new("Updating password...");
        let result = account::reset_password(&auth, &store, &password, &confirm).await;
        spinner.stop();

        match result {
            Ok(()) => {
                println!("{}", Style::success(RESET_SUCCESS_MESSAGE));
                return Ok(());
            }
            Err(PasswordResetError::Input(e)) => {
                print_error(&e.to_string());
            }
            Err(PasswordResetError::Flow(e)) => bail!(e),
        }
    }
}

fn email_or_prompt(email: Option<String>) -> Result<Option<String>> {
    if let Some(email) = email {
        return Ok(Some(email));
    }
    let answer = answer_or_cancel(Text::new("Email:").prompt())?;
    Ok(answer.map(|e| e.trim().to_string()).filter(|e| !e.is_empty()))
}
