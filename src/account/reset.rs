use reqwest::Url;
use thiserror::Error;

use crate::backend::AuthBackend;
use crate::error::FlowError;
use crate::store::{AUTH_TOKEN_KEY, KeyValueStore};

pub const TOKEN_VALIDATION_ERROR: &str = "token_validation_error";
pub const PASSWORD_UPDATE_ERROR: &str = "password_update_error";

pub const INVALID_LINK_MESSAGE: &str = "Invalid or expired reset link";
pub const MISSING_TOKEN_MESSAGE: &str = "Invalid or missing reset token";
pub const UNKNOWN_USER_MESSAGE: &str = "Unable to verify your identity. Please try again.";
pub const RESET_SUCCESS_MESSAGE: &str =
    "Your password has been reset successfully. Please sign in with your new password.";

const MIN_PASSWORD_LEN: usize = 6;

/// Parameters carried by a password reset link.
///
/// Supabase puts them in the fragment; the query string is read too and the
/// fragment wins when both carry a key. Empty values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResetLinkParams {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

impl ResetLinkParams {
    /// Accepts a full link or just its encoded parameters.
    pub fn parse(link: &str) -> Self {
        let link = link.trim();
        let mut params = Self::default();

        match Url::parse(link) {
            Ok(url) => {
                if let Some(query) = url.query() {
                    params.merge(query);
                }
                if let Some(fragment) = url.fragment() {
                    params.merge(fragment);
                }
            }
            Err(_) => params.merge(link.trim_start_matches(['?', '#'])),
        }

        params
    }

    fn merge(&mut self, encoded: &str) {
        for (key, value) in decode_pairs(encoded) {
            if value.is_empty() {
                continue;
            }
            let slot = match key.as_str() {
                "access_token" => &mut self.access_token,
                "refresh_token" => &mut self.refresh_token,
                "error" => &mut self.error,
                "error_description" => &mut self.error_description,
                _ => continue,
            };
            *slot = Some(value);
        }
    }
}

fn decode_pairs(encoded: &str) -> Vec<(String, String)> {
    Url::parse("http://localhost/")
        .map(|mut url| {
            url.set_query(Some(encoded));
            url.query_pairs().into_owned().collect()
        })
        .unwrap_or_default()
}

/// Checks that a reset link lets the user change their password.
///
/// On success the backend holds a session for the user. The returned error
/// is meant to be handed to the forgot-password flow.
pub async fn validate_reset_link<A>(auth: &A, params: &ResetLinkParams) -> Result<(), FlowError>
where
    A: AuthBackend + ?Sized,
{
    let invalid = |message: &str| FlowError::new(TOKEN_VALIDATION_ERROR, message);

    if params.error.is_some() {
        let message = params
            .error_description
            .as_deref()
            .unwrap_or(INVALID_LINK_MESSAGE);
        tracing::error!(error = ?params.error, %message, "reset link carries an error");
        return Err(invalid(message));
    }

    match auth.get_session().await {
        Ok(Some(_)) => {
            tracing::debug!("existing session found, reset link accepted");
            return Ok(());
        }
        Ok(None) => {}
        Err(e) => tracing::debug!(error = %e, "could not read current session"),
    }

    let Some(access_token) = params.access_token.as_deref() else {
        tracing::error!("reset link has no access token");
        return Err(invalid(MISSING_TOKEN_MESSAGE));
    };
    let refresh_token = params.refresh_token.as_deref().unwrap_or_default();

    auth.set_session(access_token, refresh_token)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "error validating reset token");
            invalid(&e.user_message())
        })?;

    tracing::info!("reset token validated");
    Ok(())
}

/// Local checks on a new password pair. No remote call is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PasswordInputError {
    #[error("Please fill in all fields")]
    MissingField,
    #[error("Passwords do not match")]
    Mismatch,
    #[error("Password must be at least 6 characters")]
    TooShort,
}

pub fn check_new_password(password: &str, confirm: &str) -> Result<(), PasswordInputError> {
    if password.is_empty() || confirm.is_empty() {
        return Err(PasswordInputError::MissingField);
    }
    if password != confirm {
        return Err(PasswordInputError::Mismatch);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(PasswordInputError::TooShort);
    }
    Ok(())
}

#[derive(Debug, Error)]
pub enum PasswordResetError {
    #[error(transparent)]
    Input(#[from] PasswordInputError),
    #[error(transparent)]
    Flow(#[from] FlowError),
}

/// Sets a new password for the user behind the held session, then signs out
/// and forgets the stored auth token so the next start requires a login.
pub async fn reset_password<A, K>(
    auth: &A,
    kv: &K,
    password: &str,
    confirm: &str,
) -> Result<(), PasswordResetError>
where
    A: AuthBackend + ?Sized,
    K: KeyValueStore + ?Sized,
{
    check_new_password(password, confirm)?;

    let failed = |message: String| {
        tracing::error!(%message, "password update error");
        FlowError::new(PASSWORD_UPDATE_ERROR, message)
    };

    let user = match auth.get_user().await {
        Ok(Some(user)) => user,
        Ok(None) => return Err(failed(UNKNOWN_USER_MESSAGE.to_string()).into()),
        Err(e) => return Err(failed(e.user_message()).into()),
    };

    tracing::info!(user = %user.id, "updating password");
    auth.update_password(password)
        .await
        .map_err(|e| failed(e.user_message()))?;

    if let Err(e) = auth.sign_out().await {
        tracing::warn!(error = %e, "sign out after password reset failed");
    }
    if let Err(e) = kv.remove(AUTH_TOKEN_KEY) {
        tracing::warn!(error = %e, "could not remove stored auth token");
    }

    Ok(())
}
