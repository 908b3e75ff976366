use anyhow::{Context, Result, anyhow, bail};

use crate::account;
use crate::backend::{AuthBackend, SupabaseClient, User};
use crate::config::{ConfigFile, resolve_backend};
use crate::store::LocalStore;

/// A backend connection carrying the stored sign-in.
pub struct SignedIn {
    pub client: SupabaseClient,
    pub user: User,
}

pub fn connect(config_file: &ConfigFile) -> Result<SupabaseClient> {
    let settings = resolve_backend(config_file)?;
    SupabaseClient::new(&settings.url, settings.anon_key).context("Invalid backend configuration")
}

/// Connects and restores the sign-in kept in the local store.
pub async fn signed_in(config_file: &ConfigFile, store: &LocalStore) -> Result<SignedIn> {
    let client = connect(config_file)?;
    let Some(session) = account::restore_session(&client, store)? else {
        bail!("Not signed in\n\nRun 'chatabubble login --email <address>' first.");
    };

    let user = match session.user {
        Some(user) => user,
        None => client.auth().get_user().await?.ok_or_else(|| {
            anyhow!("Your sign-in has expired\n\nRun 'chatabubble login' again.")
        })?,
    };

    Ok(SignedIn { client, user })
}
