use thiserror::Error;

use crate::backend::{AuthBackend, AuthSession, SupabaseClient};
use crate::error::{BackendError, StoreError};
use crate::store::{AUTH_TOKEN_KEY, KeyValueStore};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AccountError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Failed to encode auth session: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Signs in and remembers the session for later runs.
pub async fn login<A, K>(
    auth: &A,
    kv: &K,
    email: &str,
    password: &str,
) -> Result<AuthSession, AccountError>
where
    A: AuthBackend + ?Sized,
    K: KeyValueStore + ?Sized,
{
    let session = auth.sign_in_with_password(email, password).await?;
    kv.set(AUTH_TOKEN_KEY, &serde_json::to_string(&session)?)?;
    tracing::info!(%email, "signed in");
    Ok(session)
}

/// Signs out and forgets the stored session. The stored token is removed even
/// when the backend call fails.
pub async fn logout<A, K>(auth: &A, kv: &K) -> Result<(), AccountError>
where
    A: AuthBackend + ?Sized,
    K: KeyValueStore + ?Sized,
{
    let remote = auth.sign_out().await;
    kv.remove(AUTH_TOKEN_KEY)?;
    remote?;
    tracing::info!("signed out");
    Ok(())
}

/// Reads the stored session, if any. An unreadable entry is dropped.
pub fn stored_session<K: KeyValueStore + ?Sized>(kv: &K) -> Result<Option<AuthSession>, StoreError> {
    let Some(raw) = kv.get(AUTH_TOKEN_KEY)? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(session) => Ok(Some(session)),
        Err(e) => {
            tracing::warn!(error = %e, "discarding unreadable stored auth session");
            kv.remove(AUTH_TOKEN_KEY)?;
            Ok(None)
        }
    }
}

/// Loads the stored session into `client` so requests run as that user.
/// Returns the restored session.
pub fn restore_session<K: KeyValueStore + ?Sized>(
    client: &SupabaseClient,
    kv: &K,
) -> Result<Option<AuthSession>, StoreError> {
    let session = stored_session(kv)?;
    if let Some(session) = &session {
        client.restore_session(session.clone());
    }
    Ok(session)
}
