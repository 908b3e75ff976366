use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::Deserialize;

use super::client::{SupabaseClient, check};
use super::{AuthBackend, AuthSession, User};
use crate::error::BackendError;

/// Supabase GoTrue endpoints under `/auth/v1`.
#[derive(Clone)]
pub struct SupabaseAuth {
    client: SupabaseClient,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: String,
    user: Option<User>,
}

impl SupabaseAuth {
    pub(crate) const fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    async fn fetch_user(&self, access_token: &str) -> Result<User, BackendError> {
        let url = self.client.endpoint("auth/v1/user")?;
        let response = self
            .client
            .request_with_token(Method::GET, url, access_token)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }
}

#[async_trait]
impl AuthBackend for SupabaseAuth {
    /// The held session, if its access token is still accepted.
    async fn get_session(&self) -> Result<Option<AuthSession>, BackendError> {
        let Some(mut session) = self.client.current_session() else {
            return Ok(None);
        };
        match self.fetch_user(&session.access_token).await {
            Ok(user) => {
                session.user = Some(user);
                self.client.set_current_session(Some(session.clone()));
                Ok(Some(session))
            }
            Err(BackendError::Api { status, .. }) if status == StatusCode::UNAUTHORIZED => {
                self.client.set_current_session(None);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn set_session(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<AuthSession, BackendError> {
        let user = self.fetch_user(access_token).await?;
        let session = AuthSession {
            access_token: access_token.to_string(),
            refresh_token: refresh_token.to_string(),
            user: Some(user),
        };
        self.client.set_current_session(Some(session.clone()));
        Ok(session)
    }

    async fn get_user(&self) -> Result<Option<User>, BackendError> {
        let Some(session) = self.client.current_session() else {
            return Ok(None);
        };
        match self.fetch_user(&session.access_token).await {
            Ok(user) => Ok(Some(user)),
            Err(BackendError::Api { status, .. }) if status == StatusCode::UNAUTHORIZED => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn update_password(&self, password: &str) -> Result<User, BackendError> {
        if self.client.current_session().is_none() {
            return Err(BackendError::NotAuthenticated);
        }
        let url = self.client.endpoint("auth/v1/user")?;
        let response = self
            .client
            .request(Method::PUT, url)
            .json(&serde_json::json!({ "password": password }))
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        let Some(session) = self.client.current_session() else {
            return Ok(());
        };
        // Local state is cleared even if the server call fails
        self.client.set_current_session(None);

        let url = self.client.endpoint("auth/v1/logout")?;
        let response = self
            .client
            .request_with_token(Method::POST, url, &session.access_token)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, BackendError> {
        let mut url = self.client.endpoint("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");

        let response = self
            .client
            .request(Method::POST, url)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;
        let token: TokenResponse = check(response).await?.json().await?;

        let session = AuthSession {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            user: token.user,
        };
        self.client.set_current_session(Some(session.clone()));
        Ok(session)
    }

    async fn reset_password_for_email(
        &self,
        email: &str,
        redirect_to: Option<&str>,
    ) -> Result<(), BackendError> {
        let mut url = self.client.endpoint("auth/v1/recover")?;
        if let Some(redirect) = redirect_to {
            url.query_pairs_mut().append_pair("redirect_to", redirect);
        }

        let response = self
            .client
            .request(Method::POST, url)
            .json(&serde_json::json!({ "email": email }))
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }
}
