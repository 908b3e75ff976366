use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::backend::{AuthBackend, AuthSession, User};
use crate::error::{BackendError, StoreError};
use crate::store::KeyValueStore;

/// Scriptable auth backend that records which operations were called.
#[derive(Default)]
pub struct FakeAuth {
    pub session: Mutex<Option<AuthSession>>,
    pub user: Option<User>,
    pub reject_tokens: Option<String>,
    pub reject_update: Option<String>,
    pub calls: Mutex<Vec<&'static str>>,
}

impl FakeAuth {
    pub fn signed_in() -> Self {
        let user = user();
        Self {
            session: Mutex::new(Some(AuthSession {
                access_token: "access".to_string(),
                refresh_token: "refresh".to_string(),
                user: Some(user.clone()),
            })),
            user: Some(user),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }
}

pub fn user() -> User {
    User {
        id: "user-1".to_string(),
        email: Some("learner@example.com".to_string()),
    }
}

fn rejected(message: &str) -> BackendError {
    BackendError::Api {
        status: StatusCode::UNAUTHORIZED,
        message: message.to_string(),
    }
}

#[async_trait]
impl AuthBackend for FakeAuth {
    async fn get_session(&self) -> Result<Option<AuthSession>, BackendError> {
        self.record("get_session");
        Ok(self.session.lock().unwrap().clone())
    }

    async fn set_session(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<AuthSession, BackendError> {
        self.record("set_session");
        if let Some(message) = &self.reject_tokens {
            return Err(rejected(message));
        }
        let session = AuthSession {
            access_token: access_token.to_string(),
            refresh_token: refresh_token.to_string(),
            user: self.user.clone(),
        };
        *self.session.lock().unwrap() = Some(session.clone());
        Ok(session)
    }

    async fn get_user(&self) -> Result<Option<User>, BackendError> {
        self.record("get_user");
        Ok(self.user.clone())
    }

    async fn update_password(&self, _password: &str) -> Result<User, BackendError> {
        self.record("update_password");
        match (&self.reject_update, &self.user) {
            (Some(message), _) => Err(rejected(message)),
            (None, Some(user)) => Ok(user.clone()),
            (None, None) => Err(BackendError::NotAuthenticated),
        }
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        self.record("sign_out");
        *self.session.lock().unwrap() = None;
        Ok(())
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, BackendError> {
        self.record("sign_in_with_password");
        if password != "correct horse" {
            return Err(rejected("Invalid login credentials"));
        }
        let session = AuthSession {
            access_token: format!("token-for-{email}"),
            refresh_token: "refresh".to_string(),
            user: Some(user()),
        };
        *self.session.lock().unwrap() = Some(session.clone());
        Ok(session)
    }

    async fn reset_password_for_email(
        &self,
        _email: &str,
        _redirect_to: Option<&str>,
    ) -> Result<(), BackendError> {
        self.record("reset_password_for_email");
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryKv {
    pub entries: Mutex<HashMap<String, String>>,
}

impl KeyValueStore for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}
