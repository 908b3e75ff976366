use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::Deserialize;
use std::sync::{Arc, Mutex, PoisonError};

use super::{AuthSession, SessionsTable, SupabaseAuth};
use crate::error::BackendError;

/// Shared connection to a Supabase project.
///
/// Cloning is cheap; clones share the held auth session so that table
/// requests run as the signed-in user.
#[derive(Clone)]
pub struct SupabaseClient {
    http: Client,
    base_url: Url,
    anon_key: String,
    session: Arc<Mutex<Option<AuthSession>>>,
}

impl SupabaseClient {
    pub fn new(url: &str, anon_key: String) -> Result<Self, BackendError> {
        // Trailing slash so that joins append instead of replacing the last segment
        let base = format!("{}/", url.trim_end_matches('/'));
        let base_url = Url::parse(&base).map_err(|e| BackendError::InvalidUrl(format!("{url}: {e}")))?;

        Ok(Self {
            http: Client::new(),
            base_url,
            anon_key,
            session: Arc::new(Mutex::new(None)),
        })
    }

    pub fn auth(&self) -> SupabaseAuth {
        SupabaseAuth::new(self.clone())
    }

    pub fn sessions_table(&self) -> SessionsTable {
        SessionsTable::new(self.clone())
    }

    /// Adopts a session persisted by an earlier run.
    pub fn restore_session(&self, session: AuthSession) {
        self.set_current_session(Some(session));
    }

    pub fn current_session(&self) -> Option<AuthSession> {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn set_current_session(&self, session: Option<AuthSession>) {
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = session;
    }

    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        self.base_url
            .join(path)
            .map_err(|e| BackendError::InvalidUrl(format!("{path}: {e}")))
    }

    /// Starts a request carrying the anon key and the session token (or the
    /// anon key when signed out).
    pub(crate) fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let token = self
            .current_session()
            .map_or_else(|| self.anon_key.clone(), |s| s.access_token);
        self.request_with_token(method, url, &token)
    }

    pub(crate) fn request_with_token(&self, method: Method, url: Url, token: &str) -> RequestBuilder {
        tracing::debug!(%method, %url, "backend request");
        self.http
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    msg: Option<String>,
    message: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

/// Passes 2xx responses through and turns anything else into
/// [`BackendError::Api`], extracting the message from the usual error shapes.
pub(crate) async fn check(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|e| e.msg.or(e.message).or(e.error_description).or(e.error))
        .unwrap_or(body);

    Err(BackendError::Api { status, message })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_appends_to_base_path() {
        let client = SupabaseClient::new("http://localhost:54321/project", "anon".into()).unwrap();
        assert_eq!(
            client.endpoint("rest/v1/chat_sessions").unwrap().as_str(),
            "http://localhost:54321/project/rest/v1/chat_sessions"
        );

        let client = SupabaseClient::new("https://demo.supabase.co/", "anon".into()).unwrap();
        assert_eq!(
            client.endpoint("auth/v1/user").unwrap().as_str(),
            "https://demo.supabase.co/auth/v1/user"
        );
    }

    #[test]
    fn test_invalid_url() {
        assert!(matches!(
            SupabaseClient::new("not a url", "anon".into()),
            Err(BackendError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_clones_share_session() {
        let client = SupabaseClient::new("https://demo.supabase.co", "anon".into()).unwrap();
        let clone = client.clone();

        client.restore_session(AuthSession {
            access_token: "token".into(),
            refresh_token: String::new(),
            user: None,
        });

        assert_eq!(clone.current_session().unwrap().access_token, "token");
    }
}
