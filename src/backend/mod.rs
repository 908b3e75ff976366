//! Remote auth and database backend (Supabase-compatible).
//!
//! The traits are the seams the reset flow and the sync service depend on;
//! [`SupabaseClient`] provides the HTTP implementations.

mod auth;
mod client;
mod rest;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::BackendError;
use crate::model::{ChatMessage, Language, SessionStatus};

pub use auth::SupabaseAuth;
pub use client::SupabaseClient;
pub use rest::{SESSIONS_TABLE, SessionsTable, filter_query};

/// An authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Tokens for a signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default)]
    pub user: Option<User>,
}

/// Auth operations used by the account flows.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// The session currently held, if its token is still accepted.
    ///
    /// A held token is checked against the backend; a rejected one is
    /// dropped and `None` returned.
    async fn get_session(&self) -> Result<Option<AuthSession>, BackendError>;

    /// Adopts the given tokens after checking them with the backend.
    async fn set_session(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<AuthSession, BackendError>;

    /// The user behind the held session, `None` when signed out.
    async fn get_user(&self) -> Result<Option<User>, BackendError>;

    async fn update_password(&self, password: &str) -> Result<User, BackendError>;

    /// Ends the held session. Succeeds when already signed out.
    async fn sign_out(&self) -> Result<(), BackendError>;

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, BackendError>;

    /// Sends a password recovery email.
    async fn reset_password_for_email(
        &self,
        email: &str,
        redirect_to: Option<&str>,
    ) -> Result<(), BackendError>;
}

/// Summary numbers stored alongside a synced session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMetrics {
    pub message_count: usize,
    /// Milliseconds between session start and sync.
    pub duration: i64,
    pub last_updated: i64,
}

/// A row of the `chat_sessions` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRow {
    pub id: String,
    pub user_id: String,
    pub scenario_id: String,
    pub messages: Vec<ChatMessage>,
    pub source_language: Language,
    pub target_language: Language,
    pub status: SessionStatus,
    pub metrics: SessionMetrics,
    /// Assigned by the database on insert.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Row selection for `chat_sessions` reads and deletes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFilter {
    pub user_id: String,
    /// Rows must have one of these statuses. Empty means any.
    pub statuses: Vec<SessionStatus>,
    /// Rows must have been created strictly before this instant.
    pub created_before: Option<DateTime<Utc>>,
}

impl RowFilter {
    pub fn for_user(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            statuses: Vec::new(),
            created_before: None,
        }
    }

    #[must_use]
    pub fn with_statuses(mut self, statuses: &[SessionStatus]) -> Self {
        self.statuses = statuses.to_vec();
        self
    }

    #[must_use]
    pub const fn created_before(mut self, cutoff: DateTime<Utc>) -> Self {
        self.created_before = Some(cutoff);
        self
    }

    /// Evaluates the filter locally, as the database would.
    pub fn matches(&self, row: &SessionRow) -> bool {
        row.user_id == self.user_id
            && (self.statuses.is_empty() || self.statuses.contains(&row.status))
            && self
                .created_before
                .is_none_or(|cutoff| row.created_at.is_some_and(|at| at < cutoff))
    }
}

/// Table operations on `chat_sessions`.
#[async_trait]
pub trait SessionTable: Send + Sync {
    /// Inserts or replaces the row with the same id.
    async fn upsert(&self, row: &SessionRow) -> Result<(), BackendError>;

    /// Rows matching `filter`, newest `created_at` first.
    async fn select(&self, filter: &RowFilter) -> Result<Vec<SessionRow>, BackendError>;

    async fn delete(&self, filter: &RowFilter) -> Result<(), BackendError>;
}
