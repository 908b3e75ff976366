//! Reconciles local sessions with the remote `chat_sessions` table.

use chrono::{DateTime, Duration, Utc};

use crate::backend::{RowFilter, SessionMetrics, SessionRow, SessionTable};
use crate::error::BackendError;
use crate::model::{Session, SessionStatus};

pub const DEFAULT_CLEANUP_DAYS: u32 = 30;

/// Statuses returned by [`SyncService::fetch_saved_sessions`].
const LISTED_STATUSES: &[SessionStatus] = &[SessionStatus::Completed, SessionStatus::Saved];

/// Result of pushing one session to the remote table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOutcome {
    pub success: bool,
    /// The local copy may be removed (only for completed sessions).
    pub should_delete_local: bool,
}

impl SyncOutcome {
    const SKIPPED: Self = Self {
        success: false,
        should_delete_local: false,
    };
}

pub struct SyncService<'a, T: ?Sized> {
    table: &'a T,
}

impl<'a, T: SessionTable + ?Sized> SyncService<'a, T> {
    pub const fn new(table: &'a T) -> Self {
        Self { table }
    }

    /// Upserts a saved or completed session. Other statuses are not synced.
    ///
    /// Remote failures are logged and reported as an unsuccessful outcome.
    pub async fn sync_chat_session(&self, session: &Session) -> SyncOutcome {
        self.sync_chat_session_at(session, Utc::now()).await
    }

    pub async fn sync_chat_session_at(&self, session: &Session, now: DateTime<Utc>) -> SyncOutcome {
        if !session.status.is_syncable() {
            return SyncOutcome::SKIPPED;
        }

        let row = session_row(session, now);
        match self.table.upsert(&row).await {
            Ok(()) => {
                tracing::info!(session = %session.id, status = %session.status, "session synced");
                SyncOutcome {
                    success: true,
                    should_delete_local: session.status == SessionStatus::Completed,
                }
            }
            Err(e) => {
                tracing::error!(session = %session.id, error = %e, "error syncing chat session");
                SyncOutcome::SKIPPED
            }
        }
    }

    /// Saved and completed sessions of `user_id`, newest first.
    pub async fn fetch_saved_sessions(&self, user_id: &str) -> Result<Vec<SessionRow>, BackendError> {
        let filter = RowFilter::for_user(user_id).with_statuses(LISTED_STATUSES);
        self.table.select(&filter).await.inspect_err(|e| {
            tracing::error!(user = %user_id, error = %e, "error fetching saved sessions");
        })
    }

    /// Deletes completed sessions created more than `days_old` days ago.
    /// Saved sessions are never touched.
    pub async fn cleanup_old_sessions(&self, user_id: &str, days_old: u32) -> Result<(), BackendError> {
        self.cleanup_old_sessions_at(user_id, days_old, Utc::now())
            .await
    }

    pub async fn cleanup_old_sessions_at(
        &self,
        user_id: &str,
        days_old: u32,
        now: DateTime<Utc>,
    ) -> Result<(), BackendError> {
        let cutoff = Duration::try_days(i64::from(days_old))
            .and_then(|age| now.checked_sub_signed(age))
            .ok_or(BackendError::InvalidAge(days_old))
            .inspect_err(|e| {
                tracing::error!(user = %user_id, error = %e, "error cleaning up old sessions");
            })?;
        let filter = RowFilter::for_user(user_id)
            .with_statuses(&[SessionStatus::Completed])
            .created_before(cutoff);

        self.table.delete(&filter).await.inspect_err(|e| {
            tracing::error!(user = %user_id, error = %e, "error cleaning up old sessions");
        })?;

        tracing::info!(user = %user_id, %cutoff, "old sessions cleaned up");
        Ok(())
    }
}

/// Builds the remote row for a session.
pub fn session_row(session: &Session, now: DateTime<Utc>) -> SessionRow {
    SessionRow {
        id: session.id.clone(),
        user_id: session.user_id.clone(),
        scenario_id: session.scenario_id.clone(),
        messages: session.messages.clone(),
        source_language: session.source_language.clone(),
        target_language: session.target_language.clone(),
        status: session.status,
        metrics: SessionMetrics {
            message_count: session.messages.len(),
            duration: now.timestamp_millis() - session.start_time,
            last_updated: session.last_updated,
        },
        created_at: None,
    }
}
