use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{ChatMessage, Language, now_millis};

/// Lifecycle state of a session. Only `Saved` and `Completed` sessions are
/// eligible for remote sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Active,
    Saved,
    Completed,
}

impl SessionStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Saved => "saved",
            Self::Completed => "completed",
        }
    }

    pub const fn is_syncable(self) -> bool {
        matches!(self, Self::Saved | Self::Completed)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for SessionStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "saved" => Ok(Self::Saved),
            "completed" => Ok(Self::Completed),
            other => anyhow::bail!("Unknown session status: '{other}'"),
        }
    }
}

/// One roleplay conversation between the user and a persona.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub scenario_id: String,
    pub target_language: Language,
    pub source_language: Language,
    /// Ordered by insertion.
    pub messages: Vec<ChatMessage>,
    /// Milliseconds since the Unix epoch.
    pub start_time: i64,
    pub last_updated: i64,
    #[serde(default)]
    pub status: SessionStatus,
}

impl Session {
    pub fn start(
        user_id: String,
        scenario_id: String,
        source_language: Language,
        target_language: Language,
    ) -> Self {
        let now = now_millis();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id,
            scenario_id,
            target_language,
            source_language,
            messages: Vec::new(),
            start_time: now,
            last_updated: now,
            status: SessionStatus::Active,
        }
    }

    /// Replaces the message list and bumps `last_updated`.
    pub fn replace_messages(&mut self, messages: Vec<ChatMessage>) {
        self.messages = messages;
        self.last_updated = now_millis();
    }

    pub fn set_status(&mut self, status: SessionStatus) {
        self.status = status;
        self.last_updated = now_millis();
    }
}
