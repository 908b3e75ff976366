use anyhow::{Context, Result, bail};
use chrono::{DateTime, Local, Utc};

use super::remote;
use crate::backend::SessionRow;
use crate::chat::LOCAL_USER_ID;
use crate::config::ConfigManager;
use crate::model::Session;
use crate::store::{LocalStore, SessionStore};
use crate::sync::SyncService;
use crate::ui::{Spinner, Style};

/// Lists sessions kept on this device, most recently updated first.
pub fn list_local() -> Result<()> {
    let store = LocalStore::new()?;
    let sessions = store.list_sessions()?;

    if sessions.is_empty() {
        println!("No sessions on this device.");
        println!("Start one with 'chatabubble chat --to <lang>'");
        return Ok(());
    }

    println!("{}", Style::header("Sessions on this device"));
    for session in &sessions {
        print_local(session);
    }
    Ok(())
}

fn print_local(session: &Session) {
    println!(
        "  {}  {:9}  {:10} {}  {}",
        Style::value(&session.id),
        session.status,
        session.scenario_id,
        Style::code(format!("{}→{}", session.source_language.code, session.target_language.code)),
        Style::secondary(format!(
            "{} messages, updated {}",
            session.messages.len(),
            format_millis(session.last_updated)
        ))
    );
}

/// Lists the signed-in user's saved and completed sessions on the server.
pub async fn list_remote() -> Result<()> {
    let config_file = ConfigManager::new()?.load_or_default();
    let store = LocalStore::new()?;
    let signed_in = remote::signed_in(&config_file, &store).await?;

    let spinner = Spinner::new("Fetching sessions...");
    let table = signed_in.client.sessions_table();
    let rows = SyncService::new(&table)
        .fetch_saved_sessions(&signed_in.user.id)
        .await;
    spinner.stop();
    let rows = rows.context("Failed to fetch sessions")?;

    if rows.is_empty() {
        println!("No saved sessions.");
        return Ok(());
    }

    println!("{}", Style::header("Saved sessions"));
    for row in &rows {
        print_remote(row);
    }
    Ok(())
}

fn print_remote(row: &SessionRow) {
    let created = row
        .created_at
        .map_or_else(|| "-".to_string(), |at| format_time(at.with_timezone(&Local)));
    println!(
        "  {}  {:9}  {:10} {}  {}",
        Style::value(&row.id),
        row.status,
        row.scenario_id,
        Style::code(format!("{}→{}", row.source_language.code, row.target_language.code)),
        Style::secondary(format!(
            "{} messages, created {created}",
            row.metrics.message_count
        ))
    );
}

/// Pushes a saved or completed local session. Completed sessions are removed
/// from this device once the server has them.
pub async fn sync(id: &str) -> Result<()> {
    let config_file = ConfigManager::new()?.load_or_default();
    let store = LocalStore::new()?;

    let Some(mut session) = store.load_session(id)? else {
        bail!("Session '{id}' not found on this device");
    };
    if !session.status.is_syncable() {
        bail!(
            "Session '{id}' is still {}\n\n\
             Use /save or /end in 'chatabubble chat --session {id}' first.",
            session.status
        );
    }

    let signed_in = remote::signed_in(&config_file, &store).await?;
    if session.user_id == LOCAL_USER_ID {
        session.user_id.clone_from(&signed_in.user.id);
        store.save_session(&session)?;
    }

    let spinner = Spinner::new("Syncing...");
    let table = signed_in.client.sessions_table();
    let outcome = SyncService::new(&table).sync_chat_session(&session).await;
    spinner.stop();

    if !outcome.success {
        bail!("Failed to sync session '{id}'. It is kept on this device.");
    }

    if outcome.should_delete_local {
        store.delete_session(id)?;
        println!(
            "{} Session {} synced and removed from this device",
            Style::success("✓"),
            Style::value(id)
        );
    } else {
        println!("{} Session {} synced", Style::success("✓"), Style::value(id));
    }
    Ok(())
}

/// Deletes the user's completed sessions older than `days` on the server.
pub async fn cleanup(days: u32) -> Result<()> {
    let config_file = ConfigManager::new()?.load_or_default();
    let store = LocalStore::new()?;
    let signed_in = remote::signed_in(&config_file, &store).await?;

    let spinner = Spinner::new("Cleaning up...");
    let table = signed_in.client.sessions_table();
    let result = SyncService::new(&table)
        .cleanup_old_sessions(&signed_in.user.id, days)
        .await;
    spinner.stop();
    result.context("Failed to clean up old sessions")?;

    println!(
        "{} Removed completed sessions older than {days} days",
        Style::success("✓")
    );
    Ok(())
}

pub fn delete(id: &str) -> Result<()> {
    let store = LocalStore::new()?;
    if !store.delete_session(id)? {
        bail!("Session '{id}' not found on this device");
    }
    println!("{} Session {} deleted", Style::success("✓"), Style::value(id));
    Ok(())
}

fn format_millis(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis).map_or_else(
        || "-".to_string(),
        |at| format_time(at.with_timezone(&Local)),
    )
}

fn format_time(at: DateTime<Local>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_millis_out_of_range() {
        assert_eq!(format_millis(i64::MAX), "-");
    }

    #[test]
    fn test_format_time_layout() {
        let formatted = format_millis(0);
        assert_eq!(formatted.len(), "1970-01-01 00:00".len());
    }
}
