use anyhow::{Context, Result, anyhow, bail};

use super::remote;
use crate::ai::OpenAiClient;
use crate::backend::SessionTable;
use crate::catalog::resolve_scenario;
use crate::chat::{ChatSession, ChatSetup, LOCAL_USER_ID};
use crate::config::{ConfigFile, ConfigManager, ResolveOptions, resolve_config};
use crate::model::{Session, SessionStatus};
use crate::store::{LocalStore, SessionStore};

pub struct ChatOptions {
    pub to: Option<String>,
    pub source: Option<String>,
    pub scenario: Option<String>,
    pub endpoint: Option<String>,
    pub model: Option<String>,
    /// Id of a local session to resume.
    pub session: Option<String>,
}

pub async fn run_chat(options: ChatOptions) -> Result<()> {
    let manager = ConfigManager::new()?;
    let config_file = manager.load_or_default();
    let store = LocalStore::new()?;

    let resumed = options
        .session
        .as_deref()
        .map(|id| -> Result<Session> {
            store
                .load_session(id)?
                .ok_or_else(|| anyhow!("Session '{id}' not found on this device"))
        })
        .transpose()?;
    if let Some(session) = resumed.as_ref().filter(|s| s.status == SessionStatus::Completed) {
        bail!(
            "Session '{}' has ended and cannot be continued\n\n\
             Upload it with 'chatabubble sessions sync {}'.",
            session.id,
            session.id
        );
    }

    // A resumed session keeps its scenario and languages
    let resolve_options = match &resumed {
        Some(session) => ResolveOptions {
            to: Some(session.target_language.code.clone()),
            source: Some(session.source_language.code.clone()),
            scenario: Some(session.scenario_id.clone()),
            endpoint: options.endpoint,
            model: options.model,
        },
        None => ResolveOptions {
            to: options.to,
            source: options.source,
            scenario: options.scenario,
            endpoint: options.endpoint,
            model: options.model,
        },
    };
    let resolved = resolve_config(&resolve_options, &config_file)?;
    let scenario = resolve_scenario(
        &resolved.scenario_id,
        &config_file.scenarios,
        resolved.target_language.clone(),
    )?;

    let (remote_table, user_id) = remote_table(&config_file, &store).await;

    let setup = match resumed {
        Some(mut session) => {
            // Sessions started while signed out are claimed on resume
            if session.user_id == LOCAL_USER_ID && user_id != LOCAL_USER_ID {
                session.user_id = user_id;
            }
            ChatSetup {
                scenario,
                source_language: session.source_language.clone(),
                target_language: session.target_language.clone(),
                session,
                resumed: true,
            }
        }
        None => {
            let session = Session::start(
                user_id,
                scenario.id.clone(),
                resolved.source_language.clone(),
                resolved.target_language.clone(),
            );
            store
                .save_session(&session)
                .context("Failed to create the session on this device")?;
            tracing::info!(session = %session.id, scenario = %scenario.id, "session started");
            ChatSetup {
                scenario,
                source_language: resolved.source_language,
                target_language: resolved.target_language,
                session,
                resumed: false,
            }
        }
    };

    let ai = OpenAiClient::new(resolved.endpoint, resolved.model, resolved.api_key);
    let mut chat = ChatSession::new(setup, Box::new(ai), store, remote_table);
    chat.run().await
}

/// The remote table when signed in. Chat works offline otherwise.
async fn remote_table(
    config_file: &ConfigFile,
    store: &LocalStore,
) -> (Option<Box<dyn SessionTable>>, String) {
    match remote::signed_in(config_file, store).await {
        Ok(signed_in) => {
            let table: Box<dyn SessionTable> = Box::new(signed_in.client.sessions_table());
            (Some(table), signed_in.user.id)
        }
        Err(e) => {
            tracing::debug!(error = %e, "remote sync unavailable");
            (None, LOCAL_USER_ID.to_string())
        }
    }
}
