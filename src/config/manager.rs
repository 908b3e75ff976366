use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::model::{
    Category, Difficulty, Language, Persona, Scenario, TextDirection, resolve_language,
};
use crate::paths;

pub const DEFAULT_AI_ENDPOINT: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_SOURCE_LANGUAGE: &str = "en";
pub const DEFAULT_SCENARIO: &str = "cafe";

pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const SUPABASE_URL_ENV: &str = "SUPABASE_URL";
pub const SUPABASE_ANON_KEY_ENV: &str = "SUPABASE_ANON_KEY";

/// Default settings in the `[chatabubble]` section of config.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default target language code.
    pub to: Option<String>,
    /// Language the user types in.
    pub source: Option<String>,
    /// Default scenario id.
    pub scenario: Option<String>,
}

/// The `[ai]` section: an OpenAI-compatible chat completion endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AiConfig {
    pub endpoint: Option<String>,
    pub model: Option<String>,
    /// API key stored directly in config (not recommended).
    #[serde(default)]
    pub api_key: Option<String>,
    /// Environment variable name containing the API key.
    #[serde(default)]
    pub api_key_env: Option<String>,
}

impl AiConfig {
    /// Gets the API key: the configured env var, then the file, then
    /// `OPENAI_API_KEY`.
    pub fn get_api_key(&self) -> Option<String> {
        self.api_key_env
            .as_deref()
            .and_then(non_empty_env)
            .or_else(|| self.api_key.clone())
            .or_else(|| non_empty_env(OPENAI_API_KEY_ENV))
    }
}

/// The `[supabase]` section: auth and database backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SupabaseConfig {
    pub url: Option<String>,
    #[serde(default)]
    pub anon_key: Option<String>,
    #[serde(default)]
    pub anon_key_env: Option<String>,
}

impl SupabaseConfig {
    pub fn get_url(&self) -> Option<String> {
        self.url
            .clone()
            .or_else(|| non_empty_env(SUPABASE_URL_ENV))
    }

    pub fn get_anon_key(&self) -> Option<String> {
        self.anon_key_env
            .as_deref()
            .and_then(non_empty_env)
            .or_else(|| self.anon_key.clone())
            .or_else(|| non_empty_env(SUPABASE_ANON_KEY_ENV))
    }
}

/// A user-declared language (`[languages.<code>]`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomLanguage {
    pub name: String,
    #[serde(default = "default_direction")]
    pub direction: TextDirection,
}

const fn default_direction() -> TextDirection {
    TextDirection::Ltr
}

/// A user-declared scenario (`[scenarios.<id>]`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomScenario {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    pub difficulty: Difficulty,
    pub persona: Persona,
}

impl CustomScenario {
    pub fn to_scenario(&self, id: &str, target_language: Language) -> Scenario {
        Scenario {
            id: id.to_string(),
            title: self.title.clone(),
            description: self.description.clone(),
            category: self.category,
            difficulty: self.difficulty,
            persona: self.persona.clone(),
            target_language,
        }
    }
}

/// The complete configuration file structure.
///
/// Corresponds to `~/.config/chatabubble/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub chatabubble: AppConfig,
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub supabase: SupabaseConfig,
    #[serde(default)]
    pub languages: HashMap<String, CustomLanguage>,
    #[serde(default)]
    pub scenarios: HashMap<String, CustomScenario>,
}

impl ConfigFile {
    /// Custom languages keyed by code, flagged as custom.
    pub fn custom_languages(&self) -> HashMap<String, Language> {
        self.languages
            .iter()
            .map(|(code, lang)| {
                (
                    code.clone(),
                    Language::custom(code, &lang.name, lang.direction),
                )
            })
            .collect()
    }
}

/// Resolved settings for a chat session after merging CLI arguments and
/// the config file.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub source_language: Language,
    pub target_language: Language,
    pub scenario_id: String,
}

/// CLI overrides that take precedence over config file values.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    pub to: Option<String>,
    pub source: Option<String>,
    pub scenario: Option<String>,
    pub endpoint: Option<String>,
    pub model: Option<String>,
}

/// Resolves chat settings by merging CLI options with config file settings.
///
/// Priority: CLI option, then config file, then environment, then built-in
/// default.
///
/// # Errors
///
/// Returns an error if the target language is missing or if a language code
/// is unknown.
pub fn resolve_config(options: &ResolveOptions, config_file: &ConfigFile) -> Result<ResolvedConfig> {
    let custom_languages = config_file.custom_languages();

    let to = options
        .to
        .as_ref()
        .or(config_file.chatabubble.to.as_ref())
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Missing required configuration: 'to' (target language)\n\n\
                 Please provide it via:\n  \
                 - CLI option: chatabubble chat --to <lang>\n  \
                 - Config file: ~/.config/chatabubble/config.toml"
            )
        })?;
    let target_language = resolve_language(to, &custom_languages)?;

    let source = options
        .source
        .as_deref()
        .or(config_file.chatabubble.source.as_deref())
        .unwrap_or(DEFAULT_SOURCE_LANGUAGE);
    let source_language = resolve_language(source, &custom_languages)?;

    if source_language.code == target_language.code {
        bail!(
            "Source and target language are both '{}'\n\n\
             Pick a target language different from the one you type in.",
            target_language.code
        );
    }

    let scenario_id = options
        .scenario
        .clone()
        .or_else(|| config_file.chatabubble.scenario.clone())
        .unwrap_or_else(|| DEFAULT_SCENARIO.to_string());

    let endpoint = options
        .endpoint
        .clone()
        .or_else(|| config_file.ai.endpoint.clone())
        .unwrap_or_else(|| DEFAULT_AI_ENDPOINT.to_string());

    let model = options
        .model
        .clone()
        .or_else(|| config_file.ai.model.clone())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    let api_key = config_file.ai.get_api_key();
    if api_key.is_none() {
        tracing::warn!("AI API key not found in configuration");
    }

    Ok(ResolvedConfig {
        endpoint,
        model,
        api_key,
        source_language,
        target_language,
        scenario_id,
    })
}

/// Connection settings for the auth/database backend.
#[derive(Debug, Clone)]
pub struct BackendSettings {
    pub url: String,
    pub anon_key: String,
}

/// Resolves backend settings from the config file and environment.
///
/// # Errors
///
/// Returns an error if the URL or anon key is missing.
pub fn resolve_backend(config_file: &ConfigFile) -> Result<BackendSettings> {
    let url = config_file.supabase.get_url().ok_or_else(|| {
        anyhow::anyhow!(
            "Missing required configuration: 'supabase.url'\n\n\
             Please provide it via:\n  \
             - Environment: export {SUPABASE_URL_ENV}=\"https://<project>.supabase.co\"\n  \
             - Config file: ~/.config/chatabubble/config.toml"
        )
    })?;

    let anon_key = config_file.supabase.get_anon_key().ok_or_else(|| {
        let env_var = config_file
            .supabase
            .anon_key_env
            .as_deref()
            .unwrap_or(SUPABASE_ANON_KEY_ENV);
        anyhow::anyhow!(
            "Missing required configuration: 'supabase.anon_key'\n\n\
             Set the {env_var} environment variable:\n  \
             export {env_var}=\"your-anon-key\"\n\n\
             Or set anon_key in ~/.config/chatabubble/config.toml"
        )
    })?;

    Ok(BackendSettings { url, anon_key })
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Manages loading and saving configuration files.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Creates a new config manager.
    ///
    /// Configuration is stored at `$XDG_CONFIG_HOME/chatabubble/config.toml`
    /// or `~/.config/chatabubble/config.toml` if `XDG_CONFIG_HOME` is not set.
    pub fn new() -> Result<Self> {
        Ok(Self {
            config_path: paths::config_dir()?.join("config.toml"),
        })
    }

    pub fn with_path(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    pub const fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    pub fn load(&self) -> Result<ConfigFile> {
        let contents = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        let config_file: ConfigFile =
            toml::from_str(&contents).with_context(|| "Failed to parse config file")?;

        Ok(config_file)
    }

    pub fn save(&self, config: &ConfigFile) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;

        atomic_write(&self.config_path, &contents).with_context(|| {
            format!(
                "Failed to write config file: {}",
                self.config_path.display()
            )
        })
    }

    /// Loads the config file, falling back to defaults when it is missing.
    ///
    /// A file that exists but does not parse is reported and ignored.
    pub fn load_or_default(&self) -> ConfigFile {
        if !self.config_path.exists() {
            return ConfigFile::default();
        }
        self.load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "ignoring unreadable config file");
            ConfigFile::default()
        })
    }
}

/// Writes through a temp file in the same directory and renames it over the
/// target, so an interrupted write never leaves a truncated config.
fn atomic_write(path: &Path, content: &str) -> Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = path.file_name().unwrap_or_default().to_string_lossy();
    let temp_path = parent.join(format!(".{file_name}.tmp"));

    fs::write(&temp_path, content)?;
    fs::rename(&temp_path, path)?;

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::LanguageStyle;
    use serial_test::serial;
    use tempfile::TempDir;

    fn create_test_manager(temp_dir: &TempDir) -> ConfigManager {
        ConfigManager::with_path(temp_dir.path().join("config.toml"))
    }

    fn create_test_config() -> ConfigFile {
        let mut languages = HashMap::new();
        languages.insert(
            "tw".to_string(),
            CustomLanguage {
                name: "Twi".to_string(),
                direction: TextDirection::Ltr,
            },
        );

        ConfigFile {
            chatabubble: AppConfig {
                to: Some("es".to_string()),
                source: Some("en".to_string()),
                scenario: Some("market".to_string()),
            },
            ai: AiConfig {
                endpoint: Some("http://localhost:11434".to_string()),
                model: Some("gemma3:12b".to_string()),
                api_key: None,
                api_key_env: None,
            },
            supabase: SupabaseConfig::default(),
            languages,
            scenarios: HashMap::new(),
        }
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);

        let mut config = create_test_config();
        config.scenarios.insert(
            "bakery".to_string(),
            CustomScenario {
                title: "At the bakery".to_string(),
                description: String::new(),
                category: Category::Shopping,
                difficulty: Difficulty::Beginner,
                persona: Persona {
                    name: "Hans".to_string(),
                    role: "baker".to_string(),
                    personality: "gruff".to_string(),
                    language_style: LanguageStyle::Casual,
                },
            },
        );

        manager.save(&config).unwrap();
        let loaded = manager.load().unwrap();

        assert_eq!(loaded.chatabubble.to, Some("es".to_string()));
        assert_eq!(loaded.ai.model, Some("gemma3:12b".to_string()));
        assert_eq!(loaded.languages["tw"].name, "Twi");
        assert_eq!(loaded.scenarios["bakery"].persona.name, "Hans");
        assert!(!temp_dir.path().join(".config.toml.tmp").exists());
    }

    #[test]
    fn test_load_nonexistent_config() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);

        assert!(manager.load().is_err());
        assert!(manager.load_or_default().chatabubble.to.is_none());
    }

    #[test]
    fn test_parse_minimal_toml() {
        let config: ConfigFile = toml::from_str(
            r#"
            [chatabubble]
            to = "fr"

            [languages.tw]
            name = "Twi"
            "#,
        )
        .unwrap();

        assert_eq!(config.chatabubble.to.as_deref(), Some("fr"));
        assert_eq!(config.languages["tw"].direction, TextDirection::Ltr);
        assert!(config.custom_languages()["tw"].is_custom());
    }

    #[test]
    #[serial]
    fn test_ai_api_key_priority() {
        unsafe {
            std::env::set_var("CHATABUBBLE_TEST_KEY", "from-env");
        }

        let ai = AiConfig {
            api_key: Some("from-file".to_string()),
            api_key_env: Some("CHATABUBBLE_TEST_KEY".to_string()),
            ..AiConfig::default()
        };
        assert_eq!(ai.get_api_key(), Some("from-env".to_string()));

        unsafe {
            std::env::remove_var("CHATABUBBLE_TEST_KEY");
        }
        assert_eq!(ai.get_api_key(), Some("from-file".to_string()));
    }

    #[test]
    fn test_resolve_config_from_file() {
        let resolved = resolve_config(&ResolveOptions::default(), &create_test_config()).unwrap();

        assert_eq!(resolved.target_language.code, "es");
        assert_eq!(resolved.source_language.code, "en");
        assert_eq!(resolved.scenario_id, "market");
        assert_eq!(resolved.endpoint, "http://localhost:11434");
        assert_eq!(resolved.model, "gemma3:12b");
    }

    #[test]
    fn test_resolve_config_builtin_defaults() {
        let config = ConfigFile {
            chatabubble: AppConfig {
                to: Some("ja".to_string()),
                ..AppConfig::default()
            },
            ..ConfigFile::default()
        };

        let resolved = resolve_config(&ResolveOptions::default(), &config).unwrap();

        assert_eq!(resolved.endpoint, DEFAULT_AI_ENDPOINT);
        assert_eq!(resolved.model, DEFAULT_MODEL);
        assert_eq!(resolved.scenario_id, DEFAULT_SCENARIO);
        assert_eq!(resolved.source_language.code, DEFAULT_SOURCE_LANGUAGE);
    }

    #[test]
    fn test_resolve_config_missing_target_language() {
        let result = resolve_config(&ResolveOptions::default(), &ConfigFile::default());
        assert!(result.unwrap_err().to_string().contains("'to'"));
    }

    #[test]
    fn test_resolve_config_custom_target_language() {
        let options = ResolveOptions {
            to: Some("tw".to_string()),
            ..ResolveOptions::default()
        };

        let resolved = resolve_config(&options, &create_test_config()).unwrap();
        assert_eq!(resolved.target_language.name, "Twi");
        assert!(resolved.target_language.is_custom());
    }

    #[test]
    fn test_resolve_config_same_source_and_target() {
        let options = ResolveOptions {
            to: Some("en".to_string()),
            ..ResolveOptions::default()
        };

        let result = resolve_config(&options, &create_test_config());
        assert!(result.unwrap_err().to_string().contains("both 'en'"));
    }

    #[test]
    fn test_resolve_config_unknown_language() {
        let options = ResolveOptions {
            to: Some("xx".to_string()),
            ..ResolveOptions::default()
        };

        let result = resolve_config(&options, &create_test_config());
        assert!(result.unwrap_err().to_string().contains("Invalid language code"));
    }

    #[test]
    fn test_resolve_backend_from_file() {
        let mut config = create_test_config();
        config.supabase = SupabaseConfig {
            url: Some("https://demo.supabase.co".to_string()),
            anon_key: Some("anon".to_string()),
            anon_key_env: Some("CHATABUBBLE_TEST_NONEXISTENT_ANON".to_string()),
        };

        let backend = resolve_backend(&config).unwrap();
        assert_eq!(backend.url, "https://demo.supabase.co");
        assert_eq!(backend.anon_key, "anon");
    }

    #[test]
    #[serial]
    fn test_resolve_backend_missing_url() {
        let original = std::env::var(SUPABASE_URL_ENV).ok();
        unsafe { std::env::remove_var(SUPABASE_URL_ENV) };

        let result = resolve_backend(&ConfigFile::default());
        assert!(result.unwrap_err().to_string().contains("supabase.url"));

        if let Some(v) = original {
            unsafe { std::env::set_var(SUPABASE_URL_ENV, v) };
        }
    }
}
