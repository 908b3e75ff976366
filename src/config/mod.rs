mod manager;

pub use manager::{
    AiConfig, AppConfig, BackendSettings, ConfigFile, ConfigManager, CustomLanguage,
    CustomScenario, DEFAULT_AI_ENDPOINT, DEFAULT_MODEL, DEFAULT_SCENARIO,
    DEFAULT_SOURCE_LANGUAGE, OPENAI_API_KEY_ENV, ResolveOptions, ResolvedConfig,
    SUPABASE_ANON_KEY_ENV, SUPABASE_URL_ENV, SupabaseConfig, resolve_backend, resolve_config,
};
