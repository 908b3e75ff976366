#![allow(clippy::unwrap_used)]
//! Config priority contract tests.
//!
//! These tests verify that CLI options take priority over config file settings.
//! Priority order (highest to lowest):
//! 1. CLI arguments
//! 2. Config file defaults
//! 3. Built-in defaults

use std::collections::HashMap;

use chatabubble::catalog::resolve_scenario;
use chatabubble::config::{
    AiConfig, AppConfig, ConfigFile, CustomLanguage, CustomScenario, DEFAULT_AI_ENDPOINT,
    DEFAULT_MODEL, DEFAULT_SCENARIO, ResolveOptions, resolve_config,
};
use chatabubble::model::{Category, Difficulty, LanguageStyle, Persona, TextDirection};

fn make_config_with_defaults() -> ConfigFile {
    let mut languages = HashMap::new();
    languages.insert(
        "haw".to_string(),
        CustomLanguage {
            name: "Hawaiian".to_string(),
            direction: TextDirection::Ltr,
        },
    );

    let mut scenarios = HashMap::new();
    scenarios.insert(
        "bakery".to_string(),
        CustomScenario {
            title: "At the Bakery".to_string(),
            description: "Buy bread for a picnic".to_string(),
            category: Category::Shopping,
            difficulty: Difficulty::Beginner,
            persona: Persona {
                name: "Pierre".to_string(),
                role: "Baker".to_string(),
                personality: "Cheerful and chatty".to_string(),
                language_style: LanguageStyle::Casual,
            },
        },
    );

    ConfigFile {
        chatabubble: AppConfig {
            to: Some("fr".to_string()),
            source: Some("de".to_string()),
            scenario: Some("bakery".to_string()),
        },
        ai: AiConfig {
            endpoint: Some("http://localhost:11434".to_string()),
            model: Some("config_model".to_string()),
            api_key: Some("file_key".to_string()),
            api_key_env: None,
        },
        languages,
        scenarios,
        ..ConfigFile::default()
    }
}

#[test]
fn test_config_file_values_used_without_cli_options() {
    let config = make_config_with_defaults();

    let resolved = resolve_config(&ResolveOptions::default(), &config).unwrap();

    assert_eq!(resolved.target_language.code, "fr");
    assert_eq!(resolved.source_language.code, "de");
    assert_eq!(resolved.scenario_id, "bakery");
    assert_eq!(resolved.endpoint, "http://localhost:11434");
    assert_eq!(resolved.model, "config_model");
    assert_eq!(resolved.api_key.as_deref(), Some("file_key"));
}

#[test]
fn test_cli_options_override_config_file() {
    let config = make_config_with_defaults();
    let options = ResolveOptions {
        to: Some("ja".to_string()),
        source: Some("en".to_string()),
        scenario: Some("hotel".to_string()),
        endpoint: Some("http://cli.local".to_string()),
        model: Some("cli_model".to_string()),
    };

    let resolved = resolve_config(&options, &config).unwrap();

    assert_eq!(resolved.target_language.code, "ja");
    assert_eq!(resolved.source_language.code, "en");
    assert_eq!(resolved.scenario_id, "hotel");
    assert_eq!(resolved.endpoint, "http://cli.local");
    assert_eq!(resolved.model, "cli_model");
}

#[test]
fn test_partial_cli_options_merge_with_config() {
    let config = make_config_with_defaults();
    let options = ResolveOptions {
        model: Some("cli_model".to_string()),
        ..ResolveOptions::default()
    };

    let resolved = resolve_config(&options, &config).unwrap();

    assert_eq!(resolved.model, "cli_model");
    assert_eq!(resolved.target_language.code, "fr");
    assert_eq!(resolved.endpoint, "http://localhost:11434");
}

#[test]
fn test_builtin_defaults_fill_the_rest() {
    let config = ConfigFile::default();
    let options = ResolveOptions {
        to: Some("es".to_string()),
        ..ResolveOptions::default()
    };

    let resolved = resolve_config(&options, &config).unwrap();

    assert_eq!(resolved.source_language.code, "en");
    assert_eq!(resolved.scenario_id, DEFAULT_SCENARIO);
    assert_eq!(resolved.endpoint, DEFAULT_AI_ENDPOINT);
    assert_eq!(resolved.model, DEFAULT_MODEL);
}

#[test]
fn test_cli_target_can_use_custom_language() {
    let config = make_config_with_defaults();
    let options = ResolveOptions {
        to: Some("haw".to_string()),
        ..ResolveOptions::default()
    };

    let resolved = resolve_config(&options, &config).unwrap();

    assert_eq!(resolved.target_language.name, "Hawaiian");
    assert!(resolved.target_language.is_custom());
}

#[test]
fn test_missing_target_language_explains_where_to_set_it() {
    let err = resolve_config(&ResolveOptions::default(), &ConfigFile::default()).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("'to'"));
    assert!(message.contains("--to"));
}

#[test]
fn test_configured_scenario_resolves_to_custom_persona() {
    let config = make_config_with_defaults();
    let resolved = resolve_config(&ResolveOptions::default(), &config).unwrap();

    let scenario = resolve_scenario(
        &resolved.scenario_id,
        &config.scenarios,
        resolved.target_language.clone(),
    )
    .unwrap();

    assert_eq!(scenario.persona.name, "Pierre");
    assert_eq!(scenario.target_language.code, "fr");
}

#[test]
fn test_cli_scenario_overrides_custom_default() {
    let config = make_config_with_defaults();
    let options = ResolveOptions {
        scenario: Some("cafe".to_string()),
        ..ResolveOptions::default()
    };
    let resolved = resolve_config(&options, &config).unwrap();

    let scenario = resolve_scenario(
        &resolved.scenario_id,
        &config.scenarios,
        resolved.target_language.clone(),
    )
    .unwrap();

    assert_eq!(scenario.id, "cafe");
    assert_eq!(scenario.category, Category::Dining);
}
