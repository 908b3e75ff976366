//! Scenario catalog.
//!
//! Built-in roleplay scenarios plus user-defined scenarios from the config
//! file. A scenario is bound to a target language only when a session starts.

use std::collections::HashMap;
use thiserror::Error;

use crate::config::CustomScenario;
use crate::model::{Category, Difficulty, Language, LanguageStyle, Persona, Scenario};
use crate::ui::Style;

/// A built-in scenario (not modifiable by users).
#[derive(Debug, Clone)]
pub struct PresetScenario {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub category: Category,
    pub difficulty: Difficulty,
    pub persona_name: &'static str,
    pub persona_role: &'static str,
    pub personality: &'static str,
    pub language_style: LanguageStyle,
}

impl PresetScenario {
    fn to_scenario(&self, target_language: Language) -> Scenario {
        Scenario {
            id: self.id.to_string(),
            title: self.title.to_string(),
            description: self.description.to_string(),
            category: self.category,
            difficulty: self.difficulty,
            persona: Persona {
                name: self.persona_name.to_string(),
                role: self.persona_role.to_string(),
                personality: self.personality.to_string(),
                language_style: self.language_style,
            },
            target_language,
        }
    }
}

pub const PRESETS: &[PresetScenario] = &[
    PresetScenario {
        id: "cafe",
        title: "Ordering at a café",
        description: "Order a drink and a pastry, ask about prices and pay.",
        category: Category::Dining,
        difficulty: Difficulty::Beginner,
        persona_name: "Lucía",
        persona_role: "barista",
        personality: "cheerful and patient, happy to repeat things",
        language_style: LanguageStyle::Casual,
    },
    PresetScenario {
        id: "market",
        title: "Haggling at the market",
        description: "Buy fruit and a souvenir, negotiate a better price.",
        category: Category::Shopping,
        difficulty: Difficulty::Intermediate,
        persona_name: "Marco",
        persona_role: "market vendor",
        personality: "talkative and playful, likes to bargain",
        language_style: LanguageStyle::Mixed,
    },
    PresetScenario {
        id: "hotel",
        title: "Checking into a hotel",
        description: "Check in, ask about breakfast times and report a problem with the room.",
        category: Category::Travel,
        difficulty: Difficulty::Beginner,
        persona_name: "Sophie",
        persona_role: "hotel receptionist",
        personality: "polite and efficient",
        language_style: LanguageStyle::Formal,
    },
    PresetScenario {
        id: "interview",
        title: "Job interview",
        description: "Answer questions about your experience and ask about the role.",
        category: Category::Business,
        difficulty: Difficulty::Advanced,
        persona_name: "Mr. Tanaka",
        persona_role: "hiring manager",
        personality: "serious but fair, asks follow-up questions",
        language_style: LanguageStyle::Formal,
    },
    PresetScenario {
        id: "neighbor",
        title: "Chatting with a neighbor",
        description: "Small talk about the weekend, hobbies and the weather.",
        category: Category::Casual,
        difficulty: Difficulty::Intermediate,
        persona_name: "Amara",
        persona_role: "friendly neighbor",
        personality: "warm and curious",
        language_style: LanguageStyle::Casual,
    },
];

#[derive(Debug, Clone, Error)]
pub enum ScenarioError {
    #[error("Scenario '{key}' not found\n\nAvailable scenarios: {}", available.join(", "))]
    NotFound { key: String, available: Vec<String> },
}

pub fn get_preset(id: &str) -> Option<&'static PresetScenario> {
    PRESETS.iter().find(|p| p.id == id)
}

/// Returns custom scenario ids sorted alphabetically.
#[allow(clippy::implicit_hasher)]
pub fn sorted_custom_keys(scenarios: &HashMap<String, CustomScenario>) -> Vec<&String> {
    let mut keys: Vec<_> = scenarios.keys().collect();
    keys.sort();
    keys
}

/// Resolves a scenario id and binds it to `target_language`.
///
/// Custom scenarios shadow presets with the same id.
#[allow(clippy::implicit_hasher)]
pub fn resolve_scenario(
    id: &str,
    custom: &HashMap<String, CustomScenario>,
    target_language: Language,
) -> Result<Scenario, ScenarioError> {
    if let Some(scenario) = custom.get(id) {
        return Ok(scenario.to_scenario(id, target_language));
    }

    if let Some(preset) = get_preset(id) {
        return Ok(preset.to_scenario(target_language));
    }

    let mut available: Vec<String> = PRESETS.iter().map(|p| p.id.to_string()).collect();
    available.extend(sorted_custom_keys(custom).into_iter().cloned());
    Err(ScenarioError::NotFound {
        key: id.to_string(),
        available,
    })
}

/// Prints preset and custom scenarios to stdout.
#[allow(clippy::implicit_hasher)]
pub fn print_scenarios(custom: &HashMap<String, CustomScenario>) {
    println!("{}", Style::header("Preset scenarios"));
    for preset in PRESETS {
        println!(
            "  {:10} {} {}",
            Style::value(preset.id),
            preset.title,
            Style::secondary(format!("[{}, {}]", preset.category, preset.difficulty))
        );
    }

    if !custom.is_empty() {
        println!();
        println!("{}", Style::header("Custom scenarios"));
        for key in sorted_custom_keys(custom) {
            let scenario = &custom[key];
            println!(
                "  {:10} {} {}",
                Style::value(key),
                scenario.title,
                Style::secondary(format!(
                    "[{}, {}]",
                    scenario.category, scenario.difficulty
                ))
            );
        }
    }
}
