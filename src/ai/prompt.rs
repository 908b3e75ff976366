use crate::model::Scenario;

pub const TRANSLATION_PROMPT_TEMPLATE: &str = "You are a translator. Translate the following text to {target_language}. \
     Output only the translated text without any explanations. \
     Preserve the original formatting including blank lines and whitespace.";

#[allow(clippy::literal_string_with_formatting_args)]
pub fn build_translation_prompt(target_language: &str) -> String {
    // {target_language} is a placeholder for string replacement, not a format argument
    TRANSLATION_PROMPT_TEMPLATE.replace("{target_language}", target_language)
}

/// System prompt that puts the model in character for a scenario.
pub fn build_persona_prompt(scenario: &Scenario, target_language: &str) -> String {
    let persona = &scenario.persona;
    format!(
        "You are {name}, a {role}. Your personality: {personality}.\n\
         Roleplay scenario: {title}. {description}\n\
         You are talking with a {difficulty} learner of {target_language}. \
         Reply only in {target_language}, using a {style} register, \
         and keep each reply to a few short sentences so the learner can answer. \
         Stay in character and never mention that you are an AI.",
        name = persona.name,
        role = persona.role,
        personality = persona.personality,
        title = scenario.title,
        description = scenario.description,
        difficulty = scenario.difficulty,
        style = persona.language_style,
    )
}
