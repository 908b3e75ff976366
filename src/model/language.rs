//! Languages a session can be held in.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::ui::Style;

/// Writing direction of a language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    Ltr,
    Rtl,
}

/// A language the user can learn or translate into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Language {
    /// Short language code (e.g. `es`).
    pub code: String,
    /// Display name, also used when prompting the model.
    pub name: String,
    pub direction: TextDirection,
    /// Set for languages declared by the user rather than built in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_custom: Option<bool>,
}

impl Language {
    pub fn new(code: &str, name: &str, direction: TextDirection) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            direction,
            is_custom: None,
        }
    }

    /// Builds a user-declared language.
    pub fn custom(code: &str, name: &str, direction: TextDirection) -> Self {
        Self {
            is_custom: Some(true),
            ..Self::new(code, name, direction)
        }
    }

    pub fn is_custom(&self) -> bool {
        self.is_custom.unwrap_or(false)
    }

    /// English, the language assistant replies are translated back into.
    pub fn english() -> Self {
        Self::new("en", "English", TextDirection::Ltr)
    }
}

/// Built-in languages: (code, name, direction).
pub const PREDEFINED_LANGUAGES: &[(&str, &str, TextDirection)] = &[
    ("es", "Spanish", TextDirection::Ltr),
    ("fr", "French", TextDirection::Ltr),
    ("de", "German", TextDirection::Ltr),
    ("it", "Italian", TextDirection::Ltr),
    ("pt", "Portuguese", TextDirection::Ltr),
    ("ru", "Russian", TextDirection::Ltr),
    ("ja", "Japanese", TextDirection::Ltr),
    ("zh", "Chinese", TextDirection::Ltr),
    ("ko", "Korean", TextDirection::Ltr),
    ("ar", "Arabic", TextDirection::Rtl),
    ("yo", "Yoruba", TextDirection::Ltr),
    ("ha", "Hausa", TextDirection::Ltr),
    ("ig", "Igbo", TextDirection::Ltr),
];

/// Looks up a built-in language by code. English is always known.
pub fn find_language(code: &str) -> Option<Language> {
    if code == "en" {
        return Some(Language::english());
    }
    PREDEFINED_LANGUAGES
        .iter()
        .find(|(c, _, _)| *c == code)
        .map(|(c, name, direction)| Language::new(c, name, *direction))
}

/// Resolves a language code against custom languages first, then built-ins.
///
/// # Errors
///
/// Returns an error if the code is neither custom nor built in.
pub fn resolve_language(code: &str, custom: &HashMap<String, Language>) -> Result<Language> {
    if let Some(language) = custom.get(code) {
        return Ok(language.clone());
    }
    find_language(code).ok_or_else(|| {
        anyhow::anyhow!(
            "Invalid language code: '{code}'\n\n\
             Valid language codes: es, fr, de, it, ja, zh, ar, ...\n\
             Run 'chatabubble languages' to see all supported codes."
        )
    })
}

/// Prints built-in and custom languages to stdout.
pub fn print_languages(custom: &HashMap<String, Language>) {
    println!("{}", Style::header("Supported languages"));
    for (code, name, direction) in PREDEFINED_LANGUAGES {
        let marker = if *direction == TextDirection::Rtl {
            " (rtl)"
        } else {
            ""
        };
        println!(
            "  {:5} {}{}",
            Style::code(code),
            Style::secondary(name),
            Style::secondary(marker)
        );
    }

    if !custom.is_empty() {
        println!();
        println!("{}", Style::header("Custom languages"));
        let mut codes: Vec<_> = custom.keys().collect();
        codes.sort();
        for code in codes {
            println!(
                "  {:5} {}",
                Style::code(code),
                Style::secondary(&custom[code].name)
            );
        }
    }
}
