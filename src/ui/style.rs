//! Colour and formatting helpers for terminal output (owo-colors).

use owo_colors::OwoColorize;
use std::fmt::Display;

/// Styles for the semantic elements of the chat and listings.
pub struct Style;

impl Style {
    /// Section headers ("Presets", "Available commands")
    pub fn header<T: Display>(text: T) -> String {
        format!("{}", text.bold())
    }

    /// Field labels in detail views
    pub fn label<T: Display>(text: T) -> String {
        format!("{}", text.dimmed())
    }

    /// Primary values: scenario ids, model names
    pub fn value<T: Display>(text: T) -> String {
        format!("{}", text.cyan())
    }

    /// Descriptions and other supplementary text
    pub fn secondary<T: Display>(text: T) -> String {
        format!("{}", text.dimmed())
    }

    pub fn success<T: Display>(text: T) -> String {
        format!("{}", text.green())
    }

    pub fn error<T: Display>(text: T) -> String {
        format!("{}", text.red().bold())
    }

    pub fn warning<T: Display>(text: T) -> String {
        format!("{}", text.yellow())
    }

    /// Slash commands ("/save", "/help")
    pub fn command<T: Display>(text: T) -> String {
        format!("{}", text.green())
    }

    /// Language codes
    pub fn code<T: Display>(text: T) -> String {
        format!("{}", text.yellow())
    }

    pub fn hint<T: Display>(text: T) -> String {
        format!("{}", text.dimmed().italic())
    }

    pub fn version<T: Display>(text: T) -> String {
        format!("{}", text.dimmed())
    }

    /// Speaker tag for the learner
    pub fn user<T: Display>(text: T) -> String {
        format!("{}", text.blue().bold())
    }

    /// Speaker tag for the persona
    pub fn persona<T: Display>(text: T) -> String {
        format!("{}", text.magenta().bold())
    }

    /// The translated line shown under a message
    pub fn translation<T: Display>(text: T) -> String {
        format!("{}", text.dimmed().italic())
    }
}
