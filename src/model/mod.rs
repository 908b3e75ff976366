//! Domain types shared by the pipeline, the stores and the sync service.

mod language;
mod message;
mod scenario;
mod session;

pub use language::{
    Language, PREDEFINED_LANGUAGES, TextDirection, find_language, print_languages,
    resolve_language,
};
pub use message::{ChatMessage, MessageContent, Sender, TRANSLATION_PLACEHOLDER, now_millis};
pub use scenario::{Category, Difficulty, LanguageStyle, Persona, Scenario};
pub use session::{Session, SessionStatus};
