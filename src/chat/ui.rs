//! Chat mode UI components.

use crate::model::{ChatMessage, Language, Scenario, Sender, Session, TextDirection};
use crate::ui::Style;

use super::command::SLASH_COMMANDS;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn print_header(scenario: &Scenario, source: &Language, target: &Language) {
    println!(
        "{} {} - Roleplay Practice",
        Style::header("chatabubble"),
        Style::version(format!("v{VERSION}"))
    );
    println!();
    println!(
        "{} {}",
        Style::header(&scenario.title),
        Style::secondary(format!(
            "[{}, {}]",
            scenario.category, scenario.difficulty
        ))
    );
    println!("{}", Style::secondary(&scenario.description));
    println!(
        "  {} {} ({}, {})",
        Style::label("with"),
        Style::persona(&scenario.persona.name),
        scenario.persona.role,
        scenario.persona.personality
    );
    println!(
        "  {} {} {} {}",
        Style::label("practice"),
        Style::code(&target.code),
        Style::label("from"),
        Style::code(&source.code)
    );
    if target.direction == TextDirection::Rtl {
        println!("  {}", Style::hint("Replies are written right-to-left."));
    }
    println!();
}

pub fn print_message(message: &ChatMessage, persona_name: &str) {
    let speaker = match message.sender {
        Sender::User => Style::user("You"),
        Sender::Assistant => Style::persona(persona_name),
    };
    println!("{speaker}: {}", message.target_text());

    // The other side of the pair, in the language not shown above
    let other = match message.sender {
        Sender::User => &message.content.original,
        Sender::Assistant => &message.content.translated,
    };
    if !other.is_empty() && other != message.target_text() {
        println!("  {}", Style::translation(other));
    }
    println!();
}

pub fn print_history(messages: &[ChatMessage], persona_name: &str) {
    if messages.is_empty() {
        println!("{}", Style::secondary("No messages yet."));
        println!();
        return;
    }
    println!("{}", Style::header("Conversation"));
    for message in messages {
        print_message(message, persona_name);
    }
}

pub fn print_help() {
    println!("{}", Style::header("Available commands"));
    for (cmd, desc) in SLASH_COMMANDS {
        println!("  {}{}", Style::command(format!("{cmd:10}")), Style::secondary(desc));
    }
    println!();
}

pub fn print_resumed(session: &Session) {
    println!(
        "{} Resumed session {} ({} messages)",
        Style::success("✓"),
        Style::value(&session.id),
        session.messages.len()
    );
    println!();
}

pub fn print_goodbye(session: Option<&Session>) {
    if let Some(session) = session {
        println!(
            "{} {}",
            Style::secondary("Session kept on this device:"),
            Style::value(&session.id)
        );
    }
    println!("{}", Style::success("¡Hasta luego!"));
}
