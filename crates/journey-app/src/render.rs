//! Plain-text rendering of conversation turns for the terminal.

use std::fmt::Write;

use journey_chat::{BlockClassifier, BlockKind, ClassifiedBlock, ConversationTurn, Sender};

/// Shown while a reply is pending.
pub const THINKING_INDICATOR: &str = "AI is thinking...";

const RELATED_HEADER: &str = "People like you also asked:";

/// Render one classified block as a single line (spacers render empty).
pub fn render_block(block: &ClassifiedBlock) -> String {
    let text = block.text();
    match block.kind {
        BlockKind::Spacer => String::new(),
        BlockKind::Heading => format!("## {text}"),
        BlockKind::Bullet => format!("  • {text}"),
        BlockKind::Question => format!("? {text}"),
        BlockKind::Location => format!("@ {text}"),
        BlockKind::Tip => format!("* {text}"),
        BlockKind::Celebration => format!("! {text}"),
        BlockKind::Paragraph => text.to_string(),
    }
}

/// Render a full turn, including its hints for assistant turns.
pub fn render_turn(turn: &ConversationTurn) -> String {
    let mut out = String::new();
    let stamp = turn.timestamp.format("%H:%M");

    match turn.sender {
        Sender::User => {
            let _ = writeln!(out, "you [{stamp}]> {}", turn.text);
        }
        Sender::Assistant => {
            let _ = writeln!(out, "assistant [{stamp}]");
            for block in BlockClassifier.classify(&turn.text) {
                let _ = writeln!(out, "{}", render_block(&block));
            }
            if let Some(hints) = turn.hints.as_ref() {
                if hints.has_map || hints.has_images {
                    let mut extras = Vec::new();
                    if hints.has_map {
                        extras.push("map");
                    }
                    if hints.has_images {
                        extras.push("photos");
                    }
                    let _ = writeln!(out, "[{} available]", extras.join(" + "));
                }
                if !hints.related_questions.is_empty() {
                    let _ = writeln!(out, "{RELATED_HEADER}");
                    for question in &hints.related_questions {
                        let _ = writeln!(out, "  > {question}");
                    }
                }
            }
        }
    }
    out
}

/// Render the starter prompts offered before the first user turn.
pub fn render_suggestions(suggestions: &[&str]) -> String {
    if suggestions.is_empty() {
        return String::new();
    }
    let mut out = String::from("Try asking:\n");
    for s in suggestions {
        let _ = writeln!(out, "  - {s}");
    }
    out
}
