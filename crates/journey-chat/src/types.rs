//! Shared data types for conversation turns and classified reply blocks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Turns
// =============================================================================

/// Author of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Assistant,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rendering hints attached to assistant turns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnHints {
    /// Show a map panel next to the reply.
    pub has_map: bool,
    /// Show an image gallery under the reply.
    pub has_images: bool,
    /// Follow-up prompts offered as "people also asked".
    pub related_questions: Vec<String>,
}

impl TurnHints {
    /// True when no hint would change the presentation.
    pub fn is_empty(&self) -> bool {
        !self.has_map && !self.has_images && self.related_questions.is_empty()
    }
}

/// One message in a conversation. Immutable once appended to a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// Unique within the owning store; derived from creation time.
    pub id: String,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    /// Only ever set on assistant turns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hints: Option<TurnHints>,
}

impl ConversationTurn {
    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }

    pub fn is_assistant(&self) -> bool {
        self.sender == Sender::Assistant
    }
}

// =============================================================================
// Classified blocks
// =============================================================================

/// Visual block type produced by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Heading,
    Bullet,
    Question,
    Location,
    Tip,
    Celebration,
    Paragraph,
    Spacer,
}

/// One typed fragment of a reply, recomputed on every render pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedBlock {
    pub kind: BlockKind,
    /// Trimmed source line (marker stripped for bullets). `None` for spacers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl ClassifiedBlock {
    pub fn spacer() -> Self {
        Self {
            kind: BlockKind::Spacer,
            content: None,
        }
    }

    pub fn new(kind: BlockKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: Some(content.into()),
        }
    }

    /// Block text, empty for spacers.
    pub fn text(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }
}
