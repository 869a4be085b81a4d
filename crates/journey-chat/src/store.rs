//! Append-only, in-memory message store for one conversation.

use chrono::Utc;

use crate::types::{ConversationTurn, Sender, TurnHints};

/// Ordered sequence of turns. Insertion order is conversation order.
///
/// Turns are never edited or removed; the store only hands out shared
/// references, and it lives exactly as long as its conversation view.
#[derive(Debug, Default)]
pub struct MessageStore {
    turns: Vec<ConversationTurn>,
    /// Last numeric id handed out, in epoch milliseconds.
    last_id: i64,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a user turn.
    pub fn push_user(&mut self, text: impl Into<String>) -> &ConversationTurn {
        self.push(Sender::User, text.into(), None)
    }

    /// Append an assistant turn. Empty hints are dropped.
    pub fn push_assistant(
        &mut self,
        text: impl Into<String>,
        hints: Option<TurnHints>,
    ) -> &ConversationTurn {
        let hints = hints.filter(|h| !h.is_empty());
        self.push(Sender::Assistant, text.into(), hints)
    }

    /// All turns in conversation order.
    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ConversationTurn> {
        self.turns.iter()
    }

    pub fn last(&self) -> Option<&ConversationTurn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    fn push(&mut self, sender: Sender, text: String, hints: Option<TurnHints>) -> &ConversationTurn {
        let timestamp = Utc::now();
        // Two turns created in the same millisecond still get distinct ids.
        let id = timestamp.timestamp_millis().max(self.last_id + 1);
        self.last_id = id;

        self.turns.push(ConversationTurn {
            id: id.to_string(),
            text,
            sender,
            timestamp,
            hints: if sender == Sender::Assistant { hints } else { None },
        });
        let index = self.turns.len() - 1;
        &self.turns[index]
    }
}

impl<'a> IntoIterator for &'a MessageStore {
    type Item = &'a ConversationTurn;
    type IntoIter = std::slice::Iter<'a, ConversationTurn>;

    fn into_iter(self) -> Self::IntoIter {
        self.turns.iter()
    }
}
