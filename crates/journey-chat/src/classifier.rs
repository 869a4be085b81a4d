//! Heuristic text-to-block classifier for assistant replies.
//!
//! Each line is matched against a fixed, ordered rule table and takes the
//! kind of the first rule that fires. Rule order is the only tie-break: a
//! question that names a place is a `Question`, not a `Location`.
//!
//! The length guards are part of each rule; they keep short fragments such
//! as "Why?" or "Bali" from turning into callouts.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::{BlockKind, ClassifiedBlock};

// =============================================================================
// Vocabulary
// =============================================================================

/// Characters that open a bullet line on their own.
const BULLET_GLYPHS: &[char] = &['•', '●', '◦', '▪', '‣'];

/// ASCII markers that open a bullet line when followed by whitespace.
const ASCII_BULLETS: &[char] = &['-', '*'];

/// Known place names for location callouts.
pub const PLACE_NAMES: &[&str] = &[
    "Bali",
    "Ubud",
    "Seminyak",
    "Uluwatu",
    "Indonesia",
    "Japan",
    "Tokyo",
    "Kyoto",
    "Osaka",
    "Europe",
    "Paris",
    "France",
    "Rome",
    "Italy",
    "Barcelona",
    "Spain",
    "Amsterdam",
    "London",
    "Greece",
    "Santorini",
    "Iceland",
    "Thailand",
    "Vietnam",
    "Maldives",
    "Portugal",
];

/// Openers that mark an enthusiastic line.
const CELEBRATION_OPENERS: &[&str] = &[
    "Absolutely!",
    "Great!",
    "Perfect!",
    "Excellent!",
    "Wonderful!",
    "Fantastic!",
    "Amazing!",
    "Awesome!",
];

static PLACE_RE: LazyLock<Regex> = LazyLock::new(|| {
    let alts: Vec<String> = PLACE_NAMES.iter().map(|p| regex::escape(p)).collect();
    Regex::new(&format!(r"(?i)\b(?:{})\b", alts.join("|"))).expect("Invalid place regex")
});

// Word-prefix match: "tips" and "recommended" count, "multiple" and "country" do not.
static ADVICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:recommend|suggest|tip|advice|advise|consider|try)")
        .expect("Invalid advice regex")
});

// =============================================================================
// Rules
// =============================================================================

/// One entry of the ordered rule table.
struct Rule {
    kind: BlockKind,
    matches: fn(&str) -> bool,
}

/// Evaluated top to bottom on the trimmed line; first match wins.
const RULES: &[Rule] = &[
    Rule {
        kind: BlockKind::Spacer,
        matches: |line| line.is_empty(),
    },
    Rule {
        kind: BlockKind::Bullet,
        matches: |line| strip_bullet(line).is_some(),
    },
    Rule {
        kind: BlockKind::Question,
        matches: |line| line.ends_with('?') && char_len(line) > 10,
    },
    Rule {
        kind: BlockKind::Location,
        matches: |line| PLACE_RE.is_match(line) && char_len(line) > 20,
    },
    Rule {
        kind: BlockKind::Tip,
        matches: |line| ADVICE_RE.is_match(line) && char_len(line) > 15,
    },
    Rule {
        kind: BlockKind::Celebration,
        matches: |line| CELEBRATION_OPENERS.iter().any(|o| line.starts_with(o)),
    },
    Rule {
        kind: BlockKind::Heading,
        matches: |line| line.ends_with(':') && char_len(line) < 50,
    },
];

fn char_len(line: &str) -> usize {
    line.chars().count()
}

/// Remainder of a bullet line with its marker and surrounding whitespace removed.
fn strip_bullet(line: &str) -> Option<&str> {
    let mut chars = line.chars();
    let first = chars.next()?;
    let rest = chars.as_str();

    if BULLET_GLYPHS.contains(&first) {
        return Some(rest.trim());
    }
    if ASCII_BULLETS.contains(&first) && rest.starts_with(char::is_whitespace) {
        return Some(rest.trim());
    }
    None
}

// =============================================================================
// BlockClassifier
// =============================================================================

/// Splits reply text into typed presentation blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockClassifier;

impl BlockClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify every line of `text`, in order.
    ///
    /// Always yields at least one block: empty input is a single spacer.
    pub fn classify(&self, text: &str) -> Vec<ClassifiedBlock> {
        text.split('\n').map(|line| self.classify_line(line)).collect()
    }

    /// Classify a single line.
    pub fn classify_line(&self, line: &str) -> ClassifiedBlock {
        let trimmed = line.trim();
        let kind = RULES
            .iter()
            .find(|rule| (rule.matches)(trimmed))
            .map(|rule| rule.kind)
            .unwrap_or(BlockKind::Paragraph);

        match kind {
            BlockKind::Spacer => ClassifiedBlock::spacer(),
            BlockKind::Bullet => {
                ClassifiedBlock::new(kind, strip_bullet(trimmed).unwrap_or(trimmed))
            }
            _ => ClassifiedBlock::new(kind, trimmed),
        }
    }
}

/// Classify `text` with the default rule table.
pub fn classify(text: &str) -> Vec<ClassifiedBlock> {
    BlockClassifier.classify(text)
}

/// Place names mentioned in `text`, in order of first appearance.
pub fn places_in(text: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for m in PLACE_RE.find_iter(text) {
        let canonical = PLACE_NAMES
            .iter()
            .find(|p| p.eq_ignore_ascii_case(m.as_str()))
            .map(|p| p.to_string())
            .unwrap_or_else(|| m.as_str().to_string());
        if !found.contains(&canonical) {
            found.push(canonical);
        }
    }
    found
}
