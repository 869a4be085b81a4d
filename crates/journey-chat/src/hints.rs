//! Rendering hints for assistant turns, derived from the reply text.

use crate::classifier::{places_in, BlockClassifier};
use crate::types::{BlockKind, TurnHints};

/// Destinations with a photo gallery and a canned follow-up list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    Bali,
    Japan,
    Europe,
}

const BALI_FOLLOW_UPS: &[&str] = &[
    "What are the average temperatures in Bali during the low tourist season?",
    "Which months have the lowest rainfall and pleasant humidity in Bali?",
    "How does crowd density vary between the dry and wet seasons in Bali?",
    "What are the best months for family-friendly activities with fewer tourists in Bali?",
];

const JAPAN_FOLLOW_UPS: &[&str] = &[
    "When is cherry blossom season in Tokyo and Kyoto?",
    "Is the Japan Rail Pass worth it for a one-week trip?",
    "Which ryokan areas are easiest to reach from Kyoto?",
    "How crowded is Japan during Golden Week?",
];

const EUROPE_FOLLOW_UPS: &[&str] = &[
    "How many cities can I comfortably see in two weeks in Europe?",
    "Is it cheaper to travel between European cities by train or plane?",
    "Which European cities are best in the shoulder season?",
    "Do I need a Schengen visa for my trip?",
];

/// Follow-ups for any other destination.
const GENERAL_FOLLOW_UPS: &[&str] = &[
    "What's the weather like during peak season?",
    "Are there any local festivals to consider?",
    "What are the accommodation prices like?",
    "How crowded are the main attractions?",
];

fn region_of(place: &str) -> Option<Region> {
    match place {
        "Bali" | "Ubud" | "Seminyak" | "Uluwatu" | "Indonesia" => Some(Region::Bali),
        "Japan" | "Tokyo" | "Kyoto" | "Osaka" => Some(Region::Japan),
        "Europe" | "Paris" | "France" | "Rome" | "Italy" | "Barcelona" | "Spain"
        | "Amsterdam" | "London" | "Greece" | "Santorini" | "Portugal" => Some(Region::Europe),
        _ => None,
    }
}

fn follow_ups(region: Option<Region>) -> &'static [&'static str] {
    match region {
        Some(Region::Bali) => BALI_FOLLOW_UPS,
        Some(Region::Japan) => JAPAN_FOLLOW_UPS,
        Some(Region::Europe) => EUROPE_FOLLOW_UPS,
        None => GENERAL_FOLLOW_UPS,
    }
}

/// Derive hints for an assistant reply. `None` when nothing applies.
///
/// Deterministic: the same text always yields the same hints.
pub fn derive(reply: &str) -> Option<TurnHints> {
    let places = places_in(reply);
    if places.is_empty() {
        return None;
    }

    let region = places.iter().find_map(|p| region_of(p));
    let has_location_block = BlockClassifier
        .classify(reply)
        .iter()
        .any(|b| b.kind == BlockKind::Location);

    Some(TurnHints {
        has_map: true,
        has_images: region.is_some() || has_location_block,
        related_questions: follow_ups(region).iter().map(|q| q.to_string()).collect(),
    })
}
