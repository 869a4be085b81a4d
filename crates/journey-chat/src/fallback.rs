//! Local replies used when the remote assistant is unreachable or unconfigured.
//!
//! Everything here is total: any input yields a non-empty reply and nothing
//! can fail. Topic routing is deterministic; uniform mode is random by design.

use std::sync::LazyLock;

use async_trait::async_trait;
use journey_core::FallbackStrategy;
use rand::Rng;
use regex::Regex;

use crate::client::Assistant;
use crate::error::ChatError;
use crate::session::Session;

// =============================================================================
// Reply pools and templates
// =============================================================================

/// Generic replies for uniform mode.
const UNIFORM_REPLIES: &[&str] = &[
    "I can help you with that! Let me suggest some options based on your preferences. What's your ideal travel style - adventure, relaxation, cultural exploration, or a mix?",
    "Excellent choice! I can provide recommendations for accommodations, activities, and local experiences. What's most important to you for this trip?",
    "Based on your query, I can provide detailed travel insights. The best time to visit most tropical destinations is during the shoulder seasons when you'll find ideal weather conditions with fewer crowds and better prices.",
    "Great question! I can help you plan the perfect timing for your trip. Weather patterns, local events, and tourist seasons all play important roles in determining the ideal travel dates.",
];

const JAPAN_REPLY: &str = "Absolutely! Here's a 7-day Japan itinerary to get you started:

Days 1-3 in Tokyo:
• Explore Shibuya, Shinjuku and the Asakusa temple district
• Take a day trip to Nikko or Kamakura
• Sample street food at Tsukiji Outer Market

Days 4-6 in Kyoto:
• Walk through the torii gates at Fushimi Inari at sunrise
• Visit Kinkaku-ji and the Arashiyama bamboo grove
• Spend an evening in Gion looking for maiko

Day 7 in Osaka:
• Eat your way down Dotonbori before flying home

I recommend a 7-day Japan Rail Pass if you plan to travel between cities.

Would you like hotel suggestions for each stop?";

const BALI_REPLY: &str = "Great! Bali is wonderful almost any time of year.

Best time to visit:
• April to June and September to early October bring dry weather and fewer crowds
• July and August are peak season with higher prices
• November to March is the wet season with short tropical downpours

Where to stay:
• Ubud for rice terraces, yoga and culture
• Seminyak for beach clubs and dining
• Uluwatu for surf breaks and clifftop sunsets

Consider splitting your stay between Ubud and the coast to see both sides of Bali.

How many days are you planning to spend on the island?";

const EUROPE_REPLY: &str = "Perfect! Europe rewards a little planning.

A classic first route:
• Paris for museums, cafes and the Seine
• Amsterdam for canals and cycling
• Rome for ancient history and trattorias
• Barcelona for Gaudi and the beaches

Getting around:
• Trains connect most capitals in a few hours
• Budget airlines are cheap if you travel light

Try to visit in May, June or September for mild weather and shorter queues across Europe.

Which countries are at the top of your list?";

const TRIP_PLANNING_REPLY: &str = "I'd love to help you plan your trip!

To build the right itinerary I need a few details:
• Where would you like to go?
• How many days do you have?
• What's your rough budget per day?
• Do you prefer adventure, relaxation or culture?

I suggest starting with the destination and dates, then we can fill in each day together.

Where are you dreaming of going?";

const BUDGET_REPLY: &str = "Traveling on a budget is absolutely doable!

Ways to save:
• Travel in shoulder season for lower flight and hotel prices
• Stay in guesthouses, hostels or apartment rentals
• Eat where the locals eat and try street food
• Use public transport and rail passes instead of taxis

Budget-friendly destinations:
• Southeast Asia: Vietnam, Thailand and Indonesia
• Eastern Europe: Portugal, Poland and Hungary

Consider setting a daily spending limit before you leave.

What's your budget range for this trip?";

const ROMANTIC_REPLY: &str = "Wonderful! Here are some romantic destinations for couples:

Top picks:
• Santorini for whitewashed villages and caldera sunsets
• Maldives for overwater villas and private beaches
• Paris for candlelit dinners and evening walks along the Seine
• Kyoto for quiet temples and traditional ryokan stays
• Bali for jungle villas and spa retreats

I recommend booking sunset dinners and special experiences in advance.

Is this for a honeymoon, an anniversary or a getaway?";

const PACKING_REPLY: &str = "Smart thinking! Packing well makes every trip easier.

Essentials:
• Passport, visas and copies of important documents
• Travel adapter and a portable charger
• Comfortable walking shoes
• Basic medication and a small first-aid kit

For cold destinations:
• Thermal base layers and a warm waterproof jacket
• Hat, gloves and wool socks

Tip: roll your clothes and use packing cubes to save space.

Where are you heading, and for how long?";

const ADVICE_REPLY: &str = "Happy to share some travel advice!

General tips:
• Book flights six to eight weeks ahead for better prices
• Check entry requirements and vaccination rules early
• Get travel insurance before you depart
• Download offline maps and translation apps

I suggest telling me your destination so I can give you specific recommendations.

What would you like to know more about?";

const DEFAULT_REPLY: &str = "I'm here to help you plan an amazing journey!

Here's what I can do:
• Plan day-by-day itineraries
• Recommend destinations for your travel style
• Find the best time to visit
• Build a trip around your budget
• Help you pack for any climate

Try asking something like \"Plan a 7-day trip to Japan\" or \"What's the best time to visit Bali?\"";

// =============================================================================
// Topic routing
// =============================================================================

/// Topic buckets in priority order. Destination buckets come first so a
/// request like "plan a trip to Japan" gets the destination template.
///
/// `TripPlanning` must stay after the destinations: "plan" and "trip" appear
/// in most destination requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Japan,
    Bali,
    Europe,
    TripPlanning,
    Budget,
    Romantic,
    Packing,
    Advice,
}

impl Topic {
    pub fn name(&self) -> &'static str {
        match self {
            Topic::Japan => "japan",
            Topic::Bali => "bali",
            Topic::Europe => "europe",
            Topic::TripPlanning => "trip_planning",
            Topic::Budget => "budget",
            Topic::Romantic => "romantic",
            Topic::Packing => "packing",
            Topic::Advice => "advice",
        }
    }

    /// Templated reply for this bucket.
    pub fn reply(&self) -> &'static str {
        match self {
            Topic::Japan => JAPAN_REPLY,
            Topic::Bali => BALI_REPLY,
            Topic::Europe => EUROPE_REPLY,
            Topic::TripPlanning => TRIP_PLANNING_REPLY,
            Topic::Budget => BUDGET_REPLY,
            Topic::Romantic => ROMANTIC_REPLY,
            Topic::Packing => PACKING_REPLY,
            Topic::Advice => ADVICE_REPLY,
        }
    }
}

static TOPIC_PATTERNS: LazyLock<Vec<(Topic, Regex)>> = LazyLock::new(|| {
    let table: &[(Topic, &str)] = &[
        (Topic::Japan, r"\bjapan(?:ese)?\b|\btokyo\b|\bkyoto\b|\bosaka\b"),
        (Topic::Bali, r"\bbali(?:nese)?\b|\bubud\b|\bseminyak\b"),
        (
            Topic::Europe,
            r"\beurope(?:an)?\b|\bparis\b|\brome\b|\bbarcelona\b|\bamsterdam\b",
        ),
        (Topic::TripPlanning, r"\bplan(?:ning)?\b|\bitinerar(?:y|ies)\b|\btrip\b"),
        (Topic::Budget, r"\bbudget\b|\bcheap\w*|\bafford\w*|\bcosts?\b|\bmoney\b"),
        (
            Topic::Romantic,
            r"\bromantic\b|\bcouples?\b|\bhoneymoon\b|\banniversary\b",
        ),
        (Topic::Packing, r"\bpack(?:ing)?\b|\bluggage\b|\bsuitcase\b"),
        (
            Topic::Advice,
            r"\btips?\b|\badvice\b|\brecommend\w*|\bsuggest\w*|\bbest time\b|\bvisit\b",
        ),
    ];
    table
        .iter()
        .map(|(topic, pat)| (*topic, Regex::new(pat).expect("Invalid topic regex")))
        .collect()
});

/// Select the first topic bucket matching `user_text`, if any.
pub fn route(user_text: &str) -> Option<Topic> {
    let lower = user_text.to_lowercase();
    TOPIC_PATTERNS
        .iter()
        .find(|(_, re)| re.is_match(&lower))
        .map(|(topic, _)| *topic)
}

// =============================================================================
// FallbackEngine
// =============================================================================

/// Produces local replies without any network access.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackEngine {
    strategy: FallbackStrategy,
}

impl FallbackEngine {
    pub fn new(strategy: FallbackStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> FallbackStrategy {
        self.strategy
    }

    /// Map a user utterance to a canned reply. Never fails, never empty.
    pub fn reply(&self, user_text: &str) -> String {
        match self.strategy {
            FallbackStrategy::Uniform => {
                let index = rand::rng().random_range(0..UNIFORM_REPLIES.len());
                UNIFORM_REPLIES[index].to_string()
            }
            FallbackStrategy::TopicRouted => match route(user_text) {
                Some(topic) => {
                    tracing::debug!(bucket = topic.name(), "Fallback topic matched");
                    topic.reply().to_string()
                }
                None => DEFAULT_REPLY.to_string(),
            },
        }
    }

    /// Every reply this engine can produce.
    pub fn reply_space(&self) -> Vec<&'static str> {
        match self.strategy {
            FallbackStrategy::Uniform => UNIFORM_REPLIES.to_vec(),
            FallbackStrategy::TopicRouted => TOPIC_PATTERNS
                .iter()
                .map(|(topic, _)| topic.reply())
                .chain(std::iter::once(DEFAULT_REPLY))
                .collect(),
        }
    }
}

#[async_trait]
impl Assistant for FallbackEngine {
    async fn respond(&self, user_text: &str, _session: &Session) -> Result<String, ChatError> {
        Ok(self.reply(user_text))
    }
}
