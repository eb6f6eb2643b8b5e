//! Built-in catalog: the 22 Major Arcana, five topics and two spreads.

use once_cell::sync::Lazy;

use crate::domain::catalog::{validate, Card, CatalogError, SpreadDefinition, Topic};
use crate::ports::CardCatalog;

// (id, name, number, keywords, upright, reversed, glyph)
type CardRow = (
    &'static str,
    &'static str,
    u8,
    &'static [&'static str],
    &'static str,
    &'static str,
    &'static str,
);

const MAJOR_ARCANA: &[CardRow] = &[
    (
        "the_fool", "The Fool", 0,
        &["new beginnings", "adventure", "innocence", "freedom"],
        "A fresh start full of possibility. Step forward with curiosity and an open heart.",
        "Recklessness or hesitation. Look before you leap, but don't let fear keep you still.",
        "🌱",
    ),
    (
        "the_magician", "The Magician", 1,
        &["creativity", "skill", "willpower", "manifestation"],
        "You have every tool you need. Focus your will and turn ideas into action.",
        "Scattered energy or untapped talent. Check that your plans match your intentions.",
        "✨",
    ),
    (
        "the_high_priestess", "The High Priestess", 2,
        &["intuition", "mystery", "inner wisdom", "stillness"],
        "Trust your intuition. The answer is already within you; listen quietly.",
        "Ignoring your inner voice. Slow down and reconnect with what you really feel.",
        "🌙",
    ),
    (
        "the_empress", "The Empress", 3,
        &["abundance", "nurturing", "beauty", "growth"],
        "A season of abundance and care. Nurture what matters and it will flourish.",
        "Overgiving or creative block. Remember to care for yourself as well.",
        "👑",
    ),
    (
        "the_emperor", "The Emperor", 4,
        &["authority", "structure", "stability", "leadership"],
        "Structure and steady leadership bring results. Set clear goals and hold firm.",
        "Rigidity or control slipping away. Balance discipline with flexibility.",
        "⚡",
    ),
    (
        "the_hierophant", "The Hierophant", 5,
        &["tradition", "learning", "guidance", "belief"],
        "Wisdom comes through learning and trusted guidance. Lean on proven paths.",
        "Questioning convention. It may be time to find your own way.",
        "📚",
    ),
    (
        "the_lovers", "The Lovers", 6,
        &["love", "harmony", "choice", "alignment"],
        "Harmony and meaningful connection. A choice made from the heart.",
        "Imbalance or a difficult decision. Be honest about what you truly value.",
        "💕",
    ),
    (
        "the_chariot", "The Chariot", 7,
        &["determination", "victory", "control", "momentum"],
        "Drive and determination carry you forward. Victory comes from focus.",
        "Losing direction. Regain control before pushing ahead.",
        "🏆",
    ),
    (
        "strength", "Strength", 8,
        &["courage", "patience", "compassion", "inner strength"],
        "Quiet courage and patience win the day. Gentleness is its own power.",
        "Self-doubt. Your strength is still there; give it room to return.",
        "💪",
    ),
    (
        "the_hermit", "The Hermit", 9,
        &["reflection", "solitude", "insight", "guidance"],
        "A time for reflection. Step back and let your inner light guide you.",
        "Isolation or withdrawal. Reach out; you don't have to search alone.",
        "🔍",
    ),
    (
        "wheel_of_fortune", "Wheel of Fortune", 10,
        &["change", "cycles", "luck", "turning point"],
        "The wheel is turning in your favour. Embrace the change that's coming.",
        "A bumpy phase in the cycle. Hold on; every low point turns again.",
        "🎡",
    ),
    (
        "justice", "Justice", 11,
        &["fairness", "truth", "balance", "cause and effect"],
        "Fairness and clarity prevail. Honest choices bring balanced outcomes.",
        "Something feels unfair. Look at the facts and take responsibility where due.",
        "⚖️",
    ),
    (
        "the_hanged_man", "The Hanged Man", 12,
        &["pause", "surrender", "new perspective", "letting go"],
        "A pause that brings a new perspective. Let go and see things differently.",
        "Stalling or resisting change. Waiting longer won't make the choice easier.",
        "🔄",
    ),
    (
        "death", "Death", 13,
        &["endings", "transformation", "transition", "renewal"],
        "One chapter closes so another can begin. Transformation is underway.",
        "Clinging to the past. Releasing the old makes space for the new.",
        "🦋",
    ),
    (
        "temperance", "Temperance", 14,
        &["balance", "moderation", "patience", "harmony"],
        "Balance and moderation bring calm progress. Blend things gently.",
        "Excess or imbalance. Find your middle ground again.",
        "🌈",
    ),
    (
        "the_devil", "The Devil", 15,
        &["attachment", "temptation", "habits", "materialism"],
        "Notice what binds you. Awareness is the first step to freedom.",
        "Breaking free. Old chains are loosening; keep going.",
        "⛓️",
    ),
    (
        "the_tower", "The Tower", 16,
        &["upheaval", "revelation", "sudden change", "awakening"],
        "A sudden shake-up clears the way. What falls was not built to last.",
        "Avoiding a necessary change. Facing it sooner makes it gentler.",
        "💥",
    ),
    (
        "the_star", "The Star", 17,
        &["hope", "inspiration", "healing", "serenity"],
        "Hope and healing shine on you. Trust that brighter days are ahead.",
        "Discouragement. Your light dims but never goes out; rekindle your faith.",
        "⭐",
    ),
    (
        "the_moon", "The Moon", 18,
        &["intuition", "illusion", "dreams", "uncertainty"],
        "Not everything is as it seems. Let intuition guide you through the fog.",
        "Confusion lifting. The truth is starting to come into view.",
        "🌙",
    ),
    (
        "the_sun", "The Sun", 19,
        &["joy", "success", "vitality", "positivity"],
        "Joy, success and warmth. Let yourself shine.",
        "A cloudy day, not a dark one. Your optimism just needs a nudge.",
        "☀️",
    ),
    (
        "judgement", "Judgement", 20,
        &["awakening", "reflection", "renewal", "calling"],
        "A moment of awakening. Answer the call and rise to a new level.",
        "Self-criticism holding you back. Forgive yourself and move forward.",
        "📯",
    ),
    (
        "the_world", "The World", 21,
        &["completion", "achievement", "wholeness", "travel"],
        "Completion and fulfilment. A cycle ends in success; celebrate it.",
        "Loose ends remain. Finish what you started before the next journey.",
        "🌍",
    ),
];

// (key, name, description, glyph)
const TOPICS: &[(&str, &str, &str, &str)] = &[
    ("love", "Love", "Romance and relationships", "💝"),
    ("career", "Career", "Work and professional growth", "💼"),
    ("wealth", "Wealth", "Money and financial luck", "💰"),
    ("health", "Health", "Physical and mental wellbeing", "🌿"),
    ("general", "General Fortune", "An overall look at where things stand", "🔮"),
];

// (key, name, description, positions)
const SPREADS: &[(&str, &str, &str, &[&str])] = &[
    (
        "single",
        "Single Card",
        "One card for a quick, focused reading",
        &["Current situation"],
    ),
    (
        "past_present_future",
        "Past, Present, Future",
        "Three cards for the past, the present and the future",
        &["Past", "Present", "Future"],
    ),
];

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

static STANDARD_CARDS: Lazy<Vec<Card>> = Lazy::new(|| {
    MAJOR_ARCANA
        .iter()
        .map(|&(id, name, number, keywords, upright, reversed, glyph)| Card {
            id: id.to_string(),
            name: name.to_string(),
            number,
            keywords: strings(keywords),
            upright_meaning: upright.to_string(),
            reversed_meaning: reversed.to_string(),
            glyph: glyph.to_string(),
        })
        .collect()
});

static STANDARD_TOPICS: Lazy<Vec<Topic>> = Lazy::new(|| {
    TOPICS
        .iter()
        .map(|&(key, name, description, glyph)| Topic {
            key: key.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            glyph: glyph.to_string(),
        })
        .collect()
});

static STANDARD_SPREADS: Lazy<Vec<SpreadDefinition>> = Lazy::new(|| {
    SPREADS
        .iter()
        .map(|&(key, name, description, positions)| SpreadDefinition {
            key: key.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            card_count: positions.len(),
            positions: strings(positions),
        })
        .collect()
});

/// In-memory catalog, validated on construction.
#[derive(Debug, Clone)]
pub struct StaticCardCatalog {
    cards: Vec<Card>,
    topics: Vec<Topic>,
    spreads: Vec<SpreadDefinition>,
}

impl StaticCardCatalog {
    /// Builds a catalog, refusing data a reading could not be drawn from.
    pub fn new(
        cards: Vec<Card>,
        topics: Vec<Topic>,
        spreads: Vec<SpreadDefinition>,
    ) -> Result<Self, CatalogError> {
        validate(&cards, &topics, &spreads)?;
        Ok(Self {
            cards,
            topics,
            spreads,
        })
    }

    /// The built-in Major Arcana catalog.
    pub fn standard() -> Result<Self, CatalogError> {
        Self::new(
            STANDARD_CARDS.clone(),
            STANDARD_TOPICS.clone(),
            STANDARD_SPREADS.clone(),
        )
    }
}

impl CardCatalog for StaticCardCatalog {
    fn topics(&self) -> &[Topic] {
        &self.topics
    }

    fn spreads(&self) -> &[SpreadDefinition] {
        &self.spreads
    }

    fn cards(&self) -> &[Card] {
        &self.cards
    }
}
