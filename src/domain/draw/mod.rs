//! Card selection for a spread.
//!
//! A draw samples distinct cards from the whole deck, then flips a fair
//! coin per card for its orientation, then pairs cards with the spread's
//! positions in order. With a seed the whole result is reproducible.

use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::domain::catalog::Card;
use crate::ports::CardCatalog;

/// Which way up a card landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    Upright,
    Reversed,
}

impl Orientation {
    pub fn is_reversed(&self) -> bool {
        matches!(self, Orientation::Reversed)
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Orientation::Upright => "Upright",
            Orientation::Reversed => "Reversed",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A card placed in a spread position. Never mutated after the draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawnCard {
    #[serde(flatten)]
    pub card: Card,
    pub position: String,
    pub position_index: usize,
    pub is_reversed: bool,
    pub current_meaning: String,
    pub orientation: Orientation,
}

impl DrawnCard {
    pub fn new(
        card: Card,
        position: impl Into<String>,
        position_index: usize,
        orientation: Orientation,
    ) -> Self {
        let current_meaning = match orientation {
            Orientation::Upright => card.upright_meaning.clone(),
            Orientation::Reversed => card.reversed_meaning.clone(),
        };
        Self {
            card,
            position: position.into(),
            position_index,
            is_reversed: orientation.is_reversed(),
            current_meaning,
            orientation,
        }
    }

    /// One-line description, e.g. `🌱 The Fool (Upright) - Past`.
    pub fn summary_line(&self) -> String {
        let mut line = format!("{} {} ({})", self.card.glyph, self.card.name, self.orientation);
        if !self.position.is_empty() {
            line.push_str(" - ");
            line.push_str(&self.position);
        }
        line
    }
}

/// Reasons a draw cannot be made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrawError {
    #[error("unknown spread '{0}'")]
    UnknownSpread(String),

    #[error("spread '{spread}' needs {needed} cards but the deck has {available}")]
    CatalogTooSmall {
        spread: String,
        needed: usize,
        available: usize,
    },

    #[error("card '{0}' is listed but cannot be looked up")]
    UnknownCard(String),
}

/// Draws a spread, seeding the random source when a seed is given.
pub fn draw(
    catalog: &dyn CardCatalog,
    spread_key: &str,
    seed: Option<u64>,
) -> Result<Vec<DrawnCard>, DrawError> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    draw_with_rng(catalog, spread_key, &mut rng)
}

/// Draws a spread from the given random source.
pub fn draw_with_rng<R: Rng + ?Sized>(
    catalog: &dyn CardCatalog,
    spread_key: &str,
    rng: &mut R,
) -> Result<Vec<DrawnCard>, DrawError> {
    let spread = catalog
        .spread(spread_key)
        .ok_or_else(|| DrawError::UnknownSpread(spread_key.to_string()))?;

    let deck = catalog.card_ids();
    if spread.card_count > deck.len() {
        return Err(DrawError::CatalogTooSmall {
            spread: spread.key.clone(),
            needed: spread.card_count,
            available: deck.len(),
        });
    }

    let picks: Vec<usize> = index::sample(rng, deck.len(), spread.card_count).into_vec();
    let orientations: Vec<Orientation> = picks
        .iter()
        .map(|_| {
            if rng.random_bool(0.5) {
                Orientation::Reversed
            } else {
                Orientation::Upright
            }
        })
        .collect();

    picks
        .into_iter()
        .zip(orientations)
        .zip(spread.positions.iter())
        .enumerate()
        .map(|(i, ((pick, orientation), position))| {
            let id = deck[pick];
            let card = catalog
                .card(id)
                .ok_or_else(|| DrawError::UnknownCard(id.to_string()))?;
            Ok(DrawnCard::new(card.clone(), position.clone(), i, orientation))
        })
        .collect()
}

/// Textual summary of a draw used in the card reveal.
pub fn draw_summary(cards: &[DrawnCard]) -> String {
    match cards {
        [] => "No cards were drawn.".to_string(),
        [only] => format!("You drew: {}", only.summary_line()),
        many => {
            let lines: Vec<String> = many
                .iter()
                .enumerate()
                .map(|(i, c)| format!("{}. {}", i + 1, c.summary_line()))
                .collect();
            format!("You drew:\n{}", lines.join("\n"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{SpreadDefinition, Topic};
    use proptest::prelude::*;
    use std::collections::HashSet;

    struct TestDeck {
        cards: Vec<Card>,
        spreads: Vec<SpreadDefinition>,
    }

    impl TestDeck {
        fn with_cards(count: usize) -> Self {
            let cards = (0..count)
                .map(|i| Card {
                    id: format!("card_{i}"),
                    name: format!("Card {i}"),
                    number: i as u8,
                    keywords: vec!["test".to_string()],
                    upright_meaning: format!("upright {i}"),
                    reversed_meaning: format!("reversed {i}"),
                    glyph: "🃏".to_string(),
                })
                .collect();
            let spreads = vec![
                SpreadDefinition {
                    key: "single".to_string(),
                    name: "Single Card".to_string(),
                    description: String::new(),
                    card_count: 1,
                    positions: vec!["Current situation".to_string()],
                },
                SpreadDefinition {
                    key: "past_present_future".to_string(),
                    name: "Past, Present, Future".to_string(),
                    description: String::new(),
                    card_count: 3,
                    positions: vec![
                        "Past".to_string(),
                        "Present".to_string(),
                        "Future".to_string(),
                    ],
                },
            ];
            Self { cards, spreads }
        }
    }

    impl CardCatalog for TestDeck {
        fn topics(&self) -> &[Topic] {
            &[]
        }
        fn spreads(&self) -> &[SpreadDefinition] {
            &self.spreads
        }
        fn cards(&self) -> &[Card] {
            &self.cards
        }
    }

    #[test]
    fn unknown_spread_is_rejected() {
        let deck = TestDeck::with_cards(22);
        assert_eq!(
            draw(&deck, "celtic_cross", Some(1)),
            Err(DrawError::UnknownSpread("celtic_cross".to_string()))
        );
    }

    #[test]
    fn small_deck_reports_instead_of_panicking() {
        let deck = TestDeck::with_cards(2);
        assert!(matches!(
            draw(&deck, "past_present_future", Some(1)),
            Err(DrawError::CatalogTooSmall { needed: 3, available: 2, .. })
        ));
    }

    struct UnresolvableDeck(TestDeck);

    impl CardCatalog for UnresolvableDeck {
        fn topics(&self) -> &[Topic] {
            &[]
        }
        fn spreads(&self) -> &[SpreadDefinition] {
            self.0.spreads()
        }
        fn cards(&self) -> &[Card] {
            self.0.cards()
        }
        fn card(&self, _id: &str) -> Option<&Card> {
            None
        }
    }

    #[test]
    fn listed_card_that_cannot_be_resolved_is_an_error() {
        let deck = UnresolvableDeck(TestDeck::with_cards(22));
        assert!(matches!(
            draw(&deck, "single", Some(3)),
            Err(DrawError::UnknownCard(id)) if id.starts_with("card_")
        ));
    }

    #[test]
    fn drawn_cards_come_from_listed_ids() {
        let deck = TestDeck::with_cards(22);
        let ids: HashSet<&str> = deck.card_ids().into_iter().collect();
        for card in draw(&deck, "past_present_future", Some(11)).unwrap() {
            assert!(ids.contains(card.card.id.as_str()));
        }
    }

    #[test]
    fn positions_follow_spread_order() {
        let deck = TestDeck::with_cards(22);
        let cards = draw(&deck, "past_present_future", Some(7)).unwrap();
        let positions: Vec<&str> = cards.iter().map(|c| c.position.as_str()).collect();
        assert_eq!(positions, vec!["Past", "Present", "Future"]);
        let indexes: Vec<usize> = cards.iter().map(|c| c.position_index).collect();
        assert_eq!(indexes, vec![0, 1, 2]);
    }

    #[test]
    fn current_meaning_follows_orientation() {
        let deck = TestDeck::with_cards(22);
        for seed in 0..32 {
            for card in draw(&deck, "past_present_future", Some(seed)).unwrap() {
                if card.is_reversed {
                    assert_eq!(card.current_meaning, card.card.reversed_meaning);
                    assert_eq!(card.orientation, Orientation::Reversed);
                } else {
                    assert_eq!(card.current_meaning, card.card.upright_meaning);
                    assert_eq!(card.orientation, Orientation::Upright);
                }
            }
        }
    }

    #[test]
    fn both_orientations_occur() {
        let deck = TestDeck::with_cards(22);
        let mut seen = HashSet::new();
        for seed in 0..64 {
            let cards = draw(&deck, "single", Some(seed)).unwrap();
            seen.insert(cards[0].orientation);
        }
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn unseeded_draw_still_honours_spread() {
        let deck = TestDeck::with_cards(22);
        assert_eq!(draw(&deck, "past_present_future", None).unwrap().len(), 3);
    }

    #[test]
    fn summary_for_single_card_is_one_line() {
        let card = Card {
            id: "the_fool".to_string(),
            name: "The Fool".to_string(),
            number: 0,
            keywords: vec![],
            upright_meaning: "A new beginning.".to_string(),
            reversed_meaning: "Recklessness.".to_string(),
            glyph: "🌱".to_string(),
        };
        let drawn = DrawnCard::new(card, "Current situation", 0, Orientation::Upright);
        assert_eq!(
            draw_summary(&[drawn]),
            "You drew: 🌱 The Fool (Upright) - Current situation"
        );
    }

    #[test]
    fn summary_numbers_multiple_cards() {
        let deck = TestDeck::with_cards(22);
        let cards = draw(&deck, "past_present_future", Some(3)).unwrap();
        let summary = draw_summary(&cards);
        assert!(summary.starts_with("You drew:\n1. "));
        assert_eq!(summary.lines().count(), 4);
        assert_eq!(draw_summary(&[]), "No cards were drawn.");
    }

    #[test]
    fn drawn_card_flattens_card_fields() {
        let deck = TestDeck::with_cards(22);
        let cards = draw(&deck, "single", Some(5)).unwrap();
        let json = serde_json::to_value(&cards[0]).unwrap();
        assert!(json.get("id").is_some());
        assert!(json.get("emoji").is_some());
        assert_eq!(json["position"], "Current situation");
        assert_eq!(json["position_index"], 0);
        assert!(json["orientation"] == "Upright" || json["orientation"] == "Reversed");
    }

    proptest! {
        #[test]
        fn draw_size_matches_spread_and_ids_are_distinct(
            seed in any::<u64>(),
            spread in prop::sample::select(vec!["single", "past_present_future"]),
        ) {
            let deck = TestDeck::with_cards(22);
            let expected = deck.spread(spread).unwrap().card_count;
            let cards = draw(&deck, spread, Some(seed)).unwrap();
            prop_assert_eq!(cards.len(), expected);
            let ids: HashSet<&str> = cards.iter().map(|c| c.card.id.as_str()).collect();
            prop_assert_eq!(ids.len(), expected);
        }

        #[test]
        fn same_seed_gives_same_draw(seed in any::<u64>()) {
            let deck = TestDeck::with_cards(22);
            let first = draw(&deck, "past_present_future", Some(seed)).unwrap();
            let second = draw(&deck, "past_present_future", Some(seed)).unwrap();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn exhaustive_spread_uses_whole_deck(seed in any::<u64>()) {
            let deck = TestDeck::with_cards(3);
            let cards = draw(&deck, "past_present_future", Some(seed)).unwrap();
            let ids: HashSet<&str> = cards.iter().map(|c| c.card.id.as_str()).collect();
            prop_assert_eq!(ids.len(), 3);
        }
    }
}
