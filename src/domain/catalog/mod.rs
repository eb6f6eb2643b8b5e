//! Catalog module - Reference data for readings.
//!
//! Cards, topics and spread definitions are immutable once loaded. This
//! module only holds the types and the consistency rules a catalog must
//! satisfy; the data itself lives in the catalog adapter.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// A tarot card as it appears in the deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub name: String,
    pub number: u8,
    pub keywords: Vec<String>,
    pub upright_meaning: String,
    pub reversed_meaning: String,
    #[serde(rename = "emoji")]
    pub glyph: String,
}

/// A subject a reading can focus on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub key: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "emoji")]
    pub glyph: String,
}

/// A card layout with named positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpreadDefinition {
    pub key: String,
    pub name: String,
    pub description: String,
    pub card_count: usize,
    pub positions: Vec<String>,
}

/// Reasons a catalog refuses to load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("catalog has no cards")]
    Empty,

    #[error("duplicate card id '{0}'")]
    DuplicateCard(String),

    #[error("duplicate {kind} key '{key}'")]
    DuplicateKey { kind: &'static str, key: String },

    #[error("spread '{spread}' declares {card_count} cards but names {positions} positions")]
    PositionMismatch {
        spread: String,
        card_count: usize,
        positions: usize,
    },

    #[error("spread '{spread}' needs {needed} cards but the deck has {available}")]
    DeckTooSmall {
        spread: String,
        needed: usize,
        available: usize,
    },
}

/// Checks that cards, topics and spreads are mutually consistent.
///
/// Every spread must be drawable from the deck without replacement.
pub fn validate(
    cards: &[Card],
    topics: &[Topic],
    spreads: &[SpreadDefinition],
) -> Result<(), CatalogError> {
    if cards.is_empty() {
        return Err(CatalogError::Empty);
    }

    let mut seen = HashSet::new();
    for card in cards {
        if !seen.insert(card.id.as_str()) {
            return Err(CatalogError::DuplicateCard(card.id.clone()));
        }
    }

    let mut seen = HashSet::new();
    for topic in topics {
        if !seen.insert(topic.key.as_str()) {
            return Err(CatalogError::DuplicateKey {
                kind: "topic",
                key: topic.key.clone(),
            });
        }
    }

    let mut seen = HashSet::new();
    for spread in spreads {
        if !seen.insert(spread.key.as_str()) {
            return Err(CatalogError::DuplicateKey {
                kind: "spread",
                key: spread.key.clone(),
            });
        }
        if spread.positions.len() != spread.card_count {
            return Err(CatalogError::PositionMismatch {
                spread: spread.key.clone(),
                card_count: spread.card_count,
                positions: spread.positions.len(),
            });
        }
        if spread.card_count > cards.len() {
            return Err(CatalogError::DeckTooSmall {
                spread: spread.key.clone(),
                needed: spread.card_count,
                available: cards.len(),
            });
        }
    }

    Ok(())
}
