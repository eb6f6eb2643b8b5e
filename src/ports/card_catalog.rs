//! Card Catalog Port - Read-only reference data for readings.
//!
//! Loaded once at startup and shared by every session. Implementations
//! must be consistent: every spread is drawable from `card_ids()`.

use crate::domain::catalog::{Card, SpreadDefinition, Topic};

/// Port for card, topic and spread lookups.
pub trait CardCatalog: Send + Sync {
    /// All topics in display order.
    fn topics(&self) -> &[Topic];

    /// All spreads in display order.
    fn spreads(&self) -> &[SpreadDefinition];

    /// All cards in deck order.
    fn cards(&self) -> &[Card];

    /// Looks up a topic by key.
    fn topic(&self, key: &str) -> Option<&Topic> {
        self.topics().iter().find(|t| t.key == key)
    }

    /// Looks up a spread by key.
    fn spread(&self, key: &str) -> Option<&SpreadDefinition> {
        self.spreads().iter().find(|s| s.key == key)
    }

    /// Looks up a card by id.
    fn card(&self, id: &str) -> Option<&Card> {
        self.cards().iter().find(|c| c.id == id)
    }

    /// Card ids in deck order.
    fn card_ids(&self) -> Vec<&str> {
        self.cards().iter().map(|c| c.id.as_str()).collect()
    }

    /// Topic keys in display order.
    fn topic_keys(&self) -> Vec<String> {
        self.topics().iter().map(|t| t.key.clone()).collect()
    }

    /// Spread keys in display order.
    fn spread_keys(&self) -> Vec<String> {
        self.spreads().iter().map(|s| s.key.clone()).collect()
    }
}
