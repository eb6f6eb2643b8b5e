//! Response bodies for reference-data endpoints.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::domain::catalog::{Card, SpreadDefinition, Topic};

/// Entries keyed by their catalog key, in catalog order.
#[derive(Debug)]
pub struct Keyed<'a, T>(pub Vec<(&'a str, &'a T)>);

impl<T: Serialize> Serialize for Keyed<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[derive(Debug, Serialize)]
pub struct TopicsResponse<'a> {
    pub topics: Keyed<'a, Topic>,
}

impl<'a> TopicsResponse<'a> {
    pub fn new(topics: &'a [Topic]) -> Self {
        Self {
            topics: Keyed(topics.iter().map(|t| (t.key.as_str(), t)).collect()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SpreadsResponse<'a> {
    pub spreads: Keyed<'a, SpreadDefinition>,
}

impl<'a> SpreadsResponse<'a> {
    pub fn new(spreads: &'a [SpreadDefinition]) -> Self {
        Self {
            spreads: Keyed(spreads.iter().map(|s| (s.key.as_str(), s)).collect()),
        }
    }
}

/// Public card summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardInfo {
    pub id: String,
    pub name: String,
    /// Upright meaning
    pub description: String,
    pub keywords: Vec<String>,
    pub image_url: String,
}

impl From<&Card> for CardInfo {
    fn from(card: &Card) -> Self {
        Self {
            id: card.id.clone(),
            name: card.name.clone(),
            description: card.upright_meaning.clone(),
            keywords: card.keywords.clone(),
            image_url: format!("/cards/{}.jpg", card.id),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GreetingResponse {
    pub message: String,
}
