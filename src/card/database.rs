use crate::card::types::Card;
use crate::card::predicates::normalize_name;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CardDatabaseError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Card not found: {0}")]
    CardNotFound(String),
}

/// Card database that loads cards from JSON, used to resolve text deck lists
pub struct CardDatabase {
    cards: HashMap<String, Card>,
}

impl CardDatabase {
    /// Load cards from a JSON file containing an array of cards
    pub fn from_file(path: &str) -> Result<Self, CardDatabaseError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self, CardDatabaseError> {
        let cards_vec: Vec<Card> = serde_json::from_str(content)?;
        Ok(Self::from_cards(cards_vec))
    }

    pub fn from_cards(cards_vec: Vec<Card>) -> Self {
        let mut cards = HashMap::new();
        for card in cards_vec {
            // First printing wins when a name repeats
            cards.entry(normalize_name(&card.name)).or_insert(card);
        }
        CardDatabase { cards }
    }

    /// Get a card by name, ignoring case and accents
    pub fn get_card(&self, name: &str) -> Result<Card, CardDatabaseError> {
        self.cards
            .get(&normalize_name(name))
            .cloned()
            .ok_or_else(|| CardDatabaseError::CardNotFound(name.to_string()))
    }

    /// Get all card names, sorted
    pub fn card_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.cards.values().map(|c| c.name.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Get total number of cards
    pub fn card_count(&self) -> usize {
        self.cards.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CARDS: &str = r#"[
        {"name": "Pikachu", "supertype": "Pokémon", "subtypes": ["Basic"], "hp": 60},
        {"name": "Raichu", "supertype": "Pokémon", "subtypes": ["Stage 1"], "evolvesFrom": "Pikachu"},
        {"name": "Poké Ball", "supertype": "Trainer", "subtypes": ["Item"]},
        {"name": "Lightning Energy", "supertype": "Energy", "subtypes": ["Basic"]}
    ]"#;

    #[test]
    fn test_load_cards() {
        let db = CardDatabase::from_json_str(CARDS).expect("Failed to load cards");
        assert_eq!(db.card_count(), 4);
    }

    #[test]
    fn test_get_card_ignores_case_and_accents() {
        let db = CardDatabase::from_json_str(CARDS).expect("Failed to load cards");
        let card = db.get_card("poke ball").expect("Poké Ball should exist");
        assert_eq!(card.name, "Poké Ball");
    }

    #[test]
    fn test_card_not_found() {
        let db = CardDatabase::from_json_str(CARDS).expect("Failed to load cards");
        let result = db.get_card("Nonexistent Card");
        assert!(matches!(result, Err(CardDatabaseError::CardNotFound(_))));
    }

    #[test]
    fn test_invalid_card_rejected() {
        let result = CardDatabase::from_json_str(r#"[{"name": "Ghost"}]"#);
        assert!(matches!(result, Err(CardDatabaseError::JsonError(_))));
    }

    #[test]
    fn test_all_cards_accessible() {
        let db = CardDatabase::from_json_str(CARDS).expect("Failed to load cards");
        for name in db.card_names() {
            let card = db.get_card(name).unwrap_or_else(|_| panic!("Should get card: {}", name));
            assert_eq!(card.name, name);
        }
    }
}
