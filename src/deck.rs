use crate::card::predicates::{
    basic_energy_type, is_disruption_card, is_draw_trainer, is_energy_acceleration,
    is_evolution_skip_card, is_playable_opener, is_search_card, normalize_name,
};
use crate::card::{Card, CardDatabase, CardDatabaseError, EnergyType, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Invalid deck format at line {line}: {reason}")]
    InvalidFormat { line: usize, reason: String },
    #[error("Card database error: {0}")]
    DatabaseError(#[from] CardDatabaseError),
    #[error("Invalid card data: {0}")]
    Validation(#[from] ValidationError),
    #[error("Deck list '{0}' needs a card database (--cards)")]
    MissingDatabase(String),
}

/// Largest quantity a single deck entry may carry
pub const MAX_ENTRY_QUANTITY: u32 = 1_000;

/// One card and how many copies the deck runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDeckEntry")]
pub struct DeckEntry {
    pub card: Card,
    pub quantity: u32,
}

impl DeckEntry {
    pub fn new(card: Card, quantity: u32) -> Self {
        DeckEntry { card, quantity }
    }
}

#[derive(Debug, Deserialize)]
struct RawDeckEntry {
    card: Card,
    #[serde(alias = "count")]
    quantity: i64,
}

impl TryFrom<RawDeckEntry> for DeckEntry {
    type Error = ValidationError;

    fn try_from(raw: RawDeckEntry) -> Result<Self, Self::Error> {
        let quantity = validate_quantity(&raw.card.name, raw.quantity)?;
        Ok(DeckEntry {
            card: raw.card,
            quantity,
        })
    }
}

fn validate_quantity(card: &str, quantity: i64) -> Result<u32, ValidationError> {
    if quantity < 0 {
        return Err(ValidationError::NegativeQuantity {
            card: card.to_string(),
            quantity,
        });
    }
    match u32::try_from(quantity) {
        Ok(q) if q <= MAX_ENTRY_QUANTITY => Ok(q),
        _ => Err(ValidationError::QuantityTooLarge {
            card: card.to_string(),
            quantity,
            max: MAX_ENTRY_QUANTITY,
        }),
    }
}

/// Ordered card multiset. The engine checks, but never enforces, the 60-card
/// total and the four-copy limit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "cards")]
    pub entries: Vec<DeckEntry>,
}

/// Card counts shared by every check
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckSummary {
    pub total_cards: u32,
    pub creature_count: u32,
    pub basic_count: u32,
    pub trainer_count: u32,
    pub energy_count: u32,
    pub playable_count: u32,
    pub draw_support_count: u32,
    pub search_count: u32,
    pub skip_count: u32,
    pub acceleration_count: u32,
    pub disruption_count: u32,
    pub basic_energy_types: Vec<EnergyType>,
}

impl Deck {
    pub fn new(name: Option<&str>, entries: Vec<DeckEntry>) -> Self {
        Deck {
            name: name.map(str::to_string),
            entries,
        }
    }

    /// Parse a JSON deck: either `{"name": .., "cards": [..]}` or a bare entry array
    pub fn from_json_str(content: &str) -> Result<Self, DeckError> {
        let value: serde_json::Value = serde_json::from_str(content)?;
        if value.is_array() {
            let entries: Vec<DeckEntry> = serde_json::from_value(value)?;
            Ok(Deck::new(None, entries))
        } else {
            Ok(serde_json::from_value(value)?)
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("unnamed deck")
    }

    /// Sums saturate, so entries built in code with huge quantities never overflow
    pub fn total_cards(&self) -> u32 {
        self.entries
            .iter()
            .map(|e| e.quantity)
            .fold(0, u32::saturating_add)
    }

    /// Total copies of cards matching the predicate
    pub fn count_where<F>(&self, predicate: F) -> u32
    where
        F: Fn(&Card) -> bool,
    {
        self.entries
            .iter()
            .filter(|e| predicate(&e.card))
            .map(|e| e.quantity)
            .fold(0, u32::saturating_add)
    }

    pub fn creature_entries(&self) -> impl Iterator<Item = &DeckEntry> {
        self.entries.iter().filter(|e| e.card.is_creature())
    }

    /// Copies per card name (case and accent folded), in deck order
    pub fn copies_by_name(&self) -> Vec<(String, u32)> {
        let mut order: Vec<(String, u32)> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        for entry in &self.entries {
            let key = normalize_name(&entry.card.name);
            match positions.get(&key) {
                Some(&idx) => order[idx].1 = order[idx].1.saturating_add(entry.quantity),
                None => {
                    positions.insert(key, order.len());
                    order.push((entry.card.name.clone(), entry.quantity));
                }
            }
        }
        order
    }

    pub fn summary(&self) -> DeckSummary {
        let basic_energy_types: BTreeSet<EnergyType> = self
            .entries
            .iter()
            .filter(|e| e.quantity > 0)
            .filter_map(|e| basic_energy_type(&e.card))
            .collect();

        DeckSummary {
            total_cards: self.total_cards(),
            creature_count: self.count_where(Card::is_creature),
            basic_count: self.count_where(Card::is_basic_creature),
            trainer_count: self.count_where(Card::is_trainer),
            energy_count: self.count_where(Card::is_energy),
            playable_count: self.count_where(is_playable_opener),
            draw_support_count: self.count_where(is_draw_trainer),
            search_count: self.count_where(is_search_card),
            skip_count: self.count_where(is_evolution_skip_card),
            acceleration_count: self.count_where(is_energy_acceleration),
            disruption_count: self.count_where(is_disruption_card),
            basic_energy_types: basic_energy_types.into_iter().collect(),
        }
    }
}

/// Parse a plain-text deck list against a card database.
/// Format: "4 Card Name" per line, supports comments with # or //
pub fn parse_deck_list(content: &str, database: &CardDatabase) -> Result<Deck, DeckError> {
    let mut entries: Vec<DeckEntry> = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        let trimmed = line.trim();

        // Skip empty lines and comments
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("//") {
            continue;
        }

        let parts: Vec<&str> = trimmed.splitn(2, ' ').collect();
        if parts.len() != 2 {
            return Err(DeckError::InvalidFormat {
                line: line_num + 1,
                reason: "Expected format: 'COUNT CARD_NAME'".to_string(),
            });
        }

        let count_str = parts[0];
        let card_name = parts[1].trim();

        let count: i64 = count_str.parse().map_err(|_| DeckError::InvalidFormat {
            line: line_num + 1,
            reason: format!("'{}' is not a valid number", count_str),
        })?;
        let quantity = validate_quantity(card_name, count)?;

        let card = database.get_card(card_name)?;

        // Repeated lines for the same card fold into one entry
        match entries.iter_mut().find(|e| e.card.name == card.name) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(quantity),
            None => entries.push(DeckEntry::new(card, quantity)),
        }
    }

    Ok(Deck::new(None, entries))
}

/// Parse a deck list file; the deck takes the file stem as its name
pub fn parse_deck_file(path: &str, database: &CardDatabase) -> Result<Deck, DeckError> {
    let content = std::fs::read_to_string(path)?;
    let mut deck = parse_deck_list(&content, database)?;
    deck.name = file_stem(path);
    Ok(deck)
}

/// Load a deck from `.json` directly, or from a text list resolved through `database`
pub fn load_deck(path: &str, database: Option<&CardDatabase>) -> Result<Deck, DeckError> {
    let is_json = Path::new(path)
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if is_json {
        let content = std::fs::read_to_string(path)?;
        let mut deck = Deck::from_json_str(&content)?;
        if deck.name.is_none() {
            deck.name = file_stem(path);
        }
        return Ok(deck);
    }

    match database {
        Some(db) => parse_deck_file(path, db),
        None => Err(DeckError::MissingDatabase(path.to_string())),
    }
}

fn file_stem(path: &str) -> Option<String> {
    Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
}
