use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors raised when raw card or deck data is malformed.
///
/// Raw data is rejected at the boundary instead of being coerced into
/// defaults, so a card that reaches the analysis engine is always well formed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("card is missing a name")]
    MissingName,
    #[error("card '{0}' is missing a supertype")]
    MissingSupertype(String),
    #[error("card '{card}' has unknown supertype '{value}'")]
    UnknownSupertype { card: String, value: String },
    #[error("unknown energy type '{0}'")]
    UnknownEnergyType(String),
    #[error("card '{card}' has negative quantity {quantity}")]
    NegativeQuantity { card: String, quantity: i64 },
    #[error("card '{card}' has quantity {quantity}, above the limit of {max}")]
    QuantityTooLarge { card: String, quantity: i64, max: u32 },
}

/// Top-level card category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Supertype {
    Creature,
    Trainer,
    Energy,
}

impl Supertype {
    /// Parse a supertype, accepting the names used by upstream card data.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "creature" | "pokemon" | "pokémon" => Some(Supertype::Creature),
            "trainer" => Some(Supertype::Trainer),
            "energy" => Some(Supertype::Energy),
            _ => None,
        }
    }
}

/// Energy / creature types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum EnergyType {
    Grass,
    Fire,
    Water,
    Lightning,
    Psychic,
    Fighting,
    Darkness,
    Metal,
    Dragon,
    Fairy,
    Colorless,
}

impl EnergyType {
    pub const ALL: [EnergyType; 11] = [
        EnergyType::Grass,
        EnergyType::Fire,
        EnergyType::Water,
        EnergyType::Lightning,
        EnergyType::Psychic,
        EnergyType::Fighting,
        EnergyType::Darkness,
        EnergyType::Metal,
        EnergyType::Dragon,
        EnergyType::Fairy,
        EnergyType::Colorless,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EnergyType::Grass => "Grass",
            EnergyType::Fire => "Fire",
            EnergyType::Water => "Water",
            EnergyType::Lightning => "Lightning",
            EnergyType::Psychic => "Psychic",
            EnergyType::Fighting => "Fighting",
            EnergyType::Darkness => "Darkness",
            EnergyType::Metal => "Metal",
            EnergyType::Dragon => "Dragon",
            EnergyType::Fairy => "Fairy",
            EnergyType::Colorless => "Colorless",
        }
    }
}

impl TryFrom<String> for EnergyType {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let lowered = value.trim().to_lowercase();
        let found = match lowered.as_str() {
            "dark" => Some(EnergyType::Darkness),
            "electric" => Some(EnergyType::Lightning),
            "steel" => Some(EnergyType::Metal),
            "normal" | "free" => Some(EnergyType::Colorless),
            other => EnergyType::ALL
                .iter()
                .copied()
                .find(|t| t.as_str().eq_ignore_ascii_case(other)),
        };
        found.ok_or(ValidationError::UnknownEnergyType(value))
    }
}

impl fmt::Display for EnergyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Evolution stage of a creature card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    Basic,
    Stage1,
    Stage2,
}

/// A creature attack
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attack {
    pub name: String,
    pub energy_cost: Vec<EnergyType>,
    pub damage: u32,
}

impl Attack {
    pub fn new(name: &str, energy_cost: Vec<EnergyType>, damage: u32) -> Self {
        Attack {
            name: name.to_string(),
            energy_cost,
            damage,
        }
    }

    pub fn cost(&self) -> usize {
        self.energy_cost.len()
    }
}

/// A static or activated ability printed on a card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ability {
    pub name: String,
    #[serde(default)]
    pub text: String,
}

/// Immutable, validated card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCard", rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub name: String,
    pub supertype: Supertype,
    pub subtypes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hp: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evolves_from: Option<String>,
    pub attacks: Vec<Attack>,
    pub abilities: Vec<Ability>,
    pub types: Vec<EnergyType>,
}

impl Card {
    pub fn new(name: &str, supertype: Supertype) -> Self {
        Card {
            id: slug(name),
            name: name.to_string(),
            supertype,
            subtypes: Vec::new(),
            hp: None,
            evolves_from: None,
            attacks: Vec::new(),
            abilities: Vec::new(),
            types: Vec::new(),
        }
    }

    pub fn with_subtype(mut self, subtype: &str) -> Self {
        if !self.has_subtype(subtype) {
            self.subtypes.push(subtype.to_string());
        }
        self
    }

    pub fn with_hp(mut self, hp: u32) -> Self {
        self.hp = Some(hp);
        self
    }

    pub fn with_evolves_from(mut self, name: &str) -> Self {
        self.evolves_from = Some(name.to_string());
        self
    }

    pub fn with_attack(mut self, attack: Attack) -> Self {
        self.attacks.push(attack);
        self
    }

    pub fn with_ability(mut self, name: &str, text: &str) -> Self {
        self.abilities.push(Ability {
            name: name.to_string(),
            text: text.to_string(),
        });
        self
    }

    pub fn with_type(mut self, energy_type: EnergyType) -> Self {
        self.types.push(energy_type);
        self
    }

    pub fn has_subtype(&self, subtype: &str) -> bool {
        self.subtypes.iter().any(|s| s.eq_ignore_ascii_case(subtype))
    }

    pub fn is_creature(&self) -> bool {
        self.supertype == Supertype::Creature
    }

    pub fn is_trainer(&self) -> bool {
        self.supertype == Supertype::Trainer
    }

    pub fn is_energy(&self) -> bool {
        self.supertype == Supertype::Energy
    }

    /// Evolution stage, for creatures only
    pub fn stage(&self) -> Option<Stage> {
        if !self.is_creature() {
            return None;
        }
        if self.has_subtype("Stage 2") {
            Some(Stage::Stage2)
        } else if self.has_subtype("Stage 1") {
            Some(Stage::Stage1)
        } else if self.has_subtype("Basic") {
            Some(Stage::Basic)
        } else {
            None
        }
    }

    pub fn is_basic_creature(&self) -> bool {
        self.stage() == Some(Stage::Basic)
    }

    pub fn max_damage(&self) -> u32 {
        self.attacks.iter().map(|a| a.damage).max().unwrap_or(0)
    }
}

fn slug(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect()
}

/// Numbers that upstream data sometimes encodes as strings ("70", "30+", "20×")
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum LooseNumber {
    Number(u32),
    Text(String),
}

impl LooseNumber {
    fn value(&self) -> Option<u32> {
        match self {
            LooseNumber::Number(n) => Some(*n),
            LooseNumber::Text(s) => {
                let digits: String = s.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
                digits.parse().ok()
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAttack {
    name: String,
    #[serde(default, alias = "cost", alias = "energy_cost")]
    energy_cost: Vec<EnergyType>,
    #[serde(default)]
    damage: Option<LooseNumber>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCard {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    supertype: Option<String>,
    #[serde(default)]
    subtypes: Vec<String>,
    #[serde(default)]
    hp: Option<LooseNumber>,
    #[serde(default, alias = "evolves_from")]
    evolves_from: Option<String>,
    #[serde(default)]
    attacks: Vec<RawAttack>,
    #[serde(default)]
    abilities: Vec<Ability>,
    #[serde(default)]
    types: Vec<EnergyType>,
}

impl TryFrom<RawCard> for Card {
    type Error = ValidationError;

    fn try_from(raw: RawCard) -> Result<Self, Self::Error> {
        let name = raw
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or(ValidationError::MissingName)?;

        let supertype_raw = raw
            .supertype
            .ok_or_else(|| ValidationError::MissingSupertype(name.clone()))?;
        let supertype =
            Supertype::parse(&supertype_raw).ok_or_else(|| ValidationError::UnknownSupertype {
                card: name.clone(),
                value: supertype_raw.clone(),
            })?;

        let mut subtypes: Vec<String> = Vec::with_capacity(raw.subtypes.len());
        for subtype in raw.subtypes {
            let subtype = subtype.trim().to_string();
            if !subtype.is_empty() && !subtypes.iter().any(|s| s.eq_ignore_ascii_case(&subtype)) {
                subtypes.push(subtype);
            }
        }

        let attacks = raw
            .attacks
            .into_iter()
            .map(|a| Attack {
                name: a.name,
                energy_cost: a.energy_cost,
                damage: a.damage.and_then(|d| d.value()).unwrap_or(0),
            })
            .collect();

        let evolves_from = raw
            .evolves_from
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty());

        Ok(Card {
            id: raw.id.unwrap_or_else(|| slug(&name)),
            name,
            supertype,
            subtypes,
            hp: raw.hp.and_then(|h| h.value()),
            evolves_from,
            attacks,
            abilities: raw.abilities,
            types: raw.types,
        })
    }
}
