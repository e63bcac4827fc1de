//! Named card classifiers.
//!
//! Every rule that needs to know "is this a draw card?" or "does this skip an
//! evolution stage?" goes through one of these functions, so the matching
//! surface stays in one table per concept.

use crate::card::types::{Card, EnergyType};

/// Cards that let a Basic evolve straight into its Stage 2
const EVOLUTION_SKIP_CARDS: &[&str] = &["rare candy", "pokemon breeder", "pokemon breeder's nurturing"];

/// Supporters whose main effect is drawing cards
const DRAW_SUPPORTERS: &[&str] = &[
    "professor's research",
    "professor oak",
    "professor juniper",
    "professor sycamore",
    "iono",
    "judge",
    "marnie",
    "cynthia",
    "lillie",
    "n",
    "colress's experiment",
    "bianca's devotion",
    "hop",
    "sonia",
    "shauna",
    "tierno",
    "bill",
];

/// Non-supporter trainers that draw cards
const DRAW_ITEMS: &[&str] = &["bill", "trekking shoes", "pokegear 3.0", "research record"];

/// Trainers that search the deck for creatures or energy
const SEARCH_CARDS: &[&str] = &[
    "ultra ball",
    "nest ball",
    "quick ball",
    "level ball",
    "great ball",
    "poke ball",
    "hisuian heavy ball",
    "buddy-buddy poffin",
    "battle vip pass",
    "evolution incense",
    "capturing aroma",
    "earthen vessel",
    "energy search",
    "professor's letter",
    "arven",
    "irida",
    "bug catching set",
    "pokemon communication",
];

/// Trainers that put extra energy into play
const ENERGY_ACCELERATION_CARDS: &[&str] = &[
    "elesa's sparkle",
    "professor sada's vitality",
    "dark patch",
    "metal saucer",
    "max elixir",
    "welder",
    "melony",
    "turbo energize",
    "magma basin",
];

/// Abilities that attach energy beyond the one-per-turn allowance
const ENERGY_ACCELERATION_ABILITIES: &[&str] = &[
    "inferno fandango",
    "deluge",
    "psychic embrace",
    "metal maker",
    "infernal reign",
    "energy trans",
    "rain dance",
];

/// Trainers that interfere with the opponent's board or hand
const DISRUPTION_CARDS: &[&str] = &[
    "boss's orders",
    "counter catcher",
    "prime catcher",
    "pokemon catcher",
    "lysandre",
    "guzma",
    "iono",
    "judge",
    "marnie",
    "roxanne",
    "path to the peak",
    "crushing hammer",
    "lost vacuum",
    "enhanced hammer",
];

/// Name fragments identifying the type a basic energy provides
const ENERGY_TYPE_NAMES: &[(&str, EnergyType)] = &[
    ("grass", EnergyType::Grass),
    ("fire", EnergyType::Fire),
    ("water", EnergyType::Water),
    ("lightning", EnergyType::Lightning),
    ("psychic", EnergyType::Psychic),
    ("fighting", EnergyType::Fighting),
    ("darkness", EnergyType::Darkness),
    ("metal", EnergyType::Metal),
    ("fairy", EnergyType::Fairy),
];

/// Lowercase the name and fold accented letters so "Poké Ball" matches "poke ball"
pub fn normalize_name(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            'é' | 'É' | 'è' | 'ê' => 'e',
            '’' => '\'',
            other => other,
        })
        .collect::<String>()
        .to_lowercase()
}

fn name_in(card: &Card, table: &[&str]) -> bool {
    let name = normalize_name(&card.name);
    table.iter().any(|entry| *entry == name)
}

/// Evolution-skip accelerant: permits Stage 2 counts above Stage 1 counts
pub fn is_evolution_skip_card(card: &Card) -> bool {
    card.is_trainer() && name_in(card, EVOLUTION_SKIP_CARDS)
}

pub fn is_draw_supporter(card: &Card) -> bool {
    card.is_trainer() && name_in(card, DRAW_SUPPORTERS)
}

/// Any trainer that draws cards, supporter or not
pub fn is_draw_trainer(card: &Card) -> bool {
    is_draw_supporter(card) || (card.is_trainer() && name_in(card, DRAW_ITEMS))
}

pub fn is_search_card(card: &Card) -> bool {
    card.is_trainer() && name_in(card, SEARCH_CARDS)
}

pub fn is_disruption_card(card: &Card) -> bool {
    card.is_trainer() && name_in(card, DISRUPTION_CARDS)
}

/// Trainer or creature ability that attaches extra energy
pub fn is_energy_acceleration(card: &Card) -> bool {
    if card.is_trainer() {
        return name_in(card, ENERGY_ACCELERATION_CARDS);
    }
    card.is_creature()
        && card
            .abilities
            .iter()
            .any(|a| ENERGY_ACCELERATION_ABILITIES.contains(&normalize_name(&a.name).as_str()))
}

/// Counts toward "playable" in the dead-draw metric
pub fn is_playable_opener(card: &Card) -> bool {
    card.is_creature() || is_draw_trainer(card)
}

pub fn is_special_energy(card: &Card) -> bool {
    card.is_energy() && card.has_subtype("Special")
}

/// Type provided by a basic energy card, taken from its name
pub fn basic_energy_type(card: &Card) -> Option<EnergyType> {
    if !card.is_energy() || is_special_energy(card) {
        return None;
    }
    let name = normalize_name(&card.name);
    ENERGY_TYPE_NAMES
        .iter()
        .find(|(fragment, _)| name.contains(fragment))
        .map(|(_, energy_type)| *energy_type)
        .or_else(|| {
            if name.contains("dark") {
                Some(EnergyType::Darkness)
            } else {
                None
            }
        })
}

pub fn is_basic_energy(card: &Card) -> bool {
    basic_energy_type(card).is_some()
}

/// Type an energy card can pay for; special energy counts as Colorless
pub fn energy_provided(card: &Card) -> Option<EnergyType> {
    if !card.is_energy() {
        return None;
    }
    basic_energy_type(card).or(Some(EnergyType::Colorless))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::types::Supertype;

    fn trainer(name: &str) -> Card {
        Card::new(name, Supertype::Trainer)
    }

    #[test]
    fn test_evolution_skip_card() {
        assert!(is_evolution_skip_card(&trainer("Rare Candy")));
        assert!(is_evolution_skip_card(&trainer("Pokémon Breeder")));
        assert!(!is_evolution_skip_card(&trainer("Ultra Ball")));
        // A creature that happens to share a name is not an item
        assert!(!is_evolution_skip_card(&Card::new("Rare Candy", Supertype::Creature)));
    }

    #[test]
    fn test_draw_and_search() {
        assert!(is_draw_supporter(&trainer("Professor's Research")));
        assert!(is_draw_trainer(&trainer("Trekking Shoes")));
        assert!(!is_draw_supporter(&trainer("Trekking Shoes")));
        assert!(is_search_card(&trainer("Poké Ball")));
        assert!(is_search_card(&trainer("Buddy-Buddy Poffin")));
        assert!(!is_search_card(&trainer("Iono")));
    }

    #[test]
    fn test_energy_acceleration_by_ability() {
        let charizard = Card::new("Charizard ex", Supertype::Creature)
            .with_subtype("Stage 2")
            .with_ability("Infernal Reign", "Search your deck for up to 3 Basic Fire Energy");
        assert!(is_energy_acceleration(&charizard));
        assert!(is_energy_acceleration(&trainer("Elesa's Sparkle")));
        assert!(!is_energy_acceleration(&trainer("Nest Ball")));
    }

    #[test]
    fn test_basic_energy_type() {
        let fire = Card::new("Basic Fire Energy", Supertype::Energy);
        assert_eq!(basic_energy_type(&fire), Some(EnergyType::Fire));

        let dark = Card::new("Dark Energy", Supertype::Energy);
        assert_eq!(basic_energy_type(&dark), Some(EnergyType::Darkness));

        let special = Card::new("Double Turbo Energy", Supertype::Energy).with_subtype("Special");
        assert_eq!(basic_energy_type(&special), None);
        assert_eq!(energy_provided(&special), Some(EnergyType::Colorless));
        assert!(!is_basic_energy(&special));
    }

    #[test]
    fn test_playable_opener() {
        assert!(is_playable_opener(&Card::new("Pikachu", Supertype::Creature)));
        assert!(is_playable_opener(&trainer("Iono")));
        assert!(!is_playable_opener(&trainer("Nest Ball")));
        assert!(!is_playable_opener(&Card::new("Fire Energy", Supertype::Energy)));
    }
}
