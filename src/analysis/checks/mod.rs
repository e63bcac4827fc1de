//! One check per warning category.

mod consistency;
mod economy;
mod legality;
mod matchup;
mod power;
mod speed;

pub use consistency::ConsistencyCheck;
pub use economy::EconomyCheck;
pub use legality::LegalityCheck;
pub use matchup::MatchupCheck;
pub use power::PowerCheck;
pub use speed::SpeedCheck;

use crate::card::Card;
use crate::deck::{Deck, DeckEntry};

/// Creature entries that have at least one damaging attack
pub(crate) fn attackers(deck: &Deck) -> impl Iterator<Item = &DeckEntry> {
    deck.creature_entries()
        .filter(|e| e.quantity > 0 && e.card.max_damage() > 0)
}

/// Cheapest damaging attack on a card
pub(crate) fn cheapest_attack_cost(card: &Card) -> Option<usize> {
    card.attacks
        .iter()
        .filter(|a| a.damage > 0)
        .map(|a| a.cost())
        .min()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::analysis::evolution::{build_evolution_lines, EvolutionLine};
    use crate::analysis::probability::{draw_probabilities, DrawProbabilities};
    use crate::analysis::warnings::{CheckContext, DeckCheck, Warning, WarningCode};
    use crate::card::{Attack, Card, EnergyType, Supertype};
    use crate::config::AnalyzerConfig;
    use crate::deck::{Deck, DeckEntry, DeckSummary};

    pub fn basic(name: &str, energy: EnergyType, damage: u32) -> Card {
        Card::new(name, Supertype::Creature)
            .with_subtype("Basic")
            .with_hp(70)
            .with_type(energy)
            .with_attack(Attack::new("Tackle", vec![energy, EnergyType::Colorless], damage))
    }

    pub fn trainer(name: &str, subtype: &str) -> Card {
        Card::new(name, Supertype::Trainer).with_subtype(subtype)
    }

    pub fn energy(energy_type: EnergyType) -> Card {
        Card::new(&format!("Basic {} Energy", energy_type), Supertype::Energy).with_subtype("Basic")
    }

    /// A sound 60-card Lightning list: 12 basics, 12 draw trainers, 12 energy
    pub fn solid_deck() -> Deck {
        let lightning = EnergyType::Lightning;
        Deck::new(
            Some("solid"),
            vec![
                DeckEntry::new(basic("Pikachu", lightning, 30), 4),
                DeckEntry::new(
                    Card::new("Raichu", Supertype::Creature)
                        .with_subtype("Stage 1")
                        .with_evolves_from("Pikachu")
                        .with_type(lightning)
                        .with_attack(Attack::new(
                            "Thunder",
                            vec![lightning, lightning, EnergyType::Colorless],
                            140,
                        )),
                    3,
                ),
                DeckEntry::new(basic("Zapdos", lightning, 110), 4),
                DeckEntry::new(basic("Lugia", EnergyType::Colorless, 20), 4),
                DeckEntry::new(trainer("Professor's Research", "Supporter"), 4),
                DeckEntry::new(trainer("Iono", "Supporter"), 4),
                DeckEntry::new(trainer("Boss's Orders", "Supporter"), 2),
                DeckEntry::new(trainer("Nest Ball", "Item"), 4),
                DeckEntry::new(trainer("Ultra Ball", "Item"), 4),
                DeckEntry::new(trainer("Switch", "Item"), 4),
                DeckEntry::new(trainer("Elesa's Sparkle", "Supporter"), 2),
                DeckEntry::new(trainer("Trekking Shoes", "Item"), 4),
                DeckEntry::new(trainer("Potion", "Item"), 3),
                DeckEntry::new(trainer("Energy Retrieval", "Item"), 2),
                DeckEntry::new(energy(lightning), 12),
            ],
        )
    }

    pub struct Fixture {
        pub deck: Deck,
        pub summary: DeckSummary,
        pub probabilities: DrawProbabilities,
        pub lines: Vec<EvolutionLine>,
        pub config: AnalyzerConfig,
    }

    impl Fixture {
        pub fn new(deck: Deck) -> Self {
            Self::with_config(deck, AnalyzerConfig::default())
        }

        pub fn with_config(deck: Deck, config: AnalyzerConfig) -> Self {
            Fixture {
                summary: deck.summary(),
                probabilities: draw_probabilities(&deck, config.hand_size, config.setup_turns),
                lines: build_evolution_lines(&deck, config.hand_size),
                deck,
                config,
            }
        }

        pub fn run(&self, check: &dyn DeckCheck) -> Vec<Warning> {
            let ctx = CheckContext {
                deck: &self.deck,
                summary: &self.summary,
                probabilities: &self.probabilities,
                lines: &self.lines,
                config: &self.config,
            };
            check.run(&ctx).expect("check should succeed")
        }
    }

    pub fn codes(warnings: &[Warning]) -> Vec<WarningCode> {
        warnings.iter().map(|w| w.code).collect()
    }
}
