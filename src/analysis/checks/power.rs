use super::attackers;
use crate::analysis::warnings::{Category, CheckContext, CheckError, DeckCheck, Severity, Warning, WarningCode};
use crate::card::predicates::energy_provided;
use crate::card::{Card, EnergyType};
use std::collections::HashSet;

/// Whether the deck can deal damage, and enough of it
pub struct PowerCheck;

impl DeckCheck for PowerCheck {
    fn name(&self) -> &str {
        "power"
    }

    fn category(&self) -> Category {
        Category::Power
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Result<Vec<Warning>, CheckError> {
        let mut warnings = Vec::new();
        let deck = ctx.deck;

        let best = attackers(deck).map(|e| e.card.max_damage()).max();
        match best {
            None => warnings.push(
                Warning::new(WarningCode::NoViableAttacker, Severity::Critical, "No creature can deal damage")
                    .with_description("The deck has no attack that deals damage and cannot take prizes.")
                    .with_suggestion("Add creatures with damaging attacks")
                    .with_priority(10)
                    .with_impact(-50.0, 0.0, 0.0),
            ),
            Some(damage) if damage < ctx.config.weak_attack_damage => warnings.push(
                Warning::new(
                    WarningCode::WeakAttacks,
                    Severity::Medium,
                    format!("Best attack deals only {} damage", damage),
                )
                .with_description("Low damage needs extra turns per knockout against typical HP.")
                .with_suggestion(format!(
                    "Add an attacker that hits for {} or more",
                    ctx.config.weak_attack_damage
                ))
                .with_priority(6)
                .with_impact(-8.0, 0.0, 1.0),
            ),
            Some(_) => {}
        }

        if ctx.summary.energy_count > 0 {
            let provided: HashSet<EnergyType> = deck
                .entries
                .iter()
                .filter(|e| e.quantity > 0)
                .filter_map(|e| energy_provided(&e.card))
                .collect();

            let stranded: Vec<&str> = attackers(deck)
                .filter(|e| !has_payable_attack(&e.card, &provided))
                .map(|e| e.card.name.as_str())
                .collect();

            if !stranded.is_empty() {
                warnings.push(
                    Warning::new(
                        WarningCode::EnergyTypeMismatch,
                        Severity::Critical,
                        format!("{} attacker(s) cannot be powered", stranded.len()),
                    )
                    .with_description(format!(
                        "No energy in the deck pays for the attacks of: {}.",
                        stranded.join(", ")
                    ))
                    .with_suggestion("Add basic energy of the types these attacks need")
                    .with_priority(9)
                    .with_impact(-25.0, -10.0, 0.0),
                );
            }
        }

        let creatures = deck.creature_entries().any(|e| e.quantity > 0);
        let any_ability = deck
            .creature_entries()
            .any(|e| e.quantity > 0 && !e.card.abilities.is_empty());
        if creatures && !any_ability {
            warnings.push(
                Warning::new(WarningCode::NoAbilities, Severity::Info, "No creature has an ability")
                    .with_description("Abilities often supply draw or acceleration without using a Supporter.")
                    .with_priority(1),
            );
        }

        Ok(warnings)
    }
}

/// Colorless is payable by any energy; other symbols need a matching provider
fn has_payable_attack(card: &Card, provided: &HashSet<EnergyType>) -> bool {
    card.attacks.iter().filter(|a| a.damage > 0).any(|attack| {
        attack
            .energy_cost
            .iter()
            .all(|t| *t == EnergyType::Colorless || provided.contains(t))
    })
}
