use super::{attackers, cheapest_attack_cost};
use crate::analysis::probability::setup_probability;
use crate::analysis::warnings::{Category, CheckContext, CheckError, DeckCheck, Severity, Warning, WarningCode};

const SETUP_TURN: u32 = 2;

/// How soon the deck gets a Basic and energy down, and how soon it can attack
pub struct SpeedCheck;

impl DeckCheck for SpeedCheck {
    fn name(&self) -> &str {
        "speed"
    }

    fn category(&self) -> Category {
        Category::Speed
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Result<Vec<Warning>, CheckError> {
        let mut warnings = Vec::new();
        let summary = ctx.summary;
        let config = ctx.config;

        // Reuse the reported figure when the report covers turn 2
        let setup = ctx.probabilities.setup_on(SETUP_TURN).unwrap_or_else(|| {
            setup_probability(
                summary.total_cards,
                config.hand_size,
                &[summary.basic_count, summary.energy_count],
                SETUP_TURN,
            )
        });

        if setup < config.min_turn_two_setup {
            warnings.push(
                Warning::new(
                    WarningCode::SlowSetup,
                    Severity::Medium,
                    format!("{:.0}% chance to have a Basic and energy by turn 2", setup * 100.0),
                )
                .with_description("The deck often spends its first turns without attaching or attacking.")
                .with_suggestion("Raise Basic and energy counts, or add search")
                .with_priority(5)
                .with_impact(-5.0, -10.0, 1.0),
            );
        }

        let cheapest = attackers(ctx.deck)
            .filter_map(|e| cheapest_attack_cost(&e.card))
            .min();
        if let Some(cost) = cheapest {
            if cost >= config.heavy_attack_cost && summary.acceleration_count == 0 {
                warnings.push(
                    Warning::new(
                        WarningCode::HeavyAttackCosts,
                        Severity::Low,
                        format!("Cheapest attack needs {} energy", cost),
                    )
                    .with_description(format!(
                        "With one attachment per turn the first attack lands on turn {} at best.",
                        cost
                    ))
                    .with_suggestion("Add energy acceleration or a cheaper opening attacker")
                    .with_priority(4)
                    .with_impact(-4.0, 0.0, cost as f64 - 2.0),
                );
            }
        }

        Ok(warnings)
    }
}
