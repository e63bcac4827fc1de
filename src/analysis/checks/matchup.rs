use super::attackers;
use crate::analysis::warnings::{Category, CheckContext, CheckError, DeckCheck, Severity, Warning, WarningCode};
use crate::card::EnergyType;
use std::collections::BTreeSet;

/// Exposure to a single weakness and lack of interaction
pub struct MatchupCheck;

impl DeckCheck for MatchupCheck {
    fn name(&self) -> &str {
        "matchup"
    }

    fn category(&self) -> Category {
        Category::Matchup
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Result<Vec<Warning>, CheckError> {
        let mut warnings = Vec::new();

        let types: BTreeSet<EnergyType> = attackers(ctx.deck)
            .flat_map(|e| e.card.types.iter().copied())
            .collect();
        if types.len() == 1 {
            let only = types.iter().next().map(|t| t.as_str()).unwrap_or_default();
            warnings.push(
                Warning::new(
                    WarningCode::SingleTypeAttackers,
                    Severity::Low,
                    format!("Every attacker is {} type", only),
                )
                .with_description("One shared weakness lets a single counter deck take every knockout cheaply.")
                .with_suggestion("Add a secondary attacker of another type")
                .with_priority(3)
                .with_impact(-3.0, 0.0, 0.0),
            );
        }

        if ctx.summary.disruption_count == 0 {
            warnings.push(
                Warning::new(WarningCode::NoDisruption, Severity::Low, "No disruption cards")
                    .with_description("Without gust or hand disruption the deck cannot pick its knockouts or slow the opponent.")
                    .with_suggestion("Add Boss's Orders or Iono")
                    .with_priority(3)
                    .with_impact(-3.0, 0.0, 0.0),
            );
        }

        Ok(warnings)
    }
}
