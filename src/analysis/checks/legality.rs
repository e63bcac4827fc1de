use crate::analysis::warnings::{Category, CheckContext, CheckError, DeckCheck, Severity, Warning, WarningCode};
use crate::card::predicates::{is_basic_energy, normalize_name};
use std::collections::HashSet;

/// Deck-construction rules: size, copy limit, at least one Basic
pub struct LegalityCheck;

impl DeckCheck for LegalityCheck {
    fn name(&self) -> &str {
        "legality"
    }

    fn category(&self) -> Category {
        Category::Legality
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Result<Vec<Warning>, CheckError> {
        let mut warnings = Vec::new();
        let config = ctx.config;
        let total = ctx.summary.total_cards;

        if total != config.deck_size {
            let (verb, diff) = if total > config.deck_size {
                ("Remove", total - config.deck_size)
            } else {
                ("Add", config.deck_size - total)
            };
            warnings.push(
                Warning::new(
                    WarningCode::DeckSize,
                    Severity::Critical,
                    format!("Deck has {} cards instead of {}", total, config.deck_size),
                )
                .with_description("The deck cannot be registered until it has exactly the required card count.")
                .with_suggestion(format!("{} {} card(s)", verb, diff))
                .with_priority(10)
                .with_impact(-30.0, -20.0, 0.0),
            );
        }

        // Basic energy is exempt from the copy limit
        let exempt: HashSet<String> = ctx
            .deck
            .entries
            .iter()
            .filter(|e| is_basic_energy(&e.card))
            .map(|e| normalize_name(&e.card.name))
            .collect();

        for (name, copies) in ctx.deck.copies_by_name() {
            if copies <= config.max_copies || exempt.contains(&normalize_name(&name)) {
                continue;
            }
            warnings.push(
                Warning::new(
                    WarningCode::CopyLimit,
                    Severity::Critical,
                    format!("{} copies of {}", copies, name),
                )
                .scoped(&name)
                .with_description(format!(
                    "Only {} copies of a card with the same name are allowed.",
                    config.max_copies
                ))
                .with_suggestion(format!("Cut {} to {} copies", name, config.max_copies))
                .with_priority(9)
                .with_impact(-25.0, -5.0, 0.0),
            );
        }

        if ctx.summary.basic_count == 0 {
            warnings.push(
                Warning::new(WarningCode::NoBasicCreatures, Severity::Critical, "No Basic creatures")
                    .with_description("Every opening hand is a mulligan without a Basic creature to place.")
                    .with_suggestion("Add at least 8 Basic creatures")
                    .with_priority(10)
                    .with_impact(-60.0, -50.0, 0.0),
            );
        }

        Ok(warnings)
    }
}
