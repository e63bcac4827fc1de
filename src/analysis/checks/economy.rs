use crate::analysis::warnings::{Category, CheckContext, CheckError, DeckCheck, Severity, Warning, WarningCode};

/// How the 60 slots are spent
pub struct EconomyCheck;

impl DeckCheck for EconomyCheck {
    fn name(&self) -> &str {
        "economy"
    }

    fn category(&self) -> Category {
        Category::Economy
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Result<Vec<Warning>, CheckError> {
        let mut warnings = Vec::new();
        let summary = ctx.summary;
        let config = ctx.config;

        let colours = &summary.basic_energy_types;
        if colours.len() > config.max_energy_types {
            let names: Vec<&str> = colours.iter().map(|t| t.as_str()).collect();
            warnings.push(
                Warning::new(
                    WarningCode::TooManyEnergyTypes,
                    Severity::Medium,
                    format!("{} basic energy types", colours.len()),
                )
                .with_description(format!("Energy is split across {}.", names.join(", ")))
                .with_suggestion(format!("Settle on at most {} types", config.max_energy_types))
                .with_priority(5)
                .with_impact(-6.0, -8.0, 0.5),
            );
        }

        let energy = summary.energy_count;
        if energy > config.energy_excess_above && energy <= config.max_energy {
            warnings.push(
                Warning::new(
                    WarningCode::EnergyExcess,
                    Severity::Low,
                    format!("{} energy is more than the attackers need", energy),
                )
                .with_suggestion(format!(
                    "Trim to {} energy and spend the slots on draw or search",
                    config.energy_excess_above
                ))
                .with_priority(4)
                .with_impact(-3.0, -4.0, 0.0),
            );
        }

        let stage2_lines = ctx.lines.iter().filter(|l| l.stage2.is_some()).count();
        if stage2_lines > config.max_stage2_lines {
            warnings.push(
                Warning::new(
                    WarningCode::TooManyStage2Lines,
                    Severity::Medium,
                    format!("{} Stage 2 lines", stage2_lines),
                )
                .with_description("Each Stage 2 line costs 8 to 12 slots and competes for the same setup turns.")
                .with_suggestion("Focus on one or two Stage 2 lines")
                .with_priority(4)
                .with_impact(-4.0, -8.0, 0.5),
            );
        }

        if summary.trainer_count < config.min_trainers {
            warnings.push(
                Warning::new(
                    WarningCode::LowTrainerCount,
                    Severity::Low,
                    format!("Only {} trainers", summary.trainer_count),
                )
                .with_suggestion(format!("Run at least {} trainers", config.min_trainers))
                .with_priority(3)
                .with_impact(-3.0, -6.0, 0.0),
            );
        }

        Ok(warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::checks::fixtures::{basic, codes, energy, solid_deck, Fixture};
    use crate::card::{Card, EnergyType, Supertype};
    use crate::deck::DeckEntry;

    fn evolved(name: &str, subtype: &str, from: &str) -> Card {
        Card::new(name, Supertype::Creature)
            .with_subtype(subtype)
            .with_evolves_from(from)
    }

    #[test]
    fn test_solid_deck_is_efficient() {
        assert!(Fixture::new(solid_deck()).run(&EconomyCheck).is_empty());
    }

    #[test]
    fn test_three_energy_types() {
        let mut deck = solid_deck();
        deck.entries.push(DeckEntry::new(energy(EnergyType::Fire), 1));
        deck.entries.push(DeckEntry::new(energy(EnergyType::Water), 1));
        let warnings = Fixture::new(deck).run(&EconomyCheck);
        assert_eq!(codes(&warnings), vec![WarningCode::TooManyEnergyTypes]);
        assert!(warnings[0].description.contains("Fire"));
    }

    #[test]
    fn test_energy_excess_band() {
        let mut deck = solid_deck();
        deck.entries.push(DeckEntry::new(energy(EnergyType::Lightning), 4));
        let found = codes(&Fixture::new(deck.clone()).run(&EconomyCheck));
        assert_eq!(found, vec![WarningCode::EnergyExcess]);

        // Beyond the range limit is a consistency problem, not excess
        deck.entries.push(DeckEntry::new(energy(EnergyType::Lightning), 4));
        let found = codes(&Fixture::new(deck).run(&EconomyCheck));
        assert!(!found.contains(&WarningCode::EnergyExcess));
    }

    #[test]
    fn test_too_many_stage2_lines() {
        let mut deck = solid_deck();
        for (b, s1, s2) in [
            ("Charmander", "Charmeleon", "Charizard"),
            ("Squirtle", "Wartortle", "Blastoise"),
            ("Bulbasaur", "Ivysaur", "Venusaur"),
        ] {
            deck.entries.push(DeckEntry::new(basic(b, EnergyType::Colorless, 10), 1));
            deck.entries.push(DeckEntry::new(evolved(s1, "Stage 1", b), 1));
            deck.entries.push(DeckEntry::new(evolved(s2, "Stage 2", s1), 1));
        }
        let found = codes(&Fixture::new(deck).run(&EconomyCheck));
        assert_eq!(found, vec![WarningCode::TooManyStage2Lines]);
    }

    #[test]
    fn test_low_trainer_count() {
        let mut deck = solid_deck();
        deck.entries.retain(|e| !e.card.is_trainer() || e.card.name == "Iono");
        let warnings = Fixture::new(deck).run(&EconomyCheck);
        assert_eq!(codes(&warnings), vec![WarningCode::LowTrainerCount]);
        assert_eq!(warnings[0].title, "Only 4 trainers");
    }
}
