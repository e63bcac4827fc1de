use crate::analysis::evolution::{EvolutionLine, LineIssue, StageSlot};
use crate::analysis::warnings::{Category, CheckContext, CheckError, DeckCheck, Severity, Warning, WarningCode};

/// Opening hands, draw and search density, energy count and evolution lines
pub struct ConsistencyCheck;

impl DeckCheck for ConsistencyCheck {
    fn name(&self) -> &str {
        "consistency"
    }

    fn category(&self) -> Category {
        Category::Consistency
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Result<Vec<Warning>, CheckError> {
        let config = ctx.config;
        if config.min_energy > config.max_energy {
            return Err(CheckError::InvalidThreshold(format!(
                "min_energy {} exceeds max_energy {}",
                config.min_energy, config.max_energy
            )));
        }

        let mut warnings = Vec::new();
        let summary = ctx.summary;
        let basics = summary.basic_count;

        if basics > 0 && basics < config.basic_floor {
            warnings.push(
                Warning::new(
                    WarningCode::BasicsBelowFloor,
                    Severity::Critical,
                    format!("Only {} Basic creatures", basics),
                )
                .with_description("Too few Basics to open reliably or recover from a knocked-out attacker.")
                .with_suggestion(format!("Run at least {} Basic creatures", config.basic_recommended))
                .with_priority(9)
                .with_impact(-20.0, -25.0, 0.5),
            );
        } else if basics >= config.basic_floor && basics < config.basic_recommended {
            warnings.push(
                Warning::new(
                    WarningCode::FewBasics,
                    Severity::Medium,
                    format!("{} Basic creatures is on the low side", basics),
                )
                .with_suggestion("Add a Basic or a Basic-search card such as Nest Ball")
                .with_priority(5)
                .with_impact(-4.0, -8.0, 0.0),
            );
        }

        let mulligan = ctx.probabilities.mulligan_rate;
        if mulligan > config.max_mulligan_rate {
            let severity = if mulligan > 0.35 { Severity::High } else { Severity::Medium };
            warnings.push(
                Warning::new(
                    WarningCode::HighMulliganRate,
                    severity,
                    format!("{:.1}% of opening hands have no Basic", mulligan * 100.0),
                )
                .with_description("Each mulligan hands the opponent an extra card.")
                .with_suggestion("Add Basic creatures")
                .with_priority(7)
                .with_impact(-(mulligan * 20.0), -(mulligan * 100.0), 0.0),
            );
        }

        let dead_draw = ctx.probabilities.dead_draw_rate;
        if dead_draw > config.max_dead_draw_rate {
            warnings.push(
                Warning::new(
                    WarningCode::HighDeadDrawRate,
                    Severity::Medium,
                    format!("{:.1}% of opening hands have nothing to play", dead_draw * 100.0),
                )
                .with_suggestion("Swap situational cards for creatures or draw Supporters")
                .with_priority(4)
                .with_impact(-3.0, -(dead_draw * 50.0), 0.0),
            );
        }

        if summary.draw_support_count < config.min_draw_support {
            warnings.push(
                Warning::new(
                    WarningCode::InsufficientDrawSupport,
                    Severity::High,
                    format!("Only {} draw cards", summary.draw_support_count),
                )
                .with_description("Without draw Supporters the deck stalls after the opening hand.")
                .with_suggestion("Add Professor's Research or Iono")
                .with_priority(7)
                .with_impact(-10.0, -15.0, 0.5),
            );
        }

        if summary.search_count < config.min_search {
            warnings.push(
                Warning::new(
                    WarningCode::InsufficientSearch,
                    Severity::Medium,
                    format!("Only {} search cards", summary.search_count),
                )
                .with_suggestion("Add Nest Ball or Ultra Ball to find key creatures")
                .with_priority(6)
                .with_impact(-6.0, -10.0, 0.3),
            );
        }

        let energy = summary.energy_count;
        if energy < config.min_energy || energy > config.max_energy {
            let (title, suggestion) = if energy < config.min_energy {
                (format!("Only {} energy cards", energy), format!("Run at least {} energy", config.min_energy))
            } else {
                (format!("{} energy cards", energy), format!("Cut energy to at most {}", config.max_energy))
            };
            warnings.push(
                Warning::new(WarningCode::EnergyCountOutOfRange, Severity::High, title)
                    .with_description("Energy count is outside the range attackers can run on.")
                    .with_suggestion(suggestion)
                    .with_priority(7)
                    .with_impact(-10.0, -10.0, 0.5),
            );
        }

        for line in ctx.lines {
            if let Some(warning) = line_warning(line) {
                warnings.push(warning);
            }
        }

        Ok(warnings)
    }
}

fn names(slot: &Option<StageSlot>) -> String {
    slot.as_ref().map(|s| s.names.join(" / ")).unwrap_or_default()
}

fn line_warning(line: &EvolutionLine) -> Option<Warning> {
    let key = line.key.as_str();
    let warning = match (line.issue, &line.suppressed_by) {
        (LineIssue::Complete, _) => return None,
        (LineIssue::MissingBasic, _) => Warning::new(
            WarningCode::BrokenEvolutionChain,
            Severity::Critical,
            format!("{} has no Basic to evolve from", names(&line.stage1)),
        )
        .with_description(format!("The deck runs no copies of {}.", key))
        .with_suggestion(format!("Add {} or cut the line", key))
        .with_priority(9)
        .with_impact(-20.0, -20.0, 1.0),
        (LineIssue::Unresolved, _) => Warning::new(
            WarningCode::UnresolvedEvolution,
            Severity::Info,
            format!("Could not trace the evolution line of {}", key),
        )
        .with_description("The card does not name what it evolves from.")
        .with_priority(1),
        (_, Some(skip)) => Warning::new(
            WarningCode::EvolutionSkipCovered,
            Severity::Info,
            format!("{} covers the thin Stage 1 of the {} line", skip, key),
        )
        .with_description("Evolving straight from Basic to Stage 2 makes the uneven counts workable.")
        .with_priority(2),
        (LineIssue::MissingStage1, None) => Warning::new(
            WarningCode::BrokenEvolutionChain,
            Severity::Critical,
            format!("{} has no Stage 1 to evolve from", names(&line.stage2)),
        )
        .with_description(format!("Stage 1 bottleneck: the {} line cannot reach Stage 2.", key))
        .with_suggestion("Add the Stage 1 or an evolution-skip card such as Rare Candy")
        .with_priority(8)
        .with_impact(-20.0, -20.0, 1.0),
        (LineIssue::Quantity, None) => Warning::new(
            WarningCode::EvolutionBottleneck,
            Severity::Medium,
            format!(
                "Uneven {} line ({}-{}-{})",
                key,
                line.basic_count(),
                line.stage1_count(),
                line.stage2_count()
            ),
        )
        .with_description(format!("The {:?} stage cannot support the stage above it.", line.bottleneck))
        .with_suggestion("Match each stage's count to at least the stage above it")
        .with_priority(5)
        .with_impact(-4.0, -8.0, 0.3),
    };
    Some(warning.scoped(key))
}
