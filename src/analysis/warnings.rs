//! Warning model and the check registry.
//!
//! Individual rules live in [`crate::analysis::checks`]; this module only
//! runs them, isolates failures, ranks the results and folds their estimated
//! impact.

use crate::analysis::checks::{
    ConsistencyCheck, EconomyCheck, LegalityCheck, MatchupCheck, PowerCheck, SpeedCheck,
};
use crate::analysis::evolution::EvolutionLine;
use crate::analysis::probability::DrawProbabilities;
use crate::config::AnalyzerConfig;
use crate::deck::{Deck, DeckSummary};
use serde::Serialize;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use thiserror::Error;
use tracing::{debug, warn};

/// Diminishing-returns multiplier applied after each consumed warning
pub const IMPACT_DECAY: f64 = 0.8;
/// Aggregate win-rate impact never drops below this
pub const IMPACT_FLOOR: f64 = -90.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Info,
}

impl Severity {
    /// Sort rank, most severe first
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Critical => 0,
            Severity::High => 1,
            Severity::Medium => 2,
            Severity::Low => 3,
            Severity::Info => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Legality,
    Consistency,
    Power,
    Speed,
    Matchup,
    Economy,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Legality => "legality",
            Category::Consistency => "consistency",
            Category::Power => "power",
            Category::Speed => "speed",
            Category::Matchup => "matchup",
            Category::Economy => "economy",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score-deduction bucket, independent of display severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Tier {
    /// Fundamental failures
    Fundamental,
    /// Consistency problems
    Consistency,
    /// Efficiency problems
    Efficiency,
    /// Everything else that needs attention
    Attention,
}

/// Closed set of everything a check can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningCode {
    DeckSize,
    CopyLimit,
    NoBasicCreatures,

    BasicsBelowFloor,
    FewBasics,
    HighMulliganRate,
    HighDeadDrawRate,
    InsufficientDrawSupport,
    InsufficientSearch,
    EnergyCountOutOfRange,
    BrokenEvolutionChain,
    EvolutionBottleneck,
    EvolutionSkipCovered,
    UnresolvedEvolution,

    NoViableAttacker,
    EnergyTypeMismatch,
    WeakAttacks,
    NoAbilities,

    SlowSetup,
    HeavyAttackCosts,

    SingleTypeAttackers,
    NoDisruption,

    TooManyEnergyTypes,
    EnergyExcess,
    TooManyStage2Lines,
    LowTrainerCount,
}

impl WarningCode {
    pub fn category(&self) -> Category {
        use WarningCode::*;
        match self {
            DeckSize | CopyLimit | NoBasicCreatures => Category::Legality,
            BasicsBelowFloor | FewBasics | HighMulliganRate | HighDeadDrawRate
            | InsufficientDrawSupport | InsufficientSearch | EnergyCountOutOfRange
            | BrokenEvolutionChain | EvolutionBottleneck | EvolutionSkipCovered
            | UnresolvedEvolution => Category::Consistency,
            NoViableAttacker | EnergyTypeMismatch | WeakAttacks | NoAbilities => Category::Power,
            SlowSetup | HeavyAttackCosts => Category::Speed,
            SingleTypeAttackers | NoDisruption => Category::Matchup,
            TooManyEnergyTypes | EnergyExcess | TooManyStage2Lines | LowTrainerCount => {
                Category::Economy
            }
        }
    }

    /// Scoring tier; informational codes have none and never affect the score
    pub fn tier(&self) -> Option<Tier> {
        use WarningCode::*;
        match self {
            DeckSize | CopyLimit | NoBasicCreatures | BasicsBelowFloor | BrokenEvolutionChain
            | NoViableAttacker | EnergyTypeMismatch => Some(Tier::Fundamental),
            InsufficientDrawSupport | InsufficientSearch | EnergyCountOutOfRange => {
                Some(Tier::Consistency)
            }
            WeakAttacks | TooManyEnergyTypes | EnergyExcess => Some(Tier::Efficiency),
            FewBasics | HighMulliganRate | HighDeadDrawRate | EvolutionBottleneck | SlowSetup
            | HeavyAttackCosts | SingleTypeAttackers | NoDisruption | TooManyStage2Lines
            | LowTrainerCount => Some(Tier::Attention),
            EvolutionSkipCovered | UnresolvedEvolution | NoAbilities => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        use WarningCode::*;
        match self {
            DeckSize => "deck_size",
            CopyLimit => "copy_limit",
            NoBasicCreatures => "no_basic_creatures",
            BasicsBelowFloor => "basics_below_floor",
            FewBasics => "few_basics",
            HighMulliganRate => "high_mulligan_rate",
            HighDeadDrawRate => "high_dead_draw_rate",
            InsufficientDrawSupport => "insufficient_draw_support",
            InsufficientSearch => "insufficient_search",
            EnergyCountOutOfRange => "energy_count_out_of_range",
            BrokenEvolutionChain => "broken_evolution_chain",
            EvolutionBottleneck => "evolution_bottleneck",
            EvolutionSkipCovered => "evolution_skip_covered",
            UnresolvedEvolution => "unresolved_evolution",
            NoViableAttacker => "no_viable_attacker",
            EnergyTypeMismatch => "energy_type_mismatch",
            WeakAttacks => "weak_attacks",
            NoAbilities => "no_abilities",
            SlowSetup => "slow_setup",
            HeavyAttackCosts => "heavy_attack_costs",
            SingleTypeAttackers => "single_type_attackers",
            NoDisruption => "no_disruption",
            TooManyEnergyTypes => "too_many_energy_types",
            EnergyExcess => "energy_excess",
            TooManyStage2Lines => "too_many_stage2_lines",
            LowTrainerCount => "low_trainer_count",
        }
    }
}

/// Estimated effect of leaving a warning unaddressed
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimatedImpact {
    /// Win-rate change in percentage points; negative is harm
    pub win_rate: f64,
    pub consistency: f64,
    pub speed_turns: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Warning {
    pub id: String,
    pub severity: Severity,
    pub category: Category,
    pub code: WarningCode,
    pub title: String,
    pub description: String,
    pub suggestions: Vec<String>,
    /// 1 (lowest) to 10 (highest)
    pub priority: u8,
    pub estimated_impact: EstimatedImpact,
}

impl Warning {
    pub fn new(code: WarningCode, severity: Severity, title: impl Into<String>) -> Self {
        let category = code.category();
        Warning {
            id: format!("{}.{}", category.as_str(), code.as_str()),
            severity,
            category,
            code,
            title: title.into(),
            description: String::new(),
            suggestions: Vec::new(),
            priority: 5,
            estimated_impact: EstimatedImpact::default(),
        }
    }

    /// Distinguish repeated warnings of one code, e.g. one per card name
    pub fn scoped(mut self, scope: &str) -> Self {
        let slug: String = scope
            .chars()
            .map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
            .collect();
        self.id = format!("{}.{}", self.id, slug);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority.clamp(1, 10);
        self
    }

    pub fn with_impact(mut self, win_rate: f64, consistency: f64, speed_turns: f64) -> Self {
        self.estimated_impact = EstimatedImpact {
            win_rate,
            consistency,
            speed_turns,
        };
        self
    }

    pub fn tier(&self) -> Option<Tier> {
        self.code.tier()
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CheckError {
    #[error("invalid threshold: {0}")]
    InvalidThreshold(String),
    #[error("inconsistent deck data: {0}")]
    InconsistentData(String),
}

/// Everything a check may look at
pub struct CheckContext<'a> {
    pub deck: &'a Deck,
    pub summary: &'a DeckSummary,
    pub probabilities: &'a DrawProbabilities,
    pub lines: &'a [EvolutionLine],
    pub config: &'a AnalyzerConfig,
}

/// One independent rule set; checks never see each other's output
pub trait DeckCheck: Send + Sync {
    fn name(&self) -> &str;
    fn category(&self) -> Category;
    fn run(&self, ctx: &CheckContext<'_>) -> Result<Vec<Warning>, CheckError>;
}

/// Ordered set of checks; the order breaks ranking ties
pub struct CheckRegistry {
    checks: Vec<Box<dyn DeckCheck>>,
}

impl CheckRegistry {
    /// Registry with one check per category
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(LegalityCheck));
        registry.register(Box::new(ConsistencyCheck));
        registry.register(Box::new(PowerCheck));
        registry.register(Box::new(SpeedCheck));
        registry.register(Box::new(MatchupCheck));
        registry.register(Box::new(EconomyCheck));
        registry
    }

    pub fn empty() -> Self {
        CheckRegistry { checks: Vec::new() }
    }

    pub fn register(&mut self, check: Box<dyn DeckCheck>) {
        self.checks.push(check);
    }

    pub fn check_names(&self) -> Vec<&str> {
        self.checks.iter().map(|c| c.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

impl Default for CheckRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// A check that failed and was skipped. Kept out of the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckDiagnostic {
    pub check: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineOutput {
    pub warnings: Vec<Warning>,
    pub aggregate_impact: f64,
    pub diagnostics: Vec<CheckDiagnostic>,
}

/// Run every registered check, skipping (and recording) any that fail
pub fn run_checks(registry: &CheckRegistry, ctx: &CheckContext<'_>) -> EngineOutput {
    let mut warnings = Vec::new();
    let mut diagnostics = Vec::new();

    for check in &registry.checks {
        let outcome = catch_unwind(AssertUnwindSafe(|| check.run(ctx)));
        let failure = match outcome {
            Ok(Ok(found)) => {
                debug!(check = check.name(), category = %check.category(), count = found.len(), "check completed");
                warnings.extend(found);
                continue;
            }
            Ok(Err(err)) => err.to_string(),
            Err(_) => "check panicked".to_string(),
        };
        warn!(check = check.name(), error = %failure, "check failed, skipping");
        diagnostics.push(CheckDiagnostic {
            check: check.name().to_string(),
            message: failure,
        });
    }

    let warnings = rank_warnings(warnings);
    let aggregate_impact = aggregate_impact(&warnings);
    EngineOutput {
        warnings,
        aggregate_impact,
        diagnostics,
    }
}

/// Order by severity, then by descending priority. The sort is stable, so
/// equal warnings keep registry order.
pub fn rank_warnings(mut warnings: Vec<Warning>) -> Vec<Warning> {
    warnings.sort_by(|a, b| {
        a.severity
            .rank()
            .cmp(&b.severity.rank())
            .then_with(|| b.priority.cmp(&a.priority))
    });
    warnings
}

/// Fold win-rate impacts most harmful first, each one weighted 0.8x the
/// previous, and floor the total at -90.
pub fn aggregate_impact(warnings: &[Warning]) -> f64 {
    let mut impacts: Vec<f64> = warnings
        .iter()
        .map(|w| w.estimated_impact.win_rate)
        .collect();
    impacts.sort_by(|a, b| a.total_cmp(b));

    let mut factor = 1.0;
    let mut total = 0.0;
    for impact in impacts {
        total += impact * factor;
        factor *= IMPACT_DECAY;
    }
    total.max(IMPACT_FLOOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::probability::draw_probabilities;
    use proptest::prelude::*;

    fn warning(severity: Severity, priority: u8, win_rate: f64) -> Warning {
        Warning::new(WarningCode::FewBasics, severity, "test")
            .with_priority(priority)
            .with_impact(win_rate, 0.0, 0.0)
    }

    #[test]
    fn test_rank_by_severity_then_priority() {
        let ranked = rank_warnings(vec![
            warning(Severity::Low, 9, 0.0).scoped("a"),
            warning(Severity::Critical, 2, 0.0).scoped("b"),
            warning(Severity::Low, 10, 0.0).scoped("c"),
            warning(Severity::Critical, 8, 0.0).scoped("d"),
            warning(Severity::Info, 10, 0.0).scoped("e"),
        ]);
        let ids: Vec<&str> = ranked.iter().map(|w| w.id.rsplit('.').next().unwrap()).collect();
        assert_eq!(ids, vec!["d", "b", "c", "a", "e"]);
    }

    #[test]
    fn test_rank_is_stable_for_ties() {
        let ranked = rank_warnings(vec![
            warning(Severity::High, 5, 0.0).scoped("first"),
            warning(Severity::High, 5, 0.0).scoped("second"),
        ]);
        assert!(ranked[0].id.ends_with("first"));
    }

    #[test]
    fn test_aggregate_impact_decays() {
        let warnings = vec![
            warning(Severity::Low, 5, -5.0),
            warning(Severity::Low, 5, -10.0),
            warning(Severity::Low, 5, -20.0),
        ];
        // -20 * 1.0 + -10 * 0.8 + -5 * 0.64
        let expected = -20.0 - 8.0 - 3.2;
        assert!((aggregate_impact(&warnings) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_aggregate_impact_floor() {
        let warnings: Vec<Warning> = (0..20).map(|_| warning(Severity::Critical, 10, -50.0)).collect();
        assert_eq!(aggregate_impact(&warnings), IMPACT_FLOOR);
    }

    #[test]
    fn test_aggregate_impact_empty() {
        assert_eq!(aggregate_impact(&[]), 0.0);
    }

    #[test]
    fn test_priority_clamped() {
        assert_eq!(warning(Severity::Low, 0, 0.0).priority, 1);
        assert_eq!(warning(Severity::Low, 42, 0.0).priority, 10);
    }

    #[test]
    fn test_tier_mapping_is_closed() {
        assert_eq!(WarningCode::DeckSize.tier(), Some(Tier::Fundamental));
        assert_eq!(WarningCode::InsufficientSearch.tier(), Some(Tier::Consistency));
        assert_eq!(WarningCode::EnergyExcess.tier(), Some(Tier::Efficiency));
        assert_eq!(WarningCode::NoDisruption.tier(), Some(Tier::Attention));
        assert_eq!(WarningCode::EvolutionSkipCovered.tier(), None);
        assert_eq!(WarningCode::CopyLimit.category(), Category::Legality);
    }

    struct FailingCheck;

    impl DeckCheck for FailingCheck {
        fn name(&self) -> &str {
            "failing"
        }

        fn category(&self) -> Category {
            Category::Power
        }

        fn run(&self, _ctx: &CheckContext<'_>) -> Result<Vec<Warning>, CheckError> {
            Err(CheckError::InconsistentData("boom".to_string()))
        }
    }

    struct PanickingCheck;

    impl DeckCheck for PanickingCheck {
        fn name(&self) -> &str {
            "panicking"
        }

        fn category(&self) -> Category {
            Category::Speed
        }

        fn run(&self, _ctx: &CheckContext<'_>) -> Result<Vec<Warning>, CheckError> {
            panic!("unexpected state")
        }
    }

    struct FixedCheck;

    impl DeckCheck for FixedCheck {
        fn name(&self) -> &str {
            "fixed"
        }

        fn category(&self) -> Category {
            Category::Matchup
        }

        fn run(&self, _ctx: &CheckContext<'_>) -> Result<Vec<Warning>, CheckError> {
            Ok(vec![Warning::new(WarningCode::NoDisruption, Severity::Low, "fixed")])
        }
    }

    #[test]
    fn test_default_registry_covers_every_category() {
        let registry = CheckRegistry::new();
        assert_eq!(registry.len(), 6);
        assert_eq!(
            registry.check_names(),
            vec!["legality", "consistency", "power", "speed", "matchup", "economy"]
        );
        assert!(CheckRegistry::empty().is_empty());
    }

    #[test]
    fn test_failing_checks_are_isolated() {
        let deck = Deck::default();
        let summary = deck.summary();
        let probabilities = draw_probabilities(&deck, 7, 4);
        let config = AnalyzerConfig::default();
        let ctx = CheckContext {
            deck: &deck,
            summary: &summary,
            probabilities: &probabilities,
            lines: &[],
            config: &config,
        };

        let mut registry = CheckRegistry::empty();
        registry.register(Box::new(FailingCheck));
        registry.register(Box::new(PanickingCheck));
        registry.register(Box::new(FixedCheck));
        assert_eq!(registry.len(), 3);

        let output = run_checks(&registry, &ctx);
        assert_eq!(output.warnings.len(), 1);
        assert_eq!(output.warnings[0].title, "fixed");
        assert_eq!(output.diagnostics.len(), 2);
        assert_eq!(output.diagnostics[0].check, "failing");
        assert!(output.diagnostics[0].message.contains("boom"));
        assert_eq!(output.diagnostics[1].check, "panicking");
    }

    proptest! {
        #[test]
        fn prop_aggregate_impact_never_below_floor(
            impacts in proptest::collection::vec(-100.0f64..20.0, 0..40)
        ) {
            let warnings: Vec<Warning> = impacts
                .iter()
                .map(|&i| warning(Severity::Medium, 5, i))
                .collect();
            let total = aggregate_impact(&warnings);
            prop_assert!(total >= IMPACT_FLOOR);
            prop_assert!(total.is_finite());
        }
    }
}
