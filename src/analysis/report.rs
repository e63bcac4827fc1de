//! One-call deck analysis: model, probabilities, evolution lines, warnings, score.

use crate::analysis::evolution::{build_evolution_lines, EvolutionLine};
use crate::analysis::probability::{draw_probabilities, DrawProbabilities};
use crate::analysis::scoring::{score, TierCounts};
use crate::analysis::strengths::find_strengths;
use crate::analysis::warnings::{run_checks, CheckContext, CheckDiagnostic, CheckRegistry, Warning};
use crate::config::AnalyzerConfig;
use crate::deck::{Deck, DeckSummary};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

/// Everything the analyzer reports about one deck. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub deck_name: String,
    pub score: u8,
    pub warnings: Vec<Warning>,
    pub evolution_lines: Vec<EvolutionLine>,
    pub probabilities: DrawProbabilities,
    /// Decayed win-rate impact of all warnings, floored at -90
    pub aggregate_impact: f64,
    pub strengths: Vec<String>,
    pub tiers: TierCounts,
    pub summary: DeckSummary,
}

/// A report plus the internal diagnostics of checks that failed
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub report: Report,
    pub diagnostics: Vec<CheckDiagnostic>,
}

pub struct Analyzer {
    config: AnalyzerConfig,
    registry: CheckRegistry,
}

impl Analyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self::with_registry(config, CheckRegistry::new())
    }

    pub fn with_registry(config: AnalyzerConfig, registry: CheckRegistry) -> Self {
        Analyzer { config, registry }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn analyze(&self, deck: &Deck) -> Analysis {
        let config = &self.config;
        let summary = deck.summary();
        let probabilities = draw_probabilities(deck, config.hand_size, config.setup_turns);
        let evolution_lines = build_evolution_lines(deck, config.hand_size);

        let ctx = CheckContext {
            deck,
            summary: &summary,
            probabilities: &probabilities,
            lines: &evolution_lines,
            config,
        };
        let output = run_checks(&self.registry, &ctx);
        let strengths = find_strengths(&ctx);

        let tiers = TierCounts::from_warnings(&output.warnings);
        let score = score(&output.warnings, strengths.len());
        debug!(
            deck = deck.display_name(),
            score,
            warnings = output.warnings.len(),
            strengths = strengths.len(),
            "deck analyzed"
        );

        Analysis {
            report: Report {
                deck_name: deck.display_name().to_string(),
                score,
                warnings: output.warnings,
                evolution_lines,
                probabilities,
                aggregate_impact: output.aggregate_impact,
                strengths,
                tiers,
                summary,
            },
            diagnostics: output.diagnostics,
        }
    }

    /// Analyze decks in parallel; results keep the input order
    pub fn analyze_batch(&self, decks: &[Deck]) -> Vec<Analysis> {
        decks
            .par_iter()
            .map(|deck| {
                let analysis = self.analyze(deck);
                info!(deck = deck.display_name(), score = analysis.report.score, "analyzed");
                analysis
            })
            .collect()
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}

/// Analyze with default thresholds and checks
pub fn analyze(deck: &Deck) -> Report {
    Analyzer::default().analyze(deck).report
}
