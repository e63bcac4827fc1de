//! Positive observations. Each one is worth a small score bonus.

use crate::analysis::evolution::LineIssue;
use crate::analysis::warnings::CheckContext;

const LOW_MULLIGAN_RATE: f64 = 0.15;
const STRONG_DRAW_SUPPORT: u32 = 8;
const STRONG_SEARCH: u32 = 4;
const FAST_SETUP: f64 = 0.7;

/// Human-readable strengths, in a fixed order
pub fn find_strengths(ctx: &CheckContext<'_>) -> Vec<String> {
    let mut strengths = Vec::new();
    let summary = ctx.summary;
    let probabilities = ctx.probabilities;

    if summary.basic_count > 0 && probabilities.mulligan_rate < LOW_MULLIGAN_RATE {
        strengths.push(format!(
            "Low mulligan rate ({:.1}%)",
            probabilities.mulligan_rate * 100.0
        ));
    }
    if summary.draw_support_count >= STRONG_DRAW_SUPPORT {
        strengths.push(format!("Strong draw support ({} cards)", summary.draw_support_count));
    }
    if summary.search_count >= STRONG_SEARCH {
        strengths.push(format!("Plenty of search ({} cards)", summary.search_count));
    }
    if !ctx.lines.is_empty() && ctx.lines.iter().all(|l| l.issue == LineIssue::Complete) {
        strengths.push("Every evolution line is complete".to_string());
    }
    if summary.basic_energy_types.len() == 1 {
        strengths.push(format!(
            "Focused {} energy base",
            summary.basic_energy_types[0].as_str()
        ));
    }
    if let Some(setup) = probabilities.setup_on(2) {
        if setup >= FAST_SETUP {
            strengths.push(format!("Fast setup ({:.0}% by turn 2)", setup * 100.0));
        }
    }
    let strong_attacker = ctx
        .deck
        .creature_entries()
        .filter(|e| e.quantity > 0)
        .map(|e| (e.card.name.as_str(), e.card.max_damage()))
        .find(|(_, damage)| *damage >= ctx.config.strong_attack_damage);
    if let Some((name, damage)) = strong_attacker {
        strengths.push(format!("{} hits for {}", name, damage));
    }
    if summary.skip_count > 0 && ctx.lines.iter().any(|l| l.stage2.is_some()) {
        strengths.push("Evolution-skip cards back the Stage 2 line".to_string());
    }

    strengths
}
