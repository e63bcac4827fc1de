//! Fun facts printed under a report. Kept apart from [`Report`] so the report
//! stays a pure function of the deck.
//!
//! [`Report`]: crate::analysis::Report

use crate::analysis::Report;
use crate::deck::Deck;
use crate::rng::TriviaRng;

const GENERAL_FACTS: &[&str] = &[
    "A 60-card deck has 386,206,920 possible opening hands.",
    "Prize cards are set aside before the first turn, so six cards are out of reach until a knockout.",
    "Going second draws a card on the first turn but usually cannot play a Supporter.",
    "Four copies of a card show up in the opening hand about 40% of the time.",
    "Most tournament decks run between 8 and 12 energy cards.",
];

/// Facts specific to this deck and its report
fn deck_facts(deck: &Deck, report: &Report) -> Vec<String> {
    let mut facts = Vec::new();

    if let Some(entry) = deck
        .creature_entries()
        .filter(|e| e.quantity > 0)
        .max_by_key(|e| e.card.max_damage())
    {
        if entry.card.max_damage() > 0 {
            facts.push(format!(
                "{} is the hardest hitter here at {} damage.",
                entry.card.name,
                entry.card.max_damage()
            ));
        }
    }

    let mulligan = report.probabilities.mulligan_rate;
    if mulligan > 0.0 && mulligan < 1.0 {
        facts.push(format!(
            "Roughly one game in {:.0} opens with a mulligan.",
            1.0 / mulligan
        ));
    }

    if let Some(line) = report.evolution_lines.first() {
        facts.push(format!(
            "The {} line runs {}-{}-{}.",
            line.key,
            line.basic_count(),
            line.stage1_count(),
            line.stage2_count()
        ));
    }

    facts
}

/// One fact chosen by `rng`, mixing deck-specific and general trivia
pub fn fun_fact(deck: &Deck, report: &Report, rng: &mut TriviaRng) -> String {
    let mut facts = deck_facts(deck, report);
    facts.extend(GENERAL_FACTS.iter().map(|f| f.to_string()));
    rng.pick(&facts)
        .cloned()
        .unwrap_or_else(|| GENERAL_FACTS[0].to_string())
}
