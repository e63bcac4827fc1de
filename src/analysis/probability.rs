//! Hypergeometric draw statistics.
//!
//! All probabilities are built from running products rather than factorials,
//! which keeps them finite for 60-card decks and double-digit draws. Degenerate
//! inputs return 0.0 or 1.0 instead of NaN.

use crate::card::predicates::is_playable_opener;
use crate::card::Card;
use crate::deck::Deck;
use serde::Serialize;

/// Extra cards drawn per turn after the opening hand
const CARDS_PER_TURN: u32 = 1;

/// Probability of drawing zero successes.
///
/// Sentinels, in order: empty deck → 1.0 (nothing can be drawn),
/// no successes → 1.0, drawing more than the deck → 0.0,
/// deck made only of successes → 0.0, drawing nothing → 1.0.
pub fn prob_none(deck_size: u32, successes: u32, draws: u32) -> f64 {
    if deck_size == 0 || successes == 0 {
        return 1.0;
    }
    if draws > deck_size {
        return 0.0;
    }
    if draws == 0 {
        return 1.0;
    }
    if successes >= deck_size {
        return 0.0;
    }

    let n = deck_size as f64;
    let k = successes as f64;
    let mut p = 1.0;
    for i in 0..draws {
        let i = i as f64;
        let numerator = n - k - i;
        if numerator <= 0.0 {
            return 0.0;
        }
        p *= numerator / (n - i);
    }
    p.clamp(0.0, 1.0)
}

/// Probability of drawing one or more successes
pub fn prob_at_least_one(deck_size: u32, successes: u32, draws: u32) -> f64 {
    1.0 - prob_none(deck_size, successes, draws)
}

/// Binomial coefficient as a running product; 0.0 when k > n
pub fn comb(n: u32, k: u32) -> f64 {
    if k > n {
        return 0.0;
    }
    // C(n, k) == C(n, n - k); the shorter product is more accurate
    let k = k.min(n - k);
    let mut result = 1.0;
    for i in 1..=k {
        result *= (n - i + 1) as f64 / i as f64;
    }
    result
}

/// Probability of drawing exactly `desired` successes
pub fn prob_exactly(deck_size: u32, successes: u32, draws: u32, desired: u32) -> f64 {
    if deck_size == 0 {
        return if desired == 0 { 1.0 } else { 0.0 };
    }
    if draws > deck_size || desired > draws {
        return 0.0;
    }
    let successes = successes.min(deck_size);
    let total = comb(deck_size, draws);
    if total == 0.0 {
        return 0.0;
    }
    let p = comb(successes, desired) * comb(deck_size - successes, draws - desired) / total;
    p.clamp(0.0, 1.0)
}

/// Probability of drawing `desired` or more successes
pub fn prob_at_least(deck_size: u32, successes: u32, draws: u32, desired: u32) -> f64 {
    if desired == 0 {
        return 1.0;
    }
    if desired == 1 {
        return prob_at_least_one(deck_size, successes, draws);
    }
    let upper = draws.min(successes);
    let sum: f64 = (desired..=upper)
        .map(|k| prob_exactly(deck_size, successes, draws, k))
        .sum();
    sum.clamp(0.0, 1.0)
}

/// Cards seen by the given turn: the opening hand plus one draw per later turn
pub fn cards_seen_by_turn(hand_size: u32, turn: u32) -> u32 {
    hand_size + turn.saturating_sub(1) * CARDS_PER_TURN
}

/// Multiplier applied when independent per-resource probabilities are
/// multiplied together; the product overstates how often every resource lines
/// up, and more so the longer the game runs.
pub fn setup_dampening(turn: u32) -> f64 {
    match turn {
        0 | 1 => 1.0,
        2 => 0.85,
        3 => 0.80,
        4 => 0.75,
        _ => 0.70,
    }
}

/// Approximate chance of holding at least one copy of every requirement by
/// `turn`. Each requirement is the number of copies in the deck.
///
/// This multiplies independent hypergeometric probabilities and damps the
/// result; it is a fixed heuristic, not a sequential draw model.
pub fn setup_probability(deck_size: u32, hand_size: u32, requirements: &[u32], turn: u32) -> f64 {
    let draws = cards_seen_by_turn(hand_size, turn);
    let composed: f64 = requirements
        .iter()
        .map(|&copies| prob_at_least_one(deck_size, copies, draws))
        .product();
    let dampening = if requirements.len() > 1 {
        setup_dampening(turn)
    } else {
        1.0
    };
    (composed * dampening).clamp(0.0, 1.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TurnProbability {
    pub turn: u32,
    pub probability: f64,
}

/// Draw statistics reported for a deck
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawProbabilities {
    pub mulligan_rate: f64,
    pub dead_draw_rate: f64,
    pub setup_by_turn: Vec<TurnProbability>,
}

impl DrawProbabilities {
    pub fn setup_on(&self, turn: u32) -> Option<f64> {
        self.setup_by_turn
            .iter()
            .find(|t| t.turn == turn)
            .map(|t| t.probability)
    }
}

/// Chance the opening hand has no Basic creature
pub fn mulligan_rate(deck: &Deck, hand_size: u32) -> f64 {
    prob_none(deck.total_cards(), deck.count_where(Card::is_basic_creature), hand_size)
}

/// Chance the opening hand has neither a creature nor a draw trainer
pub fn dead_draw_rate(deck: &Deck, hand_size: u32) -> f64 {
    prob_none(deck.total_cards(), deck.count_where(is_playable_opener), hand_size)
}

/// Setup odds for turns 1..=`turns`: a Basic creature plus an energy card
pub fn setup_by_turn(deck: &Deck, hand_size: u32, turns: u32) -> Vec<TurnProbability> {
    let total = deck.total_cards();
    let requirements = [
        deck.count_where(Card::is_basic_creature),
        deck.count_where(Card::is_energy),
    ];
    (1..=turns)
        .map(|turn| TurnProbability {
            turn,
            probability: setup_probability(total, hand_size, &requirements, turn),
        })
        .collect()
}

pub fn draw_probabilities(deck: &Deck, hand_size: u32, setup_turns: u32) -> DrawProbabilities {
    DrawProbabilities {
        mulligan_rate: mulligan_rate(deck, hand_size),
        dead_draw_rate: dead_draw_rate(deck, hand_size),
        setup_by_turn: setup_by_turn(deck, hand_size, setup_turns),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_known_mulligan_rates() {
        let twelve = prob_none(60, 12, 7);
        assert!((twelve - 0.191).abs() < 0.001, "got {}", twelve);

        let eight = prob_none(60, 8, 7);
        assert!((eight - 0.347).abs() < 0.002, "got {}", eight);
    }

    #[test]
    fn test_degenerate_cases() {
        assert_eq!(prob_none(60, 0, 7), 1.0);
        assert_eq!(prob_none(60, 60, 7), 0.0);
        assert_eq!(prob_none(0, 0, 7), 1.0);
        assert_eq!(prob_none(5, 2, 7), 0.0);
        assert_eq!(prob_none(60, 10, 0), 1.0);
        assert_eq!(prob_exactly(0, 0, 7, 0), 1.0);
        assert_eq!(prob_exactly(0, 0, 7, 1), 0.0);
        assert_eq!(prob_exactly(10, 4, 11, 1), 0.0);
    }

    #[test]
    fn test_comb() {
        assert!((comb(5, 2) - 10.0).abs() < EPS);
        assert!((comb(60, 7) - 386_206_920.0).abs() < 1e-3);
        assert_eq!(comb(3, 4), 0.0);
        assert_eq!(comb(7, 0), 1.0);
    }

    #[test]
    fn test_exactly_matches_none() {
        let via_product = prob_none(60, 12, 7);
        let via_comb = prob_exactly(60, 12, 7, 0);
        assert!((via_product - via_comb).abs() < 1e-9);
    }

    #[test]
    fn test_exactly_sums_to_one() {
        let total: f64 = (0..=7).map(|k| prob_exactly(60, 12, 7, k)).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_at_least_two() {
        let p = prob_at_least(60, 4, 7, 2);
        let expected = 1.0 - prob_exactly(60, 4, 7, 0) - prob_exactly(60, 4, 7, 1);
        assert!((p - expected).abs() < 1e-9);
        assert_eq!(prob_at_least(60, 4, 7, 0), 1.0);
        assert_eq!(prob_at_least(60, 1, 7, 2), 0.0);
    }

    #[test]
    fn test_setup_dampening_applies_to_composed_requirements() {
        let single = setup_probability(60, 7, &[12], 2);
        assert!((single - prob_at_least_one(60, 12, 8)).abs() < EPS);

        let both = setup_probability(60, 7, &[12, 12], 2);
        let expected = prob_at_least_one(60, 12, 8).powi(2) * 0.85;
        assert!((both - expected).abs() < EPS);
    }

    #[test]
    fn test_cards_seen_by_turn() {
        assert_eq!(cards_seen_by_turn(7, 1), 7);
        assert_eq!(cards_seen_by_turn(7, 3), 9);
        assert_eq!(cards_seen_by_turn(7, 0), 7);
    }

    proptest! {
        #[test]
        fn prop_probabilities_are_finite_and_bounded(
            deck_size in 0u32..200,
            successes in 0u32..200,
            draws in 0u32..20,
            desired in 0u32..10,
        ) {
            for p in [
                prob_none(deck_size, successes, draws),
                prob_at_least_one(deck_size, successes, draws),
                prob_exactly(deck_size, successes, draws, desired),
                prob_at_least(deck_size, successes, draws, desired),
            ] {
                prop_assert!(p.is_finite());
                prop_assert!((0.0..=1.0).contains(&p));
            }
        }

        #[test]
        fn prop_more_basics_never_raise_mulligan_rate(basics in 0u32..60) {
            let fewer = prob_none(60, basics, 7);
            let more = prob_none(60, basics + 1, 7);
            prop_assert!(more <= fewer);
            if fewer > 0.0 && fewer < 1.0 && more > 0.0 {
                prop_assert!(more < fewer);
            }
        }
    }
}
