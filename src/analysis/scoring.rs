//! Deterministic 0-100 deck score.
//!
//! The score depends only on how many warnings fall in each tier and how many
//! strengths were found, never on warning order or wording.
//! - 90-100: tournament ready
//! - 75-89: solid, minor tuning
//! - 50-74: playable, real problems
//! - 25-49: needs rework
//! - 0-24: not functional

use crate::analysis::warnings::{Tier, Warning};
use serde::Serialize;

const TIER1_PENALTY: i32 = 25;
const TIER2_PENALTY: i32 = 15;
const TIER3_PENALTY: i32 = 8;
const TIER4_PENALTY: i32 = 3;
const POSITIVE_BONUS: i32 = 2;
const MAX_POSITIVE_BONUS: i32 = 10;

/// Warning counts per scoring tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TierCounts {
    pub tier1: u32,
    pub tier2: u32,
    pub tier3: u32,
    pub tier4: u32,
}

impl TierCounts {
    pub fn from_warnings(warnings: &[Warning]) -> Self {
        let mut counts = TierCounts::default();
        for warning in warnings {
            match warning.tier() {
                Some(Tier::Fundamental) => counts.tier1 += 1,
                Some(Tier::Consistency) => counts.tier2 += 1,
                Some(Tier::Efficiency) => counts.tier3 += 1,
                Some(Tier::Attention) => counts.tier4 += 1,
                None => {}
            }
        }
        counts
    }

    pub fn total(&self) -> u32 {
        self.tier1 + self.tier2 + self.tier3 + self.tier4
    }
}

pub fn score(warnings: &[Warning], positives: usize) -> u8 {
    score_counts(TierCounts::from_warnings(warnings), positives)
}

/// Deduct per tier, add the strength bonus, then apply caps in order.
/// Each cap can only lower the running score.
pub fn score_counts(counts: TierCounts, positives: usize) -> u8 {
    let t1 = counts.tier1 as i32;
    let t2 = counts.tier2 as i32;
    let t3 = counts.tier3 as i32;
    let t4 = counts.tier4 as i32;
    let total = counts.total();

    let bonus = (positives.min(MAX_POSITIVE_BONUS as usize) as i32 * POSITIVE_BONUS).min(MAX_POSITIVE_BONUS);
    let mut score = 100 - TIER1_PENALTY * t1 - TIER2_PENALTY * t2 - TIER3_PENALTY * t3
        - TIER4_PENALTY * t4
        + bonus;

    if t1 > 0 {
        score = score.min(50);
    } else if t2 > 0 {
        score = score.min(70);
    } else if t3 > 0 {
        score = score.min(85);
    }

    if total >= 8 {
        score = score.min(50);
    } else if total >= 6 {
        score = score.min(65);
    } else if total >= 4 {
        score = score.min(75);
    }

    if t1 >= 2 {
        score = score.min(25);
    }

    if total == 0 && positives >= 5 {
        score = score.min(95);
    }

    score.clamp(0, 100) as u8
}

/// Short label for a score band
pub fn rating(score: u8) -> &'static str {
    match score {
        90..=100 => "tournament ready",
        75..=89 => "solid",
        50..=74 => "playable",
        25..=49 => "needs rework",
        _ => "not functional",
    }
}
