//! Analyzer thresholds.
//!
//! Every number a check compares against lives here so a deck format with
//! different conventions can be evaluated by loading a JSON file instead of
//! editing the checks.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Required total deck size
    pub deck_size: u32,
    /// Copy limit per card name (basic energy exempt)
    pub max_copies: u32,
    /// Opening hand size
    pub hand_size: u32,
    /// Turns reported in `setupByTurn`
    pub setup_turns: u32,

    /// Fewer basics than this is a fundamental failure
    pub basic_floor: u32,
    /// Fewer basics than this is worth a note
    pub basic_recommended: u32,
    pub max_mulligan_rate: f64,
    pub max_dead_draw_rate: f64,
    pub min_draw_support: u32,
    pub min_search: u32,

    pub min_energy: u32,
    pub max_energy: u32,
    /// Energy above this (but within `max_energy`) counts as excess
    pub energy_excess_above: u32,
    pub max_energy_types: usize,

    /// Best attack below this damage is considered weak
    pub weak_attack_damage: u32,
    /// An attacker at or above this damage counts as a strength
    pub strong_attack_damage: u32,
    /// Cheapest attack cost at which the deck is considered slow
    pub heavy_attack_cost: usize,
    pub min_turn_two_setup: f64,
    pub max_stage2_lines: usize,
    pub min_trainers: u32,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        AnalyzerConfig {
            deck_size: 60,
            max_copies: 4,
            hand_size: 7,
            setup_turns: 4,
            basic_floor: 6,
            basic_recommended: 8,
            max_mulligan_rate: 0.25,
            max_dead_draw_rate: 0.15,
            min_draw_support: 6,
            min_search: 3,
            min_energy: 8,
            max_energy: 18,
            energy_excess_above: 14,
            max_energy_types: 2,
            weak_attack_damage: 90,
            strong_attack_damage: 120,
            heavy_attack_cost: 3,
            min_turn_two_setup: 0.5,
            max_stage2_lines: 2,
            min_trainers: 20,
        }
    }
}

impl AnalyzerConfig {
    /// Load a config from a JSON file; missing keys keep their defaults
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }
}
