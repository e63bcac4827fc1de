pub mod checks;
pub mod evolution;
pub mod probability;
pub mod report;
pub mod scoring;
pub mod strengths;
pub mod warnings;

pub use evolution::{build_evolution_lines, EvolutionLine};
pub use probability::{draw_probabilities, DrawProbabilities};
pub use report::{analyze, Analysis, Analyzer, Report};
pub use scoring::{score, TierCounts};
pub use warnings::{CheckRegistry, DeckCheck, Severity, Warning, WarningCode};
