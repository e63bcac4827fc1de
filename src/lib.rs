pub mod analysis;
pub mod card;
pub mod config;
pub mod deck;
pub mod rng;
pub mod trivia;

pub use analysis::{analyze, Analyzer, Report};
pub use config::AnalyzerConfig;
pub use deck::{Deck, DeckEntry};
