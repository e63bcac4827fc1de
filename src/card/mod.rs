pub mod database;
pub mod predicates;
pub mod types;

pub use database::{CardDatabase, CardDatabaseError};
pub use types::{Ability, Attack, Card, EnergyType, Stage, Supertype, ValidationError};
