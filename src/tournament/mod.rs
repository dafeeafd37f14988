//! Tournament mechanics: configuration, single-hand table engine, and the
//! multi-table round orchestrator.

pub mod config;
pub mod orchestrator;
pub mod table;

pub use config::{BlindLevel, TournamentConfig};
pub use orchestrator::{Tournament, TournamentResult};
pub use table::{play_hand, HandOutcome};
