//! # Poker MTT Sim
//!
//! A multi-table elimination poker tournament simulator whose bot agents
//! share one iteratively updated regret-minimization strategy.
//!
//! ## Features
//!
//! - **Shared Strategy Engine**: Every bot pools regret and strategy weight
//!   into one common table, refined by self-play at each live decision
//! - **Multi-Table Rounds**: Tables play their hands in parallel and join at
//!   a round barrier before eliminations and re-seating
//! - **Opponent Profiling**: Per-player dossiers of observed behavior with a
//!   fold-probability heuristic
//! - **Reproducible Runs**: One master seed replays an entire tournament
//! - **Strategy Persistence**: The learned table survives across tournaments
//!   through JSON snapshots
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use poker_mtt_sim::{StrategyEngine, Tournament, TournamentConfig};
//!
//! let engine = Arc::new(StrategyEngine::new());
//! let config = TournamentConfig::default().with_seed(42);
//!
//! let mut tournament = Tournament::new(config, engine)?;
//! tournament.register_bots(160);
//!
//! let result = tournament.run()?;
//! println!("winner: {}", result.winner().unwrap().name);
//! ```
//!
//! ## Modules
//!
//! - [`cards`]: Card, deck, and street primitives plus the hand evaluator
//! - [`strategy`]: The shared regret store and decision engine
//! - [`profile`]: Per-opponent behavioral dossiers
//! - [`player`]: Tournament seats and decision policies
//! - [`tournament`]: Configuration, the table engine, and the orchestrator
//! - [`external`]: Persistence and live-state boundaries
//! - [`error`]: The error taxonomy
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Tournament Orchestrator                      │
//! │  - Round loop            - Table formation and re-seating       │
//! │  - Parallel fan-out      - Eliminations, payouts, snapshots     │
//! └─────────────────────────────────────────────────────────────────┘
//!            │ one hand per table per round (rayon)
//!            ▼
//!    ┌──────────────┐   decisions   ┌──────────────────────────┐
//!    │ Table Engine │──────────────▶│  Shared Strategy Engine  │
//!    │ blinds/deal/ │               │  regret matching over a  │
//!    │ showdown     │◀──────────────│  common regret store     │
//!    └──────────────┘   actions     └──────────────────────────┘
//! ```

#![warn(missing_docs)]

pub mod cards;
pub mod error;
pub mod external;
pub mod player;
pub mod profile;
pub mod strategy;
pub mod tournament;

// Re-export commonly used types at crate root for convenience
pub use cards::{Card, Deck, HandCategory, HandEvaluator, HandValue, Street, Suit};
pub use error::{ConfigError, TournamentError};
pub use external::{LiveStatePublisher, PersistenceStore};
pub use player::{DecisionPolicy, Player};
pub use profile::OpponentProfile;
pub use strategy::{BotAction, DecisionContext, StrategyEngine};
pub use tournament::{BlindLevel, Tournament, TournamentConfig, TournamentResult};
