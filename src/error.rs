//! Error taxonomy for the tournament core.
//!
//! Configuration errors, round requests below the known blind schedule, and
//! deck exhaustion are fatal and always propagate. Everything else a round
//! can produce is recoverable: the orchestrator is the one place allowed to
//! catch it, log it, and continue with the next round.

use std::fmt;

use crate::cards::EvalError;

/// Configuration problems detected at setup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Blind schedule missing or containing a non-positive level.
    InvalidBlindSchedule,
    /// Starting stack must be a positive chip count.
    NonPositiveStack(i64),
    /// A table needs at least two seats.
    TooFewSeats(usize),
    /// Payout shares must lie in (0, 1] and sum to at most 1.
    InvalidPayouts,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidBlindSchedule => write!(f, "invalid blind schedule"),
            ConfigError::NonPositiveStack(stack) => {
                write!(f, "starting stack must be positive, got {}", stack)
            }
            ConfigError::TooFewSeats(seats) => {
                write!(f, "players per table must be at least 2, got {}", seats)
            }
            ConfigError::InvalidPayouts => write!(f, "invalid payout structure"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors surfaced by the tournament orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TournamentError {
    /// Fatal setup problem.
    Config(ConfigError),
    /// A blind level was requested below the lowest defined round.
    RoundOutOfRange(u32),
    /// More cards were requested than the deck holds: a sizing bug, never
    /// silently wrapped around.
    DeckExhausted,
    /// Malformed evaluator input reached the showdown.
    Eval(EvalError),
}

impl TournamentError {
    /// Whether this error must always propagate instead of being absorbed
    /// by the per-round catch.
    pub fn is_fatal(&self) -> bool {
        match self {
            TournamentError::Config(_)
            | TournamentError::RoundOutOfRange(_)
            | TournamentError::DeckExhausted => true,
            TournamentError::Eval(_) => false,
        }
    }
}

impl fmt::Display for TournamentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TournamentError::Config(e) => write!(f, "configuration error: {}", e),
            TournamentError::RoundOutOfRange(round) => {
                write!(f, "round {} is below the defined blind schedule", round)
            }
            TournamentError::DeckExhausted => write!(f, "deck exhausted while dealing"),
            TournamentError::Eval(e) => write!(f, "hand evaluation error: {}", e),
        }
    }
}

impl std::error::Error for TournamentError {}

impl From<ConfigError> for TournamentError {
    fn from(e: ConfigError) -> Self {
        TournamentError::Config(e)
    }
}

impl From<EvalError> for TournamentError {
    fn from(e: EvalError) -> Self {
        TournamentError::Eval(e)
    }
}
