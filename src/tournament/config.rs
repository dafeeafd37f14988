//! Tournament configuration: blind schedule, stacks, seating, payouts.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, TournamentError};
use crate::strategy::engine::DEFAULT_ITERATIONS;

/// Forced bets for one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlindLevel {
    /// Small blind posted by the first seat.
    pub small_blind: i64,
    /// Big blind posted by the second seat.
    pub big_blind: i64,
    /// Ante contributed by every seat (0 disables it).
    pub ante: i64,
}

impl BlindLevel {
    /// Create a blind level.
    pub fn new(small_blind: i64, big_blind: i64, ante: i64) -> Self {
        Self {
            small_blind,
            big_blind,
            ante,
        }
    }

    /// The level for the following round: every field doubled.
    fn doubled(&self) -> Self {
        Self {
            small_blind: self.small_blind * 2,
            big_blind: self.big_blind * 2,
            ante: self.ante * 2,
        }
    }
}

/// Configuration for a tournament.
///
/// Validation is all-or-nothing: an invalid configuration is rejected at
/// setup and never partially applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentConfig {
    /// Blind schedule by round number; rounds past the last defined level
    /// get synthesized by doubling and cached.
    pub blind_schedule: BTreeMap<u32, BlindLevel>,
    /// Chips every player starts with.
    pub starting_stack: i64,
    /// Fixed table capacity.
    pub players_per_table: usize,
    /// Prize-pool shares by finishing place.
    pub payout_structure: BTreeMap<u32, f64>,
    /// Self-play iterations per bot decision.
    pub strategy_iterations: u32,
    /// Master seed; identical seeds reproduce identical tournaments.
    pub seed: Option<u64>,
    /// Optional pacing pause between decisions (the original's 0.1s tick).
    #[serde(skip)]
    pub decision_pause: Option<Duration>,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        let mut blind_schedule = BTreeMap::new();
        for (round, sb, bb, ante) in [
            (1, 50, 100, 10),
            (2, 100, 200, 20),
            (3, 150, 300, 30),
            (4, 200, 400, 40),
            (5, 300, 600, 60),
            (6, 400, 800, 80),
            (7, 500, 1000, 100),
            (8, 600, 1200, 120),
            (9, 800, 1600, 160),
            (10, 1000, 2000, 200),
            (11, 1200, 2400, 240),
        ] {
            blind_schedule.insert(round, BlindLevel::new(sb, bb, ante));
        }

        let mut payout_structure = BTreeMap::new();
        payout_structure.insert(1, 0.5);
        payout_structure.insert(2, 0.3);
        payout_structure.insert(3, 0.2);

        Self {
            blind_schedule,
            starting_stack: 10_000,
            players_per_table: 8,
            payout_structure,
            strategy_iterations: DEFAULT_ITERATIONS,
            seed: None,
            decision_pause: None,
        }
    }
}

impl TournamentConfig {
    /// Create a configuration with the default 11-level schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the starting stack.
    pub fn with_starting_stack(mut self, stack: i64) -> Self {
        self.starting_stack = stack;
        self
    }

    /// Builder method: set the table capacity.
    pub fn with_players_per_table(mut self, seats: usize) -> Self {
        self.players_per_table = seats;
        self
    }

    /// Builder method: replace the blind schedule.
    pub fn with_blind_schedule(mut self, schedule: BTreeMap<u32, BlindLevel>) -> Self {
        self.blind_schedule = schedule;
        self
    }

    /// Builder method: set the per-decision iteration count.
    pub fn with_strategy_iterations(mut self, iterations: u32) -> Self {
        self.strategy_iterations = iterations;
        self
    }

    /// Builder method: set the master seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builder method: set the pacing pause between decisions.
    pub fn with_decision_pause(mut self, pause: Duration) -> Self {
        self.decision_pause = Some(pause);
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.blind_schedule.is_empty() {
            return Err(ConfigError::InvalidBlindSchedule);
        }
        for level in self.blind_schedule.values() {
            if level.small_blind <= 0 || level.big_blind <= 0 || level.ante < 0 {
                return Err(ConfigError::InvalidBlindSchedule);
            }
        }
        if self.starting_stack <= 0 {
            return Err(ConfigError::NonPositiveStack(self.starting_stack));
        }
        if self.players_per_table < 2 {
            return Err(ConfigError::TooFewSeats(self.players_per_table));
        }
        let share_sum: f64 = self.payout_structure.values().sum();
        if self
            .payout_structure
            .values()
            .any(|&s| s <= 0.0 || s > 1.0)
            || share_sum > 1.0 + 1e-9
        {
            return Err(ConfigError::InvalidPayouts);
        }
        Ok(())
    }

    /// Blind level for a round.
    ///
    /// Rounds past the last defined level are synthesized by doubling the
    /// final level once per missing round and cached, so asking for the same
    /// round twice returns the identical value. A round below the lowest
    /// defined level is a caller contract violation and fails.
    pub fn blinds_for_round(&mut self, round: u32) -> Result<BlindLevel, TournamentError> {
        if let Some(level) = self.blind_schedule.get(&round) {
            return Ok(*level);
        }

        let (&last_round, &last_level) = self
            .blind_schedule
            .iter()
            .next_back()
            .ok_or(TournamentError::Config(ConfigError::InvalidBlindSchedule))?;

        if round < last_round {
            // Present rounds were handled above; a miss below the defined
            // range means the caller asked for a round the schedule never
            // covered.
            return Err(TournamentError::RoundOutOfRange(round));
        }

        let mut level = last_level;
        for r in (last_round + 1)..=round {
            level = level.doubled();
            self.blind_schedule.insert(r, level);
        }
        Ok(level)
    }

    /// Payout amounts by finishing place for a given prize pool.
    pub fn payouts(&self, prize_pool: i64) -> BTreeMap<u32, i64> {
        self.payout_structure
            .iter()
            .map(|(&place, &share)| (place, (prize_pool as f64 * share) as i64))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(TournamentConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_setups() {
        let empty = TournamentConfig::default().with_blind_schedule(BTreeMap::new());
        assert_eq!(empty.validate(), Err(ConfigError::InvalidBlindSchedule));

        let broke = TournamentConfig::default().with_starting_stack(0);
        assert_eq!(broke.validate(), Err(ConfigError::NonPositiveStack(0)));

        let lonely = TournamentConfig::default().with_players_per_table(1);
        assert_eq!(lonely.validate(), Err(ConfigError::TooFewSeats(1)));

        let mut greedy = TournamentConfig::default();
        greedy.payout_structure.insert(4, 0.9);
        assert_eq!(greedy.validate(), Err(ConfigError::InvalidPayouts));
    }

    #[test]
    fn test_defined_rounds_come_from_the_schedule() {
        let mut config = TournamentConfig::default();
        assert_eq!(
            config.blinds_for_round(1).unwrap(),
            BlindLevel::new(50, 100, 10)
        );
        assert_eq!(
            config.blinds_for_round(11).unwrap(),
            BlindLevel::new(1200, 2400, 240)
        );
    }

    #[test]
    fn test_blind_doubling_past_the_schedule() {
        let mut config = TournamentConfig::default();
        // Last defined level is (1200, 2400, 240).
        let level = config.blinds_for_round(12).unwrap();
        assert_eq!(level, BlindLevel::new(2400, 4800, 480));

        // Idempotent: the synthesized level is cached.
        assert_eq!(config.blinds_for_round(12).unwrap(), level);

        // Two rounds later doubles twice more.
        let level = config.blinds_for_round(14).unwrap();
        assert_eq!(level, BlindLevel::new(9600, 19_200, 1920));
    }

    #[test]
    fn test_round_below_schedule_is_fatal() {
        let mut schedule = BTreeMap::new();
        schedule.insert(5, BlindLevel::new(50, 100, 0));
        let mut config = TournamentConfig::default().with_blind_schedule(schedule);

        match config.blinds_for_round(2) {
            Err(TournamentError::RoundOutOfRange(2)) => {}
            other => panic!("expected RoundOutOfRange, got {:?}", other),
        }
        assert!(config.blinds_for_round(2).unwrap_err().is_fatal());
    }

    #[test]
    fn test_payouts_split_the_prize_pool() {
        let config = TournamentConfig::default();
        let payouts = config.payouts(100_000);
        assert_eq!(payouts.get(&1), Some(&50_000));
        assert_eq!(payouts.get(&2), Some(&30_000));
        assert_eq!(payouts.get(&3), Some(&20_000));
    }
}
