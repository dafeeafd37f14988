//! Per-opponent behavioral dossiers.
//!
//! Each player owns one `OpponentProfile` tallying what it has seen each
//! opponent do. The derived fold-probability estimate is a heuristic score,
//! not a calibrated probability; agents consume it as an optional signal and
//! the strategy engine never depends on it.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kinds of observable opponent behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservedAction {
    /// Aggressive action (a raise).
    Aggro,
    /// A fold.
    Fold,
    /// A call.
    Call,
    /// A detected bluff.
    Bluff,
}

impl fmt::Display for ObservedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObservedAction::Aggro => write!(f, "aggro"),
            ObservedAction::Fold => write!(f, "fold"),
            ObservedAction::Call => write!(f, "call"),
            ObservedAction::Bluff => write!(f, "bluff"),
        }
    }
}

/// Monotone counters for one observed opponent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileEntry {
    /// Raises seen.
    pub aggro: u32,
    /// Folds seen.
    pub fold: u32,
    /// Calls seen.
    pub call: u32,
    /// Bluffs seen.
    pub bluff: u32,
}

impl ProfileEntry {
    fn total(&self) -> u32 {
        self.aggro + self.fold + self.call + self.bluff
    }
}

/// One player's tally of observed opponent actions.
///
/// Owned per observer and never shared across concurrent tasks, so it needs
/// no synchronization. Counters grow for the lifetime of the owning player.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpponentProfile {
    entries: FxHashMap<String, ProfileEntry>,
}

impl OpponentProfile {
    /// Create an empty dossier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one observed action for an opponent.
    pub fn record(&mut self, opponent: &str, action: ObservedAction) {
        let entry = self.entries.entry(opponent.to_string()).or_default();
        match action {
            ObservedAction::Aggro => entry.aggro += 1,
            ObservedAction::Fold => entry.fold += 1,
            ObservedAction::Call => entry.call += 1,
            ObservedAction::Bluff => entry.bluff += 1,
        }
    }

    /// Counters recorded for an opponent, if any.
    pub fn entry(&self, opponent: &str) -> Option<&ProfileEntry> {
        self.entries.get(opponent)
    }

    /// Number of opponents with at least one observation.
    pub fn num_opponents(&self) -> usize {
        self.entries.len()
    }

    /// Estimate how likely an opponent is to fold to the current bet.
    ///
    /// `fold_rate * (1 - aggression) * (1 - street_index/4) * bet/(pot + bet)`
    /// where `fold_rate` is the observed fold fraction. Returns exactly 0.0
    /// when no actions have been observed for that opponent.
    pub fn estimate_fold_probability(
        &self,
        opponent: &str,
        current_bet: i64,
        pot_size: i64,
        street_index: usize,
        aggression_level: f64,
    ) -> f64 {
        let Some(entry) = self.entries.get(opponent) else {
            return 0.0;
        };
        let total = entry.total();
        if total == 0 {
            return 0.0;
        }
        let fold_rate = f64::from(entry.fold) / f64::from(total);
        let bet = current_bet.max(0) as f64;
        let pot = pot_size.max(0) as f64;
        let bet_pressure = if bet + pot > 0.0 { bet / (pot + bet) } else { 0.0 };

        fold_rate
            * (1.0 - aggression_level)
            * (1.0 - street_index as f64 / 4.0)
            * bet_pressure
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_observations_yield_zero() {
        let profile = OpponentProfile::new();
        assert_eq!(
            profile.estimate_fold_probability("ghost", 100, 500, 0, 0.0),
            0.0
        );
        assert_eq!(
            profile.estimate_fold_probability("ghost", 0, 0, 3, 1.0),
            0.0
        );
    }

    #[test]
    fn test_counters_accumulate() {
        let mut profile = OpponentProfile::new();
        profile.record("vera", ObservedAction::Fold);
        profile.record("vera", ObservedAction::Fold);
        profile.record("vera", ObservedAction::Call);
        profile.record("vera", ObservedAction::Aggro);

        let entry = profile.entry("vera").unwrap();
        assert_eq!(entry.fold, 2);
        assert_eq!(entry.call, 1);
        assert_eq!(entry.aggro, 1);
        assert_eq!(entry.bluff, 0);
    }

    #[test]
    fn test_fold_probability_formula() {
        let mut profile = OpponentProfile::new();
        // 2 folds out of 4 observations -> fold_rate 0.5.
        profile.record("vera", ObservedAction::Fold);
        profile.record("vera", ObservedAction::Fold);
        profile.record("vera", ObservedAction::Call);
        profile.record("vera", ObservedAction::Aggro);

        // 0.5 * (1 - 0.2) * (1 - 1/4) * 100/(300 + 100) = 0.075
        let p = profile.estimate_fold_probability("vera", 100, 300, 1, 0.2);
        assert!((p - 0.075).abs() < 1e-12, "got {}", p);
        assert!((0.0..=1.0).contains(&p));
    }

    #[test]
    fn test_later_streets_reduce_the_estimate() {
        let mut profile = OpponentProfile::new();
        profile.record("vera", ObservedAction::Fold);

        let early = profile.estimate_fold_probability("vera", 50, 100, 0, 0.0);
        let late = profile.estimate_fold_probability("vera", 50, 100, 3, 0.0);
        assert!(early > late);
    }
}
