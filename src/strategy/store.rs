//! Storage for cumulative regrets and strategy weights.
//!
//! The table maps a context key to one `RegretEntry` per action. With the
//! default global key the whole tournament shares three counters, exactly
//! reproducing the action-keyed design; finer keys slot in without touching
//! this module.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::sync::{RwLock, RwLockWriteGuard};

use super::engine::BotAction;

/// Cumulative regret and strategy weight for one action under one key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RegretEntry {
    /// Sum of per-iteration regrets.
    pub cumulative_regret: f64,
    /// Sum of per-iteration action probabilities.
    pub cumulative_weight: f64,
}

/// Thread-safe regret/strategy table shared by all bot agents.
///
/// Every table's every decision reads and writes this store, so the whole
/// read-modify-write sequence of a decision runs under a single write guard;
/// anything less loses updates under concurrent tables.
#[derive(Debug, Default)]
pub struct RegretStore {
    entries: RwLock<FxHashMap<String, [RegretEntry; BotAction::COUNT]>>,
}

impl RegretStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(FxHashMap::default()),
        }
    }

    /// Current action probabilities for a key, by regret matching.
    ///
    /// Probability is proportional to positive cumulative regret; if no
    /// regret is positive (or the key is unseen) the distribution is uniform.
    pub fn current_strategy(&self, key: &str) -> [f64; BotAction::COUNT] {
        let entries = self.entries.read().unwrap();
        match entries.get(key) {
            Some(row) => strategy_of(row),
            None => uniform(),
        }
    }

    /// Cumulative strategy weights for a key (zeroes when unseen).
    pub fn cumulative_weights(&self, key: &str) -> [f64; BotAction::COUNT] {
        let entries = self.entries.read().unwrap();
        match entries.get(key) {
            Some(row) => {
                let mut out = [0.0; BotAction::COUNT];
                for (w, e) in out.iter_mut().zip(row.iter()) {
                    *w = e.cumulative_weight;
                }
                out
            }
            None => [0.0; BotAction::COUNT],
        }
    }

    /// Exclusive access to one key's row for a full decision transaction.
    ///
    /// The write guard spans the caller's whole read-modify-write loop.
    pub fn transact<T>(
        &self,
        key: &str,
        f: impl FnOnce(&mut [RegretEntry; BotAction::COUNT]) -> T,
    ) -> T {
        let mut entries: RwLockWriteGuard<'_, _> = self.entries.write().unwrap();
        let row = entries.entry(key.to_string()).or_default();
        f(row)
    }

    /// Number of distinct context keys seen.
    pub fn num_keys(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    /// Export the table to a serializable snapshot.
    pub fn export(&self) -> StoreSnapshot {
        StoreSnapshot {
            entries: self.entries.read().unwrap().clone(),
        }
    }

    /// Replace the table from a snapshot.
    pub fn import(&self, snapshot: StoreSnapshot) {
        *self.entries.write().unwrap() = snapshot.entries;
    }

    /// Drop all accumulated state.
    pub fn clear(&self) {
        self.entries.write().unwrap().clear();
    }
}

impl Clone for RegretStore {
    fn clone(&self) -> Self {
        Self {
            entries: RwLock::new(self.entries.read().unwrap().clone()),
        }
    }
}

/// Regret matching over one row.
pub(crate) fn strategy_of(row: &[RegretEntry; BotAction::COUNT]) -> [f64; BotAction::COUNT] {
    let positive: Vec<f64> = row.iter().map(|e| e.cumulative_regret.max(0.0)).collect();
    let sum: f64 = positive.iter().sum();
    if sum > 0.0 {
        let mut out = [0.0; BotAction::COUNT];
        for (o, p) in out.iter_mut().zip(positive.iter()) {
            *o = p / sum;
        }
        out
    } else {
        uniform()
    }
}

fn uniform() -> [f64; BotAction::COUNT] {
    [1.0 / BotAction::COUNT as f64; BotAction::COUNT]
}

/// Serializable snapshot of the regret/strategy table.
///
/// Written at tournament end, optionally read at startup; absence of a
/// snapshot means "start with an empty table".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// Table rows: context key -> per-action entries.
    pub entries: FxHashMap<String, [RegretEntry; BotAction::COUNT]>,
}
