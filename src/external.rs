//! Boundaries to external collaborators.
//!
//! Persistence and live-state push are glue around the core: the orchestrator
//! calls them at round boundaries and at tournament end, logs their failures,
//! and never lets them fault a round. The default implementations do nothing;
//! `MemoryStore` backs the tests.

use std::fmt;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::player::Player;

/// One seat as seen by the live-state consumer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatView {
    /// Player name.
    pub name: String,
    /// Current chip stack.
    pub stack: i64,
    /// Hole cards for the hand just completed.
    pub hole_cards: Vec<Card>,
}

/// One table as seen by the live-state consumer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableView {
    /// Seats in table order.
    pub players: Vec<SeatView>,
}

impl TableView {
    /// Build a view over a seated table.
    pub fn of(seats: &[Player]) -> Self {
        Self {
            players: seats
                .iter()
                .map(|p| SeatView {
                    name: p.name.clone(),
                    stack: p.stack,
                    hole_cards: p.hole_cards.clone(),
                })
                .collect(),
        }
    }
}

/// Durable record of one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// Player name.
    pub name: String,
    /// Chip stack at save time.
    pub stack: i64,
}

/// Durable snapshot of tournament progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentSnapshot {
    /// Completed round number.
    pub round: u32,
    /// Pot at snapshot time (zero after awards).
    pub pot: i64,
    /// Community cards of the snapshotted hand.
    pub community: Vec<Card>,
}

/// Persistence collaborator consumed by the core.
///
/// Failures are logged by the orchestrator and never surfaced as core
/// faults; implementations own their retry/IO policy.
pub trait PersistenceStore: Send + Sync {
    /// Persist one player's state, returning its storage id.
    fn save_player_state(&self, player: &PlayerRecord) -> Result<u64, PersistenceError>;

    /// Load all persisted players.
    fn load_players(&self) -> Result<Vec<(u64, PlayerRecord)>, PersistenceError>;

    /// Persist a round-boundary snapshot.
    fn save_tournament_snapshot(&self, snapshot: &TournamentSnapshot)
        -> Result<(), PersistenceError>;

    /// Load the most recent snapshot, if any.
    fn load_latest_tournament_snapshot(
        &self,
    ) -> Result<Option<TournamentSnapshot>, PersistenceError>;
}

/// Failure reported by a persistence collaborator.
#[derive(Debug, Clone)]
pub struct PersistenceError(pub String);

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "persistence failure: {}", self.0)
    }
}

impl std::error::Error for PersistenceError {}

/// Persistence that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStore;

impl PersistenceStore for NullStore {
    fn save_player_state(&self, _player: &PlayerRecord) -> Result<u64, PersistenceError> {
        Ok(0)
    }

    fn load_players(&self) -> Result<Vec<(u64, PlayerRecord)>, PersistenceError> {
        Ok(Vec::new())
    }

    fn save_tournament_snapshot(
        &self,
        _snapshot: &TournamentSnapshot,
    ) -> Result<(), PersistenceError> {
        Ok(())
    }

    fn load_latest_tournament_snapshot(
        &self,
    ) -> Result<Option<TournamentSnapshot>, PersistenceError> {
        Ok(None)
    }
}

/// In-memory persistence used by tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    players: Mutex<Vec<PlayerRecord>>,
    snapshots: Mutex<Vec<TournamentSnapshot>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of snapshots taken.
    pub fn snapshot_count(&self) -> usize {
        self.snapshots.lock().unwrap().len()
    }

    /// Number of player records saved.
    pub fn player_count(&self) -> usize {
        self.players.lock().unwrap().len()
    }
}

impl PersistenceStore for MemoryStore {
    fn save_player_state(&self, player: &PlayerRecord) -> Result<u64, PersistenceError> {
        let mut players = self.players.lock().unwrap();
        players.push(player.clone());
        Ok(players.len() as u64 - 1)
    }

    fn load_players(&self) -> Result<Vec<(u64, PlayerRecord)>, PersistenceError> {
        Ok(self
            .players
            .lock()
            .unwrap()
            .iter()
            .cloned()
            .enumerate()
            .map(|(i, p)| (i as u64, p))
            .collect())
    }

    fn save_tournament_snapshot(
        &self,
        snapshot: &TournamentSnapshot,
    ) -> Result<(), PersistenceError> {
        self.snapshots.lock().unwrap().push(snapshot.clone());
        Ok(())
    }

    fn load_latest_tournament_snapshot(
        &self,
    ) -> Result<Option<TournamentSnapshot>, PersistenceError> {
        Ok(self.snapshots.lock().unwrap().last().cloned())
    }
}

/// Live-state push collaborator: one call per completed round,
/// fire-and-forget, never awaited or retried.
pub trait LiveStatePublisher: Send + Sync {
    /// Publish the per-table state after a round.
    fn publish(&self, tables: &[TableView]);
}

/// Publisher that discards the state.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPublisher;

impl LiveStatePublisher for NullPublisher {
    fn publish(&self, _tables: &[TableView]) {}
}

/// Publisher that logs a per-table summary (stands in for a socket push).
#[derive(Debug, Clone, Copy, Default)]
pub struct LogPublisher;

impl LiveStatePublisher for LogPublisher {
    fn publish(&self, tables: &[TableView]) {
        for (i, table) in tables.iter().enumerate() {
            let seats: Vec<String> = table
                .players
                .iter()
                .map(|p| format!("{}:{}", p.name, p.stack))
                .collect();
            log::info!("table {}: {}", i, seats.join(", "));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trips() {
        let store = MemoryStore::new();
        let id = store
            .save_player_state(&PlayerRecord {
                name: "p1".into(),
                stack: 9000,
            })
            .unwrap();
        assert_eq!(id, 0);
        assert_eq!(store.load_players().unwrap().len(), 1);

        assert!(store.load_latest_tournament_snapshot().unwrap().is_none());
        let snapshot = TournamentSnapshot {
            round: 3,
            pot: 0,
            community: vec![],
        };
        store.save_tournament_snapshot(&snapshot).unwrap();
        assert_eq!(
            store.load_latest_tournament_snapshot().unwrap(),
            Some(snapshot)
        );
    }
}
