//! Multi-table round orchestrator.
//!
//! A tournament runs in rounds: seating is reshuffled and chunked into
//! fixed-size tables, every table plays one hand in parallel, results join
//! at the round barrier, and busted players are removed before the next
//! round forms. The orchestrator is the one place allowed to absorb a
//! recoverable per-round error; fatal errors always propagate.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::cards::{Card, Deck};
use crate::error::{ConfigError, TournamentError};
use crate::external::{
    LiveStatePublisher, NullPublisher, NullStore, PersistenceStore, PlayerRecord, TableView,
    TournamentSnapshot,
};
use crate::player::Player;
use crate::strategy::StrategyEngine;

use super::config::TournamentConfig;
use super::table::{play_hand, HandOutcome};

/// Salt distinguishing the seating shuffle from per-table deal streams.
const SEATING_STREAM: usize = usize::MAX;

/// Final report of a completed tournament.
#[derive(Debug, Clone)]
pub struct TournamentResult {
    /// Rounds played before a single player remained.
    pub rounds_played: u32,
    /// Players in finishing order: winner first, first bust-out last.
    pub standings: Vec<PlayerRecord>,
    /// Chip payouts by finishing place.
    pub payouts: BTreeMap<u32, i64>,
}

impl TournamentResult {
    /// The tournament winner, if anyone entered.
    pub fn winner(&self) -> Option<&PlayerRecord> {
        self.standings.first()
    }
}

/// The tournament orchestrator.
///
/// Owns the field of players, the round counter, and the boundaries to the
/// persistence and live-state collaborators. One strategy engine is shared
/// by every bot across every table.
pub struct Tournament {
    config: TournamentConfig,
    engine: Arc<StrategyEngine>,
    players: Vec<Player>,
    pending: Vec<Player>,
    eliminated: Vec<Player>,
    round: u32,
    entrants: usize,
    chip_total: i64,
    master_seed: u64,
    store: Arc<dyn PersistenceStore>,
    publisher: Arc<dyn LiveStatePublisher>,
}

impl Tournament {
    /// Create a tournament with no players seated yet.
    ///
    /// The configuration is validated up front and rejected whole; the
    /// engine's iteration count is aligned with the configuration.
    pub fn new(
        config: TournamentConfig,
        engine: Arc<StrategyEngine>,
    ) -> Result<Self, TournamentError> {
        config.validate()?;
        engine.set_iterations(config.strategy_iterations);
        let master_seed = config.seed.unwrap_or_else(rand::random);
        Ok(Self {
            config,
            engine,
            players: Vec::new(),
            pending: Vec::new(),
            eliminated: Vec::new(),
            round: 0,
            entrants: 0,
            chip_total: 0,
            master_seed,
            store: Arc::new(NullStore),
            publisher: Arc::new(NullPublisher),
        })
    }

    /// Builder method: attach a persistence collaborator.
    pub fn with_persistence(mut self, store: Arc<dyn PersistenceStore>) -> Self {
        self.store = store;
        self
    }

    /// Builder method: attach a live-state publisher.
    pub fn with_publisher(mut self, publisher: Arc<dyn LiveStatePublisher>) -> Self {
        self.publisher = publisher;
        self
    }

    /// Register a player. Registration lands between rounds: the new seat
    /// joins when the next round's tables form.
    pub fn register_player(&mut self, player: Player) {
        info!("registered {} with {} chips", player.name, player.stack);
        self.entrants += 1;
        self.chip_total += player.stack;
        self.pending.push(player);
    }

    /// Register `count` bots wired to the shared engine, numbered after the
    /// existing entrants.
    pub fn register_bots(&mut self, count: usize) {
        for _ in 0..count {
            let name = format!("Player_{}", self.entrants + 1);
            let bot = Player::bot(name, self.config.starting_stack, Arc::clone(&self.engine));
            self.register_player(bot);
        }
    }

    /// Players still holding chips.
    pub fn active_players(&self) -> &[Player] {
        &self.players
    }

    /// Busted players in elimination order.
    pub fn eliminated_players(&self) -> &[Player] {
        &self.eliminated
    }

    /// Rounds completed so far.
    pub fn round(&self) -> u32 {
        self.round
    }

    /// The shared strategy engine.
    pub fn engine(&self) -> &Arc<StrategyEngine> {
        &self.engine
    }

    /// Whether at most one player (seated or pending) remains.
    pub fn is_finished(&self) -> bool {
        self.players.len() + self.pending.len() <= 1
    }

    /// Play rounds until at most one player remains, then produce the
    /// final standings and payouts.
    pub fn run(&mut self) -> Result<TournamentResult, TournamentError> {
        if self.entrants < 2 {
            return Err(ConfigError::TooFewSeats(self.entrants).into());
        }
        info!(
            "tournament start: {} entrants, {} chips in play, seed {}",
            self.entrants, self.chip_total, self.master_seed
        );
        while !self.is_finished() {
            self.play_round()?;
        }
        Ok(self.finish())
    }

    /// Play one round: form tables, fan the hands out across threads, join
    /// at the barrier, then publish, snapshot, and eliminate.
    pub fn play_round(&mut self) -> Result<(), TournamentError> {
        self.round += 1;
        self.players.append(&mut self.pending);

        let blinds = self.config.blinds_for_round(self.round)?;
        let round = self.round;
        let pause = self.config.decision_pause;
        let master = self.master_seed;
        let per_table = self.config.players_per_table;

        let mut seat_rng = StdRng::seed_from_u64(stream_seed(master, round, SEATING_STREAM));
        self.players.shuffle(&mut seat_rng);

        // Fan out: one hand per table, each on its own deck and rng stream.
        // The barrier is the collect; nothing downstream sees a partial round.
        let results: Vec<(TableView, Option<Result<HandOutcome, TournamentError>>)> = self
            .players
            .par_chunks_mut(per_table)
            .enumerate()
            .map(|(table, chunk)| {
                if chunk.len() < 2 {
                    debug!("round {}: table {} sits out short-handed", round, table);
                    return (TableView::of(chunk), None);
                }
                let mut rng = StdRng::seed_from_u64(stream_seed(master, round, table));
                let mut deck = Deck::shuffled(&mut rng);
                let outcome = play_hand(round, &blinds, chunk, &mut deck, &mut rng, pause);
                (TableView::of(chunk), Some(outcome))
            })
            .collect();

        let mut views = Vec::with_capacity(results.len());
        let mut community: Vec<Card> = Vec::new();
        for (table, (view, outcome)) in results.into_iter().enumerate() {
            views.push(view);
            match outcome {
                None => {}
                Some(Ok(o)) => {
                    if community.is_empty() {
                        community = o.community;
                    }
                }
                Some(Err(e)) if e.is_fatal() => return Err(e),
                Some(Err(e)) => {
                    // The sole recoverable catch: log and carry on with the
                    // rest of the tournament.
                    warn!("round {}: table {} voided: {}", round, table, e);
                }
            }
        }

        self.publisher.publish(&views);
        if let Err(e) = self.store.save_tournament_snapshot(&TournamentSnapshot {
            round,
            pot: 0,
            community,
        }) {
            warn!("round {}: snapshot not persisted: {}", round, e);
        }

        self.eliminate_busted();

        // Late-tournament pressure: every completed round from the fifth on
        // deepens the self-play batches by half again.
        if self.round >= 5 {
            let deeper = self.engine.iterations() * 3 / 2;
            debug!(
                "round {} complete: strategy iterations raised to {}",
                self.round, deeper
            );
            self.engine.set_iterations(deeper);
        }

        info!(
            "round {} complete: {} players remain",
            self.round,
            self.players.len()
        );
        Ok(())
    }

    fn eliminate_busted(&mut self) {
        let mut i = 0;
        while i < self.players.len() {
            if self.players[i].stack <= 0 {
                let busted = self.players.remove(i);
                info!(
                    "round {}: {} eliminated with {} chips",
                    self.round, busted.name, busted.stack
                );
                self.eliminated.push(busted);
            } else {
                i += 1;
            }
        }
    }

    /// Produce the final standings and payouts, persisting player states.
    ///
    /// `run` calls this once the field collapses; callers driving rounds by
    /// hand (progress reporting) call it themselves.
    pub fn finish(&mut self) -> TournamentResult {
        self.players.sort_by(|a, b| b.stack.cmp(&a.stack));

        let standings: Vec<PlayerRecord> = self
            .players
            .iter()
            .chain(self.eliminated.iter().rev())
            .map(|p| PlayerRecord {
                name: p.name.clone(),
                stack: p.stack,
            })
            .collect();

        for record in &standings {
            if let Err(e) = self.store.save_player_state(record) {
                warn!("player {} not persisted: {}", record.name, e);
            }
        }

        let payouts = self.config.payouts(self.chip_total);
        if let Some(winner) = standings.first() {
            info!(
                "tournament over after {} rounds: {} wins",
                self.round, winner.name
            );
        }

        TournamentResult {
            rounds_played: self.round,
            standings,
            payouts,
        }
    }
}

impl fmt::Debug for Tournament {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tournament")
            .field("round", &self.round)
            .field("active", &self.players.len())
            .field("pending", &self.pending.len())
            .field("eliminated", &self.eliminated.len())
            .field("entrants", &self.entrants)
            .finish()
    }
}

/// Deterministic per-stream seed derived from the master seed. Each
/// (round, table) pair gets its own rng stream so tables never contend
/// for randomness and reruns with the same seed replay exactly.
fn stream_seed(master: u64, round: u32, stream: usize) -> u64 {
    master
        .wrapping_mul(0x9E37_79B9_7F4A_7C15)
        .wrapping_add(u64::from(round) << 32)
        .wrapping_add(stream as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::MemoryStore;
    use crate::player::DecisionPolicy;
    use crate::strategy::BotAction;

    fn uniform_field(count: usize, stack: i64) -> Vec<Player> {
        (0..count)
            .map(|i| Player::new(format!("u{}", i), stack, DecisionPolicy::Uniform))
            .collect()
    }

    fn seeded(config: TournamentConfig) -> Tournament {
        Tournament::new(config, Arc::new(StrategyEngine::new())).unwrap()
    }

    #[test]
    fn test_invalid_config_is_rejected_at_setup() {
        let config = TournamentConfig::default().with_players_per_table(1);
        // unwrap_err needs the Ok side to be Debug, so this also pins the
        // Tournament Debug impl.
        let err = Tournament::new(config, Arc::new(StrategyEngine::new())).unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(
            err,
            TournamentError::Config(ConfigError::TooFewSeats(1))
        ));
    }

    #[test]
    fn test_debug_reports_field_counts() {
        let mut tournament = seeded(TournamentConfig::default().with_seed(1));
        tournament.register_bots(2);
        let rendered = format!("{:?}", tournament);
        assert!(rendered.contains("pending: 2"), "got {}", rendered);
    }

    #[test]
    fn test_run_needs_a_field() {
        let mut solo = seeded(TournamentConfig::default().with_seed(1));
        solo.register_bots(1);
        assert!(solo.run().is_err());
    }

    #[test]
    fn test_full_run_terminates_and_conserves_chips() {
        let config = TournamentConfig::default()
            .with_starting_stack(1000)
            .with_strategy_iterations(5)
            .with_seed(2024);
        let mut tournament = seeded(config);
        tournament.register_bots(16);

        let result = tournament.run().unwrap();

        assert_eq!(result.standings.len(), 16);
        assert!(result.rounds_played >= 1);
        let total: i64 = result.standings.iter().map(|p| p.stack).sum();
        assert_eq!(total, 16 * 1000);

        // Winner holds every positive stack's worth once the rest bust.
        assert!(result.winner().unwrap().stack > 0);
        assert_eq!(result.payouts.get(&1), Some(&8000));
    }

    #[test]
    fn test_same_seed_replays_the_same_tournament() {
        let run = || {
            let config = TournamentConfig::default()
                .with_starting_stack(800)
                .with_seed(77);
            let mut tournament = seeded(config);
            for player in uniform_field(12, 800) {
                tournament.register_player(player);
            }
            let result = tournament.run().unwrap();
            (
                result.rounds_played,
                result.standings.iter().map(|p| p.name.clone()).collect::<Vec<_>>(),
            )
        };

        assert_eq!(run(), run());
    }

    #[test]
    fn test_busted_players_leave_before_the_next_round() {
        let config = TournamentConfig::default().with_seed(5);
        let mut tournament = seeded(config);
        for i in 0..7 {
            tournament.register_player(Player::new(
                format!("call{}", i),
                10_000,
                DecisionPolicy::Fixed(BotAction::Call),
            ));
        }
        // Folds out of every pot and antes 10 per round: cannot survive the
        // first hand no matter where the shuffle seats it.
        tournament.register_player(Player::new(
            "shorty",
            5,
            DecisionPolicy::Fixed(BotAction::Fold),
        ));

        tournament.play_round().unwrap();

        assert_eq!(tournament.active_players().len(), 7);
        assert_eq!(tournament.eliminated_players().len(), 1);
        assert_eq!(tournament.eliminated_players()[0].name, "shorty");
        assert!(tournament.active_players().iter().all(|p| p.stack > 0));
    }

    #[test]
    fn test_registration_lands_at_the_next_forming() {
        let config = TournamentConfig::default().with_seed(9);
        let mut tournament = seeded(config);
        for player in uniform_field(3, 10_000) {
            tournament.register_player(player);
        }
        tournament.play_round().unwrap();
        assert_eq!(tournament.active_players().len(), 3);

        tournament.register_player(Player::new(
            "late",
            10_000,
            DecisionPolicy::Uniform,
        ));
        assert_eq!(tournament.active_players().len(), 3);

        tournament.play_round().unwrap();
        assert!(tournament
            .active_players()
            .iter()
            .any(|p| p.name == "late"));
    }

    #[test]
    fn test_short_handed_trailing_table_sits_out() {
        let config = TournamentConfig::default()
            .with_starting_stack(1000)
            .with_seed(31);
        let mut tournament = seeded(config);
        for i in 0..9 {
            tournament.register_player(Player::new(
                format!("fold{}", i),
                1000,
                DecisionPolicy::Fixed(BotAction::Fold),
            ));
        }

        // 9 players chunk into a full table of 8 plus a 1-seat table that
        // must not be charged blinds or antes.
        tournament.play_round().unwrap();

        let untouched = tournament
            .active_players()
            .iter()
            .filter(|p| p.stack == 1000)
            .count();
        assert_eq!(untouched, 1);
        let total: i64 = tournament.active_players().iter().map(|p| p.stack).sum();
        assert_eq!(total, 9 * 1000);
    }

    #[test]
    fn test_round_boundary_snapshots_and_final_saves() {
        let store = Arc::new(MemoryStore::new());
        let config = TournamentConfig::default()
            .with_starting_stack(1000)
            .with_strategy_iterations(5)
            .with_seed(13);
        let mut tournament =
            seeded(config).with_persistence(Arc::clone(&store) as Arc<dyn PersistenceStore>);
        tournament.register_bots(8);

        let result = tournament.run().unwrap();

        assert_eq!(store.snapshot_count() as u32, result.rounds_played);
        assert_eq!(store.player_count(), 8);
        let latest = store.load_latest_tournament_snapshot().unwrap().unwrap();
        assert_eq!(latest.round, result.rounds_played);
    }

    #[test]
    fn test_iterations_deepen_each_round_from_five() {
        let config = TournamentConfig::default()
            .with_strategy_iterations(100)
            .with_seed(3);
        let mut tournament = seeded(config);
        for player in uniform_field(2, 1_000_000) {
            tournament.register_player(player);
        }
        assert_eq!(tournament.engine().iterations(), 100);

        for _ in 0..4 {
            tournament.play_round().unwrap();
        }
        // Rounds 1-4 leave the batch size alone.
        assert_eq!(tournament.engine().iterations(), 100);

        // From round 5 on, every completed round compounds by 1.5x.
        tournament.play_round().unwrap();
        assert_eq!(tournament.engine().iterations(), 150);

        tournament.play_round().unwrap();
        assert_eq!(tournament.engine().iterations(), 225);
    }
}
