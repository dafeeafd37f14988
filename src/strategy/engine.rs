//! The shared regret-minimization decision engine.
//!
//! `decide` runs a batch of self-play iterations against the current betting
//! context, accumulating regret and strategy weight in the shared store, then
//! reads out the action with the largest cumulative weight (average-strategy
//! readout, standard CFR convergence practice).
//!
//! The payoff estimator is an intentionally crude stochastic placeholder for
//! a full counterfactual value computation, preserved for fidelity to the
//! original design and swappable through the `PayoffEstimator` trait. The
//! same goes for context keying: the default `GlobalKey` folds all decisions
//! into one row regardless of hole cards, board, or position.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};

use log::{info, warn};
use rand::{Rng, RngCore};

use crate::cards::{Card, Street};

use super::store::{strategy_of, RegretStore, StoreSnapshot};

/// Default number of self-play iterations per live decision.
pub const DEFAULT_ITERATIONS: u32 = 1000;

/// An action a bot can take at a decision point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum BotAction {
    /// Give up the hand.
    Fold,
    /// Match the current bet.
    Call,
    /// Increase the bet.
    Raise,
}

impl BotAction {
    /// Number of distinct actions.
    pub const COUNT: usize = 3;

    /// All actions in canonical order (ties in readouts resolve to the first).
    pub const ALL: [BotAction; BotAction::COUNT] =
        [BotAction::Fold, BotAction::Call, BotAction::Raise];

    /// Index into per-action arrays.
    pub fn index(&self) -> usize {
        match self {
            BotAction::Fold => 0,
            BotAction::Call => 1,
            BotAction::Raise => 2,
        }
    }

    /// Action identifier used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            BotAction::Fold => "fold",
            BotAction::Call => "call",
            BotAction::Raise => "raise",
        }
    }
}

impl fmt::Display for BotAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// What a seat sees when asked to act.
#[derive(Debug, Clone, Copy)]
pub struct DecisionContext<'a> {
    /// Round number the hand belongs to.
    pub round: u32,
    /// Betting street in progress.
    pub street: Street,
    /// Bet amount the seat must match to stay in.
    pub current_bet: i64,
    /// Chips in the pot before this decision.
    pub pot: i64,
    /// Community cards revealed so far.
    pub community: &'a [Card],
}

/// Maps a decision context to a regret-table key.
///
/// This is the single swappable strategy-point for regret keying: the default
/// collapses everything into one global row; a street- or bucket-keyed
/// implementation slots in without touching the engine or store.
pub trait ContextKey: Send + Sync {
    /// Produce the table key for a context.
    fn key(&self, ctx: &DecisionContext<'_>) -> String;
}

/// The original action-keyed design: one row for the whole tournament.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalKey;

impl ContextKey for GlobalKey {
    fn key(&self, _ctx: &DecisionContext<'_>) -> String {
        "global".to_string()
    }
}

/// Maps a betting context to a payoff-per-action triple.
pub trait PayoffEstimator: Send + Sync {
    /// Estimated payoff for fold/call/raise given the bet to call.
    fn payoffs(&self, current_bet: i64, rng: &mut dyn RngCore) -> [f64; BotAction::COUNT];
}

/// The default stochastic estimator.
///
/// fold -> -bet; call -> uniform in [-bet, +bet]; raise -> uniform in
/// [bet, 2*bet]. A placeholder for a real counterfactual value computation.
#[derive(Debug, Clone, Copy, Default)]
pub struct StochasticPayoff;

impl PayoffEstimator for StochasticPayoff {
    fn payoffs(&self, current_bet: i64, rng: &mut dyn RngCore) -> [f64; BotAction::COUNT] {
        debug_assert!(current_bet >= 0, "bet to call cannot be negative");
        let bet = current_bet.max(0);
        let call = if bet > 0 { rng.gen_range(-bet..=bet) } else { 0 };
        let raise = if bet > 0 { rng.gen_range(bet..=2 * bet) } else { 0 };
        [-(bet as f64), call as f64, raise as f64]
    }
}

/// The shared strategy engine.
///
/// Exactly one logical owner exists per tournament; bot agents hold it behind
/// an `Arc` so every table's decisions pool into the same table.
pub struct StrategyEngine {
    store: RegretStore,
    keying: Box<dyn ContextKey>,
    estimator: Box<dyn PayoffEstimator>,
    iterations: AtomicU32,
}

impl Default for StrategyEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl StrategyEngine {
    /// Create an engine with an empty table and default components.
    pub fn new() -> Self {
        Self {
            store: RegretStore::new(),
            keying: Box::new(GlobalKey),
            estimator: Box::new(StochasticPayoff),
            iterations: AtomicU32::new(DEFAULT_ITERATIONS),
        }
    }

    /// Builder method: replace the context keying function.
    pub fn with_keying(mut self, keying: impl ContextKey + 'static) -> Self {
        self.keying = Box::new(keying);
        self
    }

    /// Builder method: replace the payoff estimator.
    pub fn with_estimator(mut self, estimator: impl PayoffEstimator + 'static) -> Self {
        self.estimator = Box::new(estimator);
        self
    }

    /// Builder method: set the self-play iteration count.
    pub fn with_iterations(self, iterations: u32) -> Self {
        self.iterations.store(iterations.max(1), Ordering::Relaxed);
        self
    }

    /// Current self-play iteration count.
    pub fn iterations(&self) -> u32 {
        self.iterations.load(Ordering::Relaxed)
    }

    /// Adjust the iteration count mid-tournament (late-round scaling).
    pub fn set_iterations(&self, iterations: u32) {
        self.iterations.store(iterations.max(1), Ordering::Relaxed);
    }

    /// Decide an action for the given context.
    ///
    /// Runs the configured number of self-play iterations, each one a
    /// regret-matching step against freshly estimated payoffs, then returns
    /// the action with the largest cumulative strategy weight. The whole
    /// batch runs inside one store transaction so concurrent tables cannot
    /// interleave and lose updates.
    pub fn decide(&self, ctx: &DecisionContext<'_>, rng: &mut dyn RngCore) -> BotAction {
        let key = self.keying.key(ctx);
        let iterations = self.iterations();

        self.store.transact(&key, |row| {
            for _ in 0..iterations {
                let probs = strategy_of(row);
                let payoffs = self.estimator.payoffs(ctx.current_bet, rng);
                let expected: f64 = payoffs
                    .iter()
                    .zip(probs.iter())
                    .map(|(&pay, &p)| pay * p)
                    .sum();
                for action in BotAction::ALL {
                    let i = action.index();
                    row[i].cumulative_regret += payoffs[i] - expected;
                    row[i].cumulative_weight += probs[i];
                }
            }

            // Average-strategy readout; first action wins ties.
            let mut best = BotAction::Fold;
            for action in BotAction::ALL {
                if row[action.index()].cumulative_weight
                    > row[best.index()].cumulative_weight
                {
                    best = action;
                }
            }
            best
        })
    }

    /// Current regret-matching probabilities for a context.
    pub fn current_strategy(&self, ctx: &DecisionContext<'_>) -> [f64; BotAction::COUNT] {
        self.store.current_strategy(&self.keying.key(ctx))
    }

    /// Access the underlying store (analysis and tests).
    pub fn store(&self) -> &RegretStore {
        &self.store
    }

    /// Export the table for persistence across tournaments.
    pub fn export_snapshot(&self) -> StoreSnapshot {
        self.store.export()
    }

    /// Replace the table from a snapshot.
    pub fn import_snapshot(&self, snapshot: StoreSnapshot) {
        self.store.import(snapshot);
    }

    /// Write the strategy snapshot to a JSON file.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let json = serde_json::to_string(&self.export_snapshot())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(&path, json)?;
        info!("strategy snapshot saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Load a strategy snapshot from a JSON file if one exists.
    ///
    /// A missing file means "start with an empty table" and is not an error;
    /// a malformed file is logged and likewise falls back to the empty table.
    /// Returns whether a snapshot was loaded.
    pub fn load_from_file(&self, path: impl AsRef<Path>) -> io::Result<bool> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(false);
        }
        let json = fs::read_to_string(path)?;
        match serde_json::from_str::<StoreSnapshot>(&json) {
            Ok(snapshot) => {
                self.import_snapshot(snapshot);
                info!("strategy snapshot loaded from {}", path.display());
                Ok(true)
            }
            Err(e) => {
                warn!(
                    "ignoring malformed strategy snapshot {}: {}",
                    path.display(),
                    e
                );
                Ok(false)
            }
        }
    }
}

impl fmt::Debug for StrategyEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyEngine")
            .field("keys", &self.store.num_keys())
            .field("iterations", &self.iterations())
            .finish()
    }
}
