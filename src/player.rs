//! Tournament seats: identity, stack, decision policy, and history.

use std::fmt;
use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::cards::{Card, Street};
use crate::profile::{ObservedAction, OpponentProfile};
use crate::strategy::{BotAction, DecisionContext, StrategyEngine};

/// How a seat chooses its actions.
#[derive(Clone)]
pub enum DecisionPolicy {
    /// Bot pooling into the shared regret-minimization engine.
    Shared(Arc<StrategyEngine>),
    /// Uniform random over fold/call/raise (the baseline non-learning bot;
    /// also what newly registered human seats fall back to between inputs).
    Uniform,
    /// Always the same action (scripted seats and tests).
    Fixed(BotAction),
}

impl fmt::Debug for DecisionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecisionPolicy::Shared(_) => write!(f, "Shared"),
            DecisionPolicy::Uniform => write!(f, "Uniform"),
            DecisionPolicy::Fixed(action) => write!(f, "Fixed({})", action),
        }
    }
}

/// One entry of a seat's append-only decision log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionRecord {
    /// Round the decision was made in.
    pub round: u32,
    /// Street the decision was made on.
    pub street: Street,
    /// Bet the seat was facing.
    pub current_bet: i64,
    /// The action taken.
    pub action: BotAction,
}

/// A tournament participant.
///
/// Identity and stack persist across rounds until elimination; hole cards
/// are round-scoped and cleared between hands; the decision history and the
/// opponent dossier grow for the player's lifetime.
pub struct Player {
    /// Unique name within the tournament.
    pub name: String,
    /// Chip stack; can dip below zero transiently before elimination applies.
    pub stack: i64,
    /// Hole cards for the hand in progress (exactly 2 once dealt).
    pub hole_cards: Vec<Card>,
    /// Whether the seat has folded out of the current hand.
    pub folded: bool,
    /// Append-only decision log.
    pub history: Vec<DecisionRecord>,
    /// Per-opponent behavior tallies owned by this player.
    pub dossier: OpponentProfile,
    policy: DecisionPolicy,
}

impl Player {
    /// Create a player with the given policy.
    pub fn new(name: impl Into<String>, stack: i64, policy: DecisionPolicy) -> Self {
        Self {
            name: name.into(),
            stack,
            hole_cards: Vec::with_capacity(2),
            folded: false,
            history: Vec::new(),
            dossier: OpponentProfile::new(),
            policy,
        }
    }

    /// Create a bot wired to the shared strategy engine.
    pub fn bot(name: impl Into<String>, stack: i64, engine: Arc<StrategyEngine>) -> Self {
        Self::new(name, stack, DecisionPolicy::Shared(engine))
    }

    /// The seat's decision policy.
    pub fn policy(&self) -> &DecisionPolicy {
        &self.policy
    }

    /// Decide an action for the given context and log it.
    pub fn make_decision(&mut self, ctx: &DecisionContext<'_>, rng: &mut dyn RngCore) -> BotAction {
        let action = match &self.policy {
            DecisionPolicy::Shared(engine) => engine.decide(ctx, rng),
            DecisionPolicy::Uniform => *BotAction::ALL
                .choose(rng)
                .expect("action list is non-empty"),
            DecisionPolicy::Fixed(action) => *action,
        };
        self.history.push(DecisionRecord {
            round: ctx.round,
            street: ctx.street,
            current_bet: ctx.current_bet,
            action,
        });
        action
    }

    /// Record an opponent's action in this player's dossier.
    pub fn observe(&mut self, opponent: &str, action: BotAction) {
        let observed = match action {
            BotAction::Fold => ObservedAction::Fold,
            BotAction::Call => ObservedAction::Call,
            BotAction::Raise => ObservedAction::Aggro,
        };
        self.dossier.record(opponent, observed);
    }

    /// Reset round-scoped state before a new hand.
    pub fn reset_for_hand(&mut self) {
        self.hole_cards.clear();
        self.folded = false;
    }
}

impl fmt::Debug for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Player")
            .field("name", &self.name)
            .field("stack", &self.stack)
            .field("folded", &self.folded)
            .field("policy", &self.policy)
            .finish()
    }
}
