//! Shared regret-minimization strategy.
//!
//! One process-wide regret/strategy table, shared by reference across every
//! bot agent that opts in. The store serializes each decision's full
//! read-modify-write transaction, which is the one genuinely contended
//! resource in the system.

pub mod engine;
pub mod store;

pub use engine::{
    BotAction, ContextKey, DecisionContext, GlobalKey, PayoffEstimator, StochasticPayoff,
    StrategyEngine,
};
pub use store::{RegretEntry, RegretStore, StoreSnapshot};
