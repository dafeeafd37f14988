//! Cards, decks, and hand evaluation.
//!
//! Everything here is round-scoped: decks are built fresh for every hand and
//! never refilled, and hand values are pure functions of the card multiset.

pub mod card;
pub mod eval;

pub use card::{Card, Deck, Street, Suit};
pub use eval::{determine_winner, estimate_strength, EvalError, HandCategory, HandEvaluator, HandValue};
