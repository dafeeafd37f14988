//! Poker hand ranking and comparison.
//!
//! The evaluator ranks 2-7 card hands into a totally ordered `HandValue`:
//! category first, then a tiebreak key of descending rank values. Evaluation
//! is a pure function of the card multiset, so identical input always yields
//! identical output.
//!
//! Known limitations, preserved on purpose:
//! - the low-ace "wheel" straight (A-2-3-4-5) is not recognized;
//! - a flush requires every card of the evaluated hand to share one suit;
//! - ties are reported as equal and the showdown keeps the first-found hand.

use std::cmp::Ordering;
use std::fmt;

use super::card::{Card, Deck};

/// Hand categories, ordered from worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HandCategory {
    /// No made hand.
    HighCard,
    /// One pair.
    OnePair,
    /// Two distinct pairs.
    TwoPair,
    /// Three of a kind.
    ThreeOfAKind,
    /// Five consecutive ranks.
    Straight,
    /// All cards of one suit.
    Flush,
    /// Three of a kind plus a pair.
    FullHouse,
    /// Four of a kind.
    FourOfAKind,
    /// Straight, all of one suit.
    StraightFlush,
}

impl HandCategory {
    /// Human-readable category name.
    pub fn name(&self) -> &'static str {
        match self {
            HandCategory::HighCard => "High Card",
            HandCategory::OnePair => "One Pair",
            HandCategory::TwoPair => "Two Pair",
            HandCategory::ThreeOfAKind => "Three of a Kind",
            HandCategory::Straight => "Straight",
            HandCategory::Flush => "Flush",
            HandCategory::FullHouse => "Full House",
            HandCategory::FourOfAKind => "Four of a Kind",
            HandCategory::StraightFlush => "Straight Flush",
        }
    }
}

impl fmt::Display for HandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The comparable result of evaluating a hand.
///
/// Ordering compares the category ordinal first, then the tiebreak key
/// lexicographically; the first differing element decides. Exhausting both
/// with no difference means a tie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandValue {
    /// The detected category.
    pub category: HandCategory,
    /// Rank values of all evaluated cards, sorted descending (J=11..A=14).
    pub tiebreak: Vec<u8>,
}

impl PartialOrd for HandValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HandValue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.category
            .cmp(&other.category)
            .then_with(|| self.tiebreak.cmp(&other.tiebreak))
    }
}

/// Errors for malformed evaluator input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// Hand size outside 2..=7.
    WrongCardCount(usize),
    /// The same card appeared twice.
    DuplicateCard(Card),
    /// An empty hand list was passed to the winner scan.
    NoHands,
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::WrongCardCount(n) => write!(f, "hand must hold 2-7 cards, got {}", n),
            EvalError::DuplicateCard(card) => write!(f, "duplicate card in hand: {}", card),
            EvalError::NoHands => write!(f, "empty hand list"),
        }
    }
}

impl std::error::Error for EvalError {}

/// Ranks and compares card combinations.
#[derive(Debug, Clone, Copy, Default)]
pub struct HandEvaluator;

impl HandEvaluator {
    /// Create a new hand evaluator.
    pub fn new() -> Self {
        Self
    }

    /// Evaluate a 2-7 card hand as one multiset.
    ///
    /// Flush and straight detection only engage from five cards up; the
    /// pair-family categories come from rank-value frequency counts.
    pub fn evaluate(&self, cards: &[Card]) -> Result<HandValue, EvalError> {
        if !(2..=7).contains(&cards.len()) {
            return Err(EvalError::WrongCardCount(cards.len()));
        }
        for (i, a) in cards.iter().enumerate() {
            if cards[i + 1..].contains(a) {
                return Err(EvalError::DuplicateCard(*a));
            }
        }

        let mut values: Vec<u8> = cards.iter().map(|c| c.rank()).collect();
        values.sort_unstable_by(|a, b| b.cmp(a));

        let is_flush =
            cards.len() >= 5 && cards.iter().all(|c| c.suit() == cards[0].suit());
        let is_straight = has_straight(&values);

        let mut counts = [0u8; 15];
        for &v in &values {
            counts[v as usize] += 1;
        }
        let quads = counts.iter().any(|&c| c == 4);
        let trips = counts.iter().any(|&c| c == 3);
        let pairs = counts.iter().filter(|&&c| c == 2).count();

        let category = if is_flush && is_straight {
            HandCategory::StraightFlush
        } else if quads {
            HandCategory::FourOfAKind
        } else if trips && pairs >= 1 {
            HandCategory::FullHouse
        } else if is_flush {
            HandCategory::Flush
        } else if is_straight {
            HandCategory::Straight
        } else if trips {
            HandCategory::ThreeOfAKind
        } else if pairs >= 2 {
            HandCategory::TwoPair
        } else if pairs == 1 {
            HandCategory::OnePair
        } else {
            HandCategory::HighCard
        };

        Ok(HandValue {
            category,
            tiebreak: values,
        })
    }

    /// Evaluate the best five-card combination of a 2-7 card hand.
    ///
    /// Used at showdown for best-5-of-7; for five cards or fewer this is
    /// plain `evaluate`.
    pub fn evaluate_best_five(&self, cards: &[Card]) -> Result<HandValue, EvalError> {
        if cards.len() <= 5 {
            return self.evaluate(cards);
        }
        // Duplicate detection must see the whole hand, not just each subset.
        for (i, a) in cards.iter().enumerate() {
            if cards[i + 1..].contains(a) {
                return Err(EvalError::DuplicateCard(*a));
            }
        }

        let mut best: Option<HandValue> = None;
        let mut combo = [0usize; 5];
        each_five_combo(cards.len(), &mut combo, 0, 0, &mut |idx| {
            let five = [cards[idx[0]], cards[idx[1]], cards[idx[2]], cards[idx[3]], cards[idx[4]]];
            // Subsets of a duplicate-free 5..=7 card hand cannot fail.
            let value = self.evaluate(&five).expect("valid 5-card subset");
            match &best {
                Some(b) if *b >= value => {}
                _ => best = Some(value),
            }
        });

        best.ok_or(EvalError::WrongCardCount(cards.len()))
    }

    /// Compare two hands by their best-five evaluation.
    pub fn compare(&self, a: &[Card], b: &[Card]) -> Result<Ordering, EvalError> {
        Ok(self.evaluate_best_five(a)?.cmp(&self.evaluate_best_five(b)?))
    }
}

/// Detect a run of five consecutive values in a descending-sorted list.
///
/// Operates on distinct values; the wheel (A-2-3-4-5) is not checked.
fn has_straight(sorted_desc: &[u8]) -> bool {
    let mut distinct: Vec<u8> = sorted_desc.to_vec();
    distinct.dedup();
    if distinct.len() < 5 {
        return false;
    }
    distinct
        .windows(5)
        .any(|w| w.windows(2).all(|p| p[0] - 1 == p[1]))
}

/// Visit every 5-element index combination of `0..n`.
fn each_five_combo(n: usize, combo: &mut [usize; 5], depth: usize, start: usize, f: &mut impl FnMut(&[usize; 5])) {
    if depth == 5 {
        f(combo);
        return;
    }
    for i in start..n {
        combo[depth] = i;
        each_five_combo(n, combo, depth + 1, i + 1, f);
    }
}

/// Find the winning hand: a running best-so-far scan over best-five values.
///
/// The first hand seeds the best; only a strictly greater hand replaces it,
/// so the first of equal hands wins (no pot splitting).
pub fn determine_winner(hands: &[Vec<Card>]) -> Result<usize, EvalError> {
    let evaluator = HandEvaluator::new();
    let mut iter = hands.iter().enumerate();
    let (mut best_idx, first) = iter.next().ok_or(EvalError::NoHands)?;
    let mut best = evaluator.evaluate_best_five(first)?;

    for (i, hand) in iter {
        let value = evaluator.evaluate_best_five(hand)?;
        if value > best {
            best = value;
            best_idx = i;
        }
    }
    Ok(best_idx)
}

/// Estimate how strong `hole` + `community` is against a random opponent.
///
/// Enumerates every two-card completion drawable from the remaining deck,
/// evaluates each against the given hand, and returns the fraction beaten.
/// Ties count as neither a win nor a loss. Quadratic in the remaining deck
/// size, so callers invoke it on demand only, never per betting decision.
pub fn estimate_strength(hole: &[Card], community: &[Card]) -> Result<f64, EvalError> {
    let evaluator = HandEvaluator::new();

    let mut ours: Vec<Card> = hole.to_vec();
    ours.extend_from_slice(community);
    let our_value = evaluator.evaluate_best_five(&ours)?;

    let remaining: Vec<Card> = Deck::canonical()
        .remaining_cards()
        .iter()
        .copied()
        .filter(|c| !ours.contains(c))
        .collect();

    let mut wins = 0u32;
    let mut total = 0u32;
    for i in 0..remaining.len() {
        for j in (i + 1)..remaining.len() {
            let mut theirs = vec![remaining[i], remaining[j]];
            theirs.extend_from_slice(community);
            let their_value = evaluator.evaluate_best_five(&theirs)?;
            if our_value > their_value {
                wins += 1;
            }
            total += 1;
        }
    }

    if total == 0 {
        return Ok(0.0);
    }
    Ok(f64::from(wins) / f64::from(total))
}
