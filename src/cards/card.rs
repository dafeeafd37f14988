//! Card, deck, and street primitives.
//!
//! A `Card` is an immutable (rank, suit) value with ranks 2..=14 (J=11, Q=12,
//! K=13, A=14). A `Deck` is a shuffled sequence of the 52 unique cards,
//! consumed from one end; exhausted decks are never reused.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rank value of a jack.
pub const RANK_J: u8 = 11;
/// Rank value of a queen.
pub const RANK_Q: u8 = 12;
/// Rank value of a king.
pub const RANK_K: u8 = 13;
/// Rank value of an ace.
pub const RANK_A: u8 = 14;

/// Rank characters for display, indexed by `rank - 2`.
const RANK_CHARS: [char; 13] = ['2', '3', '4', '5', '6', '7', '8', '9', 'T', 'J', 'Q', 'K', 'A'];

/// Suit of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Suit {
    /// Hearts.
    Hearts,
    /// Diamonds.
    Diamonds,
    /// Clubs.
    Clubs,
    /// Spades.
    Spades,
}

impl Suit {
    /// All four suits in canonical order.
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];

    /// Suit character for display.
    pub fn as_char(&self) -> char {
        match self {
            Suit::Hearts => 'h',
            Suit::Diamonds => 'd',
            Suit::Clubs => 'c',
            Suit::Spades => 's',
        }
    }

    fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'h' => Some(Suit::Hearts),
            'd' => Some(Suit::Diamonds),
            'c' => Some(Suit::Clubs),
            's' => Some(Suit::Spades),
            _ => None,
        }
    }
}

/// A single playing card. Immutable value type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    rank: u8,
    suit: Suit,
}

impl Card {
    /// Create a new card from a rank value (2..=14) and a suit.
    #[inline]
    pub fn new(rank: u8, suit: Suit) -> Self {
        debug_assert!((2..=14).contains(&rank), "rank must be 2-14");
        Self { rank, suit }
    }

    /// Parse a card from a string like "As", "Kh", "2c".
    pub fn from_str(s: &str) -> Option<Self> {
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != 2 {
            return None;
        }
        let rank = RANK_CHARS
            .iter()
            .position(|&c| c == chars[0].to_ascii_uppercase())? as u8
            + 2;
        let suit = Suit::from_char(chars[1])?;
        Some(Self::new(rank, suit))
    }

    /// The card's rank value (2..=14; J=11, Q=12, K=13, A=14).
    #[inline]
    pub fn rank(&self) -> u8 {
        self.rank
    }

    /// The card's suit.
    #[inline]
    pub fn suit(&self) -> Suit {
        self.suit
    }

    /// Rank character for display.
    pub fn rank_char(&self) -> char {
        RANK_CHARS[(self.rank - 2) as usize]
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank_char(), self.suit.as_char())
    }
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// One of the four betting phases of a hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Street {
    /// Before any community cards.
    PreFlop,
    /// Three community cards dealt.
    Flop,
    /// Fourth community card dealt.
    Turn,
    /// Fifth community card dealt.
    River,
}

impl Street {
    /// All four streets in play order.
    pub const ALL: [Street; 4] = [Street::PreFlop, Street::Flop, Street::Turn, Street::River];

    /// Street index 0..=3 (used by the fold-probability heuristic).
    pub fn index(&self) -> usize {
        match self {
            Street::PreFlop => 0,
            Street::Flop => 1,
            Street::Turn => 2,
            Street::River => 3,
        }
    }

    /// Number of community cards revealed before this street begins.
    pub fn community_cards_dealt(&self) -> usize {
        match self {
            Street::PreFlop => 0,
            Street::Flop => 3,
            Street::Turn => 1,
            Street::River => 1,
        }
    }

    /// The street that follows this one, if any.
    pub fn next(&self) -> Option<Street> {
        match self {
            Street::PreFlop => Some(Street::Flop),
            Street::Flop => Some(Street::Turn),
            Street::Turn => Some(Street::River),
            Street::River => None,
        }
    }
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Street::PreFlop => write!(f, "Pre-Flop"),
            Street::Flop => write!(f, "Flop"),
            Street::Turn => write!(f, "Turn"),
            Street::River => write!(f, "River"),
        }
    }
}

/// A deck of playing cards, consumed from the end.
#[derive(Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Build the canonical 52-card deck in a fixed order (unshuffled).
    pub fn canonical() -> Self {
        let mut cards = Vec::with_capacity(52);
        for suit in Suit::ALL {
            for rank in 2..=14 {
                cards.push(Card::new(rank, suit));
            }
        }
        Self { cards }
    }

    /// Build a freshly shuffled 52-card deck.
    pub fn shuffled<R: Rng>(rng: &mut R) -> Self {
        let mut deck = Self::canonical();
        deck.cards.shuffle(rng);
        deck
    }

    /// Build a deck that yields `order` front-to-back when drawn.
    ///
    /// Test support for scripting exact deals.
    pub fn stacked(order: Vec<Card>) -> Self {
        let mut cards = order;
        cards.reverse();
        Self { cards }
    }

    /// Draw the next card (remove-and-return the last element).
    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Draw `n` cards, or fewer if the deck runs out.
    pub fn draw_n(&mut self, n: usize) -> Vec<Card> {
        let mut out = Vec::with_capacity(n);
        for _ in 0..n {
            match self.draw() {
                Some(card) => out.push(card),
                None => break,
            }
        }
        out
    }

    /// Number of cards left.
    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    /// Remaining cards as a slice (drawn last-to-first).
    pub fn remaining_cards(&self) -> &[Card] {
        &self.cards
    }
}

impl fmt::Debug for Deck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Deck({} remaining)", self.remaining())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_card_creation() {
        let ace_spades = Card::new(RANK_A, Suit::Spades);
        assert_eq!(ace_spades.rank(), 14);
        assert_eq!(ace_spades.suit(), Suit::Spades);
        assert_eq!(ace_spades.to_string(), "As");

        let two_clubs = Card::new(2, Suit::Clubs);
        assert_eq!(two_clubs.to_string(), "2c");
    }

    #[test]
    fn test_card_parsing() {
        assert_eq!(Card::from_str("As").unwrap().to_string(), "As");
        assert_eq!(Card::from_str("Kh").unwrap().to_string(), "Kh");
        assert_eq!(Card::from_str("Td").unwrap().rank(), 10);
        assert_eq!(Card::from_str("Jc").unwrap().rank(), RANK_J);
        assert!(Card::from_str("XX").is_none());
        assert!(Card::from_str("A").is_none());
    }

    #[test]
    fn test_shuffled_deck_is_full_and_unique() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut deck = Deck::shuffled(&mut rng);
        assert_eq!(deck.remaining(), 52);

        let mut seen = HashSet::new();
        while let Some(card) = deck.draw() {
            assert!(seen.insert(card), "duplicate card {} in deck", card);
        }
        assert_eq!(seen.len(), 52);

        // Same multiset as the canonical deck.
        let canonical: HashSet<Card> = Deck::canonical().remaining_cards().iter().copied().collect();
        assert_eq!(seen, canonical);
    }

    #[test]
    fn test_deck_draws_from_one_end() {
        let mut deck = Deck::canonical();
        let last = *deck.remaining_cards().last().unwrap();
        assert_eq!(deck.draw(), Some(last));
        assert_eq!(deck.remaining(), 51);
    }

    #[test]
    fn test_stacked_deck_draw_order() {
        let order = vec![
            Card::from_str("As").unwrap(),
            Card::from_str("Kd").unwrap(),
            Card::from_str("2c").unwrap(),
        ];
        let mut deck = Deck::stacked(order.clone());
        assert_eq!(deck.draw(), Some(order[0]));
        assert_eq!(deck.draw(), Some(order[1]));
        assert_eq!(deck.draw(), Some(order[2]));
        assert_eq!(deck.draw(), None);
    }

    #[test]
    fn test_street_progression() {
        assert_eq!(Street::PreFlop.next(), Some(Street::Flop));
        assert_eq!(Street::Flop.next(), Some(Street::Turn));
        assert_eq!(Street::Turn.next(), Some(Street::River));
        assert_eq!(Street::River.next(), None);

        assert_eq!(Street::PreFlop.community_cards_dealt(), 0);
        assert_eq!(Street::Flop.community_cards_dealt(), 3);
        assert_eq!(Street::Turn.community_cards_dealt(), 1);
        assert_eq!(Street::River.community_cards_dealt(), 1);
    }
}
