//! Single-hand table engine.
//!
//! `play_hand` drives one complete hand at one table: forced bets, hole
//! cards, the four betting streets with a burn card before each board
//! segment, and either an early win (everyone else folded) or a showdown on
//! the best five of seven cards. Betting is single-pass: every live seat
//! acts exactly once per street, there are no re-raises and no side pots,
//! and the whole pot goes to one winner.

use std::thread;
use std::time::Duration;

use log::{debug, log_enabled, trace, Level};
use rand::Rng;

use crate::cards::{determine_winner, Card, Deck, Street};
use crate::error::{ConfigError, TournamentError};
use crate::player::Player;
use crate::strategy::{BotAction, DecisionContext};

use super::config::BlindLevel;

/// Result of one completed hand.
#[derive(Debug, Clone)]
pub struct HandOutcome {
    /// Seat index of the winner.
    pub winner: usize,
    /// Chips awarded to the winner.
    pub pot: i64,
    /// Community cards revealed during the hand.
    pub community: Vec<Card>,
    /// Whether the hand reached a showdown (false: all but one folded).
    pub showdown: bool,
}

/// Play one hand at a table.
///
/// Forced bets come first: seat 0 posts the small blind, seat 1 the big
/// blind, and every seat pays the ante. Bets are deducted from stacks as
/// they enter the pot, and the pot is paid out in full to the single winner,
/// so the table's total chip count is identical before and after the hand.
/// Stacks may go negative here; elimination is applied by the caller between
/// rounds. Fewer than two seats is a configuration error, reported before
/// any chips move.
pub fn play_hand<R: Rng>(
    round: u32,
    blinds: &BlindLevel,
    seats: &mut [Player],
    deck: &mut Deck,
    rng: &mut R,
    decision_pause: Option<Duration>,
) -> Result<HandOutcome, TournamentError> {
    if seats.len() < 2 {
        return Err(ConfigError::TooFewSeats(seats.len()).into());
    }

    for seat in seats.iter_mut() {
        seat.reset_for_hand();
    }

    let mut pot: i64 = 0;
    seats[0].stack -= blinds.small_blind;
    pot += blinds.small_blind;
    seats[1].stack -= blinds.big_blind;
    pot += blinds.big_blind;
    for seat in seats.iter_mut() {
        seat.stack -= blinds.ante;
        pot += blinds.ante;
    }

    for seat in seats.iter_mut() {
        seat.hole_cards = vec![draw_checked(deck)?, draw_checked(deck)?];
    }

    let mut community: Vec<Card> = Vec::with_capacity(5);

    for street in Street::ALL {
        let dealt = street.community_cards_dealt();
        if dealt > 0 {
            // Burn one card before each board segment.
            draw_checked(deck)?;
            for _ in 0..dealt {
                community.push(draw_checked(deck)?);
            }
        }
        trace!("round {} {}: board {:?}", round, street, community);

        for i in 0..seats.len() {
            if seats[i].folded {
                continue;
            }

            // The bet each seat faces is drawn fresh, standing in for real
            // bet tracking across the single-pass street.
            let current_bet = rng.gen_range(10..=100);
            let ctx = DecisionContext {
                round,
                street,
                current_bet,
                pot,
                community: &community,
            };

            if log_enabled!(Level::Debug) {
                for other in seats.iter().filter(|o| !o.folded) {
                    if other.name == seats[i].name {
                        continue;
                    }
                    let fold_p = seats[i].dossier.estimate_fold_probability(
                        &other.name,
                        current_bet,
                        pot,
                        street.index(),
                        0.5,
                    );
                    debug!(
                        "{} estimates {} folds to {} with p={:.3}",
                        seats[i].name, other.name, current_bet, fold_p
                    );
                }
            }

            let action = seats[i].make_decision(&ctx, rng);
            match action {
                BotAction::Fold => {
                    seats[i].folded = true;
                }
                BotAction::Call => {
                    seats[i].stack -= current_bet;
                    pot += current_bet;
                }
                BotAction::Raise => {
                    let raise_to = rng.gen_range(10..=100);
                    seats[i].stack -= raise_to;
                    pot += raise_to;
                }
            }

            let actor = seats[i].name.clone();
            for (j, observer) in seats.iter_mut().enumerate() {
                if j != i {
                    observer.observe(&actor, action);
                }
            }

            if let Some(pause) = decision_pause {
                thread::sleep(pause);
            }

            if let Some(winner) = sole_survivor(seats) {
                seats[winner].stack += pot;
                debug!(
                    "round {}: {} wins {} uncontested",
                    round, seats[winner].name, pot
                );
                return Ok(HandOutcome {
                    winner,
                    pot,
                    community,
                    showdown: false,
                });
            }
        }
    }

    // Showdown: best five of seven for every live seat.
    let live: Vec<usize> = (0..seats.len()).filter(|&i| !seats[i].folded).collect();
    let hands: Vec<Vec<Card>> = live
        .iter()
        .map(|&i| {
            let mut cards = seats[i].hole_cards.clone();
            cards.extend_from_slice(&community);
            cards
        })
        .collect();
    let winner = live[determine_winner(&hands)?];

    seats[winner].stack += pot;
    debug!(
        "round {}: {} wins {} at showdown, board {:?}",
        round, seats[winner].name, pot, community
    );

    Ok(HandOutcome {
        winner,
        pot,
        community,
        showdown: true,
    })
}

/// Draw one card, mapping an exhausted deck to the fatal error.
fn draw_checked(deck: &mut Deck) -> Result<Card, TournamentError> {
    deck.draw().ok_or(TournamentError::DeckExhausted)
}

/// The only unfolded seat, if exactly one remains.
fn sole_survivor(seats: &[Player]) -> Option<usize> {
    let mut live = (0..seats.len()).filter(|&i| !seats[i].folded);
    match (live.next(), live.next()) {
        (Some(i), None) => Some(i),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::DecisionPolicy;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn cards(specs: &[&str]) -> Vec<Card> {
        specs.iter().map(|s| Card::from_str(s).unwrap()).collect()
    }

    fn fixed(count: usize, stack: i64, action: BotAction) -> Vec<Player> {
        (0..count)
            .map(|i| Player::new(format!("p{}", i), stack, DecisionPolicy::Fixed(action)))
            .collect()
    }

    /// Draw order: two hole cards per seat in seat order, then
    /// burn/flop(3)/burn/turn/burn/river.
    fn heads_up_deck() -> Deck {
        Deck::stacked(cards(&[
            "6s", "5s", // seat 0: straight-flush draw
            "As", "Ks", // seat 1: nut-flush draw
            "2c", "9s", "8s", "7s", // burn + flop
            "3c", "2h", // burn + turn
            "4c", "3d", // burn + river
        ]))
    }

    #[test]
    fn test_blinds_and_antes_fund_the_pot() {
        let blinds = BlindLevel::new(50, 100, 10);
        // Everyone folds, so only forced bets move chips.
        let mut seats = fixed(2, 5000, BotAction::Fold);
        let mut deck = heads_up_deck();
        let mut rng = StdRng::seed_from_u64(1);

        let outcome =
            play_hand(1, &blinds, &mut seats, &mut deck, &mut rng, None).unwrap();

        // Seat 0 folds first, so seat 1 collects the pot uncontested.
        assert!(!outcome.showdown);
        assert_eq!(outcome.winner, 1);
        assert_eq!(outcome.pot, 50 + 100 + 2 * 10);
        assert_eq!(seats[0].stack, 5000 - 50 - 10);
        assert_eq!(seats[1].stack, 5000 - 100 - 10 + outcome.pot);
        assert_eq!(seats[0].stack + seats[1].stack, 10_000);
    }

    #[test]
    fn test_scripted_showdown_straight_flush_beats_flush() {
        let blinds = BlindLevel::new(50, 100, 0);
        let mut seats = fixed(2, 5000, BotAction::Call);
        let mut deck = heads_up_deck();
        let mut rng = StdRng::seed_from_u64(42);

        let outcome =
            play_hand(3, &blinds, &mut seats, &mut deck, &mut rng, None).unwrap();

        assert!(outcome.showdown);
        assert_eq!(outcome.winner, 0, "straight flush must beat the ace flush");
        assert_eq!(outcome.community, cards(&["9s", "8s", "7s", "2h", "3d"]));

        // Chip conservation: everything bet came back out of the pot.
        assert_eq!(seats[0].stack + seats[1].stack, 10_000);

        // The loser's stack reflects the blind plus every call it logged.
        let called: i64 = seats[1].history.iter().map(|d| d.current_bet).sum();
        assert_eq!(seats[1].history.len(), 4);
        assert_eq!(seats[1].stack, 5000 - 100 - called);
        assert_eq!(seats[0].stack, 5000 + 100 + called);
    }

    #[test]
    fn test_decisions_are_observed_by_the_table() {
        let blinds = BlindLevel::new(50, 100, 0);
        let mut seats = fixed(3, 5000, BotAction::Call);
        let mut rng = StdRng::seed_from_u64(9);
        let mut deck = Deck::shuffled(&mut rng);

        play_hand(1, &blinds, &mut seats, &mut deck, &mut rng, None).unwrap();

        // Everyone called all four streets, and everyone saw it.
        let entry = seats[0].dossier.entry("p1").unwrap();
        assert_eq!(entry.call, 4);
        assert_eq!(seats[2].dossier.num_opponents(), 2);
    }

    #[test]
    fn test_a_hand_needs_two_seats() {
        let blinds = BlindLevel::new(50, 100, 0);
        let mut rng = StdRng::seed_from_u64(1);
        let mut deck = Deck::shuffled(&mut rng);

        let mut lone = fixed(1, 5000, BotAction::Call);
        let err =
            play_hand(1, &blinds, &mut lone, &mut deck, &mut rng, None).unwrap_err();
        assert_eq!(err, TournamentError::Config(ConfigError::TooFewSeats(1)));
        assert_eq!(lone[0].stack, 5000, "forced bets must not be charged");

        let mut empty: Vec<Player> = Vec::new();
        let err =
            play_hand(1, &blinds, &mut empty, &mut deck, &mut rng, None).unwrap_err();
        assert_eq!(err, TournamentError::Config(ConfigError::TooFewSeats(0)));
    }

    #[test]
    fn test_short_deck_is_deck_exhaustion() {
        let blinds = BlindLevel::new(50, 100, 0);
        let mut seats = fixed(2, 5000, BotAction::Call);
        let mut deck = Deck::stacked(cards(&["6s", "5s", "As"]));
        let mut rng = StdRng::seed_from_u64(1);

        let err =
            play_hand(1, &blinds, &mut seats, &mut deck, &mut rng, None).unwrap_err();
        assert_eq!(err, TournamentError::DeckExhausted);
        assert!(err.is_fatal());
    }
}
