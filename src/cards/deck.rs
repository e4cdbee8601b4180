//! An ordered sequence of cards with a seeded, deterministic shuffle.
//!
//! The VM reshuffles the discard pile back into the deck on exhaustion;
//! that reshuffle is seeded from `(seed, turn)` so replays are bit-identical.

use super::card::Card;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    pub const STANDARD_SIZE: usize = 52;

    pub fn standard() -> Deck {
        Deck {
            cards: (0..52).map(Card::from).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn peek_top(&self) -> Option<&Card> {
        self.cards.last()
    }

    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Seed the shuffle from `(seed, turn)` so that reshuffles during a
    /// single simulation remain deterministic and reproducible.
    pub fn shuffle_seeded(&mut self, seed: u64, turn: u32) {
        let mut rng = SmallRng::seed_from_u64(seed ^ (turn as u64).wrapping_mul(0x9E3779B97F4A7C15));
        self.cards.shuffle(&mut rng);
    }

    /// Rebuild the deck from a discard pile, keeping the current top card
    /// of the discard in place as specified by the move-generation rules.
    pub fn reshuffle_from_discard(&mut self, discard: &mut Vec<Card>, seed: u64, turn: u32) {
        debug_assert!(self.cards.is_empty());
        if discard.len() <= 1 {
            return;
        }
        let kept = discard.pop();
        self.cards.append(discard);
        self.shuffle_seeded(seed, turn);
        if let Some(card) = kept {
            discard.push(card);
        }
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_deck_has_52_cards() {
        assert_eq!(Deck::standard().len(), 52);
    }

    #[test]
    fn shuffle_is_deterministic_per_seed_and_turn() {
        let mut a = Deck::standard();
        let mut b = Deck::standard();
        a.shuffle_seeded(42, 3);
        b.shuffle_seeded(42, 3);
        assert_eq!(a.cards(), b.cards());
    }

    #[test]
    fn reshuffle_keeps_top_discard_card_and_conserves_count() {
        let mut deck = Deck { cards: Vec::new() };
        let mut discard: Vec<Card> = (0..5).map(Card::from).collect();
        let total_before = discard.len();
        deck.reshuffle_from_discard(&mut discard, 1, 1);
        assert_eq!(discard.len(), 1);
        assert_eq!(deck.len() + discard.len(), total_before);
    }
}
