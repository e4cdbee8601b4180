//! A Card is the pair (rank, suit). `to_int`/`from` give the 0..52 isomorphism
//! used as the index space for bytecode payloads and legal-move encodings.

use super::rank::Rank;
use super::suit::Suit;
use std::fmt::{Display, Formatter, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Card {
    rank: Rank,
    suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    pub fn rank(&self) -> Rank {
        self.rank
    }

    pub fn suit(&self) -> Suit {
        self.suit
    }

    pub fn to_int(&self) -> u8 {
        (self.rank as u8) * 4 + (self.suit as u8)
    }

    /// Magnitude comparison used by trick-taking and war resolution: ace is high.
    pub fn beats(&self, other: &Card) -> bool {
        self.rank.magnitude() > other.rank.magnitude()
    }
}

impl From<u8> for Card {
    fn from(n: u8) -> Self {
        Self {
            rank: Rank::from(n / 4),
            suit: Suit::from(n % 4),
        }
    }
}

impl From<Card> for u8 {
    fn from(c: Card) -> u8 {
        c.to_int()
    }
}

impl Display for Card {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_u8() {
        for n in 0..52u8 {
            let card = Card::from(n);
            assert_eq!(card.to_int(), n);
        }
    }

    #[test]
    fn ace_outranks_king() {
        let ace = Card::new(Rank::Ace, Suit::Spade);
        let king = Card::new(Rank::King, Suit::Spade);
        assert!(ace.beats(&king));
        assert!(!king.beats(&ace));
    }
}
