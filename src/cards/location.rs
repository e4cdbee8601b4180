//! Named piles a card can occupy or move between.

use std::fmt::{Display, Formatter, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Location {
    Deck = 0,
    Hand = 1,
    Discard = 2,
    Tableau = 3,
    OpponentHand = 4,
    OpponentDiscard = 5,
}

impl From<u8> for Location {
    fn from(n: u8) -> Self {
        match n {
            0 => Location::Deck,
            1 => Location::Hand,
            2 => Location::Discard,
            3 => Location::Tableau,
            4 => Location::OpponentHand,
            5 => Location::OpponentDiscard,
            _ => panic!("invalid location byte: {n}"),
        }
    }
}

impl From<Location> for u8 {
    fn from(loc: Location) -> u8 {
        loc as u8
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(
            f,
            "{}",
            match self {
                Location::Deck => "deck",
                Location::Hand => "hand",
                Location::Discard => "discard",
                Location::Tableau => "tableau",
                Location::OpponentHand => "opponent-hand",
                Location::OpponentDiscard => "opponent-discard",
            }
        )
    }
}
