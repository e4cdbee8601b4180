//! Suits, ordered {H, D, C, S}; colour is suit mod 2.

use std::fmt::{Display, Formatter, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub enum Suit {
    Heart = 0,
    Diamond = 1,
    Club = 2,
    Spade = 3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Color {
    Red,
    Black,
}

impl Suit {
    pub const COUNT: u8 = 4;

    pub fn color(&self) -> Color {
        if (*self as u8) % 2 == 0 {
            Color::Red
        } else {
            Color::Black
        }
    }
}

impl From<u8> for Suit {
    fn from(n: u8) -> Suit {
        match n {
            0 => Suit::Heart,
            1 => Suit::Diamond,
            2 => Suit::Club,
            3 => Suit::Spade,
            _ => panic!("invalid suit byte: {n}"),
        }
    }
}

impl Display for Suit {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(
            f,
            "{}",
            match self {
                Suit::Heart => "H",
                Suit::Diamond => "D",
                Suit::Club => "C",
                Suit::Spade => "S",
            }
        )
    }
}
