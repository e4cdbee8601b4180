//! Card-level scoring rules: `(suit?, rank?, points, trigger)`.

use crate::cards::{Rank, Suit};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ScoringTrigger {
    TrickWin = 0,
    Capture = 1,
    Play = 2,
    HandEnd = 3,
    SetComplete = 4,
}

impl From<u8> for ScoringTrigger {
    fn from(n: u8) -> Self {
        match n {
            0 => ScoringTrigger::TrickWin,
            1 => ScoringTrigger::Capture,
            2 => ScoringTrigger::Play,
            3 => ScoringTrigger::HandEnd,
            4 => ScoringTrigger::SetComplete,
            _ => panic!("invalid scoring trigger byte: {n}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CardScoringRule {
    pub suit: Option<Suit>,
    pub rank: Option<Rank>,
    pub points: i16,
    pub trigger: ScoringTrigger,
}

impl CardScoringRule {
    pub const ANY: u8 = 255;

    pub fn matches(&self, rank: Rank, suit: Suit) -> bool {
        self.suit.map(|s| s == suit).unwrap_or(true) && self.rank.map(|r| r == rank).unwrap_or(true)
    }
}
