//! Hand-evaluation methods for `best_hand` win conditions and showdown
//! scoring: high-card, point-total-with-bust, pattern-match, or raw
//! card-count.

use crate::cards::Rank;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum HandEvalMethod {
    None = 0,
    HighCard = 1,
    PointTotal = 2,
    PatternMatch = 3,
    CardCount = 4,
}

impl From<u8> for HandEvalMethod {
    fn from(n: u8) -> Self {
        match n {
            0 => HandEvalMethod::None,
            1 => HandEvalMethod::HighCard,
            2 => HandEvalMethod::PointTotal,
            3 => HandEvalMethod::PatternMatch,
            4 => HandEvalMethod::CardCount,
            _ => panic!("invalid hand-evaluation method byte: {n}"),
        }
    }
}

/// One (rank, value, alt_value) row of a point-total value table, e.g. Ace
/// worth 11 or 1 in a blackjack-style evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RankValue {
    pub rank: Rank,
    pub value: u8,
    pub alt_value: u8,
}

/// A pattern-match candidate (e.g. "three of a kind", "flush"): scored by
/// priority when multiple patterns match the same hand.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Pattern {
    pub priority: u8,
    pub required_count: u8,
    pub same_suit_count: u8,
    pub seq_len: u8,
    pub seq_wrap: bool,
    pub groups: Vec<u8>,
    pub ranks: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HandEvaluation {
    pub method: HandEvalMethod,
    pub target_value: u8,
    pub bust_threshold: u8,
    pub values: Vec<RankValue>,
    pub patterns: Vec<Pattern>,
}

impl HandEvaluation {
    pub fn none() -> Self {
        Self {
            method: HandEvalMethod::None,
            target_value: 0,
            bust_threshold: 0,
            values: Vec::new(),
            patterns: Vec::new(),
        }
    }

    pub fn is_present(&self) -> bool {
        self.method != HandEvalMethod::None
    }
}
