//! Turn-structure phases. Each carries a fixed tag plus a payload.

use super::condition::Condition;
use super::bidding::BiddingConfig;
use crate::cards::{Location, Suit};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum Phase {
    Draw {
        source: Location,
        count: u32,
        mandatory: bool,
        condition: Option<Condition>,
    },
    Play {
        target: Location,
        min: u8,
        max: u8,
        mandatory: bool,
        pass_if_unable: bool,
        condition: Option<Condition>,
    },
    Discard {
        target: Location,
        count: u32,
        mandatory: bool,
    },
    Trick {
        lead_suit_required: bool,
        trump: Option<Suit>,
        high_card_wins: bool,
        breaking_suit: Option<Suit>,
    },
    Betting {
        min_bet: u32,
        max_raises: u32,
    },
    Claim,
    Bidding(BiddingConfig),
}

impl Phase {
    pub const TAG_DRAW: u8 = 1;
    pub const TAG_PLAY: u8 = 2;
    pub const TAG_DISCARD: u8 = 3;
    pub const TAG_TRICK: u8 = 4;
    pub const TAG_BETTING: u8 = 5;
    pub const TAG_CLAIM: u8 = 6;
    pub const TAG_BIDDING: u8 = 7;

    pub fn tag(&self) -> u8 {
        match self {
            Phase::Draw { .. } => Self::TAG_DRAW,
            Phase::Play { .. } => Self::TAG_PLAY,
            Phase::Discard { .. } => Self::TAG_DISCARD,
            Phase::Trick { .. } => Self::TAG_TRICK,
            Phase::Betting { .. } => Self::TAG_BETTING,
            Phase::Claim => Self::TAG_CLAIM,
            Phase::Bidding(_) => Self::TAG_BIDDING,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Phase::Draw { .. } => "draw",
            Phase::Play { .. } => "play",
            Phase::Discard { .. } => "discard",
            Phase::Trick { .. } => "trick",
            Phase::Betting { .. } => "betting",
            Phase::Claim => "claim",
            Phase::Bidding(_) => "bidding",
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TurnStructure {
    pub phases: Vec<Phase>,
    pub is_trick_based: bool,
}

impl TurnStructure {
    pub fn has_phase_tag(&self, tag: u8) -> bool {
        self.phases.iter().any(|p| p.tag() == tag)
    }
}
