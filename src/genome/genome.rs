//! The immutable, pure-data description of a game. The VM never sees this
//! directly; it consumes the compiled bytecode (see `crate::bytecode`).

use super::bidding::BiddingConfig;
use super::effects::SpecialEffect;
use super::phase::Phase;
use super::hand_eval::HandEvaluation;
use super::phase::TurnStructure;
use super::scoring::CardScoringRule;
use super::setup::Setup;
use super::team::TeamConfig;
use super::win::WinCondition;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Genome {
    pub id: u64,
    pub parent_ids: Vec<u64>,
    pub generation: u32,

    pub setup: Setup,
    pub turn_structure: TurnStructure,
    pub win_conditions: Vec<WinCondition>,
    pub card_scoring: Vec<CardScoringRule>,
    pub hand_evaluation: Option<HandEvaluation>,
    pub special_effects: Vec<SpecialEffect>,
    pub team: Option<TeamConfig>,

    pub min_turns: u32,
    pub max_turns: u32,
    pub player_count: u8,
}

impl Genome {
    pub fn has_betting_phase(&self) -> bool {
        self.turn_structure
            .has_phase_tag(super::phase::Phase::TAG_BETTING)
    }

    pub fn has_trick_phase(&self) -> bool {
        self.turn_structure
            .has_phase_tag(super::phase::Phase::TAG_TRICK)
    }

    pub fn has_bidding_phase(&self) -> bool {
        self.turn_structure
            .has_phase_tag(super::phase::Phase::TAG_BIDDING)
    }

    /// `BiddingConfig` only ever exists embedded in a `Phase::Bidding`; there
    /// is no separate top-level section for it on the wire.
    pub fn bidding(&self) -> Option<BiddingConfig> {
        self.turn_structure.phases.iter().find_map(|p| match p {
            Phase::Bidding(cfg) => Some(*cfg),
            _ => None,
        })
    }
}
