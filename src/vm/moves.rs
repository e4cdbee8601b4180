//! Legal move representation and enumeration. A move is always
//! `(phase_index, card_index, target_location)`; negative card indices
//! encode non-card actions so the same triple works across every phase kind
//! without a second enum layer — this is the wire shape MCTS and the AI
//! policies all consume.

use crate::bytecode::ParsedGenome;
use crate::cards::{Location, Rank};
use crate::genome::Phase;

use super::condition_eval::evaluate;
use super::state::GameState;

pub const CLAIM_CHALLENGE: i32 = -1;
pub const CLAIM_ACCEPT: i32 = -2;
pub const DRAW_HIT: i32 = -1;
pub const DRAW_STAND: i32 = -3;
pub const PLAY_PASS: i32 = -4;
pub const BET_CHECK: i32 = -10;
pub const BET_BET: i32 = -11;
pub const BET_CALL: i32 = -12;
pub const BET_RAISE: i32 = -13;
pub const BET_ALL_IN: i32 = -14;
pub const BET_FOLD: i32 = -15;
pub const SET_PLAY_BASE: i32 = -100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegalMove {
    pub phase_index: usize,
    pub card_index: i32,
    pub target: Location,
}

impl LegalMove {
    pub fn is_set_play(&self) -> bool {
        self.card_index <= SET_PLAY_BASE
    }

    pub fn set_play_rank(&self) -> Rank {
        Rank::from((-(self.card_index) - 100) as u8)
    }

    fn new(phase_index: usize, card_index: i32, target: Location) -> Self {
        Self {
            phase_index,
            card_index,
            target,
        }
    }
}

pub fn generate_legal_moves(state: &GameState, genome: &ParsedGenome) -> Vec<LegalMove> {
    let Some(phase) = genome.turn_structure.phases.get(state.phase_index) else {
        return Vec::new();
    };
    let p = state.current_player;
    let idx = state.phase_index;

    match phase {
        Phase::Draw { source, mandatory, condition, .. } => {
            let guarded = condition.as_ref().map(|c| evaluate(c, state, None)).unwrap_or(true);
            if !guarded {
                return Vec::new();
            }
            let can_draw = match source {
                Location::Deck => !state.deck.is_empty() || state.discard.len() > 1,
                Location::Discard => !state.discard.is_empty(),
                _ => !state.hands[(p + 1) % state.player_count as usize].is_empty(),
            };
            let mut moves = Vec::new();
            if can_draw {
                moves.push(LegalMove::new(idx, DRAW_HIT, *source));
            }
            if !*mandatory {
                moves.push(LegalMove::new(idx, DRAW_STAND, *source));
            }
            moves
        }
        Phase::Play {
            target,
            min,
            max,
            mandatory,
            pass_if_unable,
            condition,
        } => generate_play_moves(state, idx, *target, *min, *max, *mandatory, *pass_if_unable, condition.as_ref()),
        Phase::Discard { target, mandatory, .. } => {
            let mut moves: Vec<LegalMove> = (0..state.hands[p].len())
                .map(|i| LegalMove::new(idx, i as i32, *target))
                .collect();
            if !*mandatory {
                moves.push(LegalMove::new(idx, PLAY_PASS, *target));
            }
            moves
        }
        Phase::Trick {
            lead_suit_required,
            breaking_suit,
            ..
        } => generate_trick_moves(state, idx, *lead_suit_required, *breaking_suit),
        Phase::Betting { max_raises, .. } => generate_betting_moves(state, idx, *max_raises),
        Phase::Claim => generate_claim_moves(state, idx),
        Phase::Bidding(config) => {
            let mut moves = Vec::new();
            for bid in config.min_bid..=config.max_bid {
                moves.push(LegalMove::new(idx, bid as i32, Location::Hand));
            }
            if config.allow_nil {
                moves.push(LegalMove::new(idx, -1, Location::Hand));
            }
            moves
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn generate_play_moves(
    state: &GameState,
    idx: usize,
    target: Location,
    min: u8,
    max: u8,
    mandatory: bool,
    pass_if_unable: bool,
    condition: Option<&crate::genome::Condition>,
) -> Vec<LegalMove> {
    let p = state.current_player;
    let hand = &state.hands[p];
    let mut moves = Vec::new();

    for (i, card) in hand.iter().enumerate() {
        let ok = condition.map(|c| evaluate(c, state, Some(*card))).unwrap_or(true);
        if ok {
            moves.push(LegalMove::new(idx, i as i32, target));
        }
    }

    if min > 1 {
        use std::collections::BTreeMap;
        let mut by_rank: BTreeMap<u8, usize> = BTreeMap::new();
        for card in hand {
            *by_rank.entry(card.rank() as u8).or_insert(0) += 1;
        }
        moves.clear();
        for (&rank, &count) in by_rank.iter() {
            if count as u8 >= min && count as u8 <= max {
                moves.push(LegalMove::new(idx, SET_PLAY_BASE - rank as i32, target));
            }
        }
    }

    if (moves.is_empty() && !mandatory) || (pass_if_unable && moves.is_empty()) {
        moves.push(LegalMove::new(idx, PLAY_PASS, target));
    }
    moves
}

fn generate_trick_moves(
    state: &GameState,
    idx: usize,
    lead_suit_required: bool,
    breaking_suit: Option<crate::cards::Suit>,
) -> Vec<LegalMove> {
    let p = state.current_player;
    let hand = &state.hands[p];
    let is_leading = state.current_trick.is_empty();

    if is_leading {
        let breakable = breaking_suit.is_none() || state.breaking_suit_broken;
        let non_breaking: Vec<usize> = hand
            .iter()
            .enumerate()
            .filter(|(_, c)| Some(c.suit()) != breaking_suit)
            .map(|(i, _)| i)
            .collect();
        let indices = if !breakable && !non_breaking.is_empty() {
            non_breaking
        } else {
            (0..hand.len()).collect()
        };
        return indices
            .into_iter()
            .map(|i| LegalMove::new(idx, i as i32, Location::Tableau))
            .collect();
    }

    let lead_suit = state.current_trick.first().map(|(_, c)| c.suit());
    if lead_suit_required {
        if let Some(suit) = lead_suit {
            let following: Vec<usize> = hand
                .iter()
                .enumerate()
                .filter(|(_, c)| c.suit() == suit)
                .map(|(i, _)| i)
                .collect();
            if !following.is_empty() {
                return following
                    .into_iter()
                    .map(|i| LegalMove::new(idx, i as i32, Location::Tableau))
                    .collect();
            }
        }
    }
    (0..hand.len()).map(|i| LegalMove::new(idx, i as i32, Location::Tableau)).collect()
}

fn generate_betting_moves(state: &GameState, idx: usize, max_raises: u32) -> Vec<LegalMove> {
    let p = state.current_player;
    if state.folded[p] || state.all_in[p] {
        return Vec::new();
    }
    let to_call = state
        .current_bet
        .iter()
        .cloned()
        .max()
        .unwrap_or(0)
        .saturating_sub(state.current_bet[p]);
    let can_raise = (state.raise_count as u32) < max_raises;
    let mut moves = Vec::new();
    if to_call == 0 {
        moves.push(LegalMove::new(idx, BET_CHECK, Location::Hand));
        if state.chips[p] > 0 {
            moves.push(LegalMove::new(idx, BET_BET, Location::Hand));
        }
    } else if state.chips[p] >= to_call {
        moves.push(LegalMove::new(idx, BET_CALL, Location::Hand));
        if state.chips[p] > to_call && can_raise {
            moves.push(LegalMove::new(idx, BET_RAISE, Location::Hand));
        }
        moves.push(LegalMove::new(idx, BET_FOLD, Location::Hand));
    } else if state.chips[p] > 0 {
        moves.push(LegalMove::new(idx, BET_ALL_IN, Location::Hand));
        moves.push(LegalMove::new(idx, BET_FOLD, Location::Hand));
    } else {
        moves.push(LegalMove::new(idx, BET_FOLD, Location::Hand));
    }
    moves
}

fn generate_claim_moves(state: &GameState, idx: usize) -> Vec<LegalMove> {
    let p = state.current_player;
    match state.claimer {
        None => (0..state.hands[p].len())
            .map(|i| LegalMove::new(idx, i as i32, Location::Discard))
            .collect(),
        Some(claimer) if claimer != p => {
            vec![
                LegalMove::new(idx, CLAIM_CHALLENGE, Location::Discard),
                LegalMove::new(idx, CLAIM_ACCEPT, Location::Discard),
            ]
        }
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::parse;
    use crate::bytecode::compile;
    use crate::known_games;

    #[test]
    fn war_play_phase_offers_one_move_per_card() {
        let genome = known_games::war();
        let bytes = compile(&genome).unwrap();
        let parsed = parse(&bytes).unwrap();
        let mut state = GameState::new(2);
        state.hands[0] = vec![crate::cards::Card::from(0u8), crate::cards::Card::from(1u8)];
        let moves = generate_legal_moves(&state, &parsed);
        assert_eq!(moves.len(), 2);
    }
}
