//! Win-condition evaluation. Conditions are checked in declaration
//! order after every move; the first one that fires ends the game.

use crate::bytecode::ParsedGenome;
use crate::genome::{HandEvalMethod, HandEvaluation, WinCondition, WinKind};

use super::state::GameState;

/// Evaluates every win condition in order, then falls back to the turn cap.
/// Returns `true` once the state has become terminal (`state.winner` or
/// `state.draw` set); idempotent on an already-terminal state.
pub fn evaluate(state: &mut GameState, genome: &ParsedGenome) -> bool {
    if state.is_terminal() {
        return true;
    }
    if genome.has_betting_phase() {
        let active: Vec<usize> = (0..state.player_count as usize).filter(|&i| !state.folded[i]).collect();
        if active.len() == 1 {
            state.chips[active[0]] += state.pot;
            state.pot = 0;
            finish(state, genome, active[0]);
            return true;
        }
    }
    for wc in &genome.win_conditions {
        if let Some(winner) = check(wc, state, genome) {
            finish(state, genome, winner);
            return true;
        }
    }
    if state.turn_number >= genome.max_turns {
        state.draw = true;
        return true;
    }
    false
}

fn finish(state: &mut GameState, genome: &ParsedGenome, winner: usize) {
    state.winner = Some(winner);
    if let Some(team) = &genome.team {
        state.winning_team = team.team_of(winner);
    }
}

fn check(wc: &WinCondition, state: &GameState, genome: &ParsedGenome) -> Option<usize> {
    match wc.kind {
        WinKind::EmptyHand => (0..state.player_count as usize).find(|&i| state.hands[i].is_empty()),
        WinKind::HighScore => best_by(state, |s| s >= wc.threshold, |s| s),
        WinKind::LowScore => best_by(state, |s| s <= wc.threshold, |s| -s),
        WinKind::FirstToScore => (0..state.player_count as usize).find(|&i| state.scores[i] >= wc.threshold),
        WinKind::CaptureAll => (0..state.player_count as usize).find(|&i| state.hands[i].len() >= 52),
        WinKind::AllHandsEmpty => {
            if state.hands.iter().all(|h| h.is_empty()) {
                best_by(state, |_| true, |s| -s)
            } else {
                None
            }
        }
        WinKind::BestHand => check_best_hand(state, genome),
        WinKind::MostCaptured => {
            if state.deck.is_empty() && state.hands.iter().all(|h| h.is_empty()) {
                best_by(state, |_| true, |s| s)
            } else {
                None
            }
        }
    }
}

fn best_by(state: &GameState, trigger: impl Fn(i32) -> bool, rank_key: impl Fn(i32) -> i32) -> Option<usize> {
    if !(0..state.player_count as usize).any(|i| trigger(state.scores[i])) {
        return None;
    }
    (0..state.player_count as usize).max_by_key(|&i| (rank_key(state.scores[i]), -(i as i32)))
}

fn check_best_hand(state: &GameState, genome: &ParsedGenome) -> Option<usize> {
    let Some(eval) = &genome.hand_evaluation else {
        return None;
    };
    let required = genome.setup.starting_hand_size as usize;
    if state.turn_number == 0 || !state.hands.iter().all(|h| h.len() == required) {
        return None;
    }
    (0..state.player_count as usize).max_by_key(|&i| (score_hand(&state.hands[i], eval), -(i as i32)))
}

pub(crate) fn score_hand(hand: &[crate::cards::Card], eval: &HandEvaluation) -> i32 {
    match eval.method {
        HandEvalMethod::None => 0,
        HandEvalMethod::HighCard => hand.iter().map(|c| c.rank().magnitude() as i32).max().unwrap_or(0),
        HandEvalMethod::PointTotal => {
            let total: i32 = hand
                .iter()
                .map(|c| {
                    eval.values
                        .iter()
                        .find(|rv| rv.rank == c.rank())
                        .map(|rv| rv.value as i32)
                        .unwrap_or(c.rank().magnitude() as i32)
                })
                .sum();
            if eval.bust_threshold > 0 && total > eval.bust_threshold as i32 {
                0
            } else {
                total
            }
        }
        HandEvalMethod::PatternMatch => {
            use std::collections::BTreeMap;
            let mut by_rank: BTreeMap<u8, usize> = BTreeMap::new();
            for card in hand {
                *by_rank.entry(card.rank() as u8).or_insert(0) += 1;
            }
            let biggest_group = by_rank.values().cloned().max().unwrap_or(0);
            eval.patterns
                .iter()
                .filter(|p| biggest_group >= p.required_count as usize)
                .map(|p| p.priority as i32)
                .max()
                .unwrap_or(0)
        }
        HandEvalMethod::CardCount => hand.len() as i32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::{compile, parse};
    use crate::known_games;

    #[test]
    fn empty_hand_wins_for_lowest_empty_index() {
        let genome = known_games::crazy_eights();
        let bytes = compile(&genome).unwrap();
        let parsed = parse(&bytes).unwrap();
        let mut state = GameState::new(4);
        state.hands[2] = Vec::new();
        state.hands[0] = vec![crate::cards::Card::from(0u8)];
        state.hands[1] = vec![crate::cards::Card::from(1u8)];
        state.hands[3] = vec![crate::cards::Card::from(2u8)];
        assert!(evaluate(&mut state, &parsed));
        assert_eq!(state.winner, Some(2));
    }

    #[test]
    fn turn_cap_without_winner_is_a_draw() {
        let genome = known_games::war();
        let bytes = compile(&genome).unwrap();
        let parsed = parse(&bytes).unwrap();
        let mut state = GameState::new(2);
        state.hands[0] = vec![crate::cards::Card::from(0u8)];
        state.hands[1] = vec![crate::cards::Card::from(1u8)];
        state.turn_number = parsed.max_turns;
        assert!(evaluate(&mut state, &parsed));
        assert!(state.draw);
    }

    #[test]
    fn last_unfolded_player_takes_the_pot() {
        let genome = known_games::simple_poker();
        let bytes = compile(&genome).unwrap();
        let parsed = parse(&bytes).unwrap();
        let mut state = GameState::new(4);
        state.pot = 120;
        state.folded = vec![true, false, true, true];
        assert!(evaluate(&mut state, &parsed));
        assert_eq!(state.winner, Some(1));
        assert_eq!(state.chips[1], 120);
        assert_eq!(state.pot, 0);
    }
}
