//! The simulation loop: deal, then alternate move generation, AI choice, and
//! application until a win condition or the turn cap fires. This is
//! the only place a `GameState` is driven end to end; everything else in
//! `vm` is a pure function of state and genome.

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::ai::AiConfig;
use crate::bytecode::ParsedGenome;
use crate::genome::Phase;

use super::moves::generate_legal_moves;
use super::state::GameState;
use super::{apply, win};

#[derive(Debug, Clone)]
pub struct GameResult {
    pub winner: Option<usize>,
    pub winning_team: Option<u8>,
    pub draw: bool,
    pub error: bool,
    pub turns: u32,
    pub final_scores: Vec<i32>,
}

impl From<&GameState> for GameResult {
    fn from(state: &GameState) -> Self {
        Self {
            winner: state.winner,
            winning_team: state.winning_team,
            draw: state.draw,
            error: state.error,
            turns: state.turn_number,
            final_scores: state.scores.clone(),
        }
    }
}

/// Deals the opening hands per `Setup`: round-robin, `starting_hand_size`
/// cards each, then `initial_discard_count` cards face up on the discard
/// pile. Chips and team scores are seeded here too since they never change
/// shape afterward.
pub fn deal(state: &mut GameState, genome: &ParsedGenome, seed: u64) {
    state.deck.shuffle_seeded(seed, 0);
    let n = genome.player_count as usize;
    for _ in 0..genome.setup.starting_hand_size {
        for p in 0..n {
            if let Some(card) = state.deck.draw() {
                state.hands[p].push(card);
            }
        }
    }
    for _ in 0..genome.setup.initial_discard_count {
        if let Some(card) = state.deck.draw() {
            state.discard.push(card);
        }
    }
    for chips in state.chips.iter_mut() {
        *chips = genome.setup.starting_chips;
    }
    state.current_max_raises = max_raises_of(genome, state.phase_index);
}

fn max_raises_of(genome: &ParsedGenome, phase_index: usize) -> u32 {
    match genome.turn_structure.phases.get(phase_index) {
        Some(Phase::Betting { max_raises, .. }) => *max_raises,
        _ => u32::MAX,
    }
}

pub fn run_game(genome: &ParsedGenome, ai: &AiConfig, seed: u64) -> GameResult {
    let mut state = GameState::new(genome.player_count);
    deal(&mut state, genome, seed);
    let mut rng = SmallRng::seed_from_u64(seed);

    loop {
        if win::evaluate(&mut state, genome) {
            break;
        }
        let legal = generate_legal_moves(&state, genome);
        if legal.is_empty() {
            // A reachable state with no legal move is a bytecode/genome defect
            //: end the game as an errored draw rather than hang.
            state.draw = true;
            state.error = true;
            break;
        }
        let policy = ai.policy_for(state.current_player);
        let mv = policy.choose(genome, &state, &legal, &mut rng);
        apply::apply(&mut state, genome, mv, seed);
        if !state.is_terminal() {
            advance(&mut state, genome);
        }
    }

    GameResult::from(&state)
}

/// Moves `current_player`/`phase_index`/`turn_number` forward after a move
/// has been applied. Trick phases are special: `apply` already advances
/// `current_player` to the trick winner once a trick completes, so this only
/// steps to the next phase when the trick pile is empty again. Betting
/// phases repeat until every still-active player matches the table's bet (or
/// only one remains), since a single lap around the table does not by itself
/// mean betting is settled.
pub fn advance(state: &mut GameState, genome: &ParsedGenome) {
    let phase_count = genome.turn_structure.phases.len();
    match &genome.turn_structure.phases[state.phase_index] {
        Phase::Trick { .. } => {
            if state.current_trick.is_empty() {
                step_phase(state, genome, phase_count);
            }
            // else: trick still collecting plays; `apply` already set
            // `current_player` to whoever plays next.
        }
        Phase::Betting { .. } => {
            let active: Vec<usize> = (0..state.player_count as usize)
                .filter(|&i| !state.folded[i] && !state.all_in[i])
                .collect();
            let max_bet = state.current_bet.iter().cloned().max().unwrap_or(0);
            let settled = active.len() <= 1 || active.iter().all(|&i| state.current_bet[i] == max_bet);
            if settled {
                step_phase(state, genome, phase_count);
            } else {
                rotate_to_next_active(state);
            }
        }
        _ => {
            state.current_player = state.next_player();
            if state.current_player == 0 {
                step_phase(state, genome, phase_count);
            }
        }
    }
}

fn step_phase(state: &mut GameState, genome: &ParsedGenome, phase_count: usize) {
    state.phase_index = (state.phase_index + 1) % phase_count;
    state.current_max_raises = max_raises_of(genome, state.phase_index);
    if state.phase_index == 0 {
        state.advance_turn();
        state.current_bet.iter_mut().for_each(|b| *b = 0);
        state.raise_count = 0;
    }
}

fn rotate_to_next_active(state: &mut GameState) {
    let n = state.player_count as usize;
    for _ in 0..n {
        state.current_player = state.next_player();
        if !state.folded[state.current_player] && !state.all_in[state.current_player] {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{AiConfig, AiPolicy};
    use crate::bytecode::{compile, parse};
    use crate::known_games;

    #[test]
    fn war_runs_to_completion_or_turn_cap() {
        let genome = known_games::war();
        let bytes = compile(&genome).unwrap();
        let parsed = parse(&bytes).unwrap();
        let ai = AiConfig::uniform(AiPolicy::Random);
        let result = run_game(&parsed, &ai, 42);
        assert!(!result.error, "war should never reach an unreachable state");
        assert!(result.winner.is_some() || result.draw);
    }

    #[test]
    fn crazy_eights_runs_to_completion() {
        let genome = known_games::crazy_eights();
        let bytes = compile(&genome).unwrap();
        let parsed = parse(&bytes).unwrap();
        let ai = AiConfig::uniform(AiPolicy::Greedy);
        let result = run_game(&parsed, &ai, 7);
        assert!(!result.error);
    }

    #[test]
    fn simple_poker_runs_to_completion() {
        let genome = known_games::simple_poker();
        let bytes = compile(&genome).unwrap();
        let parsed = parse(&bytes).unwrap();
        let ai = AiConfig::uniform(AiPolicy::Greedy);
        let result = run_game(&parsed, &ai, 1);
        assert!(!result.error);
    }

    #[test]
    fn same_seed_is_deterministic() {
        let genome = known_games::hearts();
        let bytes = compile(&genome).unwrap();
        let parsed = parse(&bytes).unwrap();
        let ai = AiConfig::uniform(AiPolicy::Random);
        let a = run_game(&parsed, &ai, 9);
        let b = run_game(&parsed, &ai, 9);
        assert_eq!(a.winner, b.winner);
        assert_eq!(a.final_scores, b.final_scores);
    }
}
