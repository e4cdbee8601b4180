//! Single-game instrumentation: runs one simulation while recording
//! decision density, interaction signals, tension metrics, and bluffing /
//! betting counters alongside the ordinary win/turn outcome.

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::ai::AiConfig;
use crate::bytecode::ParsedGenome;
use crate::cards::Location;
use crate::genome::Phase;
use crate::vm::interpreter::{advance, deal};
use crate::vm::moves::*;
use crate::vm::state::GameState;
use crate::vm::{apply, win, LeaderDetector};

#[derive(Debug, Clone, Default)]
pub struct GameStats {
    pub winner: Option<usize>,
    pub winning_team: Option<u8>,
    pub draw: bool,
    pub error: bool,
    pub turns: u32,

    pub total_moments: u32,
    pub forced_moments: u32,
    pub move_disruption: u32,
    pub contention: u32,
    pub forced_response: u32,

    pub lead_changes: u32,
    pub closest_margin: f32,
    pub decisive_turn: u32,
    pub winner_trailing_at_midpoint: bool,

    pub claims: u32,
    pub bluffs: u32,
    pub challenges: u32,
    pub successful_bluffs: u32,
    pub catches: u32,
    pub bets: u32,
    pub all_ins: u32,
    pub fold_wins: u32,
    pub showdown_wins: u32,
}

impl GameStats {
    /// Fraction of moments that offered a genuine choice ('s metric is
    /// the inverse: fewer forced moments is a higher-quality game).
    pub fn decision_density(&self) -> f32 {
        if self.total_moments == 0 {
            return 0.0;
        }
        1.0 - (self.forced_moments as f32 / self.total_moments as f32)
    }

    pub fn interaction_frequency(&self) -> f32 {
        if self.total_moments == 0 {
            return 0.0;
        }
        let n = self.total_moments as f32;
        ((self.move_disruption as f32 / n) + (self.contention as f32 / n) + (self.forced_response as f32 / n)) / 3.0
    }
}

pub fn run_instrumented_game(genome: &ParsedGenome, ai: &AiConfig, seed: u64) -> GameStats {
    let mut state = GameState::new(genome.player_count);
    deal(&mut state, genome, seed);
    let mut rng = SmallRng::seed_from_u64(seed);
    let detector = LeaderDetector::infer(genome);

    let mut stats = GameStats::default();
    let n = genome.player_count as usize;
    let mut last_move_count: Vec<Option<usize>> = vec![None; n];
    let mut last_target: Option<Location> = None;
    let mut leader = detector.leader(&state);
    let mut closest_margin = f32::INFINITY;
    let mut last_leader_change_turn = 0u32;
    let midpoint = genome.max_turns / 2;
    let mut leader_at_midpoint: Option<usize> = None;
    let mut pending_bluff: Option<bool> = None;

    loop {
        if win::evaluate(&mut state, genome) {
            break;
        }
        let legal = generate_legal_moves(&state, genome);
        if legal.is_empty() {
            state.draw = true;
            state.error = true;
            break;
        }

        let p = state.current_player;
        stats.total_moments += 1;
        if legal.len() <= 1 {
            stats.forced_moments += 1;
        }
        if let Some(prev) = last_move_count[p] {
            if legal.len() != prev {
                stats.move_disruption += 1;
            }
            if (legal.len() as f32) < prev as f32 * 0.5 {
                stats.forced_response += 1;
            }
        }
        last_move_count[p] = Some(legal.len());
        if let Some(prev_target) = last_target {
            if legal.iter().any(|m| m.target == prev_target) {
                stats.contention += 1;
            }
        }

        let mv = ai.policy_for(p).choose(genome, &state, &legal, &mut rng);
        last_target = Some(mv.target);

        record_claim_and_betting(&mut stats, &mut pending_bluff, &state, genome, mv);
        apply::apply(&mut state, genome, mv, seed);

        let new_leader = detector.leader(&state);
        if new_leader != leader {
            stats.lead_changes += 1;
            leader = new_leader;
            last_leader_change_turn = state.turn_number;
        }
        closest_margin = closest_margin.min(detector.margin(&state));

        if !state.is_terminal() {
            advance(&mut state, genome);
        }
        if leader_at_midpoint.is_none() && state.turn_number >= midpoint {
            leader_at_midpoint = Some(detector.leader(&state));
        }
    }

    stats.winner = state.winner;
    stats.winning_team = state.winning_team;
    stats.draw = state.draw;
    stats.error = state.error;
    stats.turns = state.turn_number;
    stats.closest_margin = if closest_margin.is_finite() { closest_margin } else { 1.0 };
    stats.decisive_turn = last_leader_change_turn;
    stats.winner_trailing_at_midpoint = match (state.winner, leader_at_midpoint) {
        (Some(w), Some(l)) => w != l,
        _ => false,
    };

    if let Some(winner) = state.winner {
        if genome.has_betting_phase() {
            let folded_count = state.folded.iter().filter(|&&f| f).count();
            if folded_count == n - 1 && !state.folded[winner] {
                stats.fold_wins += 1;
            } else {
                stats.showdown_wins += 1;
            }
        }
    }

    stats
}

/// Claims are face-down; a "bluff" is a claim whose true card rank does not
/// match the asserted rank (`turn_number mod 13`, per's convention). A
/// bluff only counts as successful once its claim resolves without being
/// caught by a challenge.
fn record_claim_and_betting(
    stats: &mut GameStats,
    pending_bluff: &mut Option<bool>,
    state: &GameState,
    genome: &ParsedGenome,
    mv: LegalMove,
) {
    if let Phase::Claim = genome.turn_structure.phases[mv.phase_index] {
        match state.claimer {
            None => {
                if mv.card_index >= 0 {
                    stats.claims += 1;
                    let p = state.current_player;
                    let claimed_rank = (state.turn_number % 13) as u8;
                    let bluffed = state
                        .hands
                        .get(p)
                        .and_then(|h| h.get(mv.card_index as usize))
                        .map(|c| c.rank() as u8 != claimed_rank)
                        .unwrap_or(false);
                    *pending_bluff = Some(bluffed);
                }
            }
            Some(_) => {
                if mv.card_index == CLAIM_CHALLENGE {
                    stats.challenges += 1;
                    let honest = state.discard.last().map(|c| Some(c.rank()) == state.claimed_rank).unwrap_or(false);
                    if !honest {
                        stats.catches += 1;
                    }
                    *pending_bluff = None;
                } else if mv.card_index == CLAIM_ACCEPT {
                    if *pending_bluff == Some(true) {
                        stats.successful_bluffs += 1;
                    }
                    *pending_bluff = None;
                }
            }
        }
    }
    if let Phase::Betting { .. } = genome.turn_structure.phases[mv.phase_index] {
        match mv.card_index {
            BET_BET | BET_RAISE | BET_CALL => stats.bets += 1,
            BET_ALL_IN => stats.all_ins += 1,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::AiPolicy;
    use crate::bytecode::{compile, parse};
    use crate::known_games;

    #[test]
    fn war_has_near_zero_decision_density() {
        let genome = known_games::war();
        let bytes = compile(&genome).unwrap();
        let parsed = parse(&bytes).unwrap();
        let ai = AiConfig::uniform(AiPolicy::Random);
        let stats = run_instrumented_game(&parsed, &ai, 42);
        assert!(stats.decision_density() < 0.05);
    }

    #[test]
    fn hearts_records_lead_changes_and_margin() {
        let genome = known_games::hearts();
        let bytes = compile(&genome).unwrap();
        let parsed = parse(&bytes).unwrap();
        let ai = AiConfig::uniform(AiPolicy::Greedy);
        let stats = run_instrumented_game(&parsed, &ai, 7);
        assert!(stats.closest_margin <= 1.0);
        assert!(!stats.error);
    }
}
