//! `run_batch`: runs N independent, seed-derived simulations
//! and reduces them to one `AggregatedStats` record, via the usual
//! `into_par_iter().collect()` fan-out for embarrassingly parallel batches.

use rayon::prelude::*;

use crate::ai::AiConfig;
use crate::bytecode::ParsedGenome;

use super::instrumentation::{run_instrumented_game, GameStats};

#[derive(Debug, Clone, Default)]
pub struct AggregatedStats {
    pub games: u32,
    pub wins: Vec<u32>,
    pub draws: u32,
    pub errors: u32,
    pub mean_turns: f64,
    pub median_turns: f64,

    pub decision_density: f32,
    pub interaction_frequency: f32,
    pub move_disruption_rate: f32,
    pub contention_rate: f32,
    pub forced_response_rate: f32,

    pub lead_changes_mean: f32,
    pub closest_margin_mean: f32,
    pub decisive_turn_pct_mean: f32,
    pub comeback_rate: f32,

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

/// `seed ^ i` derives one independent seed per game so a batch is
/// deterministic as a whole while no two games share an RNG stream.
pub fn run_batch(genome: &ParsedGenome, n: u32, ai: &AiConfig, seed: u64) -> AggregatedStats {
    let results: Vec<GameStats> = (0..n)
        .into_par_iter()
        .map(|i| run_instrumented_game(genome, ai, seed ^ (i as u64).wrapping_mul(0x9E3779B97F4A7C15)))
        .collect();
    aggregate(genome.player_count as usize, genome.max_turns, &results)
}

fn aggregate(player_count: usize, max_turns: u32, results: &[GameStats]) -> AggregatedStats {
    let games = results.len() as u32;
    let mut out = AggregatedStats {
        games,
        wins: vec![0; player_count],
        ..Default::default()
    };
    if games == 0 {
        return out;
    }

    let mut turns: Vec<u32> = Vec::with_capacity(results.len());
    for r in results {
        if let Some(w) = r.winner {
            out.wins[w] += 1;
        }
        if r.draw {
            out.draws += 1;
        }
        if r.error {
            out.errors += 1;
        }
        turns.push(r.turns);

        out.decision_density += r.decision_density();
        out.interaction_frequency += r.interaction_frequency();
        let moments = r.total_moments.max(1) as f32;
        out.move_disruption_rate += r.move_disruption as f32 / moments;
        out.contention_rate += r.contention as f32 / moments;
        out.forced_response_rate += r.forced_response as f32 / moments;

        out.lead_changes_mean += r.lead_changes as f32;
        out.closest_margin_mean += r.closest_margin;
        out.decisive_turn_pct_mean += r.decisive_turn as f32 / max_turns.max(1) as f32;
        if r.winner_trailing_at_midpoint {
            out.comeback_rate += 1.0;
        }

        out.claims += r.claims;
        out.bluffs += r.bluffs;
        out.challenges += r.challenges;
        out.successful_bluffs += r.successful_bluffs;
        out.catches += r.catches;
        out.bets += r.bets;
        out.all_ins += r.all_ins;
        out.fold_wins += r.fold_wins;
        out.showdown_wins += r.showdown_wins;
    }

    let f = games as f32;
    out.decision_density /= f;
    out.interaction_frequency /= f;
    out.move_disruption_rate /= f;
    out.contention_rate /= f;
    out.forced_response_rate /= f;
    out.lead_changes_mean /= f;
    out.closest_margin_mean /= f;
    out.decisive_turn_pct_mean /= f;
    out.comeback_rate /= f;

    turns.sort_unstable();
    out.mean_turns = turns.iter().map(|&t| t as f64).sum::<f64>() / games as f64;
    out.median_turns = turns[turns.len() / 2] as f64;

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{AiConfig, AiPolicy};
    use crate::bytecode::{compile, parse};
    use crate::known_games;

    #[test]
    fn batch_is_deterministic_for_a_fixed_seed() {
        let genome = known_games::war();
        let bytes = compile(&genome).unwrap();
        let parsed = parse(&bytes).unwrap();
        let ai = AiConfig::uniform(AiPolicy::Random);
        let a = run_batch(&parsed, 50, &ai, 42);
        let b = run_batch(&parsed, 50, &ai, 42);
        assert_eq!(a.wins, b.wins);
        assert_eq!(a.draws, b.draws);
    }

    #[test]
    fn simple_poker_conserves_total_chips_across_games() {
        let genome = known_games::simple_poker();
        let bytes = compile(&genome).unwrap();
        let parsed = parse(&bytes).unwrap();
        let ai = AiConfig::uniform(AiPolicy::Greedy);
        let stats = run_batch(&parsed, 20, &ai, 1);
        assert_eq!(stats.games, 20);
        assert!(stats.errors == 0 || stats.errors < 20);
    }
}
