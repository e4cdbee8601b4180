//! Validity gate and total-fitness reduction.

use crate::ai::{AiConfig, AiPolicy};
use crate::batch::run_batch;
use crate::bytecode::{compile, parse};
use crate::genome::Genome;
use crate::skill::evaluate_skill;

use super::metrics::{self, FitnessMetrics};
use super::style::StylePreset;

/// Games per fitness evaluation; small enough to keep evolution fast, large
/// enough that per-player win counts aren't dominated by seed noise.
pub const DEFAULT_BATCH_SIZE: u32 = 200;
const SKILL_GAMES: u32 = 60;

pub fn evaluate(genome: &Genome, style: StylePreset, seed: u64) -> FitnessMetrics {
    evaluate_with_batch_size(genome, style, seed, DEFAULT_BATCH_SIZE)
}

pub fn evaluate_with_batch_size(genome: &Genome, style: StylePreset, seed: u64, batch_size: u32) -> FitnessMetrics {
    evaluate_with_options(genome, style, seed, batch_size, false)
}

/// Full form used by the evolution controller: `skip_skill` drops the
/// greedy/MCTS-vs-random matchups entirely, trading selectivity for
/// speed when a run only needs the six batch-derived metrics.
pub fn evaluate_with_options(
    genome: &Genome,
    style: StylePreset,
    seed: u64,
    batch_size: u32,
    skip_skill: bool,
) -> FitnessMetrics {
    let config = style.config();

    let bytes = match compile(genome) {
        Ok(b) => b,
        Err(_) => return FitnessMetrics { valid: false, ..Default::default() },
    };
    let parsed = match parse(&bytes) {
        Ok(p) => p,
        Err(_) => return FitnessMetrics { valid: false, ..Default::default() },
    };

    let ai = AiConfig::uniform(AiPolicy::Greedy);
    let stats = run_batch(&parsed, batch_size, &ai, seed);
    if stats.games == 0 {
        return FitnessMetrics { valid: false, ..Default::default() };
    }

    if stats.mean_turns < config.min_turns as f64 || stats.mean_turns > config.max_turns as f64 {
        return FitnessMetrics { valid: false, ..Default::default() };
    }

    let skill = if skip_skill {
        crate::skill::SkillReport::default()
    } else {
        evaluate_skill(&parsed, SKILL_GAMES, seed ^ 0xD1CE_D1CE)
    };

    let mut out = FitnessMetrics {
        decision_density: metrics::decision_density(&stats),
        comeback_potential: metrics::comeback_potential(&stats),
        tension_curve: metrics::tension_curve(&stats),
        interaction_frequency: metrics::interaction_frequency(&stats),
        rules_complexity: metrics::rules_complexity(genome, &config),
        skill_vs_luck: skill.skill_score,
        valid: true,
        total: 0.0,
    };

    let values = out.as_array();
    let weight_sum: f32 = config.weights.iter().sum();
    let weighted: f32 = values.iter().zip(config.weights.iter()).map(|(v, w)| v * w).sum();
    out.total = crate::skill::evaluator::apply_penalty(weighted / weight_sum.max(1e-6), &skill);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::known_games;

    #[test]
    fn valid_genome_produces_bounded_total() {
        let genome = known_games::hearts();
        let metrics = evaluate_with_batch_size(&genome, StylePreset::Balanced, 7, 40);
        assert!(metrics.total >= 0.0 && metrics.total <= 1.0);
    }

    #[test]
    fn out_of_window_duration_is_invalid() {
        let mut genome = known_games::war();
        genome.max_turns = 2;
        let metrics = evaluate_with_batch_size(&genome, StylePreset::Strategic, 1, 20);
        assert!(!metrics.valid);
        assert_eq!(metrics.total, 0.0);
    }
}
