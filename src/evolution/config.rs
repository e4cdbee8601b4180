//! Evolution controller configuration.

use crate::fitness::StylePreset;

#[derive(Debug, Clone)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub generations: u32,
    pub style: StylePreset,
    /// Fraction of the seed population cloned from known games (War,
    /// Hearts, Simple Poker, Crazy Eights) rather than mutated.
    pub seed_ratio: f32,
    pub random_seed: u64,
    pub elitism_rate: f32,
    pub crossover_rate: f32,
    pub tournament_size: usize,
    pub plateau_threshold: u32,
    pub improvement_threshold: f32,
    pub player_count: u8,
    pub skip_skill_eval: bool,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            generations: 30,
            style: StylePreset::Balanced,
            seed_ratio: 0.3,
            random_seed: 0,
            elitism_rate: 0.1,
            crossover_rate: 0.7,
            tournament_size: 4,
            plateau_threshold: 8,
            improvement_threshold: 0.01,
            player_count: 2,
            skip_skill_eval: false,
        }
    }
}
