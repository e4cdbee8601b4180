//! Evolution controller: the outer generation loop wrapping
//! seeding, parallel fitness evaluation, elitism, tournament selection,
//! crossover, mutation, and plateau-triggered early stop.

pub mod config;
pub mod crossover;
pub mod mutation;
pub mod plateau;
pub mod seed;
pub mod selection;

pub use config::EvolutionConfig;
pub use mutation::MutationKind;
pub use plateau::PlateauTracker;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::fitness::{evaluate_with_options, FitnessMetrics};
use crate::genome::Genome;

/// One generation's population paired with the fitness each genome earned.
#[derive(Debug, Clone)]
pub struct Scored {
    pub genome: Genome,
    pub fitness: FitnessMetrics,
}

/// Summary statistics recorded once per generation, independent of any
/// particular persisted format.
#[derive(Debug, Clone)]
pub struct GenerationStats {
    pub generation: u32,
    pub best_fitness: f32,
    pub mean_fitness: f32,
    pub valid_count: usize,
    pub population_size: usize,
}

/// Final result of a full evolutionary run.
#[derive(Debug, Clone)]
pub struct EvolutionResult {
    pub population: Vec<Scored>,
    pub history: Vec<GenerationStats>,
}

/// Runs the full `Population -> Evaluate -> Select -> Breed -> Validate &
/// Repair -> Next generation` cycle until either `config.generations`
/// elapses or the plateau tracker calls an early stop. Evaluation is the
/// outer-tier parallel stage (one genome per worker), mirroring the
/// teacher's `into_par_iter` fan-out already used for inner-tier batches.
pub fn run(config: &EvolutionConfig) -> EvolutionResult {
    let mut rng = SmallRng::seed_from_u64(config.random_seed);
    let mut population = seed::seed_population(
        config.population_size,
        config.seed_ratio,
        config.player_count,
        &mut rng,
    );

    let mut plateau = PlateauTracker::new(config.plateau_threshold, config.improvement_threshold);
    let mut history = Vec::with_capacity(config.generations as usize);
    let mut scored = evaluate_population(&population, config, 0);

    for generation in 0..config.generations {
        let stats = summarize(&scored, generation, population.len());
        plateau.record(stats.best_fitness);
        history.push(stats.clone());
        log::info!(
            "generation {}: best={:.4} mean={:.4} valid={}/{}",
            stats.generation,
            stats.best_fitness,
            stats.mean_fitness,
            stats.valid_count,
            stats.population_size,
        );

        if plateau.should_stop() {
            log::info!("plateau reached at generation {}, stopping early", generation);
            break;
        }

        population = breed_next_generation(&population, &scored, config, &mut rng);
        scored = evaluate_population(&population, config, config.random_seed ^ ((generation as u64 + 1) << 32));
    }

    let final_stats = summarize(&scored, config.generations, population.len());
    history.push(final_stats);

    EvolutionResult { population: scored, history }
}

/// Evaluates every genome in parallel (outer tier); each evaluation runs
/// its own inner-tier batch of simulations via `fitness::evaluate`.
fn evaluate_population(population: &[Genome], config: &EvolutionConfig, seed_salt: u64) -> Vec<Scored> {
    population
        .par_iter()
        .map(|genome| {
            let seed = config.random_seed ^ seed_salt ^ genome.id;
            let fitness = evaluate_with_options(
                genome,
                config.style,
                seed,
                crate::fitness::DEFAULT_BATCH_SIZE,
                config.skip_skill_eval,
            );
            Scored { genome: genome.clone(), fitness }
        })
        .collect()
}

fn summarize(scored: &[Scored], generation: u32, population_size: usize) -> GenerationStats {
    let valid: Vec<&Scored> = scored.iter().filter(|s| s.fitness.valid).collect();
    let best_fitness = valid.iter().map(|s| s.fitness.total).fold(0.0, f32::max);
    let mean_fitness = if valid.is_empty() {
        0.0
    } else {
        valid.iter().map(|s| s.fitness.total).sum::<f32>() / valid.len() as f32
    };
    GenerationStats {
        generation,
        best_fitness,
        mean_fitness,
        valid_count: valid.len(),
        population_size,
    }
}

/// Elitism copies the top fraction through unchanged; the remainder is
/// filled by tournament-selected parents bred via crossover (when rolled)
/// and always finished off with a mutation pass, each retried internally
/// against the validator.
fn breed_next_generation(
    population: &[Genome],
    scored: &[Scored],
    config: &EvolutionConfig,
    rng: &mut SmallRng,
) -> Vec<Genome> {
    let mut order: Vec<usize> = (0..scored.len()).collect();
    order.sort_by(|&a, &b| {
        scored[b]
            .fitness
            .total
            .partial_cmp(&scored[a].fitness.total)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let elite_count = ((population.len() as f32) * config.elitism_rate.clamp(0.0, 1.0)).round() as usize;
    let mut next = Vec::with_capacity(population.len());
    for &idx in order.iter().take(elite_count.min(population.len())) {
        next.push(scored[idx].genome.clone());
    }

    let scores: Vec<f32> = scored.iter().map(|s| s.fitness.total).collect();
    let next_generation = scored.first().map(|s| s.genome.generation).unwrap_or(0) + 1;

    while next.len() < population.len() {
        let parent_a = selection::tournament_select(&scores, config.tournament_size, rng);
        let child = if rng.r#gen::<f32>() < config.crossover_rate {
            let parent_b = selection::tournament_select(&scores, config.tournament_size, rng);
            crossover::crossover(&population[parent_a], &population[parent_b], next_generation, rng)
        } else {
            let mut clone = population[parent_a].clone();
            clone.generation = next_generation;
            clone
        };
        next.push(mutation::mutate(&child, rng));
    }

    next
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoke_test_preserves_population_size_and_improves_monotonically() {
        let config = EvolutionConfig {
            population_size: 20,
            generations: 5,
            random_seed: 42,
            ..EvolutionConfig::default()
        };
        let result = run(&config);
        assert_eq!(result.population.len(), 20);

        let mut running_best = 0.0f32;
        for stats in &result.history {
            assert!(stats.best_fitness + 1e-4 >= running_best, "fitness regressed past elitism tolerance");
            running_best = stats.best_fitness.max(running_best);
        }
    }

    #[test]
    fn breeding_preserves_population_size() {
        let config = EvolutionConfig { population_size: 10, player_count: 2, ..EvolutionConfig::default() };
        let mut rng = SmallRng::seed_from_u64(config.random_seed);
        let population = seed::seed_population(config.population_size, config.seed_ratio, config.player_count, &mut rng);
        let scored = evaluate_population(&population, &config, 0);
        let next = breed_next_generation(&population, &scored, &config, &mut rng);
        assert_eq!(next.len(), config.population_size);
    }
}
