//! Population seeding: a configurable ratio of known-game replicas
//! to mutated variants, the remainder filled by 1-3 mutation rounds over a
//! randomly chosen known game.

use rand::rngs::SmallRng;
use rand::Rng;

use crate::genome::Genome;
use crate::known_games;

use super::mutation::mutate;

fn known_game_pool(player_count: u8) -> Vec<Genome> {
    let mut pool = vec![known_games::war(), known_games::hearts(), known_games::simple_poker(), known_games::crazy_eights()];
    for genome in &mut pool {
        genome.player_count = player_count;
    }
    pool
}

pub fn seed_population(size: usize, seed_ratio: f32, player_count: u8, rng: &mut SmallRng) -> Vec<Genome> {
    let pool = known_game_pool(player_count);
    let replica_count = ((size as f32) * seed_ratio.clamp(0.0, 1.0)).round() as usize;

    let mut population = Vec::with_capacity(size);
    for i in 0..replica_count.min(size) {
        let mut genome = pool[i % pool.len()].clone();
        genome.id = rng.r#gen();
        genome.generation = 0;
        population.push(genome);
    }

    while population.len() < size {
        let base = &pool[rng.gen_range(0..pool.len())];
        let rounds = rng.gen_range(1..=3);
        let mut genome = base.clone();
        for _ in 0..rounds {
            genome = mutate(&genome, rng);
        }
        genome.id = rng.r#gen();
        genome.parent_ids = vec![base.id];
        genome.generation = 0;
        population.push(genome);
    }

    population
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn seeds_the_requested_population_size() {
        let mut rng = SmallRng::seed_from_u64(11);
        let population = seed_population(20, 0.25, 2, &mut rng);
        assert_eq!(population.len(), 20);
        assert!(population.iter().all(|g| g.player_count == 2));
    }
}
