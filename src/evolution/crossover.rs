//! Single-point crossover over the ordered phase list.

use rand::rngs::SmallRng;
use rand::Rng;

use crate::genome::Genome;

const MIN_PHASES: usize = 1;
const MAX_PHASES: usize = 5;

/// Splices `a`'s phases up to a random cut point with `b`'s phases past
/// that point. The rest of the offspring (setup, win conditions, scoring,
/// …) comes from `a` unchanged — crossover only recombines turn structure.
pub fn crossover(a: &Genome, b: &Genome, generation: u32, rng: &mut SmallRng) -> Genome {
    let mut child = a.clone();
    let a_len = a.turn_structure.phases.len().clamp(MIN_PHASES, MAX_PHASES);
    let b_len = b.turn_structure.phases.len().clamp(MIN_PHASES, MAX_PHASES);
    let cut = rng.gen_range(1..=a_len.min(a.turn_structure.phases.len()));
    let tail_start = rng.gen_range(0..b_len.min(b.turn_structure.phases.len()));

    let mut phases: Vec<_> = a.turn_structure.phases[..cut].to_vec();
    phases.extend(b.turn_structure.phases[tail_start..].iter().cloned());
    phases.truncate(MAX_PHASES.max(cut));
    if phases.is_empty() {
        phases = a.turn_structure.phases.clone();
    }
    child.turn_structure.phases = phases;

    child.id = rng.r#gen();
    child.parent_ids = vec![a.id, b.id];
    child.generation = generation;
    child
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::known_games;
    use rand::SeedableRng;

    #[test]
    fn crossover_carries_provenance() {
        let mut rng = SmallRng::seed_from_u64(3);
        let a = known_games::war();
        let b = known_games::hearts();
        let child = crossover(&a, &b, 4, &mut rng);
        assert_eq!(child.parent_ids, vec![a.id, b.id]);
        assert_eq!(child.generation, 4);
        assert!(!child.turn_structure.phases.is_empty());
    }
}
