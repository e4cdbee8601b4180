//! Tournament selection: draw k candidates uniformly, the highest
//! `total_fitness` among them wins.

use rand::rngs::SmallRng;
use rand::Rng;

pub fn tournament_select(scores: &[f32], k: usize, rng: &mut SmallRng) -> usize {
    let n = scores.len();
    let k = k.clamp(1, n);
    let mut best = rng.gen_range(0..n);
    for _ in 1..k {
        let candidate = rng.gen_range(0..n);
        if scores[candidate] > scores[best] {
            best = candidate;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn tournament_never_picks_worse_than_a_single_draw() {
        let mut rng = SmallRng::seed_from_u64(1);
        let scores = vec![0.1, 0.9, 0.2, 0.05];
        let mut picked_best_at_least_once = false;
        for _ in 0..50 {
            let idx = tournament_select(&scores, 4, &mut rng);
            if idx == 1 {
                picked_best_at_least_once = true;
            }
        }
        assert!(picked_best_at_least_once);
    }
}
