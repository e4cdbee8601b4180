//! Uniform-random policy: the control baseline for skill evaluation
//! and the default opponent model inside MCTS rollouts.

use rand::rngs::SmallRng;
use rand::Rng;

use crate::vm::moves::LegalMove;

pub fn choose(moves: &[LegalMove], rng: &mut SmallRng) -> LegalMove {
    moves[rng.gen_range(0..moves.len())]
}
