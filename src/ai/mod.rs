//! Decision policies consumed by `vm::interpreter::run_game` and by the
//! batch runner when it needs greedy/MCTS baselines for skill evaluation
//!.

pub mod greedy;
pub mod mcts;
pub mod random;

use rand::rngs::SmallRng;

use crate::bytecode::ParsedGenome;
use crate::vm::moves::LegalMove;
use crate::vm::state::GameState;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AiPolicy {
    Random,
    Greedy,
    Mcts { iterations: u32, exploration: f32 },
}

impl AiPolicy {
    pub fn choose(&self, genome: &ParsedGenome, state: &GameState, moves: &[LegalMove], rng: &mut SmallRng) -> LegalMove {
        debug_assert!(!moves.is_empty(), "choose is only called with a non-empty legal move set");
        match self {
            AiPolicy::Random => random::choose(moves, rng),
            AiPolicy::Greedy => greedy::choose(genome, state, moves),
            AiPolicy::Mcts { iterations, exploration } => {
                mcts::search(genome, state, moves, *iterations, *exploration, rng)
            }
        }
    }
}

/// Per-seat policy assignment. Most simulations run every seat under the
/// same policy (`uniform`); skill evaluation pits one seat's policy
/// against the rest.
#[derive(Debug, Clone)]
pub struct AiConfig {
    seats: Vec<AiPolicy>,
}

impl AiConfig {
    pub fn uniform(policy: AiPolicy) -> Self {
        Self { seats: vec![policy; 1] }
    }

    pub fn per_seat(seats: Vec<AiPolicy>) -> Self {
        Self { seats }
    }

    pub fn policy_for(&self, seat: usize) -> AiPolicy {
        if self.seats.len() == 1 {
            self.seats[0]
        } else {
            self.seats[seat % self.seats.len()]
        }
    }
}
