//! The deterministic game engine: decoded genome in, played-out result out.
//! Every submodule here is a pure function of `(GameState, ParsedGenome)`
//! except `pool`, which only recycles allocations, and `interpreter`, which
//! drives the loop.

pub mod apply;
pub mod condition_eval;
pub mod interpreter;
pub mod leader;
pub mod moves;
pub mod pool;
pub mod state;
pub mod win;

pub use interpreter::{advance, deal, run_game, GameResult};
pub use leader::LeaderDetector;
pub use moves::{generate_legal_moves, LegalMove};
pub use pool::StatePool;
pub use state::GameState;
