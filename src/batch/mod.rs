//! Batched simulation and instrumentation.

pub mod instrumentation;
pub mod runner;

pub use instrumentation::{run_instrumented_game, GameStats};
pub use runner::{run_batch, AggregatedStats};
