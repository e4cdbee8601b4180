//! Fitness evaluation pipeline: batched simulation reduced to a
//! seven-metric record (six scored, one duration gate) under a style preset.

pub mod gate;
pub mod metrics;
pub mod style;

pub use gate::{evaluate, evaluate_with_batch_size, evaluate_with_options, DEFAULT_BATCH_SIZE};
pub use metrics::FitnessMetrics;
pub use style::StylePreset;
