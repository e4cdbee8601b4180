//! Skill-vs-luck re-evaluation for top fitness candidates.

pub mod evaluator;

pub use evaluator::{evaluate_skill, SkillReport};
