//! Style presets: named weight vectors and target windows. The numeric
//! values are tuning parameters expected to shift across commits — these
//! are defaults meant to be overridden, not constants to trust blindly.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StylePreset {
    Balanced,
    Strategic,
    Bluffing,
    Party,
    TrickTaking,
}

/// Weight order matches `FitnessMetrics`'s six scored fields:
/// `[decision_density, comeback_potential, tension_curve,
/// interaction_frequency, rules_complexity, skill_vs_luck]`.
#[derive(Debug, Clone, Copy)]
pub struct StyleConfig {
    pub weights: [f32; 6],
    pub min_turns: u32,
    pub max_turns: u32,
    pub target_rule_count: (u32, u32),
}

impl StylePreset {
    pub fn config(&self) -> StyleConfig {
        match self {
            StylePreset::Balanced => StyleConfig {
                weights: [1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
                min_turns: 10,
                max_turns: 300,
                target_rule_count: (4, 14),
            },
            StylePreset::Strategic => StyleConfig {
                weights: [1.5, 0.5, 1.0, 0.8, 1.2, 1.8],
                min_turns: 20,
                max_turns: 400,
                target_rule_count: (6, 18),
            },
            StylePreset::Bluffing => StyleConfig {
                weights: [0.6, 0.8, 1.0, 1.8, 0.8, 0.6],
                min_turns: 10,
                max_turns: 200,
                target_rule_count: (4, 12),
            },
            StylePreset::Party => StyleConfig {
                weights: [0.5, 1.5, 0.8, 1.5, 0.5, 0.3],
                min_turns: 5,
                max_turns: 80,
                target_rule_count: (2, 8),
            },
            StylePreset::TrickTaking => StyleConfig {
                weights: [1.0, 1.0, 1.5, 1.2, 1.0, 1.0],
                min_turns: 15,
                max_turns: 150,
                target_rule_count: (4, 12),
            },
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "balanced" => Some(StylePreset::Balanced),
            "strategic" => Some(StylePreset::Strategic),
            "bluffing" => Some(StylePreset::Bluffing),
            "party" => Some(StylePreset::Party),
            "trick-taking" | "trick_taking" => Some(StylePreset::TrickTaking),
            _ => None,
        }
    }
}
