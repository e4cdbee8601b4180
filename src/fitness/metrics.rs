//! The seven fitness metrics: six scored components plus the
//! session-length gate (handled separately in `gate.rs`).

use crate::batch::AggregatedStats;
use crate::genome::Genome;

use super::style::StyleConfig;

#[derive(Debug, Clone, Copy, Default)]
pub struct FitnessMetrics {
    pub decision_density: f32,
    pub comeback_potential: f32,
    pub tension_curve: f32,
    pub interaction_frequency: f32,
    pub rules_complexity: f32,
    pub skill_vs_luck: f32,
    pub valid: bool,
    pub total: f32,
}

impl FitnessMetrics {
    pub fn as_array(&self) -> [f32; 6] {
        [
            self.decision_density,
            self.comeback_potential,
            self.tension_curve,
            self.interaction_frequency,
            self.rules_complexity,
            self.skill_vs_luck,
        ]
    }
}

/// Total number of distinct rule elements a genome declares: phases, win
/// conditions, scoring rules, special effects, plus team/bidding if present.
/// Used only as a complexity proxy, never as a correctness check.
pub fn rule_count(genome: &Genome) -> u32 {
    let mut count = genome.turn_structure.phases.len() as u32;
    count += genome.win_conditions.len() as u32;
    count += genome.card_scoring.len() as u32;
    count += genome.special_effects.len() as u32;
    count += genome.team.is_some() as u32;
    count += genome.bidding().is_some() as u32;
    count
}

/// 1.0 inside the target band, decaying linearly to 0.0 at twice the
/// band's width outside either edge.
pub fn rules_complexity(genome: &Genome, style: &StyleConfig) -> f32 {
    let (lo, hi) = style.target_rule_count;
    let count = rule_count(genome) as f32;
    if count >= lo as f32 && count <= hi as f32 {
        return 1.0;
    }
    let width = ((hi - lo).max(1)) as f32;
    let distance = if count < lo as f32 { lo as f32 - count } else { count - hi as f32 };
    (1.0 - distance / (2.0 * width)).max(0.0)
}

pub fn decision_density(stats: &AggregatedStats) -> f32 {
    stats.decision_density
}

pub fn comeback_potential(stats: &AggregatedStats) -> f32 {
    stats.comeback_rate
}

pub fn interaction_frequency(stats: &AggregatedStats) -> f32 {
    stats.interaction_frequency
}

/// Weighted blend of the three tension signals the batch runner already
/// reduced: normalised lead changes (capped at 10 for the normalisation),
/// inverted closest margin (a tighter game is more tense), and the decisive
/// turn's fraction of the game (a late decisive turn keeps tension high).
pub fn tension_curve(stats: &AggregatedStats) -> f32 {
    let lead_changes_norm = (stats.lead_changes_mean / 10.0).min(1.0);
    let margin_tension = 1.0 - stats.closest_margin_mean.min(1.0);
    let decisive_tension = stats.decisive_turn_pct_mean.min(1.0);
    0.4 * lead_changes_norm + 0.3 * margin_tension + 0.3 * decisive_tension
}
