//! Game-type-specific "who is winning right now" detectors, sampled once per
//! turn by the batch runner's tension instrumentation. Dispatch is a
//! tagged enum rather than a trait object, matching the VM's other hot-path
//! switches.

use super::state::GameState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaderDetector {
    Score,
    LowScore,
    HandSize,
    TrickCount,
    TrickAvoidance,
    Chips,
}

impl LeaderDetector {
    /// Picks a detector from the genome's shape: trick-taking games with
    /// low-score wins (Hearts-like) avoid tricks; everything else that
    /// scores per trick wants to take them; betting games track chips;
    /// shedding games track remaining hand size; anything else falls back
    /// to raw score.
    pub fn infer(genome: &crate::bytecode::ParsedGenome) -> Self {
        if genome.has_betting_phase() {
            LeaderDetector::Chips
        } else if genome.has_trick_phase() {
            let low_score_game = genome
                .win_conditions
                .iter()
                .any(|wc| wc.kind == crate::genome::WinKind::LowScore);
            if low_score_game {
                LeaderDetector::TrickAvoidance
            } else {
                LeaderDetector::TrickCount
            }
        } else if genome
            .win_conditions
            .iter()
            .any(|wc| wc.kind == crate::genome::WinKind::EmptyHand)
        {
            LeaderDetector::HandSize
        } else {
            LeaderDetector::Score
        }
    }

    /// Per-player standing, higher is better regardless of game orientation.
    fn standing(&self, state: &GameState, player: usize) -> f32 {
        match self {
            LeaderDetector::Score | LeaderDetector::TrickCount => state.scores[player] as f32,
            LeaderDetector::LowScore | LeaderDetector::TrickAvoidance => -(state.scores[player] as f32),
            LeaderDetector::HandSize => -(state.hands[player].len() as f32),
            LeaderDetector::Chips => state.chips[player] as f32,
        }
    }

    pub fn leader(&self, state: &GameState) -> usize {
        (0..state.player_count as usize)
            .max_by(|&a, &b| self.standing(state, a).total_cmp(&self.standing(state, b)))
            .unwrap_or(0)
    }

    /// Normalised margin in `0.0..=1.0` between the leader and the runner-up;
    /// 0 means a dead heat.
    pub fn margin(&self, state: &GameState) -> f32 {
        let n = state.player_count as usize;
        if n < 2 {
            return 1.0;
        }
        let mut standings: Vec<f32> = (0..n).map(|p| self.standing(state, p)).collect();
        standings.sort_by(|a, b| b.total_cmp(a));
        let spread = standings[0] - standings[n - 1];
        if spread.abs() < f32::EPSILON {
            return 0.0;
        }
        ((standings[0] - standings[1]) / spread).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chip_leader_tracks_largest_stack() {
        let mut state = GameState::new(2);
        state.chips = vec![100, 300];
        assert_eq!(LeaderDetector::Chips.leader(&state), 1);
    }
}
