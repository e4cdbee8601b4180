//! Optional team partition with a precomputed player -> team lookup.

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TeamConfig {
    team_count: u8,
    /// Dense, length == player_count. Entries are either a valid team index
    /// (`< team_count`) or the sentinel `-1` for an unassigned player.
    player_to_team: Vec<i8>,
}

pub const UNASSIGNED: i8 = -1;

impl TeamConfig {
    pub fn new(player_to_team: Vec<i8>) -> Self {
        let team_count = player_to_team
            .iter()
            .filter(|&&t| t != UNASSIGNED)
            .map(|&t| t as u8 + 1)
            .max()
            .unwrap_or(0);
        Self {
            team_count,
            player_to_team,
        }
    }

    pub fn team_count(&self) -> u8 {
        self.team_count
    }

    pub fn team_of(&self, player: usize) -> Option<u8> {
        match self.player_to_team.get(player) {
            Some(&t) if t != UNASSIGNED => Some(t as u8),
            _ => None,
        }
    }

    pub fn player_count(&self) -> usize {
        self.player_to_team.len()
    }

    pub fn is_dense(&self, player_count: usize) -> bool {
        self.player_to_team.len() == player_count
            && self
                .player_to_team
                .iter()
                .all(|&t| t == UNASSIGNED || (t as u8) < self.team_count)
    }

    pub fn entries(&self) -> &[i8] {
        &self.player_to_team
    }
}
