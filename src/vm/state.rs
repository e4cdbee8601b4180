//! Mutable game state. One instance lives for the length of a single
//! simulation; MCTS search clones it per node and throws the clone away when
//! the search ends.

use crate::cards::{Card, Deck, Rank};

#[derive(Debug, Clone)]
pub struct GameState {
    pub player_count: u8,
    pub current_player: usize,
    pub play_direction: i8,
    pub skip_count: u8,
    pub turn_number: u32,
    pub phase_index: usize,

    pub deck: Deck,
    pub discard: Vec<Card>,
    pub hands: Vec<Vec<Card>>,

    /// Generic tableau piles: one per player under `war`, one shared pile
    /// under `match_rank`/`none`, one per suit-foundation under `sequence`.
    pub tableau: Vec<Vec<Card>>,
    pub battle_number: u32,

    pub current_trick: Vec<(usize, Card)>,
    pub trick_leader: usize,
    pub breaking_suit_broken: bool,

    pub pot: u32,
    pub chips: Vec<u32>,
    pub current_bet: Vec<u32>,
    pub folded: Vec<bool>,
    pub all_in: Vec<bool>,
    pub raise_count: u8,
    /// `max_raises` of the betting phase currently in play, kept in sync by
    /// `deal`/`advance` so `CanRaise` can cap without a genome handle.
    pub current_max_raises: u32,

    pub claimer: Option<usize>,
    pub claimed_rank: Option<Rank>,
    pub claimed_count: usize,

    pub scores: Vec<i32>,
    pub team_scores: Vec<i32>,
    pub bids: Vec<Option<i32>>,

    pub winner: Option<usize>,
    pub winning_team: Option<u8>,
    pub draw: bool,
    pub error: bool,
}

impl GameState {
    pub fn new(player_count: u8) -> Self {
        let n = player_count as usize;
        Self {
            player_count,
            current_player: 0,
            play_direction: 1,
            skip_count: 0,
            turn_number: 0,
            phase_index: 0,
            deck: Deck::standard(),
            discard: Vec::new(),
            hands: vec![Vec::new(); n],
            tableau: vec![Vec::new(); n.max(4)],
            battle_number: 0,
            current_trick: Vec::new(),
            trick_leader: 0,
            breaking_suit_broken: false,
            pot: 0,
            chips: vec![0; n],
            current_bet: vec![0; n],
            folded: vec![false; n],
            all_in: vec![false; n],
            raise_count: 0,
            current_max_raises: u32::MAX,
            claimer: None,
            claimed_rank: None,
            claimed_count: 0,
            scores: vec![0; n],
            team_scores: vec![0; n],
            bids: vec![None; n],
            winner: None,
            winning_team: None,
            draw: false,
            error: false,
        }
    }

    /// Resets every field in place so the allocation can be reused from a pool.
    pub fn reset(&mut self, player_count: u8) {
        *self = Self::new(player_count);
    }

    pub fn is_terminal(&self) -> bool {
        self.winner.is_some() || self.draw
    }

    pub fn next_player(&self) -> usize {
        let n = self.player_count as usize;
        let delta = self.play_direction as isize;
        let cur = self.current_player as isize;
        (((cur + delta) % n as isize + n as isize) % n as isize) as usize
    }

    pub fn advance_turn(&mut self) {
        if self.skip_count > 0 {
            self.skip_count -= 1;
        }
        let mut next = self.next_player();
        while self.skip_count > 0 && self.folded.iter().filter(|f| !**f).count() > 1 {
            self.skip_count -= 1;
            let n = self.player_count as usize;
            let delta = self.play_direction as isize;
            next = (((next as isize + delta) % n as isize + n as isize) % n as isize) as usize;
        }
        self.current_player = next;
        self.turn_number += 1;
    }

    pub fn card_conservation_count(&self) -> usize {
        self.deck.len()
            + self.discard.len()
            + self.hands.iter().map(|h| h.len()).sum::<usize>()
            + self.tableau.iter().map(|t| t.len()).sum::<usize>()
            + self.current_trick.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_conserves_standard_deck() {
        let state = GameState::new(4);
        assert_eq!(state.card_conservation_count(), Deck::STANDARD_SIZE);
    }

    #[test]
    fn next_player_wraps_with_direction() {
        let mut state = GameState::new(4);
        state.current_player = 3;
        assert_eq!(state.next_player(), 0);
        state.play_direction = -1;
        assert_eq!(state.next_player(), 2);
    }
}
