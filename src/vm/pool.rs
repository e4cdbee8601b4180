//! Lock-free, per-worker object pool for `GameState`. There is no
//! cross-worker sharing: each worker thread owns one pool.

use super::state::GameState;

pub struct StatePool {
    free: Vec<GameState>,
}

impl StatePool {
    pub fn new() -> Self {
        Self { free: Vec::new() }
    }

    pub fn acquire(&mut self, player_count: u8) -> GameState {
        match self.free.pop() {
            Some(mut state) => {
                state.reset(player_count);
                state
            }
            None => GameState::new(player_count),
        }
    }

    pub fn release(&mut self, state: GameState) {
        self.free.push(state);
    }

    pub fn len(&self) -> usize {
        self.free.len()
    }
}

impl Default for StatePool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_reuses_released_allocation() {
        let mut pool = StatePool::new();
        let state = pool.acquire(4);
        pool.release(state);
        assert_eq!(pool.len(), 1);
        let reused = pool.acquire(2);
        assert_eq!(reused.player_count, 2);
        assert_eq!(pool.len(), 0);
    }
}
