//! Plateau detection: stop early once the best fitness per
//! generation stops improving by more than `improvement_threshold` for
//! `plateau_threshold` consecutive generations.

#[derive(Debug, Clone)]
pub struct PlateauTracker {
    history: Vec<f32>,
    threshold: u32,
    improvement_threshold: f32,
}

impl PlateauTracker {
    pub fn new(threshold: u32, improvement_threshold: f32) -> Self {
        Self { history: Vec::new(), threshold, improvement_threshold }
    }

    pub fn record(&mut self, best_fitness: f32) {
        self.history.push(best_fitness);
    }

    pub fn should_stop(&self) -> bool {
        let window = self.threshold as usize;
        if self.history.len() <= window {
            return false;
        }
        let baseline = self.history[self.history.len() - 1 - window];
        let recent_best = self.history[self.history.len() - window..]
            .iter()
            .cloned()
            .fold(f32::MIN, f32::max);
        recent_best - baseline < self.improvement_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stops_once_gains_fall_below_threshold() {
        let mut tracker = PlateauTracker::new(3, 0.01);
        for f in [0.1, 0.2, 0.3, 0.301, 0.302, 0.303] {
            tracker.record(f);
        }
        assert!(tracker.should_stop());
    }

    #[test]
    fn keeps_going_while_improving() {
        let mut tracker = PlateauTracker::new(3, 0.01);
        for f in [0.1, 0.2, 0.3, 0.5, 0.7, 0.9] {
            tracker.record(f);
        }
        assert!(!tracker.should_stop());
    }
}
