//! Semantic coherence checker: cross-checks between a mechanic and
//! the support it needs, distinct from the structural validator's
//! shape-only checks.

use thiserror::Error;

use crate::cards::Location;
use crate::genome::{Genome, Phase, TableauMode, WinKind};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoherenceError {
    #[error("capture-based win condition {0:?} requires a tableau phase")]
    CaptureWithoutTableau(WinKind),
    #[error("starting_chips {0} > 0 requires at least one betting phase")]
    ChipsWithoutBetting(u32),
    #[error("contract scoring is configured without a bidding phase")]
    OrphanedContractScoring,
    #[error("bidding phase requires a trick phase")]
    BiddingWithoutTrick,
}

pub fn check(genome: &Genome) -> Result<(), CoherenceError> {
    capture_requires_tableau(genome)?;
    chips_require_betting(genome)?;
    contract_scoring_requires_bidding(genome)?;
    bidding_requires_trick(genome)?;
    Ok(())
}

fn has_tableau(genome: &Genome) -> bool {
    genome.setup.tableau_mode != TableauMode::None
        || genome.turn_structure.phases.iter().any(|p| matches!(p, Phase::Play { target: Location::Tableau, .. }))
}

fn capture_requires_tableau(genome: &Genome) -> Result<(), CoherenceError> {
    for wc in &genome.win_conditions {
        if wc.is_capture_based() && !has_tableau(genome) {
            return Err(CoherenceError::CaptureWithoutTableau(wc.kind));
        }
    }
    Ok(())
}

fn chips_require_betting(genome: &Genome) -> Result<(), CoherenceError> {
    if genome.setup.starting_chips > 0 && !genome.has_betting_phase() {
        return Err(CoherenceError::ChipsWithoutBetting(genome.setup.starting_chips));
    }
    Ok(())
}

fn contract_scoring_requires_bidding(genome: &Genome) -> Result<(), CoherenceError> {
    let has_contract_scoring = genome
        .bidding()
        .map(|cfg| cfg.contract_scoring.is_some())
        .unwrap_or(false);
    if has_contract_scoring && !genome.has_bidding_phase() {
        return Err(CoherenceError::OrphanedContractScoring);
    }
    Ok(())
}

fn bidding_requires_trick(genome: &Genome) -> Result<(), CoherenceError> {
    if genome.has_bidding_phase() && !genome.has_trick_phase() {
        return Err(CoherenceError::BiddingWithoutTrick);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::known_games;

    #[test]
    fn known_games_are_coherent() {
        assert!(check(&known_games::war()).is_ok());
        assert!(check(&known_games::hearts()).is_ok());
        assert!(check(&known_games::simple_poker()).is_ok());
        assert!(check(&known_games::crazy_eights()).is_ok());
    }

    #[test]
    fn chips_without_betting_is_rejected() {
        let mut genome = known_games::war();
        genome.setup.starting_chips = 500;
        assert_eq!(check(&genome), Err(CoherenceError::ChipsWithoutBetting(500)));
    }
}
