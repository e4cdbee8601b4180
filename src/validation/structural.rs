//! Structural validator: checks that run before simulation ever
//! sees a genome. A structurally invalid genome never reaches the VM.

use thiserror::Error;

use crate::genome::{Genome, Phase, WinKind};

const DECK_SIZE: u32 = 52;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StructuralError {
    #[error("genome has no play-style phase (play, trick, or claim)")]
    NoPlayPhase,
    #[error("total deal size {requested} exceeds deck size {available}")]
    DealExceedsDeck { requested: u32, available: u32 },
    #[error("win condition {0:?} is score-based but no card scoring or trick phase backs it")]
    UnbackedScoreWin(WinKind),
    #[error("best-hand win condition requires a hand-evaluation method")]
    BestHandWithoutEvaluation,
    #[error("bidding phase requires a trick phase")]
    BiddingWithoutTrick,
}

pub fn validate(genome: &Genome) -> Result<(), StructuralError> {
    has_play_phase(genome)?;
    deal_within_deck(genome)?;
    score_wins_are_backed(genome)?;
    best_hand_has_evaluation(genome)?;
    bidding_requires_trick(genome)?;
    Ok(())
}

fn has_play_phase(genome: &Genome) -> Result<(), StructuralError> {
    let has_one = genome.turn_structure.phases.iter().any(|p| {
        matches!(p, Phase::Play { .. } | Phase::Trick { .. } | Phase::Claim)
    });
    if has_one {
        Ok(())
    } else {
        Err(StructuralError::NoPlayPhase)
    }
}

fn deal_within_deck(genome: &Genome) -> Result<(), StructuralError> {
    let requested = genome.setup.total_deal_size(genome.player_count);
    if requested <= DECK_SIZE {
        Ok(())
    } else {
        Err(StructuralError::DealExceedsDeck { requested, available: DECK_SIZE })
    }
}

fn score_wins_are_backed(genome: &Genome) -> Result<(), StructuralError> {
    let has_scoring_support = !genome.card_scoring.is_empty() || genome.has_trick_phase();
    for wc in &genome.win_conditions {
        if wc.is_score_based() && !has_scoring_support {
            return Err(StructuralError::UnbackedScoreWin(wc.kind));
        }
    }
    Ok(())
}

fn best_hand_has_evaluation(genome: &Genome) -> Result<(), StructuralError> {
    let wants_best_hand = genome.win_conditions.iter().any(|wc| wc.kind == WinKind::BestHand);
    let has_betting_showdown = genome.has_betting_phase() && wants_best_hand;
    if (wants_best_hand || has_betting_showdown) && genome.hand_evaluation.is_none() {
        return Err(StructuralError::BestHandWithoutEvaluation);
    }
    Ok(())
}

fn bidding_requires_trick(genome: &Genome) -> Result<(), StructuralError> {
    if genome.has_bidding_phase() && !genome.has_trick_phase() {
        return Err(StructuralError::BiddingWithoutTrick);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::known_games;

    #[test]
    fn known_games_are_structurally_valid() {
        assert!(validate(&known_games::war()).is_ok());
        assert!(validate(&known_games::hearts()).is_ok());
        assert!(validate(&known_games::simple_poker()).is_ok());
        assert!(validate(&known_games::crazy_eights()).is_ok());
    }

    #[test]
    fn oversized_deal_is_rejected() {
        let mut genome = known_games::war();
        genome.setup.starting_hand_size = 200;
        assert_eq!(
            validate(&genome),
            Err(StructuralError::DealExceedsDeck { requested: 200 * genome.player_count as u32, available: 52 })
        );
    }

    #[test]
    fn bidding_without_trick_is_rejected() {
        use crate::genome::BiddingConfig;
        let mut genome = known_games::simple_poker();
        genome.turn_structure.phases.push(Phase::Bidding(BiddingConfig {
            min_bid: 0,
            max_bid: 7,
            allow_nil: false,
            contract_scoring: None,
        }));
        assert_eq!(validate(&genome), Err(StructuralError::BiddingWithoutTrick));
    }
}
