//! Mutation catalogue. Every mutation either produces a
//! structurally valid, semantically coherent genome or is rejected and the
//! caller retries with a different operator.

use rand::rngs::SmallRng;
use rand::Rng;

use crate::cards::{Location, Rank};
use crate::genome::{
    CardScoringRule, Condition, EffectKind, EffectTarget, Genome, Phase, ScoringTrigger,
    SpecialEffect, WinCondition, WinKind,
};
use crate::validation;

const MAX_RETRIES: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    ParameterTweak,
    PhaseSwap,
    PhaseAdd,
    PhaseRemove,
    ConditionModify,
    WinConditionModify,
    StartingChipsModify,
    BettingPhaseAddRemoveTweak,
    TeamEnableDisableReassign,
    SpecialEffectAdd,
}

const CATALOGUE: &[MutationKind] = &[
    MutationKind::ParameterTweak,
    MutationKind::PhaseSwap,
    MutationKind::PhaseAdd,
    MutationKind::PhaseRemove,
    MutationKind::ConditionModify,
    MutationKind::WinConditionModify,
    MutationKind::StartingChipsModify,
    MutationKind::BettingPhaseAddRemoveTweak,
    MutationKind::TeamEnableDisableReassign,
    MutationKind::SpecialEffectAdd,
];

/// Applies a randomly chosen mutation, retrying with a fresh operator up to
/// `MAX_RETRIES` times if the result fails validation. Falls back to an
/// unmodified clone if every attempt is rejected.
pub fn mutate(genome: &Genome, rng: &mut SmallRng) -> Genome {
    for _ in 0..MAX_RETRIES {
        let kind = CATALOGUE[rng.gen_range(0..CATALOGUE.len())];
        let candidate = apply(genome, kind, rng);
        if validation::validate(&candidate).is_ok() {
            return candidate;
        }
    }
    genome.clone()
}

fn apply(genome: &Genome, kind: MutationKind, rng: &mut SmallRng) -> Genome {
    let mut out = genome.clone();
    match kind {
        MutationKind::ParameterTweak => parameter_tweak(&mut out, rng),
        MutationKind::PhaseSwap => phase_swap(&mut out, rng),
        MutationKind::PhaseAdd => phase_add(&mut out, rng),
        MutationKind::PhaseRemove => phase_remove(&mut out, rng),
        MutationKind::ConditionModify => condition_modify(&mut out, rng),
        MutationKind::WinConditionModify => win_condition_modify(&mut out, rng),
        MutationKind::StartingChipsModify => starting_chips_modify(&mut out, rng),
        MutationKind::BettingPhaseAddRemoveTweak => betting_phase_tweak(&mut out, rng),
        MutationKind::TeamEnableDisableReassign => team_tweak(&mut out, rng),
        MutationKind::SpecialEffectAdd => special_effect_add(&mut out, rng),
    }
    out
}

fn parameter_tweak(genome: &mut Genome, rng: &mut SmallRng) {
    match rng.gen_range(0..3) {
        0 => genome.max_turns = (genome.max_turns as i64 + rng.gen_range(-20..=20)).clamp(10, 2000) as u32,
        1 => genome.setup.starting_hand_size = (genome.setup.starting_hand_size as i32 + rng.gen_range(-2..=2)).clamp(1, 26) as u8,
        _ => genome.min_turns = genome.min_turns.saturating_add(rng.gen_range(0..=3)).min(genome.max_turns.saturating_sub(1)),
    }
}

fn phase_swap(genome: &mut Genome, rng: &mut SmallRng) {
    let len = genome.turn_structure.phases.len();
    if len < 2 {
        return;
    }
    let a = rng.gen_range(0..len);
    let b = rng.gen_range(0..len);
    genome.turn_structure.phases.swap(a, b);
}

fn random_phase(rng: &mut SmallRng) -> Phase {
    match rng.gen_range(0..4) {
        0 => Phase::Draw { source: Location::Deck, count: 1, mandatory: true, condition: None },
        1 => Phase::Play { target: Location::Discard, min: 1, max: 1, mandatory: false, pass_if_unable: true, condition: None },
        2 => Phase::Discard { target: Location::Discard, count: 1, mandatory: false },
        _ => Phase::Claim,
    }
}

fn phase_add(genome: &mut Genome, rng: &mut SmallRng) {
    if genome.turn_structure.phases.len() >= 8 {
        return;
    }
    let phase = random_phase(rng);
    let idx = rng.gen_range(0..=genome.turn_structure.phases.len());
    genome.turn_structure.phases.insert(idx, phase);
}

fn phase_remove(genome: &mut Genome, rng: &mut SmallRng) {
    if genome.turn_structure.phases.len() <= 1 {
        return;
    }
    let idx = rng.gen_range(0..genome.turn_structure.phases.len());
    genome.turn_structure.phases.remove(idx);
}

fn condition_modify(genome: &mut Genome, rng: &mut SmallRng) {
    for phase in &mut genome.turn_structure.phases {
        let slot = match phase {
            Phase::Draw { condition, .. } => Some(condition),
            Phase::Play { condition, .. } => Some(condition),
            _ => None,
        };
        if let Some(condition) = slot {
            *condition = if rng.gen_bool(0.5) { Some(Condition::always()) } else { None };
            return;
        }
    }
}

/// Switching a non-score win condition to a score-based one needs scoring
/// infrastructure behind it, so this adds a fallback card-scoring rule when
/// none exists yet.
fn win_condition_modify(genome: &mut Genome, rng: &mut SmallRng) {
    if genome.win_conditions.is_empty() {
        genome.win_conditions.push(WinCondition { kind: WinKind::EmptyHand, threshold: 0 });
        return;
    }
    let idx = rng.gen_range(0..genome.win_conditions.len());
    let new_kind = match rng.gen_range(0..3) {
        0 => WinKind::HighScore,
        1 => WinKind::FirstToScore,
        _ => WinKind::EmptyHand,
    };
    genome.win_conditions[idx] = WinCondition { kind: new_kind, threshold: rng.gen_range(10..100) };
    if genome.win_conditions[idx].is_score_based() && genome.card_scoring.is_empty() && !genome.has_trick_phase() {
        genome.card_scoring.push(CardScoringRule {
            suit: None,
            rank: None,
            points: 1,
            trigger: ScoringTrigger::Play,
        });
    }
}

/// A transition from zero to positive starting chips needs a betting phase
/// behind it, or the coherence checker will reject the genome.
fn starting_chips_modify(genome: &mut Genome, rng: &mut SmallRng) {
    let was_zero = genome.setup.starting_chips == 0;
    genome.setup.starting_chips = rng.gen_range(0..2000);
    if was_zero && genome.setup.starting_chips > 0 && !genome.has_betting_phase() {
        genome.turn_structure.phases.push(Phase::Betting { min_bet: 10, max_raises: 3 });
    }
}

fn betting_phase_tweak(genome: &mut Genome, rng: &mut SmallRng) {
    let has_betting = genome.has_betting_phase();
    if has_betting && rng.gen_bool(0.3) {
        genome.turn_structure.phases.retain(|p| !matches!(p, Phase::Betting { .. }));
        return;
    }
    let mut found = false;
    for phase in &mut genome.turn_structure.phases {
        if let Phase::Betting { min_bet, max_raises } = phase {
            *min_bet = (*min_bet as i64 + rng.gen_range(-5..=5)).max(1) as u32;
            *max_raises = (*max_raises as i64 + rng.gen_range(-1..=1)).max(0) as u32;
            found = true;
        }
    }
    if !found {
        genome.turn_structure.phases.push(Phase::Betting { min_bet: 10, max_raises: 3 });
        if genome.setup.starting_chips == 0 {
            genome.setup.starting_chips = 500;
        }
    }
}

fn team_tweak(genome: &mut Genome, rng: &mut SmallRng) {
    use crate::genome::TeamConfig;
    if genome.team.is_some() && rng.gen_bool(0.3) {
        genome.team = None;
        return;
    }
    let n = genome.player_count as usize;
    if n < 4 || n % 2 != 0 {
        return;
    }
    let assignment: Vec<i8> = (0..n).map(|i| (i % 2) as i8).collect();
    genome.team = Some(TeamConfig::new(assignment));
}

fn special_effect_add(genome: &mut Genome, rng: &mut SmallRng) {
    if genome.special_effects.len() >= 13 {
        return;
    }
    let rank = Rank::from(rng.gen_range(0..13));
    if genome.special_effects.iter().any(|e| e.rank == rank) {
        return;
    }
    let effect = match rng.gen_range(0..5) {
        0 => EffectKind::Skip,
        1 => EffectKind::Reverse,
        2 => EffectKind::DrawCards,
        3 => EffectKind::ExtraTurn,
        _ => EffectKind::ForceDiscard,
    };
    genome.special_effects.push(SpecialEffect {
        rank,
        effect,
        target: EffectTarget::NextPlayer,
        value: rng.gen_range(1..=2),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::known_games;
    use rand::SeedableRng;

    #[test]
    fn mutation_always_yields_a_valid_genome() {
        let mut rng = SmallRng::seed_from_u64(99);
        let genome = known_games::simple_poker();
        for _ in 0..50 {
            let mutated = mutate(&genome, &mut rng);
            assert!(validation::validate(&mutated).is_ok());
        }
    }

    #[test]
    fn mutation_retains_player_count() {
        let mut rng = SmallRng::seed_from_u64(5);
        let genome = known_games::war();
        let mutated = mutate(&genome, &mut rng);
        assert_eq!(mutated.player_count, genome.player_count);
    }
}
