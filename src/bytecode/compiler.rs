//! Deterministic genome -> bytecode compiler.
//!
//! The compiler never emits the legacy v1 format; v1 support lives only in
//! the parser, for bytecode produced by older tooling. Two calls on equal
//! genomes always produce byte-identical output: every collection we walk
//! is already a `Vec` in a canonical (declaration) order, so there is no
//! hidden map/set traversal to sort.

use byteorder::{BigEndian, WriteBytesExt};
use std::io::Write;

use super::error::CompilationError;
use super::header::*;
use super::opcode::*;
use crate::genome::*;

type Result<T> = std::result::Result<T, CompilationError>;

pub fn compile(genome: &Genome) -> Result<Vec<u8>> {
    if !(2..=4).contains(&genome.player_count) {
        return Err(CompilationError::InvalidPlayerCount(genome.player_count));
    }
    let total_deal = genome.setup.total_deal_size(genome.player_count);
    if total_deal > crate::cards::Deck::STANDARD_SIZE as u32 {
        return Err(CompilationError::DeckSizeViolation {
            requested: total_deal,
            available: crate::cards::Deck::STANDARD_SIZE as u32,
        });
    }

    let setup = compile_setup(&genome.setup, genome.team.as_ref())?;
    let turn = compile_turn_structure(&genome.turn_structure)?;
    let win = compile_win_conditions(&genome.win_conditions)?;
    let scoring = compile_special_effects(&genome.special_effects)?;
    let card_scoring = if genome.card_scoring.is_empty() {
        None
    } else {
        Some(compile_card_scoring(&genome.card_scoring)?)
    };
    let hand_eval = genome
        .hand_evaluation
        .as_ref()
        .filter(|h| h.is_present())
        .map(|h| compile_hand_eval(h))
        .transpose()?;

    let setup_offset = HEADER_LEN_V2 as u32;
    let turn_offset = setup_offset + setup.len() as u32;
    let win_offset = turn_offset + turn.len() as u32;
    let scoring_offset = win_offset + win.len() as u32;
    let mut cursor = scoring_offset + scoring.len() as u32;

    let card_scoring_offset = if let Some(ref section) = card_scoring {
        let offset = cursor;
        cursor += section.len() as u32;
        offset
    } else {
        0
    };
    let hand_eval_offset = if let Some(ref section) = hand_eval {
        let offset = cursor;
        cursor += section.len() as u32;
        offset
    } else {
        0
    };
    let _ = cursor;

    let mut payload = Vec::new();
    payload.extend_from_slice(&setup);
    payload.extend_from_slice(&turn);
    payload.extend_from_slice(&win);
    payload.extend_from_slice(&scoring);
    if let Some(section) = &card_scoring {
        payload.extend_from_slice(section);
    }
    if let Some(section) = &hand_eval {
        payload.extend_from_slice(section);
    }
    let genome_id_hash = fnv1a64(&payload);

    let mut out = Vec::with_capacity(HEADER_LEN_V2 + payload.len());
    out.write_u8(BYTECODE_VERSION).unwrap();
    out.write_u32::<BigEndian>(CONTENT_VERSION).unwrap();
    out.write_u64::<BigEndian>(genome_id_hash).unwrap();
    out.write_u32::<BigEndian>(genome.player_count as u32).unwrap();
    out.write_u32::<BigEndian>(genome.max_turns).unwrap();
    out.write_u32::<BigEndian>(setup_offset).unwrap();
    out.write_u32::<BigEndian>(turn_offset).unwrap();
    out.write_u32::<BigEndian>(win_offset).unwrap();
    out.write_u32::<BigEndian>(scoring_offset).unwrap();
    out.write_u8(genome.setup.tableau_mode as u8).unwrap();
    out.write_u8(genome.setup.sequence_direction as u8).unwrap();
    out.write_u32::<BigEndian>(card_scoring_offset).unwrap();
    out.write_u32::<BigEndian>(hand_eval_offset).unwrap();
    debug_assert_eq!(out.len(), HEADER_LEN_V2);
    out.extend_from_slice(&payload);
    Ok(out)
}

/// Encodes `Setup` followed by an optional team partition. The wire table
/// in has no dedicated team-config section, so it rides along at the
/// tail of the setup section, which has no outer length prefix to disturb.
fn compile_setup(setup: &Setup, team: Option<&TeamConfig>) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    buf.write_u8(setup.starting_hand_size).unwrap();
    buf.write_u8(setup.deal_count).unwrap();
    buf.write_u8(setup.initial_discard_count).unwrap();
    if setup.wildcards.len() > 255 {
        return Err(CompilationError::FieldOverflow {
            field: "wildcards",
            value: setup.wildcards.len() as i64,
            width: 1,
        });
    }
    buf.write_u8(setup.wildcards.len() as u8).unwrap();
    for rank in &setup.wildcards {
        buf.write_u8(*rank as u8).unwrap();
    }
    buf.write_u8(setup.visibility.to_bits()).unwrap();
    buf.write_u32::<BigEndian>(setup.starting_chips).unwrap();
    match team {
        None => {
            buf.write_u8(0).unwrap();
        }
        Some(team) => {
            if team.player_count() > 255 {
                return Err(CompilationError::FieldOverflow {
                    field: "team_player_count",
                    value: team.player_count() as i64,
                    width: 1,
                });
            }
            buf.write_u8(1).unwrap();
            buf.write_u8(team.team_count()).unwrap();
            buf.write_u8(team.entries().len() as u8).unwrap();
            for entry in team.entries() {
                buf.write_i8(*entry).unwrap();
            }
        }
    }
    Ok(buf)
}

fn compile_condition(cond: &Condition, buf: &mut Vec<u8>) -> Result<()> {
    match cond {
        Condition::Leaf {
            predicate,
            operator,
            value,
            reference,
        } => {
            buf.write_u8(*predicate as u8).unwrap();
            buf.write_u8(*operator as u8).unwrap();
            buf.write_i32::<BigEndian>(*value).unwrap();
            buf.write_u8(*reference).unwrap();
        }
        Condition::And(children) | Condition::Or(children) => {
            let opcode = if matches!(cond, Condition::And(_)) {
                Predicate::AND
            } else {
                Predicate::OR
            };
            if children.len() > u32::MAX as usize {
                return Err(CompilationError::FieldOverflow {
                    field: "compound_condition_children",
                    value: children.len() as i64,
                    width: 4,
                });
            }
            buf.write_u8(opcode).unwrap();
            buf.write_u8(0).unwrap();
            buf.write_i32::<BigEndian>(children.len() as i32).unwrap();
            buf.write_u8(0).unwrap();
            for child in children {
                compile_condition(child, buf)?;
            }
        }
    }
    Ok(())
}

fn compile_turn_structure(turns: &TurnStructure) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    if turns.phases.len() > 255 {
        return Err(CompilationError::FieldOverflow {
            field: "phases",
            value: turns.phases.len() as i64,
            width: 1,
        });
    }
    buf.write_u8(turns.phases.len() as u8).unwrap();
    for phase in &turns.phases {
        buf.write_u8(phase.tag()).unwrap();
        match phase {
            Phase::Draw {
                source,
                count,
                mandatory,
                condition,
            } => {
                buf.write_u8(*source as u8).unwrap();
                buf.write_u32::<BigEndian>(*count).unwrap();
                buf.write_u8(*mandatory as u8).unwrap();
                buf.write_u8(condition.is_some() as u8).unwrap();
                if let Some(cond) = condition {
                    compile_condition(cond, &mut buf)?;
                }
            }
            Phase::Play {
                target,
                min,
                max,
                mandatory,
                pass_if_unable,
                condition,
            } => {
                buf.write_u8(*target as u8).unwrap();
                buf.write_u8(*min).unwrap();
                buf.write_u8(*max).unwrap();
                buf.write_u8(*mandatory as u8).unwrap();
                buf.write_u8(*pass_if_unable as u8).unwrap();
                let mut encoded = Vec::new();
                if let Some(cond) = condition {
                    compile_condition(cond, &mut encoded)?;
                }
                buf.write_u32::<BigEndian>(encoded.len() as u32).unwrap();
                buf.write_all(&encoded).unwrap();
            }
            Phase::Discard {
                target,
                count,
                mandatory,
            } => {
                buf.write_u8(*target as u8).unwrap();
                buf.write_u32::<BigEndian>(*count).unwrap();
                buf.write_u8(*mandatory as u8).unwrap();
            }
            Phase::Trick {
                lead_suit_required,
                trump,
                high_card_wins,
                breaking_suit,
            } => {
                buf.write_u8(*lead_suit_required as u8).unwrap();
                buf.write_u8(encode_optional_suit(*trump)).unwrap();
                buf.write_u8(*high_card_wins as u8).unwrap();
                buf.write_u8(encode_optional_suit(*breaking_suit)).unwrap();
            }
            Phase::Betting { min_bet, max_raises } => {
                buf.write_u32::<BigEndian>(*min_bet).unwrap();
                buf.write_u32::<BigEndian>(*max_raises).unwrap();
            }
            Phase::Claim => {
                buf.write_all(&[0u8; 10]).unwrap();
            }
            Phase::Bidding(config) => {
                buf.write_u8(config.min_bid).unwrap();
                buf.write_u8(config.max_bid).unwrap();
                buf.write_u8(config.allow_nil as u8).unwrap();
                buf.write_u8(config.contract_scoring.is_some() as u8).unwrap();
                if let Some(contract) = config.contract_scoring {
                    buf.write_i16::<BigEndian>(contract.points_per_trick_bid).unwrap();
                    buf.write_i16::<BigEndian>(contract.overtrick_points).unwrap();
                    buf.write_i16::<BigEndian>(contract.nil_bonus).unwrap();
                    buf.write_i16::<BigEndian>(contract.nil_penalty).unwrap();
                    buf.write_u8(contract.bag_limit).unwrap();
                    buf.write_i16::<BigEndian>(contract.bag_penalty).unwrap();
                }
            }
        }
    }
    Ok(buf)
}

fn compile_win_conditions(conditions: &[WinCondition]) -> Result<Vec<u8>> {
    if conditions.len() > 255 {
        return Err(CompilationError::FieldOverflow {
            field: "win_conditions",
            value: conditions.len() as i64,
            width: 1,
        });
    }
    let mut buf = Vec::new();
    buf.write_u8(conditions.len() as u8).unwrap();
    for wc in conditions {
        buf.write_u8(wc.kind as u8).unwrap();
        buf.write_i32::<BigEndian>(wc.threshold).unwrap();
    }
    Ok(buf)
}

fn compile_special_effects(effects: &[SpecialEffect]) -> Result<Vec<u8>> {
    if effects.len() > 255 {
        return Err(CompilationError::FieldOverflow {
            field: "special_effects",
            value: effects.len() as i64,
            width: 1,
        });
    }
    let mut buf = Vec::new();
    buf.write_u8(OP_EFFECT_HEADER).unwrap();
    buf.write_u8(effects.len() as u8).unwrap();
    let mut sorted = effects.to_vec();
    sorted.sort_by_key(|e| e.rank as u8);
    for effect in &sorted {
        buf.write_u8(effect.rank as u8).unwrap();
        buf.write_u8(effect.effect as u8).unwrap();
        buf.write_u8(effect.target.to_byte()).unwrap();
        buf.write_u8(effect.value).unwrap();
    }
    Ok(buf)
}

fn compile_card_scoring(rules: &[CardScoringRule]) -> Result<Vec<u8>> {
    if rules.len() > u16::MAX as usize {
        return Err(CompilationError::FieldOverflow {
            field: "card_scoring",
            value: rules.len() as i64,
            width: 2,
        });
    }
    let mut buf = Vec::new();
    buf.write_u16::<BigEndian>(rules.len() as u16).unwrap();
    for rule in rules {
        buf.write_u8(encode_optional_suit(rule.suit)).unwrap();
        buf.write_u8(encode_optional_rank(rule.rank)).unwrap();
        buf.write_i16::<BigEndian>(rule.points).unwrap();
        buf.write_u8(rule.trigger as u8).unwrap();
    }
    Ok(buf)
}

fn compile_hand_eval(eval: &HandEvaluation) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    buf.write_u8(eval.method as u8).unwrap();
    buf.write_u8(eval.target_value).unwrap();
    buf.write_u8(eval.bust_threshold).unwrap();
    if eval.values.len() > 255 {
        return Err(CompilationError::FieldOverflow {
            field: "hand_eval_values",
            value: eval.values.len() as i64,
            width: 1,
        });
    }
    buf.write_u8(eval.values.len() as u8).unwrap();
    for rv in &eval.values {
        buf.write_u8(rv.rank as u8).unwrap();
        buf.write_u8(rv.value).unwrap();
        buf.write_u8(rv.alt_value).unwrap();
    }
    if eval.patterns.len() > 255 {
        return Err(CompilationError::FieldOverflow {
            field: "hand_eval_patterns",
            value: eval.patterns.len() as i64,
            width: 1,
        });
    }
    buf.write_u8(eval.patterns.len() as u8).unwrap();
    for pattern in &eval.patterns {
        buf.write_u8(pattern.priority).unwrap();
        buf.write_u8(pattern.required_count).unwrap();
        buf.write_u8(pattern.same_suit_count).unwrap();
        buf.write_u8(pattern.seq_len).unwrap();
        buf.write_u8(pattern.seq_wrap as u8).unwrap();
        buf.write_u8(pattern.groups.len() as u8).unwrap();
        buf.write_all(&pattern.groups).unwrap();
        buf.write_u8(pattern.ranks.len() as u8).unwrap();
        buf.write_all(&pattern.ranks).unwrap();
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::known_games;

    #[test]
    fn compilation_is_deterministic() {
        let genome = known_games::war();
        let a = compile(&genome).unwrap();
        let b = compile(&genome).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn header_starts_with_version_byte() {
        let genome = known_games::war();
        let bytes = compile(&genome).unwrap();
        assert_eq!(bytes[0], BYTECODE_VERSION);
    }

    #[test]
    fn rejects_oversized_deal() {
        let mut genome = known_games::war();
        genome.setup.starting_hand_size = 200;
        assert!(compile(&genome).is_err());
    }
}
