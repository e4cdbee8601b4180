//! Bytecode parser: turns a byte buffer into the structure the VM executes
//! against. Every offset is bounds-checked and every length prefix is
//! validated against the remaining buffer; unknown phase tags are
//! fatal, on purpose, so evolution never silently runs malformed bytecode.

use byteorder::{BigEndian, ReadBytesExt};
use std::io::Cursor;

use super::error::ParseError;
use super::header::*;
use super::opcode::*;
use crate::cards::{Location, Rank};
use crate::genome::*;

type Result<T> = std::result::Result<T, ParseError>;

#[derive(Debug, Clone)]
pub struct ParsedGenome {
    pub content_version: u32,
    pub genome_id_hash: u64,
    pub player_count: u8,
    pub max_turns: u32,
    pub setup: Setup,
    pub turn_structure: TurnStructure,
    pub win_conditions: Vec<WinCondition>,
    pub effects: EffectTable,
    pub card_scoring: Vec<CardScoringRule>,
    pub hand_evaluation: Option<HandEvaluation>,
    pub team: Option<TeamConfig>,
}

impl ParsedGenome {
    pub fn has_betting_phase(&self) -> bool {
        self.turn_structure.has_phase_tag(Phase::TAG_BETTING)
    }
    pub fn has_trick_phase(&self) -> bool {
        self.turn_structure.has_phase_tag(Phase::TAG_TRICK)
    }
    pub fn has_bidding_phase(&self) -> bool {
        self.turn_structure.has_phase_tag(Phase::TAG_BIDDING)
    }
    pub fn bidding(&self) -> Option<BiddingConfig> {
        self.turn_structure.phases.iter().find_map(|p| match p {
            Phase::Bidding(cfg) => Some(*cfg),
            _ => None,
        })
    }
}

fn need(buf: &[u8], offset: usize, len: usize, field: &'static str) -> Result<()> {
    if offset + len > buf.len() {
        return Err(ParseError::OffsetOutOfBounds {
            field,
            offset: offset as u32,
            length: buf.len(),
        });
    }
    Ok(())
}

pub fn parse(bytes: &[u8]) -> Result<ParsedGenome> {
    if bytes.is_empty() {
        return Err(ParseError::BufferTooShort {
            needed: 1,
            available: 0,
        });
    }
    if bytes[0] == BYTECODE_VERSION {
        parse_v2(bytes)
    } else {
        parse_v1(bytes)
    }
}

fn parse_v2(bytes: &[u8]) -> Result<ParsedGenome> {
    if bytes.len() < HEADER_LEN_V2 {
        return Err(ParseError::BufferTooShort {
            needed: HEADER_LEN_V2,
            available: bytes.len(),
        });
    }
    let mut cursor = Cursor::new(&bytes[1..HEADER_LEN_V2]);
    let content_version = cursor.read_u32::<BigEndian>().unwrap();
    let genome_id_hash = cursor.read_u64::<BigEndian>().unwrap();
    let player_count = cursor.read_u32::<BigEndian>().unwrap();
    let max_turns = cursor.read_u32::<BigEndian>().unwrap();
    let setup_offset = cursor.read_u32::<BigEndian>().unwrap();
    let turn_offset = cursor.read_u32::<BigEndian>().unwrap();
    let win_offset = cursor.read_u32::<BigEndian>().unwrap();
    let scoring_offset = cursor.read_u32::<BigEndian>().unwrap();
    let tableau_mode = cursor.read_u8().unwrap();
    let sequence_direction = cursor.read_u8().unwrap();
    let card_scoring_offset = cursor.read_u32::<BigEndian>().unwrap();
    let hand_eval_offset = cursor.read_u32::<BigEndian>().unwrap();

    let (mut setup, team) = parse_setup(bytes, setup_offset as usize)?;
    setup.tableau_mode = TableauMode::from(tableau_mode);
    setup.sequence_direction = SequenceDirection::from(sequence_direction);
    let turn_structure = parse_turn_structure(bytes, turn_offset as usize)?;
    let win_conditions = parse_win_conditions(bytes, win_offset as usize)?;
    let effects = parse_special_effects(bytes, scoring_offset as usize)?;
    let card_scoring = if card_scoring_offset == 0 {
        Vec::new()
    } else {
        parse_card_scoring(bytes, card_scoring_offset as usize)?
    };
    let hand_evaluation = if hand_eval_offset == 0 {
        None
    } else {
        parse_hand_eval(bytes, hand_eval_offset as usize)?
    };

    Ok(ParsedGenome {
        content_version,
        genome_id_hash,
        player_count: player_count as u8,
        max_turns,
        setup,
        turn_structure,
        win_conditions,
        effects,
        card_scoring,
        hand_evaluation,
        team,
    })
}

fn parse_v1(bytes: &[u8]) -> Result<ParsedGenome> {
    if bytes.len() < HEADER_LEN_V1 {
        return Err(ParseError::BufferTooShort {
            needed: HEADER_LEN_V1,
            available: bytes.len(),
        });
    }
    let mut cursor = Cursor::new(&bytes[0..HEADER_LEN_V1]);
    let content_version = cursor.read_u32::<BigEndian>().unwrap();
    let genome_id_hash = cursor.read_u64::<BigEndian>().unwrap();
    let player_count = cursor.read_u32::<BigEndian>().unwrap();
    let max_turns = cursor.read_u32::<BigEndian>().unwrap();
    let setup_offset = cursor.read_u32::<BigEndian>().unwrap();
    let turn_offset = cursor.read_u32::<BigEndian>().unwrap();
    let win_offset = cursor.read_u32::<BigEndian>().unwrap();
    let scoring_offset = cursor.read_u32::<BigEndian>().unwrap();

    let (mut setup, team) = parse_setup(bytes, setup_offset as usize)?;
    setup.tableau_mode = TableauMode::None;
    setup.sequence_direction = SequenceDirection::Ascending;
    let turn_structure = parse_turn_structure(bytes, turn_offset as usize)?;
    let win_conditions = parse_win_conditions(bytes, win_offset as usize)?;
    let effects = parse_special_effects(bytes, scoring_offset as usize)?;

    Ok(ParsedGenome {
        content_version,
        genome_id_hash,
        player_count: player_count as u8,
        max_turns,
        setup,
        turn_structure,
        win_conditions,
        effects,
        card_scoring: Vec::new(),
        hand_evaluation: None,
        team,
    })
}

fn parse_setup(bytes: &[u8], offset: usize) -> Result<(Setup, Option<TeamConfig>)> {
    need(bytes, offset, 6, "setup")?;
    let mut pos = offset;
    let starting_hand_size = bytes[pos];
    let deal_count = bytes[pos + 1];
    let initial_discard_count = bytes[pos + 2];
    let wildcard_count = bytes[pos + 3] as usize;
    pos += 4;
    need(bytes, pos, wildcard_count, "setup.wildcards")?;
    let wildcards = bytes[pos..pos + wildcard_count]
        .iter()
        .map(|&b| Rank::from(b))
        .collect();
    pos += wildcard_count;
    need(bytes, pos, 5, "setup.visibility_and_chips")?;
    let visibility = PileVisibility::from_bits(bytes[pos]);
    let starting_chips = u32::from_be_bytes(bytes[pos + 1..pos + 5].try_into().unwrap());
    pos += 5;

    need(bytes, pos, 1, "setup.team_flag")?;
    let has_team = bytes[pos] != 0;
    pos += 1;
    let team = if has_team {
        need(bytes, pos, 2, "setup.team_header")?;
        let team_count = bytes[pos];
        let player_count = bytes[pos + 1] as usize;
        pos += 2;
        need(bytes, pos, player_count, "setup.team_entries")?;
        let entries = bytes[pos..pos + player_count]
            .iter()
            .map(|&b| b as i8)
            .collect::<Vec<_>>();
        let _ = team_count;
        Some(TeamConfig::new(entries))
    } else {
        None
    };

    Ok((
        Setup {
            starting_hand_size,
            deal_count,
            initial_discard_count,
            wildcards,
            visibility,
            starting_chips,
            tableau_mode: TableauMode::None,
            sequence_direction: SequenceDirection::Ascending,
        },
        team,
    ))
}

fn parse_condition(bytes: &[u8], pos: &mut usize) -> Result<Condition> {
    need(bytes, *pos, CONDITION_RECORD_LEN, "condition")?;
    let opcode = bytes[*pos];
    let operator = bytes[*pos + 1];
    let value = i32::from_be_bytes(bytes[*pos + 2..*pos + 6].try_into().unwrap());
    let reference = bytes[*pos + 6];
    *pos += CONDITION_RECORD_LEN;
    if opcode == Predicate::AND || opcode == Predicate::OR {
        let count = value.max(0) as usize;
        let mut children = Vec::with_capacity(count);
        for _ in 0..count {
            children.push(parse_condition(bytes, pos)?);
        }
        Ok(if opcode == Predicate::AND {
            Condition::And(children)
        } else {
            Condition::Or(children)
        })
    } else {
        let predicate = Predicate::from_opcode(opcode).ok_or(ParseError::UnknownOpcode(opcode))?;
        Ok(Condition::Leaf {
            predicate,
            operator: ComparisonOperator::from(operator),
            value,
            reference,
        })
    }
}

fn parse_turn_structure(bytes: &[u8], offset: usize) -> Result<TurnStructure> {
    need(bytes, offset, 1, "turn_structure.count")?;
    let count = bytes[offset] as usize;
    let mut pos = offset + 1;
    let mut phases = Vec::with_capacity(count);
    for _ in 0..count {
        need(bytes, pos, 1, "phase.tag")?;
        let tag = bytes[pos];
        pos += 1;
        let phase = match tag {
            Phase::TAG_DRAW => {
                need(bytes, pos, 7, "draw_phase")?;
                let source = Location::from(bytes[pos]);
                let count = u32::from_be_bytes(bytes[pos + 1..pos + 5].try_into().unwrap());
                let mandatory = bytes[pos + 5] != 0;
                let has_condition = bytes[pos + 6] != 0;
                pos += 7;
                let condition = if has_condition {
                    Some(parse_condition(bytes, &mut pos)?)
                } else {
                    None
                };
                Phase::Draw {
                    source,
                    count,
                    mandatory,
                    condition,
                }
            }
            Phase::TAG_PLAY => {
                need(bytes, pos, 9, "play_phase")?;
                let target = Location::from(bytes[pos]);
                let min = bytes[pos + 1];
                let max = bytes[pos + 2];
                let mandatory = bytes[pos + 3] != 0;
                let pass_if_unable = bytes[pos + 4] != 0;
                let cond_len = u32::from_be_bytes(bytes[pos + 5..pos + 9].try_into().unwrap()) as usize;
                pos += 9;
                if pos + cond_len > bytes.len() {
                    return Err(ParseError::LengthPrefixExceedsBuffer {
                        field: "play_phase.condition",
                        length: cond_len,
                        remaining: bytes.len().saturating_sub(pos),
                    });
                }
                let condition = if cond_len > 0 {
                    let mut cond_pos = pos;
                    let cond = parse_condition(bytes, &mut cond_pos)?;
                    Some(cond)
                } else {
                    None
                };
                pos += cond_len;
                Phase::Play {
                    target,
                    min,
                    max,
                    mandatory,
                    pass_if_unable,
                    condition,
                }
            }
            Phase::TAG_DISCARD => {
                need(bytes, pos, 6, "discard_phase")?;
                let target = Location::from(bytes[pos]);
                let count = u32::from_be_bytes(bytes[pos + 1..pos + 5].try_into().unwrap());
                let mandatory = bytes[pos + 5] != 0;
                pos += 6;
                Phase::Discard {
                    target,
                    count,
                    mandatory,
                }
            }
            Phase::TAG_TRICK => {
                need(bytes, pos, 4, "trick_phase")?;
                let lead_suit_required = bytes[pos] != 0;
                let trump = decode_optional_suit(bytes[pos + 1]);
                let high_card_wins = bytes[pos + 2] != 0;
                let breaking_suit = decode_optional_suit(bytes[pos + 3]);
                pos += 4;
                Phase::Trick {
                    lead_suit_required,
                    trump,
                    high_card_wins,
                    breaking_suit,
                }
            }
            Phase::TAG_BETTING => {
                need(bytes, pos, 8, "betting_phase")?;
                let min_bet = u32::from_be_bytes(bytes[pos..pos + 4].try_into().unwrap());
                let max_raises = u32::from_be_bytes(bytes[pos + 4..pos + 8].try_into().unwrap());
                pos += 8;
                Phase::Betting { min_bet, max_raises }
            }
            Phase::TAG_CLAIM => {
                need(bytes, pos, 10, "claim_phase")?;
                pos += 10;
                Phase::Claim
            }
            Phase::TAG_BIDDING => {
                need(bytes, pos, 4, "bidding_phase")?;
                let min_bid = bytes[pos];
                let max_bid = bytes[pos + 1];
                let allow_nil = bytes[pos + 2] != 0;
                let has_contract = bytes[pos + 3] != 0;
                pos += 4;
                let contract_scoring = if has_contract {
                    need(bytes, pos, 11, "contract_scoring")?;
                    let points_per_trick_bid = i16::from_be_bytes(bytes[pos..pos + 2].try_into().unwrap());
                    let overtrick_points = i16::from_be_bytes(bytes[pos + 2..pos + 4].try_into().unwrap());
                    let nil_bonus = i16::from_be_bytes(bytes[pos + 4..pos + 6].try_into().unwrap());
                    let nil_penalty = i16::from_be_bytes(bytes[pos + 6..pos + 8].try_into().unwrap());
                    let bag_limit = bytes[pos + 8];
                    let bag_penalty = i16::from_be_bytes(bytes[pos + 9..pos + 11].try_into().unwrap());
                    pos += 11;
                    Some(ContractScoring {
                        points_per_trick_bid,
                        overtrick_points,
                        nil_bonus,
                        nil_penalty,
                        bag_limit,
                        bag_penalty,
                    })
                } else {
                    None
                };
                Phase::Bidding(BiddingConfig {
                    min_bid,
                    max_bid,
                    allow_nil,
                    contract_scoring,
                })
            }
            other => return Err(ParseError::UnknownPhaseTag(other)),
        };
        phases.push(phase);
    }
    let is_trick_based = phases.iter().any(|p| p.tag() == Phase::TAG_TRICK);
    Ok(TurnStructure {
        phases,
        is_trick_based,
    })
}

fn parse_win_conditions(bytes: &[u8], offset: usize) -> Result<Vec<WinCondition>> {
    need(bytes, offset, 1, "win_conditions.count")?;
    let count = bytes[offset] as usize;
    let mut pos = offset + 1;
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        need(bytes, pos, 5, "win_condition")?;
        let kind = WinKind::from(bytes[pos]);
        let threshold = i32::from_be_bytes(bytes[pos + 1..pos + 5].try_into().unwrap());
        pos += 5;
        out.push(WinCondition { kind, threshold });
    }
    Ok(out)
}

fn parse_special_effects(bytes: &[u8], offset: usize) -> Result<EffectTable> {
    need(bytes, offset, 2, "special_effects.header")?;
    // sentinel byte at bytes[offset] is OP_EFFECT_HEADER, checked defensively.
    debug_assert_eq!(bytes[offset], OP_EFFECT_HEADER);
    let count = bytes[offset + 1] as usize;
    let mut pos = offset + 2;
    let mut effects = Vec::with_capacity(count);
    for _ in 0..count {
        need(bytes, pos, EFFECT_RECORD_LEN, "special_effect")?;
        let rank = Rank::from(bytes[pos]);
        let effect = EffectKind::from(bytes[pos + 1]);
        let target = EffectTarget::from_byte(bytes[pos + 2]);
        let value = bytes[pos + 3];
        pos += EFFECT_RECORD_LEN;
        effects.push(SpecialEffect {
            rank,
            effect,
            target,
            value,
        });
    }
    Ok(EffectTable::new(effects))
}

fn parse_card_scoring(bytes: &[u8], offset: usize) -> Result<Vec<CardScoringRule>> {
    need(bytes, offset, 2, "card_scoring.count")?;
    let count = u16::from_be_bytes(bytes[offset..offset + 2].try_into().unwrap()) as usize;
    let mut pos = offset + 2;
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        need(bytes, pos, CARD_SCORING_RECORD_LEN, "card_scoring_rule")?;
        let suit = decode_optional_suit(bytes[pos]);
        let rank = decode_optional_rank(bytes[pos + 1]);
        let points = i16::from_be_bytes(bytes[pos + 2..pos + 4].try_into().unwrap());
        let trigger = ScoringTrigger::from(bytes[pos + 4]);
        pos += CARD_SCORING_RECORD_LEN;
        out.push(CardScoringRule {
            suit,
            rank,
            points,
            trigger,
        });
    }
    Ok(out)
}

fn parse_hand_eval(bytes: &[u8], offset: usize) -> Result<Option<HandEvaluation>> {
    need(bytes, offset, 1, "hand_eval.method")?;
    let method = HandEvalMethod::from(bytes[offset]);
    if method == HandEvalMethod::None {
        return Ok(None);
    }
    need(bytes, offset, 4, "hand_eval.header")?;
    let target_value = bytes[offset + 1];
    let bust_threshold = bytes[offset + 2];
    let value_count = bytes[offset + 3] as usize;
    let mut pos = offset + 4;
    need(bytes, pos, value_count * 3, "hand_eval.values")?;
    let mut values = Vec::with_capacity(value_count);
    for _ in 0..value_count {
        values.push(RankValue {
            rank: Rank::from(bytes[pos]),
            value: bytes[pos + 1],
            alt_value: bytes[pos + 2],
        });
        pos += 3;
    }
    need(bytes, pos, 1, "hand_eval.pattern_count")?;
    let pattern_count = bytes[pos] as usize;
    pos += 1;
    let mut patterns = Vec::with_capacity(pattern_count);
    for _ in 0..pattern_count {
        need(bytes, pos, 6, "hand_eval.pattern_header")?;
        let priority = bytes[pos];
        let required_count = bytes[pos + 1];
        let same_suit_count = bytes[pos + 2];
        let seq_len = bytes[pos + 3];
        let seq_wrap = bytes[pos + 4] != 0;
        let group_count = bytes[pos + 5] as usize;
        pos += 6;
        need(bytes, pos, group_count, "hand_eval.pattern_groups")?;
        let groups = bytes[pos..pos + group_count].to_vec();
        pos += group_count;
        need(bytes, pos, 1, "hand_eval.rank_count")?;
        let rank_count = bytes[pos] as usize;
        pos += 1;
        need(bytes, pos, rank_count, "hand_eval.pattern_ranks")?;
        let ranks = bytes[pos..pos + rank_count].to_vec();
        pos += rank_count;
        patterns.push(Pattern {
            priority,
            required_count,
            same_suit_count,
            seq_len,
            seq_wrap,
            groups,
            ranks,
        });
    }
    Ok(Some(HandEvaluation {
        method,
        target_value,
        bust_threshold,
        values,
        patterns,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::compiler::compile;
    use crate::known_games;

    #[test]
    fn round_trips_war() {
        let genome = known_games::war();
        let bytes = compile(&genome).unwrap();
        let parsed = parse(&bytes).unwrap();
        assert_eq!(parsed.player_count, genome.player_count);
        assert_eq!(parsed.max_turns, genome.max_turns);
        assert_eq!(parsed.win_conditions.len(), genome.win_conditions.len());
    }

    #[test]
    fn round_trips_hearts_with_conditions_and_scoring() {
        let genome = known_games::hearts();
        let bytes = compile(&genome).unwrap();
        let parsed = parse(&bytes).unwrap();
        assert_eq!(parsed.card_scoring.len(), genome.card_scoring.len());
        assert!(parsed.has_trick_phase());
    }

    #[test]
    fn unknown_phase_tag_is_fatal() {
        let genome = known_games::war();
        let mut bytes = compile(&genome).unwrap();
        let turn_offset = u32::from_be_bytes(bytes[25..29].try_into().unwrap()) as usize;
        bytes[turn_offset + 1] = 99;
        assert!(matches!(parse(&bytes), Err(ParseError::UnknownPhaseTag(99))));
    }
}
