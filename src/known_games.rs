//! Seed genomes for well-known card games. Used to bootstrap evolutionary
//! populations (a configurable fraction of the initial population is one of
//! these, or a lightly mutated variant) and as fixtures across the test
//! suite, since a from-scratch random genome is a poor basis for a
//! determinism or conservation check.

use crate::cards::{Rank, Suit};
use crate::cards::Location;
use crate::genome::*;

pub fn war() -> Genome {
    Genome {
        id: 1,
        parent_ids: Vec::new(),
        generation: 0,
        setup: Setup {
            starting_hand_size: 26,
            deal_count: 0,
            initial_discard_count: 0,
            wildcards: Vec::new(),
            visibility: PileVisibility {
                deck: false,
                hand: false,
                discard: false,
                tableau: true,
            },
            starting_chips: 0,
            tableau_mode: TableauMode::War,
            sequence_direction: SequenceDirection::Ascending,
        },
        turn_structure: TurnStructure {
            phases: vec![Phase::Play {
                target: Location::Tableau,
                min: 1,
                max: 1,
                mandatory: true,
                pass_if_unable: false,
                condition: None,
            }],
            is_trick_based: false,
        },
        win_conditions: vec![WinCondition {
            kind: WinKind::CaptureAll,
            threshold: 0,
        }],
        card_scoring: Vec::new(),
        hand_evaluation: None,
        special_effects: Vec::new(),
        team: None,
        min_turns: 1,
        max_turns: 5000,
        player_count: 2,
    }
}

pub fn hearts() -> Genome {
    let mut card_scoring = vec![CardScoringRule {
        suit: Some(Suit::Heart),
        rank: None,
        points: 1,
        trigger: ScoringTrigger::TrickWin,
    }];
    card_scoring.push(CardScoringRule {
        suit: Some(Suit::Spade),
        rank: Some(Rank::Queen),
        points: 13,
        trigger: ScoringTrigger::TrickWin,
    });

    Genome {
        id: 2,
        parent_ids: Vec::new(),
        generation: 0,
        setup: Setup {
            starting_hand_size: 13,
            deal_count: 0,
            initial_discard_count: 0,
            wildcards: Vec::new(),
            visibility: PileVisibility {
                deck: false,
                hand: false,
                discard: true,
                tableau: true,
            },
            starting_chips: 0,
            tableau_mode: TableauMode::None,
            sequence_direction: SequenceDirection::Ascending,
        },
        turn_structure: TurnStructure {
            phases: vec![Phase::Trick {
                lead_suit_required: true,
                trump: None,
                high_card_wins: true,
                breaking_suit: Some(Suit::Heart),
            }],
            is_trick_based: true,
        },
        win_conditions: vec![WinCondition {
            kind: WinKind::LowScore,
            threshold: 100,
        }],
        card_scoring,
        hand_evaluation: None,
        special_effects: Vec::new(),
        team: None,
        min_turns: 13,
        max_turns: 1000,
        player_count: 4,
    }
}

pub fn simple_poker() -> Genome {
    Genome {
        id: 3,
        parent_ids: Vec::new(),
        generation: 0,
        setup: Setup {
            starting_hand_size: 5,
            deal_count: 0,
            initial_discard_count: 0,
            wildcards: Vec::new(),
            visibility: PileVisibility {
                deck: false,
                hand: false,
                discard: false,
                tableau: false,
            },
            starting_chips: 1000,
            tableau_mode: TableauMode::None,
            sequence_direction: SequenceDirection::Ascending,
        },
        turn_structure: TurnStructure {
            phases: vec![
                Phase::Betting {
                    min_bet: 10,
                    max_raises: 3,
                },
                Phase::Discard {
                    target: Location::Discard,
                    count: 3,
                    mandatory: false,
                },
                Phase::Draw {
                    source: Location::Deck,
                    count: 3,
                    mandatory: false,
                    condition: None,
                },
                Phase::Betting {
                    min_bet: 10,
                    max_raises: 3,
                },
            ],
            is_trick_based: false,
        },
        win_conditions: vec![WinCondition {
            kind: WinKind::BestHand,
            threshold: 0,
        }],
        card_scoring: Vec::new(),
        hand_evaluation: Some(HandEvaluation {
            method: HandEvalMethod::PatternMatch,
            target_value: 0,
            bust_threshold: 0,
            values: Vec::new(),
            patterns: vec![
                Pattern {
                    priority: 1,
                    required_count: 2,
                    same_suit_count: 0,
                    seq_len: 0,
                    seq_wrap: false,
                    groups: vec![2],
                    ranks: Vec::new(),
                },
                Pattern {
                    priority: 2,
                    required_count: 3,
                    same_suit_count: 0,
                    seq_len: 0,
                    seq_wrap: false,
                    groups: vec![3],
                    ranks: Vec::new(),
                },
            ],
        }),
        special_effects: Vec::new(),
        team: None,
        min_turns: 1,
        max_turns: 500,
        player_count: 4,
    }
}

pub fn crazy_eights() -> Genome {
    let special_effects = vec![
        SpecialEffect {
            rank: Rank::Eight,
            effect: EffectKind::ExtraTurn,
            target: EffectTarget::NextPlayer,
            value: 0,
        },
        SpecialEffect {
            rank: Rank::Two,
            effect: EffectKind::DrawCards,
            target: EffectTarget::NextPlayer,
            value: 2,
        },
    ];

    Genome {
        id: 4,
        parent_ids: Vec::new(),
        generation: 0,
        setup: Setup {
            starting_hand_size: 7,
            deal_count: 0,
            initial_discard_count: 1,
            wildcards: Vec::new(),
            visibility: PileVisibility {
                deck: false,
                hand: false,
                discard: true,
                tableau: false,
            },
            starting_chips: 0,
            tableau_mode: TableauMode::MatchRank,
            sequence_direction: SequenceDirection::Ascending,
        },
        turn_structure: TurnStructure {
            phases: vec![
                Phase::Draw {
                    source: Location::Deck,
                    count: 1,
                    mandatory: false,
                    condition: Some(Condition::Leaf {
                        predicate: Predicate::CanPlay,
                        operator: ComparisonOperator::Equal,
                        value: 0,
                        reference: 0,
                    }),
                },
                Phase::Play {
                    target: Location::Discard,
                    min: 0,
                    max: 1,
                    mandatory: false,
                    pass_if_unable: true,
                    condition: None,
                },
            ],
            is_trick_based: false,
        },
        win_conditions: vec![WinCondition {
            kind: WinKind::EmptyHand,
            threshold: 0,
        }],
        card_scoring: Vec::new(),
        hand_evaluation: None,
        special_effects,
        team: None,
        min_turns: 1,
        max_turns: 2000,
        player_count: 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::compile;

    #[test]
    fn all_known_games_compile() {
        assert!(compile(&war()).is_ok());
        assert!(compile(&hearts()).is_ok());
        assert!(compile(&simple_poker()).is_ok());
        assert!(compile(&crazy_eights()).is_ok());
    }
}
