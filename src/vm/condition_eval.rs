//! Evaluates a compiled `Condition` tree against the live game state.
//!
//! `reference` in a leaf record selects a player index for player-scoped
//! predicates (`HandSize`, `Score`, `Chips`); out-of-range references fall
//! back to the current player. `candidate` carries the card under
//! consideration when a condition is used as a per-card play filter (e.g.
//! `LeadSuitMatches`); guard-level uses (draw conditions) pass `None`, and
//! any per-card predicate then defaults to `true` rather than reject.

use crate::cards::Card;
use crate::genome::{Condition, Predicate};
use crate::vm::state::GameState;

fn player_ref(state: &GameState, reference: u8) -> usize {
    let idx = reference as usize;
    if idx < state.player_count as usize {
        idx
    } else {
        state.current_player
    }
}

fn leaf_observed(predicate: Predicate, state: &GameState, reference: u8, candidate: Option<Card>) -> i32 {
    use Predicate::*;
    match predicate {
        HandSize => state.hands[player_ref(state, reference)].len() as i32,
        TableauEmpty => {
            let idx = reference as usize;
            let empty = state
                .tableau
                .get(idx)
                .map(|p| p.is_empty())
                .unwrap_or_else(|| state.tableau.iter().all(|p| p.is_empty()));
            empty as i32
        }
        DiscardEmpty => state.discard.is_empty() as i32,
        DeckEmpty => state.deck.is_empty() as i32,
        IsLeader => (state.current_player == state.trick_leader) as i32,
        TopDiscardRank => state.discard.last().map(|c| c.rank().magnitude() as i32).unwrap_or(-1),
        TopDiscardSuit => state.discard.last().map(|c| c.suit() as i32).unwrap_or(-1),
        TableauTopRank => state
            .tableau
            .get(reference as usize)
            .and_then(|p| p.last())
            .map(|c| c.rank().magnitude() as i32)
            .unwrap_or(-1),
        Score => state.scores[player_ref(state, reference)],
        Chips => state.chips[player_ref(state, reference)] as i32,
        TurnNumber => state.turn_number as i32,
        PlayersRemaining => state.folded.iter().filter(|f| !**f).count() as i32,
        // The wildcard rank set lives on `Setup`, not `GameState`; without a
        // genome handle here this predicate cannot see it, so it reports "no".
        HasWildcardInHand => 0,
        LeadSuitMatches => match (state.current_trick.first(), candidate) {
            (Some((_, lead)), Some(card)) => (lead.suit() == card.suit()) as i32,
            _ => 1,
        },
        Always => 1,
        _ => unreachable!("can-act predicates are dispatched separately"),
    }
}

fn can_act(predicate: Predicate, state: &GameState) -> bool {
    use Predicate::*;
    let p = state.current_player;
    match predicate {
        CanDraw => !state.deck.is_empty() || state.discard.len() > 1,
        CanPlay => !state.hands[p].is_empty(),
        CanDiscard => !state.hands[p].is_empty(),
        CanCapture => state.tableau.iter().any(|pile| !pile.is_empty()),
        CanChallenge => state.claimer.is_some() && state.claimer != Some(p),
        CanBet => !state.folded[p] && !state.all_in[p],
        CanRaise => !state.folded[p] && !state.all_in[p] && (state.raise_count as u32) < state.current_max_raises,
        CanFold => !state.folded[p],
        CanCall => !state.folded[p] && !state.all_in[p],
        CanCheck => state.current_bet[p] == state.current_bet.iter().cloned().max().unwrap_or(0),
        CanAllIn => state.chips[p] > 0 && !state.all_in[p],
        CanBid => state.bids[p].is_none(),
        CanDeclareNil => state.bids[p].is_none(),
        CanExtendSequence => state.tableau.iter().any(|pile| !pile.is_empty()),
        CanStartPile => state.tableau.iter().any(|pile| pile.is_empty()),
        CanStand => !state.hands[p].is_empty() || !state.deck.is_empty(),
        _ => true,
    }
}

pub fn evaluate(condition: &Condition, state: &GameState, candidate: Option<Card>) -> bool {
    match condition {
        Condition::Leaf {
            predicate,
            operator,
            value,
            reference,
        } => {
            let observed = if (*predicate as u8) >= 20 && (*predicate as u8) <= 35 {
                can_act(*predicate, state) as i32
            } else {
                leaf_observed(*predicate, state, *reference, candidate)
            };
            operator.apply(observed, *value)
        }
        Condition::And(children) => children.iter().all(|c| evaluate(c, state, candidate)),
        Condition::Or(children) => children.iter().any(|c| evaluate(c, state, candidate)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::ComparisonOperator;

    #[test]
    fn always_condition_holds() {
        let state = GameState::new(2);
        assert!(evaluate(&Condition::always(), &state, None));
    }

    #[test]
    fn hand_size_threshold() {
        let mut state = GameState::new(2);
        state.hands[0] = vec![Card::from(0u8), Card::from(1u8)];
        let cond = Condition::Leaf {
            predicate: Predicate::HandSize,
            operator: ComparisonOperator::GreaterOrEqual,
            value: 2,
            reference: 0,
        };
        assert!(evaluate(&cond, &state, None));
    }

    #[test]
    fn can_draw_reports_false_on_empty_deck_and_discard() {
        let mut state = GameState::new(2);
        state.deck = crate::cards::Deck::standard();
        while state.deck.draw().is_some() {}
        let cond = Condition::Leaf {
            predicate: Predicate::CanDraw,
            operator: ComparisonOperator::Equal,
            value: 0,
            reference: 0,
        };
        assert!(evaluate(&cond, &state, None));
    }
}
