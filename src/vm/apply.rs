//! Move application and resolution. `apply` is the only place game
//! state changes; move generation only ever offers moves that are safe to
//! apply here (enforced by `vm::moves::generate_legal_moves`).

use crate::bytecode::ParsedGenome;
use crate::cards::{Card, Location};
use crate::genome::{EffectKind, EffectTarget, Phase, ScoringTrigger, TableauMode, TeamConfig};

use super::moves::*;
use super::state::GameState;

/// `team_scores` is indexed per team when the genome partitions players into
/// teams, falling back to the player's own index otherwise so an
/// untouched game still scores per player as before.
fn team_score_index(team: &Option<TeamConfig>, player: usize) -> usize {
    team.as_ref().and_then(|t| t.team_of(player)).map(|t| t as usize).unwrap_or(player)
}

pub fn apply(state: &mut GameState, genome: &ParsedGenome, mv: LegalMove, seed: u64) {
    match &genome.turn_structure.phases[mv.phase_index] {
        Phase::Draw { source, .. } => apply_draw(state, mv, *source, seed),
        Phase::Play { target, .. } => apply_play(state, genome, mv, *target),
        Phase::Discard { target, .. } => apply_discard(state, mv, *target),
        Phase::Trick { trump, high_card_wins, breaking_suit, .. } => {
            apply_trick(state, genome, mv, *trump, *high_card_wins, *breaking_suit)
        }
        Phase::Betting { .. } => apply_betting(state, mv),
        Phase::Claim => apply_claim(state, mv, seed),
        Phase::Bidding(config) => apply_bidding(state, mv, config.allow_nil),
    }
}

fn apply_draw(state: &mut GameState, mv: LegalMove, source: Location, seed: u64) {
    if mv.card_index != DRAW_HIT {
        return;
    }
    let p = state.current_player;
    match source {
        Location::Deck => {
            if state.deck.is_empty() {
                state.deck.reshuffle_from_discard(&mut state.discard, seed, state.turn_number);
            }
            if let Some(card) = state.deck.draw() {
                state.hands[p].push(card);
            }
        }
        Location::Discard => {
            if let Some(card) = state.discard.pop() {
                state.hands[p].push(card);
            }
        }
        _ => {
            let opponent = (p + 1) % state.player_count as usize;
            if let Some(card) = state.hands[opponent].pop() {
                state.hands[p].push(card);
            }
        }
    }
}

fn apply_play(state: &mut GameState, genome: &ParsedGenome, mv: LegalMove, target: Location) {
    if mv.card_index == PLAY_PASS {
        return;
    }
    let p = state.current_player;
    let played: Vec<Card> = if mv.is_set_play() {
        let rank = mv.set_play_rank();
        let mut taken = Vec::new();
        state.hands[p].retain(|c| {
            if c.rank() == rank {
                taken.push(*c);
                false
            } else {
                true
            }
        });
        taken
    } else {
        vec![state.hands[p].remove(mv.card_index as usize)]
    };

    for card in &played {
        place_card(state, genome, *card, target);
        apply_special_effect(state, genome, *card);
    }
}

fn place_card(state: &mut GameState, genome: &ParsedGenome, card: Card, target: Location) {
    match target {
        Location::Discard => state.discard.push(card),
        Location::Tableau => resolve_tableau_play(state, genome, card),
        Location::Hand => state.hands[state.current_player].push(card),
        _ => state.discard.push(card),
    }
}

fn resolve_tableau_play(state: &mut GameState, genome: &ParsedGenome, card: Card) {
    let p = state.current_player;
    match genome.setup.tableau_mode {
        TableauMode::None => {
            state.tableau[0].push(card);
        }
        TableauMode::War => {
            state.tableau[p].push(card);
            let n = state.player_count as usize;
            if (0..n).all(|i| !state.tableau[i].is_empty()) {
                state.battle_number += 1;
                let tops: Vec<(usize, Card)> = (0..n).map(|i| (i, *state.tableau[i].last().unwrap())).collect();
                let best = tops.iter().max_by_key(|(_, c)| c.rank().magnitude()).copied().unwrap();
                let tied = tops.iter().filter(|(_, c)| c.rank().magnitude() == best.1.rank().magnitude()).count();
                if tied == 1 {
                    let winner = best.0;
                    let mut pile: Vec<Card> = Vec::new();
                    for i in 0..n {
                        pile.extend(state.tableau[i].drain(..));
                    }
                    state.hands[winner].extend(pile);
                }
                // tied battle: piles stay face up, next play adds another layer (war continues).
            }
        }
        TableauMode::MatchRank => {
            if let Some(pos) = state.tableau[0].iter().position(|c| c.rank() == card.rank()) {
                state.tableau[0].remove(pos);
                state.scores[p] += 2;
                state.team_scores[team_score_index(&genome.team, p)] += 2;
                state.discard.push(card);
            } else {
                state.tableau[0].push(card);
            }
        }
        TableauMode::Sequence => {
            let suit_idx = card.suit() as usize;
            state.tableau[suit_idx].push(card);
        }
    }
}

fn apply_special_effect(state: &mut GameState, genome: &ParsedGenome, card: Card) {
    let Some(effect) = genome.effects.get(card.rank()) else {
        return;
    };
    let n = state.player_count as usize;
    let target_player = match effect.target {
        EffectTarget::NextPlayer => state.next_player(),
        EffectTarget::AllOpponents => state.next_player(),
        EffectTarget::SpecificSeat(seat) => (seat as usize).min(n - 1),
    };
    match effect.effect {
        EffectKind::Skip => {
            state.skip_count = state.skip_count.saturating_add((n as u8).saturating_sub(1).min(effect.value.max(1)));
        }
        EffectKind::Reverse => {
            state.play_direction = -state.play_direction;
        }
        EffectKind::DrawCards => {
            for _ in 0..effect.value {
                if state.deck.is_empty() {
                    state.deck.reshuffle_from_discard(&mut state.discard, 0, state.turn_number);
                }
                if let Some(drawn) = state.deck.draw() {
                    state.hands[target_player].push(drawn);
                } else {
                    break;
                }
            }
        }
        EffectKind::ExtraTurn => {
            state.skip_count = 0;
        }
        EffectKind::ForceDiscard => {
            for _ in 0..effect.value.min(state.hands[target_player].len() as u8) {
                if let Some(top) = state.hands[target_player].pop() {
                    state.discard.push(top);
                }
            }
        }
    }
}

fn apply_discard(state: &mut GameState, mv: LegalMove, target: Location) {
    if mv.card_index < 0 {
        return;
    }
    let p = state.current_player;
    let card = state.hands[p].remove(mv.card_index as usize);
    match target {
        Location::Discard => state.discard.push(card),
        _ => state.discard.push(card),
    }
}

fn apply_trick(
    state: &mut GameState,
    genome: &ParsedGenome,
    mv: LegalMove,
    trump: Option<crate::cards::Suit>,
    high_card_wins: bool,
    breaking_suit: Option<crate::cards::Suit>,
) {
    let p = state.current_player;
    let card = state.hands[p].remove(mv.card_index as usize);
    if Some(card.suit()) == breaking_suit {
        state.breaking_suit_broken = true;
    }
    state.current_trick.push((p, card));

    if state.current_trick.len() == state.player_count as usize {
        resolve_trick(state, genome, trump, high_card_wins);
    }
}

fn resolve_trick(state: &mut GameState, genome: &ParsedGenome, trump: Option<crate::cards::Suit>, high_card_wins: bool) {
    let lead_suit = state.current_trick[0].1.suit();
    let winner = state
        .current_trick
        .iter()
        .filter(|(_, c)| trump.map(|t| c.suit() == t).unwrap_or(false) || c.suit() == lead_suit)
        .max_by_key(|(_, c)| {
            let is_trump = trump.map(|t| c.suit() == t).unwrap_or(false);
            let magnitude = if high_card_wins { c.rank().magnitude() as i32 } else { -(c.rank().magnitude() as i32) };
            (is_trump as i32, magnitude)
        })
        .map(|(player, _)| *player)
        .unwrap_or(state.trick_leader);

    let points = trick_points(state, genome, winner);
    state.scores[winner] += points;
    state.team_scores[team_score_index(&genome.team, winner)] += points;

    for (_, card) in state.current_trick.drain(..) {
        state.discard.push(card);
    }
    state.trick_leader = winner;
    state.current_player = winner;
}

fn trick_points(state: &GameState, genome: &ParsedGenome, _winner: usize) -> i32 {
    if genome.card_scoring.is_empty() {
        // Fallback Hearts-style scoring: one point per heart, 13 for queen of spades.
        state
            .current_trick
            .iter()
            .map(|(_, c)| {
                if c.suit() == crate::cards::Suit::Heart {
                    1
                } else if c.suit() == crate::cards::Suit::Spade && c.rank() == crate::cards::Rank::Queen {
                    13
                } else {
                    0
                }
            })
            .sum()
    } else {
        state
            .current_trick
            .iter()
            .flat_map(|(_, c)| {
                genome
                    .card_scoring
                    .iter()
                    .filter(|rule| rule.trigger == ScoringTrigger::TrickWin && rule.matches(c.rank(), c.suit()))
                    .map(|rule| rule.points as i32)
            })
            .sum()
    }
}

fn apply_betting(state: &mut GameState, mv: LegalMove) {
    let p = state.current_player;
    let max_bet = state.current_bet.iter().cloned().max().unwrap_or(0);
    match mv.card_index {
        BET_CHECK => {}
        BET_BET => {
            let amount = state.chips[p].min(max_bet.max(1));
            state.chips[p] -= amount;
            state.current_bet[p] += amount;
            state.pot += amount;
        }
        BET_CALL => {
            let amount = (max_bet - state.current_bet[p]).min(state.chips[p]);
            state.chips[p] -= amount;
            state.current_bet[p] += amount;
            state.pot += amount;
        }
        BET_RAISE => {
            let to_call = max_bet.saturating_sub(state.current_bet[p]);
            let raise = state.chips[p].saturating_sub(to_call).min(to_call.max(1));
            let amount = (to_call + raise).min(state.chips[p]);
            state.chips[p] -= amount;
            state.current_bet[p] += amount;
            state.pot += amount;
            state.raise_count = state.raise_count.saturating_add(1);
        }
        BET_ALL_IN => {
            let amount = state.chips[p];
            state.chips[p] = 0;
            state.current_bet[p] += amount;
            state.pot += amount;
            state.all_in[p] = true;
        }
        BET_FOLD => {
            state.folded[p] = true;
        }
        _ => {}
    }
}

fn apply_claim(state: &mut GameState, mv: LegalMove, _seed: u64) {
    let p = state.current_player;
    match state.claimer {
        None => {
            if mv.card_index >= 0 {
                let card = state.hands[p].remove(mv.card_index as usize);
                state.discard.push(card);
                state.claimer = Some(p);
                state.claimed_rank = Some(crate::cards::Rank::from((state.turn_number % 13) as u8));
                state.claimed_count = 1;
            }
        }
        Some(claimer) => {
            if mv.card_index == CLAIM_CHALLENGE {
                let honest = state
                    .discard
                    .last()
                    .map(|c| Some(c.rank()) == state.claimed_rank)
                    .unwrap_or(false);
                let loser = if honest { p } else { claimer };
                let pile: Vec<Card> = state.discard.drain(..).collect();
                state.hands[loser].extend(pile);
            }
            state.claimer = None;
            state.claimed_rank = None;
            state.claimed_count = 0;
        }
    }
}

fn apply_bidding(state: &mut GameState, mv: LegalMove, allow_nil: bool) {
    let p = state.current_player;
    if mv.card_index == -1 && allow_nil {
        state.bids[p] = Some(-1);
    } else {
        state.bids[p] = Some(mv.card_index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::{compile, parse};
    use crate::known_games;

    #[test]
    fn war_tie_battle_keeps_cards_on_tableau() {
        let genome = known_games::war();
        let bytes = compile(&genome).unwrap();
        let parsed = parse(&bytes).unwrap();
        let mut state = GameState::new(2);
        state.hands[0] = vec![Card::from(0u8)]; // Two of Hearts
        state.hands[1] = vec![Card::from(1u8)]; // Two of Diamonds, same rank

        state.current_player = 0;
        apply(&mut state, &parsed, LegalMove { phase_index: 0, card_index: 0, target: Location::Tableau }, 1);
        state.current_player = 1;
        apply(&mut state, &parsed, LegalMove { phase_index: 0, card_index: 0, target: Location::Tableau }, 1);

        assert_eq!(state.card_conservation_count(), 2);
        assert!(state.hands[0].is_empty() && state.hands[1].is_empty());
    }

    #[test]
    fn trick_win_credits_the_winners_team_not_their_own_index() {
        let mut genome = known_games::hearts();
        genome.team = Some(crate::genome::TeamConfig::new(vec![0, 1, 0, 1]));
        let bytes = compile(&genome).unwrap();
        let parsed = parse(&bytes).unwrap();

        let mut state = GameState::new(4);
        state.hands = vec![vec![], vec![], vec![], vec![]];
        state.current_trick = vec![
            (0, Card::from(10u8)),
            (1, Card::from(20u8)),
            (2, Card::from(30u8)),
            (3, Card::from(5u8)),
        ];
        resolve_trick(&mut state, &parsed, None, true);
        let winner = state.trick_leader;

        assert_eq!(state.team_scores[0] + state.team_scores[1], state.scores.iter().sum::<i32>());
        assert_eq!(state.team_scores[winner % 2], state.scores[winner]);
    }

    #[test]
    fn match_rank_capture_credits_the_capturing_players_team() {
        let mut genome = known_games::crazy_eights();
        genome.setup.tableau_mode = TableauMode::MatchRank;
        genome.team = Some(crate::genome::TeamConfig::new(vec![0, 1, 0, 1]));
        let bytes = compile(&genome).unwrap();
        let parsed = parse(&bytes).unwrap();

        let mut state = GameState::new(4);
        state.tableau[0] = vec![Card::from(0u8)];
        state.current_player = 2;

        resolve_tableau_play(&mut state, &parsed, Card::from(1u8));

        assert_eq!(state.scores[2], 2);
        assert_eq!(state.team_scores[0], 2);
        assert_eq!(state.team_scores[1], 0);
    }
}
